//! Registers the standing job table from config: daily reminder broadcasts
//! and auto-clockout sweeps, all aimed at the logbook channel.

use anyhow::Context as _;

use logbook_core::delivery::JobAction;
use logbook_core::LogbookConfig;
use logbook_scheduler::{schedule, SchedulerEngine};

pub fn register(engine: &mut SchedulerEngine, config: &LogbookConfig) -> anyhow::Result<()> {
    let channel_id = config.discord.logbook_channel_id;

    for (i, reminder) in config.schedule.reminders.iter().enumerate() {
        let daily = schedule::daily_at(&reminder.time)
            .with_context(|| format!("reminder time {:?}", reminder.time))?;
        let action = serde_json::to_string(&JobAction::Reminder {
            channel_id,
            message: reminder.message.clone(),
        })?;
        engine.add_job(&format!("reminder-{}", i), daily, &action);
    }

    for (i, time) in config.schedule.sweeps.iter().enumerate() {
        let daily =
            schedule::daily_at(time).with_context(|| format!("sweep time {:?}", time))?;
        let action = serde_json::to_string(&JobAction::Sweep { channel_id })?;
        engine.add_job(&format!("sweep-{}", i), daily, &action);
    }

    Ok(())
}
