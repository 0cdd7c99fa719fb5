//! Proactive delivery: executes scheduler-fired jobs against Discord.
//!
//! Reminders are broadcast verbatim; sweeps force-close every open session
//! and announce each closure the same way a manual clock-out is announced.

use std::sync::Arc;

use chrono::Utc;
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId, UserId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use logbook_core::delivery::{JobAction, JobDelivery};

use crate::context::AppContext;
use crate::format;
use crate::roles;

/// Background task that receives fired jobs and delivers them.
///
/// Spawned once in `adapter.rs` after the serenity client is built. Uses
/// `Arc<Http>` (REST, not the gateway), so it keeps working across gateway
/// reconnects. A failed delivery is logged and dropped; nothing retries.
pub async fn run_delivery(
    http: Arc<Http>,
    app: Arc<AppContext>,
    mut rx: mpsc::Receiver<JobDelivery>,
) {
    while let Some(delivery) = rx.recv().await {
        debug!(job_id = %delivery.job_id, "delivering fired job");
        match delivery.action {
            JobAction::Reminder {
                channel_id,
                message,
            } => {
                if let Err(e) = ChannelId::new(channel_id).say(&http, &message).await {
                    warn!(job_id = %delivery.job_id, channel_id, error = %e, "reminder delivery failed");
                } else {
                    info!(job_id = %delivery.job_id, channel_id, "reminder delivered");
                }
            }
            JobAction::Sweep { channel_id } => {
                run_sweep(&http, &app, &delivery.job_id, channel_id).await;
            }
        }
    }
    info!("delivery task exiting (channel closed)");
}

/// Close every open session and announce each closure in the logbook channel.
async fn run_sweep(http: &Http, app: &AppContext, job_id: &str, channel_id: u64) {
    let closed = app.ledger().sweep_clock_out_all(Utc::now());
    if closed.is_empty() {
        debug!(job_id, "sweep found no open sessions");
        return;
    }
    info!(job_id, count = closed.len(), "sweep closed sessions");

    let guild_id = guild_of_channel(http, channel_id).await;
    for (user_id, record) in closed {
        let name = match guild_id {
            Some(gid) => member_display_name(http, gid, user_id).await,
            None => format!("<@{}>", user_id),
        };
        let text = format::clock_out_reply(&name, &record);
        if let Err(e) = ChannelId::new(channel_id).say(http, &text).await {
            warn!(job_id, user_id, error = %e, "sweep announcement failed");
        }
    }
}

/// The guild owning a channel, via REST (no gateway context here).
async fn guild_of_channel(http: &Http, channel_id: u64) -> Option<GuildId> {
    match http.get_channel(ChannelId::new(channel_id)).await {
        Ok(channel) => channel.guild().map(|gc| gc.guild_id),
        Err(e) => {
            warn!(channel_id, error = %e, "channel fetch failed");
            None
        }
    }
}

async fn member_display_name(http: &Http, guild_id: GuildId, user_id: u64) -> String {
    match http.get_member(guild_id, UserId::new(user_id)).await {
        Ok(member) => roles::display_name(&member),
        Err(_) => format!("<@{}>", user_id),
    }
}
