use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context as _;
use tracing::{info, warn};

use logbook_core::delivery::{JobAction, JobDelivery};
use logbook_core::LogbookConfig;
use logbook_discord::{AppContext, DiscordAdapter};
use logbook_scheduler::{Job, SchedulerEngine};

mod jobs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logbook=info".into()),
        )
        .init();

    // Load config: explicit LOGBOOK_CONFIG path > ./logbook.toml > defaults.
    let config_path = std::env::var("LOGBOOK_CONFIG").ok();
    let config = LogbookConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        LogbookConfig::default()
    });

    // The one fatal startup error: no bot token.
    config.require_token()?;

    let tz = chrono_tz::Tz::from_str(&config.schedule.timezone)
        .map_err(|_| anyhow::anyhow!("invalid timezone: {}", config.schedule.timezone))?;
    info!(tz = %tz, "logbook starting");

    let app = Arc::new(AppContext::new(config.discord.clone(), tz));

    // Fired-job channel: SchedulerEngine -> delivery router task.
    let (fired_tx, mut fired_rx) = tokio::sync::mpsc::channel::<Job>(64);
    // Delivery channel: router -> Discord delivery task.
    let (delivery_tx, delivery_rx) = tokio::sync::mpsc::channel::<JobDelivery>(64);

    let mut engine = SchedulerEngine::new(&config.schedule.timezone, fired_tx)?;
    jobs::register(&mut engine, &config).context("registering scheduled jobs")?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(engine.run(shutdown_rx));

    // Delivery router: decode each fired job's action and hand it to Discord.
    tokio::spawn(async move {
        while let Some(job) = fired_rx.recv().await {
            let action: JobAction = match serde_json::from_str(&job.action) {
                Ok(a) => a,
                Err(e) => {
                    warn!(job_id = %job.id, "delivery router: bad action JSON: {e}");
                    continue;
                }
            };
            if delivery_tx
                .send(JobDelivery {
                    job_id: job.id,
                    action,
                })
                .await
                .is_err()
            {
                break;
            }
        }
    });

    let adapter = DiscordAdapter::new(app);
    tokio::select! {
        _ = adapter.run(delivery_rx) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    }

    Ok(())
}
