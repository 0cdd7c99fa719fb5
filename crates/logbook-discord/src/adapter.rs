use std::sync::Arc;
use std::time::Duration;

use serenity::model::gateway::GatewayIntents;
use serenity::Client;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use logbook_core::delivery::JobDelivery;

use crate::context::AppContext;
use crate::handler::LogbookHandler;

/// Discord adapter.
///
/// Wraps a serenity `Client` and drives the event loop until the process
/// exits. Reconnects automatically whenever the gateway drops.
pub struct DiscordAdapter {
    app: Arc<AppContext>,
}

impl DiscordAdapter {
    pub fn new(app: Arc<AppContext>) -> Self {
        Self { app }
    }

    /// Connect to Discord and keep reconnecting whenever the gateway drops.
    ///
    /// Never returns; runs for the lifetime of the process.
    ///
    /// The delivery task for scheduler-fired jobs is spawned once on
    /// `Arc<Http>` (REST), so it survives gateway reconnects without being
    /// restarted.
    pub async fn run(self, delivery_rx: mpsc::Receiver<JobDelivery>) {
        // GUILD_MEMBERS backs the role listing and nickname lookups.
        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
            | GatewayIntents::GUILD_MEMBERS;

        // Build first client; retry indefinitely until the initial connection succeeds.
        let first_client = loop {
            match self.build_client(intents).await {
                Ok(c) => break c,
                Err(e) => {
                    error!("Discord: initial connect failed ({e}), retrying in 30s");
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
            }
        };

        let http = Arc::clone(&first_client.http);
        tokio::spawn(crate::delivery::run_delivery(
            http,
            Arc::clone(&self.app),
            delivery_rx,
        ));

        let mut client = first_client;

        loop {
            info!("Discord: gateway connecting");

            if let Err(e) = client.start().await {
                warn!("Discord: gateway error ({e}), reconnecting in 5s");
            } else {
                info!("Discord: gateway stopped cleanly, reconnecting in 5s");
            }

            tokio::time::sleep(Duration::from_secs(5)).await;

            client = loop {
                match self.build_client(intents).await {
                    Ok(c) => break c,
                    Err(e) => {
                        error!("Discord: reconnect failed ({e}), retrying in 30s");
                        tokio::time::sleep(Duration::from_secs(30)).await;
                    }
                }
            };
        }
    }

    async fn build_client(&self, intents: GatewayIntents) -> Result<Client, serenity::Error> {
        let handler = LogbookHandler {
            app: Arc::clone(&self.app),
        };

        Client::builder(&self.app.config.bot_token, intents)
            .event_handler(handler)
            .await
    }
}
