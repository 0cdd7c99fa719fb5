use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogbookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("no bot token configured (set discord.bot_token or LOGBOOK_DISCORD_BOT_TOKEN)")]
    NoToken,
}

pub type Result<T> = std::result::Result<T, LogbookError>;
