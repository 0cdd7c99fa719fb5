use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid time: {0} (expected HH:MM)")]
    InvalidTime(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
