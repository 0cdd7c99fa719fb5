use thiserror::Error;

/// Errors produced by the duty ledger. All are recoverable: the command that
/// triggered them reports failure text and the process carries on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DutyError {
    #[error("user {user_id} is already clocked in")]
    AlreadyClockedIn { user_id: u64 },

    #[error("user {user_id} is not clocked in")]
    NotClockedIn { user_id: u64 },

    #[error("no duty {duty_id} found for user {user_id}")]
    DutyNotFound { user_id: u64, duty_id: String },
}

pub type Result<T> = std::result::Result<T, DutyError>;
