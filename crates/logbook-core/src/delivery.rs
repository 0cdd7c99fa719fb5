//! Scheduled-job delivery types, shared between the scheduler wiring and the
//! Discord adapter.

use serde::{Deserialize, Serialize};

/// What a fired job should do. Stored as a JSON string in the scheduler's
/// `Job::action` field so the scheduler crate stays ignorant of the domain;
/// parsed back by the delivery router when the job fires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobAction {
    /// Broadcast `message` to a channel verbatim.
    Reminder { channel_id: u64, message: String },
    /// Force-close every open duty session and announce each closure
    /// in the given channel.
    Sweep { channel_id: u64 },
}

/// Parsed and ready-to-execute action; passed from the delivery router to the
/// Discord delivery task.
#[derive(Debug, Clone)]
pub struct JobDelivery {
    /// Originating job ID, used for logging.
    pub job_id: String,
    pub action: JobAction,
}
