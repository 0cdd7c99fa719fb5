use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// When a job fires. All times are interpreted in the engine's configured
/// timezone, not UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    /// Every day at HH:MM local time.
    Daily { hour: u8, minute: u8 },
}

/// A scheduled job. Held in memory only; jobs are registered at startup and
/// live for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub schedule: Schedule,
    /// Opaque action payload (JSON). The engine never inspects it; the
    /// delivery router parses it when the job fires.
    pub action: String,
    /// Next UTC instant this job is due, `None` when exhausted.
    pub next_run: Option<DateTime<Utc>>,
    pub run_count: u32,
}
