pub mod engine;
pub mod error;
pub mod schedule;
pub mod types;

pub use engine::SchedulerEngine;
pub use error::{Result, SchedulerError};
pub use schedule::{compute_next_run, parse_hhmm};
pub use types::{Job, Schedule};
