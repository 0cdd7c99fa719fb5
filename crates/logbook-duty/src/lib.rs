pub mod error;
pub mod ledger;
pub mod policy;
pub mod types;

pub use error::{DutyError, Result};
pub use ledger::DutyLedger;
pub use types::{DutyRecord, Session};
