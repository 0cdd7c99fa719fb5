pub mod config;
pub mod delivery;
pub mod error;

pub use config::LogbookConfig;
pub use error::{LogbookError, Result};
