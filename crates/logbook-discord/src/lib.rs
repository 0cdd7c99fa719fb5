pub mod adapter;
pub mod commands;
pub mod context;
pub mod delivery;
pub mod error;
pub mod format;
pub mod handler;
pub mod roles;
pub mod send;

pub use adapter::DiscordAdapter;
pub use context::AppContext;
pub use error::DiscordError;
