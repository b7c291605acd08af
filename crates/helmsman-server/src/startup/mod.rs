//! Process startup: logging and database bootstrap

pub mod database;
pub mod logging;

pub use database::{connect, migrate};
pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
