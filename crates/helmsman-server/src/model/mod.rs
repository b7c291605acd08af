pub mod config;

pub use config::{Cli, Command, Configuration, DatabaseSettings};
