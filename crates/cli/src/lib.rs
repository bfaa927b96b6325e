//! Library side of the `audiopref` command-line tool
//!
//! Holds configuration loading, logging setup and the subcommand
//! implementations so they can be driven from tests without a process.

pub mod commands;
pub mod config;
pub mod logging;

pub use config::{AppConfig, PreferenceOverrides};
pub use logging::{setup_logging, LoggingConfig};
