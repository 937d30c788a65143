//! CLI command implementations

pub mod config;
pub mod log;
pub mod sweep;
pub mod watch;
