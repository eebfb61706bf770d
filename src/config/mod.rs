//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (provider endpoints, timeouts, limits, messages)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    AcquireConfig, Cli, Command, FetchArgs, InvokeArgs, LogFormat, LogLevel, ServeArgs,
};
