//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    download_timeout, DEFAULT_BIND_ADDR, DEFAULT_DATABASE_PATH, DEFAULT_DATA_DIR,
    DEFAULT_EDITION_ID, DOWNLOAD_TIMEOUT_SECS, MAXMIND_DOWNLOAD_BASE, MAXMIND_LICENSE_KEY_ENV,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Settings for one database acquisition run (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use geoip_api::AcquireConfig;
///
/// let config = AcquireConfig {
///     license_key: "YOUR_KEY".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct AcquireConfig {
    /// Provider-issued license key
    pub license_key: String,

    /// Edition (product) identifier, e.g. `GeoLite2-City`
    pub edition_id: String,

    /// Provider download endpoint
    pub download_base: String,

    /// Directory the extracted database is written to
    pub target_dir: PathBuf,

    /// Whole-request download timeout
    pub timeout: Duration,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            license_key: String::new(),
            edition_id: DEFAULT_EDITION_ID.to_string(),
            download_base: MAXMIND_DOWNLOAD_BASE.to_string(),
            target_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timeout: download_timeout(),
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Refresh the database (deploy time)
/// MAXMIND_LICENSE_KEY=... geoip_api fetch --target-dir ./data
///
/// # Serve lookups
/// geoip_api serve --db-path ./data/GeoLite2-City.mmdb --bind 0.0.0.0:3000
///
/// # Handle one serverless-style invocation envelope from stdin
/// echo '{"source":"aws.events"}' | geoip_api invoke
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "geoip_api",
    about = "Fetches the GeoLite2 City database and answers IP geolocation lookups."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of the `geoip_api` binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download the database archive and extract the .mmdb file
    Fetch(FetchArgs),
    /// Load the database and serve `GET /` lookups
    Serve(ServeArgs),
    /// Load the database and answer a single JSON invocation envelope
    Invoke(InvokeArgs),
}

/// Options for `fetch`.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// MaxMind license key (falls back to the MAXMIND_LICENSE_KEY env var)
    #[arg(long)]
    pub license_key: Option<String>,

    /// Edition identifier of the dataset to download
    #[arg(long, default_value = DEFAULT_EDITION_ID)]
    pub edition_id: String,

    /// Download endpoint
    #[arg(long, default_value = MAXMIND_DOWNLOAD_BASE)]
    pub download_base: String,

    /// Directory the extracted database is written to
    #[arg(long, value_parser, default_value = DEFAULT_DATA_DIR)]
    pub target_dir: PathBuf,

    /// Download timeout in seconds
    #[arg(long, default_value_t = DOWNLOAD_TIMEOUT_SECS)]
    pub timeout_seconds: u64,
}

impl FetchArgs {
    /// Resolves the license key and builds the acquisition settings.
    ///
    /// Returns `None` when no license key was given on the command line and
    /// `MAXMIND_LICENSE_KEY` is unset or empty.
    pub fn into_acquire_config(self) -> Option<AcquireConfig> {
        let license_key = self
            .license_key
            .or_else(|| std::env::var(MAXMIND_LICENSE_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())?;

        Some(AcquireConfig {
            license_key,
            edition_id: self.edition_id,
            download_base: self.download_base,
            target_dir: self.target_dir,
            timeout: Duration::from_secs(self.timeout_seconds),
        })
    }
}

/// Options for `serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Path to the GeoLite2 City database
    #[arg(long, value_parser, default_value = DEFAULT_DATABASE_PATH)]
    pub db_path: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    pub bind: SocketAddr,
}

/// Options for `invoke`.
#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Path to the GeoLite2 City database
    #[arg(long, value_parser, default_value = DEFAULT_DATABASE_PATH)]
    pub db_path: PathBuf,

    /// File holding the invocation envelope (`-` reads stdin)
    #[arg(value_parser, default_value = "-")]
    pub event: PathBuf,
}
