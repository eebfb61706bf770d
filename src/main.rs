//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geoip_api` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncReadExt;

use geoip_api::config::{FetchArgs, InvokeArgs, ServeArgs, MAXMIND_LICENSE_KEY_ENV};
use geoip_api::initialization::{init_crypto_provider, init_logger_with};
use geoip_api::{
    init_database, run_acquisition, start_lookup_server, Cli, Command, Invocation, LookupHandler,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting MAXMIND_LICENSE_KEY in .env without exporting it manually
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let result = match cli.command {
        Command::Fetch(args) => fetch(args).await,
        Command::Serve(args) => serve(args).await,
        Command::Invoke(args) => invoke(args).await,
    };

    if let Err(e) = result {
        eprintln!("geoip_api error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn fetch(args: FetchArgs) -> Result<()> {
    let config = args.into_acquire_config().with_context(|| {
        format!(
            "No MaxMind license key: pass --license-key or set {}",
            MAXMIND_LICENSE_KEY_ENV
        )
    })?;

    let report = run_acquisition(&config)
        .await
        .context("GeoIP database acquisition failed")?;

    println!(
        "✅ Downloaded {} byte archive, extracted {} byte database",
        report.archive_bytes, report.database_bytes
    );
    println!("Database saved in {}", report.database_path.display());
    Ok(())
}

async fn serve(args: ServeArgs) -> Result<()> {
    let database = init_database(&args.db_path)?;
    start_lookup_server(args.bind, LookupHandler::new(database)).await
}

async fn invoke(args: InvokeArgs) -> Result<()> {
    // Database first; the event is only read once it is loaded
    let database = init_database(&args.db_path)?;
    let handler = LookupHandler::new(database);

    let raw = read_event(&args.event).await?;
    let invocation = Invocation::from_json(&raw).context("Invalid invocation event")?;

    let response = handler.handle(&invocation);
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

async fn read_event(source: &Path) -> Result<String> {
    if source == Path::new("-") {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("Failed to read invocation event from stdin")?;
        return Ok(raw);
    }

    tokio::fs::read_to_string(source)
        .await
        .with_context(|| format!("Failed to read invocation event from {}", source.display()))
}
