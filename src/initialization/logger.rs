//! Logger initialization.
//!
//! One `env_logger` backend, two line formats: a colored human format for
//! terminals and one JSON object per line for log shippers.

use std::io::Write;

use colored::*;
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies whose chatter is capped regardless of the requested level.
const NOISY_MODULES: &[(&str, LevelFilter)] = &[
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    ("h2", LevelFilter::Info),
    ("rustls", LevelFilter::Warn),
    ("tower_http", LevelFilter::Info),
];

/// Initializes the process logger.
///
/// `RUST_LOG` is read first; `level` then overrides it for this crate and as
/// the global default. Noisy dependencies stay capped at `info`/`warn`.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # JSON lines for a log collector
/// geoip_api --log-format json serve
///
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=geoip_api::acquire=debug geoip_api fetch
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, cap) in NOISY_MODULES {
        builder.filter_module(module, (*cap).min(level));
    }
    builder.filter_module(env!("CARGO_CRATE_NAME"), level);

    match format {
        LogFormat::Json => builder.format(write_json_line),
        LogFormat::Plain => builder.format(write_plain_line),
    };

    builder.try_init()?;
    Ok(())
}

fn write_json_line(buf: &mut Formatter, record: &Record<'_>) -> std::io::Result<()> {
    let line = serde_json::json!({
        "ts": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    });
    writeln!(buf, "{}", line)
}

fn write_plain_line(buf: &mut Formatter, record: &Record<'_>) -> std::io::Result<()> {
    let level = format!("{:<5}", record.level());
    let level = match record.level() {
        Level::Error => level.red().bold(),
        Level::Warn => level.yellow(),
        Level::Info => level.green(),
        Level::Debug => level.blue(),
        Level::Trace => level.dimmed(),
    };

    writeln!(
        buf,
        "{} {} {} {}",
        chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
        level,
        record.target().cyan(),
        record.args()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);

        // Some logger is installed by now, from this test or another one
        let result = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }

    #[test]
    fn test_noisy_modules_never_exceed_info() {
        assert!(NOISY_MODULES
            .iter()
            .all(|(_, cap)| *cap <= LevelFilter::Info));
    }
}
