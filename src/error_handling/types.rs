//! Error type definitions.
//!
//! This module defines the error types used throughout the application, grouped
//! by the stage that raises them: startup, acquisition, database load and
//! per-request lookup.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Reasons a single download attempt ends without a completed file.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// DNS, connect, TLS or mid-body transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] ReqwestError),

    /// The server answered with a status that is neither 200 nor a followed redirect.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// A redirect response without a usable `Location` header.
    #[error("redirect status {status} without a usable Location header")]
    MissingLocation {
        /// Status code of the redirect response
        status: u16,
    },

    /// The redirect chain did not terminate within the hop budget.
    #[error("gave up after {0} redirects")]
    TooManyRedirects(usize),

    /// The body exceeded the configured size cap.
    #[error("response body exceeds {limit} bytes")]
    TooLarge {
        /// Maximum accepted size in bytes
        limit: u64,
    },

    /// The URL could not be parsed or joined.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Writing the destination file failed.
    #[error("failed to write {path:?}: {source}")]
    Io {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Errors raised while reading an archive or writing its selected entries.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The archive could not be opened or decoded.
    #[error("failed to read archive {path:?}: {source}")]
    Archive {
        /// Archive path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A selected entry could not be written below the target directory.
    #[error("failed to write {path:?}: {source}")]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Terminal failures of an acquisition run. Any of these must stop the deploy.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// The license key was empty.
    #[error("MaxMind license key is missing")]
    MissingLicenseKey,

    /// Setting up the temp directory, target directory or HTTP client failed.
    #[error("failed to prepare acquisition: {0}")]
    Setup(String),

    /// The download did not complete.
    #[error("download of {url} failed: {source}")]
    Download {
        /// Redacted source URL
        url: String,
        /// Cause reported by the downloader
        source: DownloadError,
    },

    /// The archive could not be extracted.
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// The filter did not select exactly one entry.
    #[error("expected exactly one .{extension} file in the archive, extracted {found}")]
    ExtractionMismatch {
        /// Extension the filter selected on
        extension: String,
        /// Number of entries written
        found: usize,
    },
}

/// Errors loading the database at startup. Fatal: the process never becomes ready.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The database file could not be read.
    #[error("failed to read GeoIP database from {path:?}: {source}")]
    Read {
        /// Database path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not a valid MaxMind database.
    #[error("failed to parse GeoIP database from {path:?}: {source}")]
    Parse {
        /// Database path
        path: PathBuf,
        /// Decoder error
        source: maxminddb::MaxMindDbError,
    },
}

/// Per-request lookup failures. Logged, then answered with a generic HTTP 500.
#[derive(Error, Debug)]
pub enum LookupError {
    /// No candidate IP was present on the invocation.
    #[error("no IP address available on the invocation")]
    MissingAddress,

    /// The chosen IP string is not an IPv4/IPv6 literal.
    #[error("invalid IP address {0:?}")]
    InvalidAddress(String),

    /// The database holds no record for the address.
    #[error("no record for {0}")]
    NotFound(std::net::IpAddr),

    /// The database reader failed while locating or decoding the record.
    #[error("database error: {0}")]
    Database(#[from] maxminddb::MaxMindDbError),

    /// The record could not be rendered as JSON.
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
