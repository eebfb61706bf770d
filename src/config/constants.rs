//! Configuration constants.
//!
//! This module defines the constants used throughout the application, including
//! provider endpoints, timeouts, size limits and fixed response messages.

use std::time::Duration;

// MaxMind provider
/// MaxMind download base URL
pub const MAXMIND_DOWNLOAD_BASE: &str = "https://download.maxmind.com/app/geoip_download";
/// Environment variable name for MaxMind license key
pub const MAXMIND_LICENSE_KEY_ENV: &str = "MAXMIND_LICENSE_KEY";
/// Edition (product) identifier of the city-resolution dataset
pub const DEFAULT_EDITION_ID: &str = "GeoLite2-City";
/// Archive suffix requested from the provider
pub const ARCHIVE_SUFFIX: &str = "tar.gz";
/// Extension of the database file inside the archive
pub const DATABASE_EXTENSION: &str = "mmdb";
/// Leading path segments dropped from archive entries (the dated wrapper directory)
pub const ARCHIVE_STRIP_DEPTH: usize = 1;
/// Prefix of the private temp directory each acquisition run downloads into
pub const TEMP_DIR_PREFIX: &str = "geoipapi-";

// Paths
/// Directory the extracted database is written to
pub const DEFAULT_DATA_DIR: &str = "./data";
/// Database path the lookup handler loads at startup
pub const DEFAULT_DATABASE_PATH: &str = "./data/GeoLite2-City.mmdb";
/// Default bind address of the lookup server
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

// Download handling
/// Maximum number of redirect hops to follow
/// Prevents infinite redirect loops between misconfigured mirrors
pub const MAX_REDIRECT_HOPS: usize = 10;
/// Whole-request timeout for the database download in seconds
/// The City archive is tens of megabytes; 5 minutes covers slow links
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 300;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Maximum archive size in bytes (200MB)
pub const MAX_DATABASE_DOWNLOAD_SIZE: u64 = 200 * 1024 * 1024;

/// Convenience accessor for the default download timeout.
pub fn download_timeout() -> Duration {
    Duration::from_secs(DOWNLOAD_TIMEOUT_SECS)
}

// Invocation handling
/// `source` value carried by scheduled (warm-keeping) invocations
pub const SCHEDULED_EVENT_SOURCE: &str = "aws.events";
/// Body message returned to warmup invocations
pub const WARMUP_MESSAGE: &str = "Warmup successful";
/// Generic message returned when a lookup fails; the cause is only logged
pub const LOOKUP_ERROR_MESSAGE: &str = "An unknown error occurred while trying to resolve the IP.";
/// Name of the query string parameter carrying an explicit IP
pub const IP_QUERY_PARAM: &str = "ip";
