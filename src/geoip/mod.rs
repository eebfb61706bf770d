//! GeoIP lookup using the MaxMind GeoLite2 City database.
//!
//! The database is loaded once per process and shared read-only by every
//! invocation; there is no reload path.

mod lookup;
mod metadata;
mod types;

use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::error_handling::DatabaseError;

// Re-export public API
pub use lookup::{GeoIpLookup, MaxMindDatabase};
pub use types::{DatabaseMetadata, GeoRecord};

/// Process-wide database, set at most once.
static GEOIP_CITY_DATABASE: OnceLock<Arc<MaxMindDatabase>> = OnceLock::new();

/// Loads the database at `path` into the process-wide slot and returns it.
///
/// Later calls return the database loaded first, whatever `path` they pass.
///
/// # Errors
///
/// Returns `DatabaseError` if the file cannot be read or parsed. Callers treat
/// this as fatal: without a database the process cannot serve.
pub fn init_database(path: &Path) -> Result<Arc<MaxMindDatabase>, DatabaseError> {
    if let Some(database) = GEOIP_CITY_DATABASE.get() {
        log::info!("GeoIP database already loaded");
        return Ok(Arc::clone(database));
    }

    log::info!("Loading GeoIP database from: {:?}", path);
    let database = MaxMindDatabase::open(path)?;
    let meta = database.metadata();
    log::info!(
        "GeoIP database loaded: {} (built {}, IPv{})",
        meta.database_type,
        metadata::build_date(meta),
        meta.ip_version
    );

    Ok(Arc::clone(
        GEOIP_CITY_DATABASE.get_or_init(|| Arc::new(database)),
    ))
}

/// The process-wide database, if [`init_database`] has succeeded.
pub fn database() -> Option<Arc<MaxMindDatabase>> {
    GEOIP_CITY_DATABASE.get().map(Arc::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_database_failure_leaves_slot_empty() {
        let result = init_database(Path::new("nonexistent/GeoLite2-City.mmdb"));
        assert!(result.is_err());
        assert!(database().is_none());
    }
}
