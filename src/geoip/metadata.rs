//! Metadata extraction for GeoIP databases.

use std::path::Path;

use maxminddb::Reader;

use super::types::DatabaseMetadata;

/// Extracts metadata from a GeoIP database
pub(crate) fn extract_metadata<T: AsRef<[u8]>>(
    reader: &Reader<T>,
    source: &Path,
) -> DatabaseMetadata {
    DatabaseMetadata {
        source: source.to_path_buf(),
        database_type: reader.metadata.database_type.clone(),
        build_epoch: reader.metadata.build_epoch,
        ip_version: reader.metadata.ip_version,
    }
}

/// Human-readable build date (`YYYY-MM-DD`), or the raw epoch if out of range.
pub(crate) fn build_date(metadata: &DatabaseMetadata) -> String {
    i64::try_from(metadata.build_epoch)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format!("epoch {}", metadata.build_epoch))
}
