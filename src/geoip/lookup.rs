//! IP address lookup.
//!
//! [`GeoIpLookup`] is the query-by-IP capability the handler depends on;
//! [`MaxMindDatabase`] implements it over a GeoLite2 `.mmdb` file held in memory.

use std::net::IpAddr;
use std::path::Path;

use maxminddb::Reader;

use super::metadata::extract_metadata;
use super::types::{DatabaseMetadata, GeoRecord};
use crate::error_handling::{DatabaseError, LookupError};

/// Point lookups against a read-only GeoIP database.
pub trait GeoIpLookup: Send + Sync {
    /// Returns the record for `ip`, or `LookupError::NotFound` if there is none.
    fn lookup(&self, ip: IpAddr) -> Result<GeoRecord, LookupError>;
}

/// A MaxMind database loaded fully into memory.
pub struct MaxMindDatabase {
    reader: Reader<Vec<u8>>,
    metadata: DatabaseMetadata,
}

impl MaxMindDatabase {
    /// Reads and parses the database at `path`.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let bytes = std::fs::read(path).map_err(|source| DatabaseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes, path)
    }

    /// Parses an in-memory database; `source` is only recorded in the metadata.
    pub fn from_bytes(bytes: Vec<u8>, source: &Path) -> Result<Self, DatabaseError> {
        let reader = Reader::from_source(bytes).map_err(|source_err| DatabaseError::Parse {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let metadata = extract_metadata(&reader, source);
        Ok(Self { reader, metadata })
    }

    /// Metadata of the loaded database.
    pub fn metadata(&self) -> &DatabaseMetadata {
        &self.metadata
    }
}

impl std::fmt::Debug for MaxMindDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaxMindDatabase")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl GeoIpLookup for MaxMindDatabase {
    fn lookup(&self, ip: IpAddr) -> Result<GeoRecord, LookupError> {
        // maxminddb 0.27: lookup() locates the record, decode() materializes it
        let result = self.reader.lookup(ip)?;
        if !result.has_data() {
            return Err(LookupError::NotFound(ip));
        }

        match result.decode::<serde_json::Value>()? {
            Some(value) => Ok(GeoRecord::new(value)),
            None => Err(LookupError::NotFound(ip)),
        }
    }
}
