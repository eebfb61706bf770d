// Shared test helpers for archive fixtures and in-memory databases.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::collections::HashMap;
use std::io::Write;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::write::GzEncoder;
use flate2::Compression;

use geoip_api::{GeoIpLookup, GeoRecord, LookupError};

/// Builds a gzip-compressed tarball from `(path, contents)` pairs.
#[allow(dead_code)] // Used by other test files
pub fn tar_gz_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut tar_builder = tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_path(name).expect("Failed to set tar entry path");
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        tar_builder
            .append(&header, *content)
            .expect("Failed to append tar entry");
    }
    let tar_bytes = tar_builder.into_inner().expect("Failed to finish tar");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar_bytes).expect("Failed to compress tar");
    encoder.finish().expect("Failed to finish gzip stream")
}

/// In-memory database that counts how often it is queried.
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingDatabase {
    records: HashMap<IpAddr, serde_json::Value>,
    queries: AtomicUsize,
}

#[allow(dead_code)]
impl CountingDatabase {
    /// Adds a record for `ip`.
    pub fn with_record(mut self, ip: &str, record: serde_json::Value) -> Self {
        self.records
            .insert(ip.parse().expect("Invalid test IP"), record);
        self
    }

    /// Number of lookups served so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl GeoIpLookup for CountingDatabase {
    fn lookup(&self, ip: IpAddr) -> Result<GeoRecord, LookupError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.records
            .get(&ip)
            .cloned()
            .map(GeoRecord::new)
            .ok_or(LookupError::NotFound(ip))
    }
}

/// A City-shaped record.
#[allow(dead_code)]
pub fn city_record(city: &str, iso_code: &str) -> serde_json::Value {
    serde_json::json!({
        "city": {"geoname_id": 5375480, "names": {"en": city}},
        "country": {"iso_code": iso_code, "names": {"en": "United States"}},
        "location": {"latitude": 37.386, "longitude": -122.0838, "time_zone": "America/Los_Angeles"}
    })
}
