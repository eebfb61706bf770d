//! GeoIP data structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The record the database holds for one address.
///
/// The shape (city, subdivisions, country, location, ...) is owned by the
/// database, so the record is kept as JSON and serialized as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeoRecord(serde_json::Value);

impl GeoRecord {
    /// Wraps a decoded record.
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The raw record.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// English city name, if the record has one.
    pub fn city_name(&self) -> Option<&str> {
        self.0.pointer("/city/names/en")?.as_str()
    }

    /// ISO 3166-1 country code, if the record has one.
    pub fn country_code(&self) -> Option<&str> {
        self.0.pointer("/country/iso_code")?.as_str()
    }
}

/// Metadata about the loaded database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseMetadata {
    /// File the database was loaded from
    pub source: PathBuf,
    /// Database type, e.g. `GeoLite2-City`
    pub database_type: String,
    /// Build time (seconds since the Unix epoch)
    pub build_epoch: u64,
    /// 4 or 6
    pub ip_version: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_geo_record_accessors() {
        let record = GeoRecord::new(json!({
            "city": {"names": {"en": "Mountain View", "de": "Mountain View"}},
            "country": {"iso_code": "US"}
        }));
        assert_eq!(record.city_name(), Some("Mountain View"));
        assert_eq!(record.country_code(), Some("US"));
    }

    #[test]
    fn test_geo_record_missing_fields() {
        let record = GeoRecord::new(json!({"continent": {"code": "EU"}}));
        assert_eq!(record.city_name(), None);
        assert_eq!(record.country_code(), None);
    }

    #[test]
    fn test_geo_record_serializes_transparently() {
        let record = GeoRecord::new(json!({"country": {"iso_code": "AU"}}));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"country":{"iso_code":"AU"}}"#
        );
    }
}
