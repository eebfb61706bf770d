//! Download target construction.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use url::Url;

use crate::config::ARCHIVE_SUFFIX;

/// Where one acquisition run downloads from and to.
///
/// Built once per run. The destination carries a calendar date stamp and lives in
/// a private temp directory, so repeated runs never collide.
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    source_url: String,
    destination_path: PathBuf,
}

impl DownloadTarget {
    /// Creates a target from an already built URL and destination path.
    pub fn new(source_url: impl Into<String>, destination_path: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            destination_path: destination_path.into(),
        }
    }

    /// Builds the provider download target for `edition_id` inside `temp_dir`.
    ///
    /// The destination file is named `<edition_id>_<YYYYMMDD>.tar.gz`.
    pub fn for_edition(
        download_base: &str,
        edition_id: &str,
        license_key: &str,
        temp_dir: &Path,
        date: NaiveDate,
    ) -> Result<Self, url::ParseError> {
        let url = download_url(download_base, edition_id, license_key)?;
        Ok(Self::new(
            url,
            temp_dir.join(archive_file_name(edition_id, date)),
        ))
    }

    /// Absolute URL of the archive.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// File the archive is streamed into.
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    /// Source URL with the license key masked, for logs and error messages.
    pub fn redacted_url(&self) -> String {
        redact_license_key(&self.source_url)
    }
}

/// Builds `<base>?edition_id=<id>&license_key=<key>&suffix=tar.gz`, URL-encoding each value.
pub fn download_url(
    download_base: &str,
    edition_id: &str,
    license_key: &str,
) -> Result<String, url::ParseError> {
    let url = Url::parse_with_params(
        download_base,
        &[
            ("edition_id", edition_id),
            ("license_key", license_key),
            ("suffix", ARCHIVE_SUFFIX),
        ],
    )?;
    Ok(url.into())
}

/// `<edition_id>_<YYYYMMDD>.tar.gz`
pub fn archive_file_name(edition_id: &str, date: NaiveDate) -> String {
    format!("{}_{}.{}", edition_id, date.format("%Y%m%d"), ARCHIVE_SUFFIX)
}

/// Replaces the `license_key` query value with `REDACTED`.
///
/// Strings that do not parse as URLs are returned unchanged.
pub fn redact_license_key(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    if !url.query_pairs().any(|(k, _)| k == "license_key") {
        return raw.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == "license_key" {
                "REDACTED".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.into()
}
