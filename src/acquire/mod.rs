//! GeoLite2 database acquisition.
//!
//! A deploy-time pipeline: download the provider's tarball (following redirects)
//! into a private temp directory, then extract the single `.mmdb` file into the
//! directory the lookup handler loads from. Any failure aborts the run so nothing
//! downstream packages a handler without its database.

mod download;
mod extract;
mod target;

use std::path::PathBuf;

use chrono::Local;

use crate::config::{AcquireConfig, ARCHIVE_STRIP_DEPTH, DATABASE_EXTENSION, TEMP_DIR_PREFIX};
use crate::error_handling::AcquisitionError;
use crate::initialization::init_download_client;

// Re-export public API
pub use download::{CompletedDownload, DownloadOutcome, Downloader};
pub use extract::{extract, ArchiveEntries, EntryVisitor, ExtractionFilter, TarGzArchive};
pub use target::{archive_file_name, download_url, redact_license_key, DownloadTarget};

/// Summary of a successful acquisition run.
#[derive(Debug, Clone)]
pub struct AcquisitionReport {
    /// Where the extracted database now lives
    pub database_path: PathBuf,
    /// Size of the downloaded archive in bytes
    pub archive_bytes: u64,
    /// Size of the extracted database in bytes
    pub database_bytes: u64,
}

/// Downloads the configured edition and extracts its `.mmdb` file into
/// `config.target_dir`.
///
/// # Errors
///
/// - `MissingLicenseKey` if the key is blank
/// - `Download` if the download does not complete (bad key, unexpected status,
///   transport failure, redirect loop)
/// - `Extract` if the archive cannot be read or written out
/// - `ExtractionMismatch` unless exactly one database file was extracted
pub async fn run_acquisition(config: &AcquireConfig) -> Result<AcquisitionReport, AcquisitionError> {
    if config.license_key.trim().is_empty() {
        return Err(AcquisitionError::MissingLicenseKey);
    }

    // Dropped (and removed) when the run ends, successful or not
    let temp_dir = tempfile::Builder::new()
        .prefix(TEMP_DIR_PREFIX)
        .tempdir()
        .map_err(|e| AcquisitionError::Setup(format!("failed to create temp directory: {}", e)))?;

    let target = DownloadTarget::for_edition(
        &config.download_base,
        &config.edition_id,
        &config.license_key,
        temp_dir.path(),
        Local::now().date_naive(),
    )
    .map_err(|e| AcquisitionError::Setup(format!("invalid download URL: {}", e)))?;

    let client = init_download_client(config.timeout)
        .map_err(|e| AcquisitionError::Setup(format!("failed to build HTTP client: {}", e)))?;

    log::info!(
        "Retrieving compressed {} database to {:?} ...",
        config.edition_id,
        target.destination_path()
    );
    let download = Downloader::new(client)
        .download(target.source_url(), target.destination_path())
        .await
        .map_err(|source| AcquisitionError::Download {
            url: target.redacted_url(),
            source,
        })?;

    tokio::fs::create_dir_all(&config.target_dir)
        .await
        .map_err(|e| {
            AcquisitionError::Setup(format!(
                "failed to create target directory {:?}: {}",
                config.target_dir, e
            ))
        })?;

    log::info!(
        "Extracting {} database to {:?} ...",
        config.edition_id,
        config.target_dir
    );
    let filter = ExtractionFilter::by_extension(DATABASE_EXTENSION, ARCHIVE_STRIP_DEPTH);
    let extracted = {
        let archive_path = download.path.clone();
        let target_dir = config.target_dir.clone();
        let filter = filter.clone();
        tokio::task::spawn_blocking(move || {
            extract(&mut TarGzArchive::open(archive_path), &target_dir, &filter)
        })
        .await
        .map_err(|e| AcquisitionError::Setup(format!("extraction task failed: {}", e)))??
    };
    log::info!("Extracted files: {:?}", extracted);

    let mismatch = |found: usize| AcquisitionError::ExtractionMismatch {
        extension: filter.extension().to_string(),
        found,
    };
    let database_path = match extracted.as_slice() {
        [single] => single.clone(),
        other => return Err(mismatch(other.len())),
    };
    let database_bytes = match tokio::fs::metadata(&database_path).await {
        Ok(metadata) if metadata.is_file() => metadata.len(),
        _ => return Err(mismatch(0)),
    };

    Ok(AcquisitionReport {
        database_path,
        archive_bytes: download.bytes,
        database_bytes,
    })
}
