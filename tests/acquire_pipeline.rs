//! Integration tests for database acquisition
//!
//! These run the full download -> extract pipeline against a local mock of the
//! provider endpoint and verify:
//! - Redirect chains are followed to the archive
//! - Exactly one .mmdb file must come out of the archive
//! - Failed downloads never leave files behind
//! - The license key never shows up in errors

mod helpers;

use std::time::Duration;

use geoip_api::acquire::Downloader;
use geoip_api::error_handling::DownloadError;
use geoip_api::initialization::{init_crypto_provider, init_download_client};
use geoip_api::{run_acquisition, AcquireConfig, AcquisitionError};
use helpers::tar_gz_bytes;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LICENSE_KEY: &str = "test-license-key-0123";
const DOWNLOAD_PATH: &str = "/app/geoip_download";

/// Helper function to create an acquisition config pointing at the mock server
fn create_test_config(server: &MockServer, target_dir: &TempDir) -> AcquireConfig {
    init_crypto_provider();
    AcquireConfig {
        license_key: LICENSE_KEY.to_string(),
        download_base: format!("{}{}", server.uri(), DOWNLOAD_PATH),
        target_dir: target_dir.path().join("data"),
        timeout: Duration::from_secs(10),
        ..Default::default()
    }
}

/// Mounts `provider endpoint -> 302 -> archive` serving `archive`.
async fn mount_redirected_archive(server: &MockServer, archive: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(DOWNLOAD_PATH))
        .and(query_param("edition_id", "GeoLite2-City"))
        .and(query_param("license_key", LICENSE_KEY))
        .and(query_param("suffix", "tar.gz"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/blob/GeoLite2-City.tar.gz", server.uri())),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blob/GeoLite2-City.tar.gz"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/gzip")
                .set_body_bytes(archive),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn files_in(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn test_acquisition_follows_redirect_and_extracts_database() {
    let server = MockServer::start().await;
    let archive = tar_gz_bytes(&[
        ("GeoLite2-City_20240102/COPYRIGHT.txt", b"copyright"),
        ("GeoLite2-City_20240102/GeoLite2-City.mmdb", b"fake mmdb content"),
        ("GeoLite2-City_20240102/LICENSE.txt", b"license"),
    ]);
    let archive_len = archive.len() as u64;
    mount_redirected_archive(&server, archive).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);

    let report = run_acquisition(&config).await.expect("acquisition should succeed");

    assert_eq!(
        report.database_path,
        config.target_dir.join("GeoLite2-City.mmdb")
    );
    assert_eq!(report.archive_bytes, archive_len);
    assert_eq!(report.database_bytes, b"fake mmdb content".len() as u64);
    assert_eq!(
        std::fs::read(&report.database_path).unwrap(),
        b"fake mmdb content"
    );
    // Only the database is extracted
    assert_eq!(files_in(&config.target_dir), vec![report.database_path.clone()]);
}

#[tokio::test]
async fn test_acquisition_rejects_bad_license_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOWNLOAD_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid license key"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);

    let err = run_acquisition(&config).await.unwrap_err();

    assert!(
        matches!(
            err,
            AcquisitionError::Download {
                source: DownloadError::UnexpectedStatus(401),
                ..
            }
        ),
        "unexpected error: {:?}",
        err
    );
    assert!(files_in(&config.target_dir).is_empty());
}

#[tokio::test]
async fn test_license_key_is_not_in_error_messages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);

    let err = run_acquisition(&config).await.unwrap_err();
    let message = format!("{:#}", anyhow::Error::from(err));

    assert!(message.contains("403"), "message: {}", message);
    assert!(!message.contains(LICENSE_KEY), "message: {}", message);
}

#[tokio::test]
async fn test_acquisition_without_database_file() {
    let server = MockServer::start().await;
    let archive = tar_gz_bytes(&[
        ("GeoLite2-City_20240102/COPYRIGHT.txt", b"copyright"),
        ("GeoLite2-City_20240102/LICENSE.txt", b"license"),
    ]);
    mount_redirected_archive(&server, archive).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);

    let err = run_acquisition(&config).await.unwrap_err();

    assert!(
        matches!(err, AcquisitionError::ExtractionMismatch { found: 0, .. }),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_acquisition_with_two_database_files() {
    let server = MockServer::start().await;
    let archive = tar_gz_bytes(&[
        ("GeoLite2-City_20240102/GeoLite2-City.mmdb", b"first"),
        ("GeoLite2-City_20240102/GeoLite2-City-Extra.mmdb", b"second"),
    ]);
    mount_redirected_archive(&server, archive).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);

    let err = run_acquisition(&config).await.unwrap_err();

    assert!(
        matches!(err, AcquisitionError::ExtractionMismatch { found: 2, .. }),
        "unexpected error: {:?}",
        err
    );
    assert!(err
        .to_string()
        .contains("expected exactly one .mmdb file in the archive, extracted 2"));
}

#[tokio::test]
async fn test_acquisition_requires_license_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = AcquireConfig {
        license_key: "  ".to_string(),
        ..create_test_config(&server, &dir)
    };

    let err = run_acquisition(&config).await.unwrap_err();
    assert!(matches!(err, AcquisitionError::MissingLicenseKey));
}

#[tokio::test]
async fn test_redirect_loop_is_bounded() {
    init_crypto_provider();
    let server = MockServer::start().await;
    // Initial request plus ten followed redirects
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .expect(11)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("db.tar.gz");
    let client = init_download_client(Duration::from_secs(5)).unwrap();

    let result = Downloader::new(client)
        .download(&format!("{}/loop", server.uri()), &dest)
        .await;

    assert!(matches!(result, Err(DownloadError::TooManyRedirects(10))));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_no_file_until_terminal_success() {
    init_crypto_provider();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/first"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/second"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/second"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("db.tar.gz");
    let client = init_download_client(Duration::from_secs(5)).unwrap();

    let result = Downloader::new(client)
        .download(&format!("{}/first", server.uri()), &dest)
        .await;

    assert!(matches!(result, Err(DownloadError::UnexpectedStatus(404))));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_download_writes_body_on_success() {
    init_crypto_provider();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![42u8; 10_000]))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("db.tar.gz");
    let client = init_download_client(Duration::from_secs(5)).unwrap();

    let completed = Downloader::new(client)
        .download(&format!("{}/archive", server.uri()), &dest)
        .await
        .unwrap();

    assert_eq!(completed.path, dest);
    assert_eq!(completed.bytes, 10_000);
    assert_eq!(std::fs::read(&dest).unwrap(), vec![42u8; 10_000]);
}
