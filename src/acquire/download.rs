//! Redirect-following downloader.
//!
//! Redirects are followed by hand (the client has automatic redirects disabled) so
//! every hop is logged and the chain is bounded by an explicit hop budget. The body
//! of the terminal 200 response is streamed to disk chunk by chunk.

use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::acquire::target::redact_license_key;
use crate::config::{MAX_DATABASE_DOWNLOAD_SIZE, MAX_REDIRECT_HOPS};
use crate::error_handling::DownloadError;

/// Result of a single request.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// 301/302: the resource lives at `location` (absolute, already resolved).
    Redirected {
        /// Next URL to request
        location: String,
    },
    /// 200: the body is fully written, flushed and closed.
    Completed {
        /// Destination file
        path: PathBuf,
        /// Bytes written
        bytes: u64,
    },
    /// Anything else. Nothing is left at the destination.
    Failed {
        /// Why the request did not complete
        cause: DownloadError,
    },
}

/// A completed download, as seen by callers of [`Downloader::download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedDownload {
    /// Destination file
    pub path: PathBuf,
    /// Bytes written
    pub bytes: u64,
}

/// Fetches a remote resource to a local file, following redirects.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    max_hops: usize,
    max_size: u64,
}

impl Downloader {
    /// Wraps a client that has automatic redirects disabled.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            max_hops: MAX_REDIRECT_HOPS,
            max_size: MAX_DATABASE_DOWNLOAD_SIZE,
        }
    }

    /// Overrides the redirect hop budget.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Overrides the body size cap in bytes.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Downloads `url` into `destination`, following up to `max_hops` redirects.
    ///
    /// The destination is only created once a 200 response arrives. Transport
    /// errors and unexpected statuses are not retried.
    pub async fn download(
        &self,
        url: &str,
        destination: &Path,
    ) -> Result<CompletedDownload, DownloadError> {
        let mut current = url.to_string();

        for hop in 0..=self.max_hops {
            match self.fetch_once(&current, destination).await {
                DownloadOutcome::Redirected { location } => {
                    log::info!(
                        "Redirected (hop {}/{}) to {}",
                        hop + 1,
                        self.max_hops,
                        redact_license_key(&location)
                    );
                    current = location;
                }
                DownloadOutcome::Completed { path, bytes } => {
                    log::info!("Download completed: {:?} ({} bytes)", path, bytes);
                    return Ok(CompletedDownload { path, bytes });
                }
                DownloadOutcome::Failed { cause } => {
                    log::error!("Download failed: {}", cause);
                    return Err(cause);
                }
            }
        }

        log::error!(
            "Download failed: redirect chain longer than {} hops",
            self.max_hops
        );
        Err(DownloadError::TooManyRedirects(self.max_hops))
    }

    /// Issues one GET against `url` and classifies the response.
    pub async fn fetch_once(&self, url: &str, destination: &Path) -> DownloadOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            // reqwest errors carry the URL, and with it the license key
            Err(e) => {
                return DownloadOutcome::Failed {
                    cause: e.without_url().into(),
                }
            }
        };

        let status = response.status();
        log::info!("Status code for download: {}", status.as_u16());

        match status {
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
                match redirect_location(url, &response) {
                    Ok(location) => DownloadOutcome::Redirected { location },
                    Err(cause) => DownloadOutcome::Failed { cause },
                }
            }
            StatusCode::OK => match stream_to_file(response, destination, self.max_size).await {
                Ok(bytes) => DownloadOutcome::Completed {
                    path: destination.to_path_buf(),
                    bytes,
                },
                Err(cause) => DownloadOutcome::Failed { cause },
            },
            other => DownloadOutcome::Failed {
                cause: DownloadError::UnexpectedStatus(other.as_u16()),
            },
        }
    }
}

/// Resolves the `Location` header of a redirect against the URL that produced it.
fn redirect_location(current: &str, response: &reqwest::Response) -> Result<String, DownloadError> {
    let status = response.status().as_u16();
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(DownloadError::MissingLocation { status })?;

    let resolved = Url::parse(location).or_else(|_| Url::parse(current)?.join(location))?;
    Ok(resolved.into())
}

/// Streams the body into `destination`; a partial file is removed on failure.
async fn stream_to_file(
    mut response: reqwest::Response,
    destination: &Path,
    max_size: u64,
) -> Result<u64, DownloadError> {
    if let Some(content_length) = response.content_length() {
        if content_length > max_size {
            return Err(DownloadError::TooLarge { limit: max_size });
        }
    }

    let io_error = |source: std::io::Error| DownloadError::Io {
        path: destination.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(destination)
        .await
        .map_err(io_error)?;

    let result = async {
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(reqwest::Error::without_url)? {
            written += chunk.len() as u64;
            // Content-Length can be missing or wrong
            if written > max_size {
                return Err(DownloadError::TooLarge { limit: max_size });
            }
            file.write_all(&chunk).await.map_err(io_error)?;
        }
        file.flush().await.map_err(io_error)?;
        Ok::<u64, DownloadError>(written)
    }
    .await;
    drop(file);

    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(destination).await {
            log::warn!("Failed to remove partial download {:?}: {}", destination, e);
        }
    }
    result
}
