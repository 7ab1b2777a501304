//! Asset downloader seam and its per-asset outcome.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{DownloadError, HttpClient};

/// Downloads one asset URL into one target file.
///
/// Implementations must be independent per call; the pipeline invokes them
/// concurrently with no shared mutable state.
///
/// This trait uses `async_trait` so the pipeline can hold an
/// `Arc<dyn AssetDownloader>`.
#[async_trait]
pub trait AssetDownloader: Send + Sync {
    /// Fetches `url` and writes the body to `target`, returning bytes written.
    async fn download(&self, url: &str, target: &Path) -> Result<u64, DownloadError>;
}

#[async_trait]
impl AssetDownloader for HttpClient {
    async fn download(&self, url: &str, target: &Path) -> Result<u64, DownloadError> {
        self.download_to_path(url, target).await
    }
}

/// Result of downloading one asset.
#[derive(Debug)]
pub struct DownloadOutcome {
    /// Asset URL.
    pub url: String,
    /// Target file path.
    pub path: PathBuf,
    /// Bytes written on success.
    pub bytes: u64,
    /// Failure, if any.
    pub error: Option<DownloadError>,
}

impl DownloadOutcome {
    /// Builds an outcome from a downloader result.
    #[must_use]
    pub fn from_result(url: String, path: PathBuf, result: Result<u64, DownloadError>) -> Self {
        match result {
            Ok(bytes) => Self {
                url,
                path,
                bytes,
                error: None,
            },
            Err(error) => Self {
                url,
                path,
                bytes: 0,
                error: Some(error),
            },
        }
    }

    /// Whether the download succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
