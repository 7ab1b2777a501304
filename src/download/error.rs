//! Error types for the download module.
//!
//! Every variant carries the URL or path it concerns, so an error stored in an
//! outcome is self-describing when it is reported.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching a page or downloading an asset.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-2xx HTTP response.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while creating or writing a file.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The URL is malformed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Another asset in the same run already writes to this target.
    #[error("target {path} already claimed by {claimed_by}")]
    TargetClaimed {
        /// The asset that was not downloaded.
        url: String,
        /// The contested target file.
        path: PathBuf,
        /// The asset that owns the target.
        claimed_by: String,
    },
}

impl DownloadError {
    /// Creates a network error, promoting reqwest timeouts to [`DownloadError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::timeout(url);
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a target conflict error.
    pub fn target_claimed(
        url: impl Into<String>,
        path: impl Into<PathBuf>,
        claimed_by: impl Into<String>,
    ) -> Self {
        Self::TargetClaimed {
            url: url.into(),
            path: path.into(),
            claimed_by: claimed_by.into(),
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: the variants need a URL
// or path that the source errors do not carry.
