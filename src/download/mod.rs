//! HTTP fetching and asset downloads.
//!
//! This module provides the shared [`HttpClient`], the [`AssetDownloader`]
//! seam used by the pipeline's second phase, and the naming rules for
//! downloaded files and retained snapshots.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Deterministic target names: `<prefix>-<NN><ext>`
//! - Configurable timeouts (30s connect, 5min overall by default)
//! - Structured error types carrying the failing URL or path
//!
//! # Example
//!
//! ```no_run
//! use regexdownload_core::download::{AssetDownloader, HttpClient, asset_filename};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let url = "https://example.com/photo.jpg";
//! let name = asset_filename("holiday", 1, url);
//! client.download(url, Path::new(&name)).await?;
//! # Ok(())
//! # }
//! ```

mod asset;
mod client;
mod constants;
mod error;
mod filename;

pub use asset::{AssetDownloader, DownloadOutcome};
pub use client::HttpClient;
pub(crate) use client::stream_to_file;
pub use constants::{CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};
pub use error::DownloadError;
pub use filename::{
    UNKNOWN_EXTENSION, asset_filename, extension_from_url, fallback_prefix, snapshot_filename,
};
