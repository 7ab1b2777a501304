//! Fatal per-seed errors of the page processor.

use std::path::PathBuf;

use thiserror::Error;

use crate::download::DownloadError;

/// A failure that ends processing of one seed URL.
///
/// Stored on the seed's [`ProcessOutcome`](super::ProcessOutcome); it never
/// affects other seeds.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The seed is not a valid absolute URL.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        /// The seed as given.
        url: String,
        /// The parse failure.
        #[source]
        source: url::ParseError,
    },

    /// The hostname is missing or has fewer than two labels.
    #[error("invalid domain in {url}: {host:?}")]
    InvalidDomain {
        /// The seed URL.
        url: String,
        /// The hostname, if any.
        host: Option<String>,
    },

    /// No configuration section matches the domain label.
    #[error("section not found: {section}")]
    SectionNotFound {
        /// The domain label that was looked up.
        section: String,
    },

    /// The page could not be fetched or streamed.
    #[error(transparent)]
    Fetch(#[from] DownloadError),

    /// The page snapshot could not be created or read back.
    #[error("snapshot error at {path}: {source}")]
    Snapshot {
        /// Directory or file involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The section's prefix pattern does not compile.
    #[error("invalid prefix pattern for section {section}: {source}")]
    PrefixPattern {
        /// Section holding the pattern.
        section: String,
        /// The compile error.
        #[source]
        source: regex::Error,
    },
}

impl ProcessError {
    /// Creates a snapshot IO error.
    pub fn snapshot(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Snapshot {
            path: path.into(),
            source,
        }
    }
}
