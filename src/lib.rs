//! Regexdownload Core Library
//!
//! Fetches seed pages, derives a naming prefix and a list of asset URLs from
//! each page with regular expressions configured per site, then downloads
//! every asset under `<prefix>-<NN><ext>`.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Per-site pattern sections, file discovery and parsing
//! - [`extract`] - Page processing and prefix sanitizing
//! - [`download`] - HTTP client, asset downloads and filename derivation
//! - [`pipeline`] - Two-phase orchestration and reporting

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod extract;
pub mod pipeline;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, ConfigSection, ExtractionRule, SiteConfig, find_config_file};
pub use download::{AssetDownloader, DownloadError, DownloadOutcome, HttpClient};
pub use extract::{
    HttpPageProcessor, Note, NoteLevel, PageProcessor, ProcessError, ProcessOutcome,
    sanitize_prefix,
};
pub use pipeline::{
    DEFAULT_CONCURRENCY, MAX_CONCURRENCY, Pipeline, PipelineError, PipelineOptions,
    PipelineReport, ProcessExit,
};
