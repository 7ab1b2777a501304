//! Error types for the site configuration module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating, reading, parsing, or querying site configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file exists at any of the searched locations.
    #[error("configuration file not found (searched: {searched})")]
    NotFound {
        /// Comma-separated list of the locations that were checked.
        searched: String,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A line of the configuration file is malformed.
    #[error("invalid configuration syntax on line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// The requested section does not exist.
    #[error("section not found: {name}")]
    SectionNotFound {
        /// The section name that was looked up.
        name: String,
    },
}

impl ConfigError {
    /// Creates a syntax error for the given 1-based line.
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Creates a section-not-found error.
    pub fn section_not_found(name: impl Into<String>) -> Self {
        Self::SectionNotFound { name: name.into() }
    }
}
