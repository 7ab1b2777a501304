//! Per-site configuration: naming prefix and asset extraction patterns.
//!
//! A configuration file is split into sections keyed by the second-level
//! domain label of the seed URL (`shop.example.com` uses section `example`).
//! Each section may define:
//!
//! - `prefix` - a regular expression whose first capture group, applied to
//!   the fetched page, names the downloaded assets
//! - `re*` - any number of extraction patterns; the first capture group of
//!   every match is an asset URL
//!
//! ```text
//! [example]
//! prefix = <title>(.*?)</title>
//! re_images = <img src="([^"]+)"
//! re_links = href="(https://cdn\.example\.com/[^"]+)"
//! ```
//!
//! The configuration is read once and shared read-only between all workers.

mod discovery;
mod error;
mod parser;

use std::collections::HashMap;
use std::path::Path;

pub use discovery::{CONFIG_ENV_VAR, config_search_paths, find_config_file};
pub use error::ConfigError;
pub use parser::parse_config_str;

/// Key holding the optional prefix pattern.
pub const PREFIX_KEY: &str = "prefix";

/// Reserved leading token of extraction pattern keys.
pub const EXTRACTION_KEY_PREFIX: &str = "re";

/// One named extraction pattern of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRule<'a> {
    /// Configuration key, e.g. `re_images`.
    pub name: &'a str,
    /// Regular expression source.
    pub pattern: &'a str,
}

/// A named group of settings, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl ConfigSection {
    /// Creates an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Builder-style variant of [`set`](Self::set).
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a key. A repeated key keeps its original position and takes the new value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// The prefix pattern, if configured.
    #[must_use]
    pub fn prefix_pattern(&self) -> Option<&str> {
        self.get(PREFIX_KEY)
    }

    /// Extraction rules in file order.
    pub fn extraction_rules(&self) -> impl Iterator<Item = ExtractionRule<'_>> {
        self.entries
            .iter()
            .filter(|(k, _)| k.starts_with(EXTRACTION_KEY_PREFIX))
            .map(|(name, pattern)| ExtractionRule {
                name: name.as_str(),
                pattern: pattern.as_str(),
            })
    }

    fn merge(&mut self, other: ConfigSection) {
        for (key, value) in other.entries {
            self.set(key, value);
        }
    }
}

/// Parsed configuration: sections by name.
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    sections: HashMap<String, ConfigSection>,
}

impl SiteConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Syntax`] if it is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_config_str(&raw)
    }

    /// Adds a section, merging keys into an existing section of the same name.
    pub fn insert_section(&mut self, section: ConfigSection) {
        match self.sections.get_mut(section.name()) {
            Some(existing) => existing.merge(section),
            None => {
                self.sections.insert(section.name().to_string(), section);
            }
        }
    }

    /// Builder-style variant of [`insert_section`](Self::insert_section).
    #[must_use]
    pub fn with_section(mut self, section: ConfigSection) -> Self {
        self.insert_section(section);
        self
    }

    /// Looks up a section by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SectionNotFound`] if no such section exists.
    pub fn section(&self, name: &str) -> Result<&ConfigSection, ConfigError> {
        self.sections
            .get(name)
            .ok_or_else(|| ConfigError::section_not_found(name))
    }

    /// Section names, sorted.
    #[must_use]
    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no sections are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
