//! Page processor: fetch one seed URL and discover its assets.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use url::Url;

use super::patterns::{apply_extraction_rules, resolve_prefix};
use super::snapshot::PageSnapshot;
use super::{ProcessError, ProcessOutcome, sanitize_prefix};
use crate::config::SiteConfig;
use crate::download::{HttpClient, fallback_prefix, snapshot_filename};

/// Turns one seed URL into a [`ProcessOutcome`].
///
/// Implementations never fail outright; every failure is recorded on the
/// returned outcome. Calls for different seeds run concurrently.
///
/// This trait uses `async_trait` so the pipeline can hold an
/// `Arc<dyn PageProcessor>`.
#[async_trait]
pub trait PageProcessor: Send + Sync {
    /// Processes one seed URL.
    async fn process(&self, seed_url: &str) -> ProcessOutcome;
}

/// Page processor that fetches seeds over HTTP.
///
/// Processing steps for a seed:
/// 1. parse the URL
/// 2. take the second-to-last hostname label as the section name
/// 3. look up the section
/// 4. fall back to `<section>-<unix-seconds>` unless a prefix pattern is configured
/// 5. skip fetching for non-HTTP(S) schemes
/// 6. fetch the page into a [`PageSnapshot`]
/// 7. apply the prefix pattern
/// 8. apply the extraction patterns
/// 9. keep the snapshot as `<section>-<unix-nanos>.html` or delete it
/// 10. sanitize the prefix
#[derive(Debug, Clone)]
pub struct HttpPageProcessor {
    client: HttpClient,
    config: Arc<SiteConfig>,
    snapshot_dir: PathBuf,
    keep_snapshots: bool,
}

impl HttpPageProcessor {
    /// Creates a processor writing snapshots to the current directory and
    /// discarding them.
    #[must_use]
    pub fn new(client: HttpClient, config: Arc<SiteConfig>) -> Self {
        Self {
            client,
            config,
            snapshot_dir: PathBuf::from("."),
            keep_snapshots: false,
        }
    }

    /// Sets the directory for temporary and retained snapshots.
    #[must_use]
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }

    /// Keeps fetched pages as `<section>-<unix-nanos>.html`.
    #[must_use]
    pub fn keep_snapshots(mut self, keep: bool) -> Self {
        self.keep_snapshots = keep;
        self
    }

    #[instrument(level = "debug", skip(self, outcome), fields(url = %seed_url))]
    async fn run(&self, seed_url: &str, outcome: &mut ProcessOutcome) -> Result<(), ProcessError> {
        let url = Url::parse(seed_url).map_err(|source| ProcessError::InvalidUrl {
            url: seed_url.to_string(),
            source,
        })?;

        let section_name = section_key(&url, seed_url)?;
        let section = self
            .config
            .section(&section_name)
            .map_err(|_| ProcessError::SectionNotFound {
                section: section_name.clone(),
            })?;
        outcome.section = Some(section_name.clone());

        let fallback = fallback_prefix(&section_name);
        let prefix_pattern = section.prefix_pattern();
        if prefix_pattern.is_none() {
            outcome.info(format!("no prefix pattern for [{section_name}]; using {fallback}"));
        }

        if !matches!(url.scheme(), "http" | "https") {
            outcome.info(format!("{} URL, not fetched", url.scheme()));
            outcome.prefix = sanitize_prefix(&fallback);
            return Ok(());
        }

        let response = self.client.get(seed_url).await?;
        let snapshot = PageSnapshot::create_in(&self.snapshot_dir)?;
        let bytes = snapshot.write_response(response, seed_url).await?;
        outcome.info(format!("fetched {bytes} bytes"));
        let body = snapshot.read().await?;

        let prefix = match prefix_pattern {
            Some(pattern) => resolve_prefix(&section_name, pattern, &body, fallback, outcome)?,
            None => fallback,
        };

        apply_extraction_rules(section.extraction_rules(), &body, outcome);
        self.finish_snapshot(snapshot, &section_name, outcome);

        outcome.prefix = sanitize_prefix(&prefix);
        Ok(())
    }

    fn finish_snapshot(&self, snapshot: PageSnapshot, section: &str, outcome: &mut ProcessOutcome) {
        if !self.keep_snapshots {
            drop(snapshot);
            return;
        }
        let target = self.snapshot_dir.join(snapshot_filename(section));
        match snapshot.retain(&target) {
            Ok(path) => outcome.info(format!("saved page as {}", path.display())),
            Err(e) => outcome.warn(format!("could not save page as {}: {e}", target.display())),
        }
    }
}

#[async_trait]
impl PageProcessor for HttpPageProcessor {
    async fn process(&self, seed_url: &str) -> ProcessOutcome {
        let mut outcome = ProcessOutcome::new(seed_url);
        match self.run(seed_url, &mut outcome).await {
            Ok(()) => debug!(
                url = %seed_url,
                prefix = %outcome.prefix,
                assets = outcome.asset_urls.len(),
                "page processed"
            ),
            Err(error) => {
                warn!(url = %seed_url, error = %error, "page processing failed");
                outcome.error = Some(error);
            }
        }
        outcome
    }
}

/// Returns the configuration section key for `url`: the second-to-last
/// hostname label (`shop.example.com` -> `example`).
fn section_key(url: &Url, seed_url: &str) -> Result<String, ProcessError> {
    let host = url.host_str().map(|h| h.trim_end_matches('.'));
    let labels: Vec<&str> = host.map(|h| h.split('.').collect()).unwrap_or_default();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(ProcessError::InvalidDomain {
            url: seed_url.to_string(),
            host: host.map(str::to_string),
        });
    }
    Ok(labels[labels.len() - 2].to_string())
}
