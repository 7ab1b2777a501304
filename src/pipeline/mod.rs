//! Two-phase pipeline: process every seed page, then download every
//! discovered asset.
//!
//! # Overview
//!
//! Phase 1 runs one [`PageProcessor`] task per seed URL. Phase 2 starts only
//! after every Phase 1 task has finished, and runs one [`AssetDownloader`]
//! task per discovered asset. Each phase collects its outcomes through a
//! channel; a failure in one task never stops its siblings.
//!
//! Both phases share an optional concurrency ceiling. A ceiling of `0`
//! spawns every task at once.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use regexdownload_core::{HttpClient, HttpPageProcessor, Pipeline, PipelineOptions, SiteConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(SiteConfig::load("regexdownload.conf".as_ref())?);
//! let client = HttpClient::new();
//! let processor = HttpPageProcessor::new(client.clone(), config);
//! let pipeline = Pipeline::new(
//!     Arc::new(processor),
//!     Arc::new(client),
//!     PipelineOptions::default(),
//! )?;
//! let report = pipeline.run(&["https://www.example.com/gallery".to_string()]).await?;
//! println!("downloaded {}", report.completed_downloads());
//! # Ok(())
//! # }
//! ```

mod report;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, instrument, warn};

use crate::download::{AssetDownloader, DownloadError, DownloadOutcome, asset_filename};
use crate::extract::{PageProcessor, ProcessOutcome};

pub use report::{PipelineReport, ProcessExit, determine_exit_outcome};

/// Default per-phase concurrency ceiling.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Largest accepted concurrency ceiling.
pub const MAX_CONCURRENCY: usize = 1024;

/// Error type for pipeline setup and scheduling.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Concurrency ceiling out of range.
    #[error("invalid concurrency value {value}: must be between 0 and {MAX_CONCURRENCY}")]
    InvalidConcurrency {
        /// The rejected value.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Pipeline settings.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory receiving downloaded assets.
    pub output_dir: PathBuf,
    /// Tasks allowed to run at once in each phase; `0` means no limit.
    pub concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// One planned asset download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    /// Asset URL.
    pub url: String,
    /// Target file.
    pub path: PathBuf,
}

/// Pipeline orchestrator.
pub struct Pipeline {
    processor: Arc<dyn PageProcessor>,
    downloader: Arc<dyn AssetDownloader>,
    output_dir: PathBuf,
    semaphore: Option<Arc<Semaphore>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("output_dir", &self.output_dir)
            .field(
                "concurrency",
                &self.semaphore.as_ref().map(|s| s.available_permits()),
            )
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Creates a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConcurrency`] if `options.concurrency`
    /// exceeds [`MAX_CONCURRENCY`].
    #[instrument(level = "debug", skip(processor, downloader))]
    pub fn new(
        processor: Arc<dyn PageProcessor>,
        downloader: Arc<dyn AssetDownloader>,
        options: PipelineOptions,
    ) -> Result<Self, PipelineError> {
        if options.concurrency > MAX_CONCURRENCY {
            return Err(PipelineError::InvalidConcurrency {
                value: options.concurrency,
            });
        }

        let semaphore =
            (options.concurrency > 0).then(|| Arc::new(Semaphore::new(options.concurrency)));

        Ok(Self {
            processor,
            downloader,
            output_dir: options.output_dir,
            semaphore,
        })
    }

    /// Runs both phases over `seeds`.
    ///
    /// Per-seed and per-asset failures are recorded in the report, never
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::SemaphoreClosed`] if the concurrency gate closes.
    #[instrument(
        skip(self, seeds),
        fields(seeds = seeds.len(), output_dir = %self.output_dir.display())
    )]
    pub async fn run(&self, seeds: &[String]) -> Result<PipelineReport, PipelineError> {
        let processed = self.process_pages(seeds).await?;

        let plan = plan_downloads(&processed, &self.output_dir);
        info!(
            pages = processed.len(),
            assets = plan.jobs.len(),
            conflicts = plan.conflicts.len(),
            "page phase complete"
        );

        let mut downloads = self.download_assets(plan.jobs).await?;
        downloads.extend(plan.conflicts);
        let report = PipelineReport {
            processed,
            downloads,
        };
        info!(
            completed = report.completed_downloads(),
            failed = report.failed_downloads(),
            failed_pages = report.failed_pages(),
            "download phase complete"
        );
        Ok(report)
    }

    /// Phase 1: one page processor task per seed.
    async fn process_pages(&self, seeds: &[String]) -> Result<Vec<ProcessOutcome>, PipelineError> {
        let processor = &self.processor;
        self.fan_out("pages", seeds.to_vec(), |seed| {
            let processor = Arc::clone(processor);
            async move { processor.process(&seed).await }
        })
        .await
    }

    /// Phase 2: one downloader task per planned asset.
    async fn download_assets(
        &self,
        jobs: Vec<DownloadJob>,
    ) -> Result<Vec<DownloadOutcome>, PipelineError> {
        let downloader = &self.downloader;
        self.fan_out("assets", jobs, |job| {
            let downloader = Arc::clone(downloader);
            async move {
                let result = downloader.download(&job.url, &job.path).await;
                DownloadOutcome::from_result(job.url, job.path, result)
            }
        })
        .await
    }

    /// Spawns `work(item)` for every item and waits for all of them.
    ///
    /// Outcomes travel through an unbounded channel and are returned in item
    /// order. A panicked task is logged and contributes no outcome.
    async fn fan_out<T, R, F, Fut>(
        &self,
        phase: &'static str,
        items: Vec<T>,
        work: F,
    ) -> Result<Vec<R>, PipelineError>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handles = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            // Blocks while the ceiling is reached
            let permit = match &self.semaphore {
                Some(semaphore) => Some(
                    Arc::clone(semaphore)
                        .acquire_owned()
                        .await
                        .map_err(|_| PipelineError::SemaphoreClosed)?,
                ),
                None => None,
            };

            let task = work(item);
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let outcome = task.await;
                if tx.send((index, outcome)).is_err() {
                    debug!(index, "outcome receiver dropped");
                }
            }));
        }
        drop(tx);

        debug!(phase, task_count = handles.len(), "waiting for tasks");

        let mut outcomes = Vec::with_capacity(handles.len());
        while let Some(entry) = rx.recv().await {
            outcomes.push(entry);
        }

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(phase, error = %e, "task panicked");
            }
        }

        outcomes.sort_by_key(|(index, _)| *index);
        Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
    }
}

/// Downloads to run, and assets refused because their target is taken.
#[derive(Debug, Default)]
pub struct DownloadPlan {
    /// One job per distinct target file.
    pub jobs: Vec<DownloadJob>,
    /// Failed outcomes for assets whose target an earlier asset owns.
    pub conflicts: Vec<DownloadOutcome>,
}

/// Plans one download per asset of every successful page.
///
/// Assets are numbered from 1 within their page and written to
/// `<output_dir>/<prefix>-<NN><ext>`. Failed pages and pages without assets
/// contribute nothing. Pages sharing a prefix map to the same targets; the
/// first asset to claim a target keeps it and later ones become
/// [`DownloadError::TargetClaimed`] outcomes, so no file has two writers.
#[must_use]
pub fn plan_downloads(processed: &[ProcessOutcome], output_dir: &Path) -> DownloadPlan {
    let mut plan = DownloadPlan::default();
    let mut owners: HashMap<PathBuf, &str> = HashMap::new();

    for outcome in processed.iter().filter(|outcome| !outcome.is_failure()) {
        for (i, url) in outcome.asset_urls.iter().enumerate() {
            let path = output_dir.join(asset_filename(&outcome.prefix, i + 1, url));
            match owners.entry(path) {
                Entry::Vacant(slot) => {
                    plan.jobs.push(DownloadJob {
                        url: url.clone(),
                        path: slot.key().clone(),
                    });
                    slot.insert(url);
                }
                Entry::Occupied(owner) => {
                    warn!(
                        url = %url,
                        path = %owner.key().display(),
                        claimed_by = %owner.get(),
                        "target already planned"
                    );
                    let error = DownloadError::target_claimed(url, owner.key(), *owner.get());
                    plan.conflicts.push(DownloadOutcome::from_result(
                        url.clone(),
                        owner.key().clone(),
                        Err(error),
                    ));
                }
            }
        }
    }

    plan
}
