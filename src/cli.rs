//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use regexdownload_core::DEFAULT_CONCURRENCY;
use regexdownload_core::download::{CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};

/// Download the assets linked from web pages.
///
/// Each page's site is looked up in the configuration file by its
/// second-level domain label. The section's `prefix` pattern names the
/// files and every `re*` pattern's first capture group yields an asset URL.
#[derive(Parser, Debug)]
#[command(name = "regexdownload")]
#[command(author, version, about)]
pub struct Args {
    /// Pages to process
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Print progress and source URLs (-v info logs, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Keep fetched pages as <section>-<nanos>.html
    #[arg(short = 'k', long)]
    pub keep: bool,

    /// Tasks run at once per phase (0 for no limit, max 1024)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u16, value_parser = clap::value_parser!(u16).range(0..=1024))]
    pub concurrency: u16,

    /// Configuration file (overrides REGEXDOWNLOAD_CONFIG and default locations)
    #[arg(short = 'C', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for downloaded assets and kept pages
    #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// HTTP connect timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// Overall HTTP request timeout in seconds (0 to disable)
    #[arg(long, value_name = "SECS", default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,
}
