//! CLI entry point for the regexdownload tool.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use regexdownload_core::{
    HttpClient, HttpPageProcessor, Pipeline, PipelineOptions, ProcessExit, SiteConfig,
    find_config_file,
};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    init_tracing(&args);

    match run(args).await {
        Ok(exit) => exit.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ProcessExit::Failure.into()
        }
    }
}

/// Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn).
fn init_tracing(args: &Args) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(args: Args) -> Result<ProcessExit> {
    debug!(?args, "CLI arguments parsed");
    let verbose = args.verbose > 0;

    let config_path = find_config_file(args.config.as_deref())?;
    let config = SiteConfig::load(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;
    if verbose {
        println!("using configuration {}", config_path.display());
    }
    info!(
        path = %config_path.display(),
        sections = config.len(),
        "configuration loaded"
    );

    tokio::fs::create_dir_all(&args.output_dir)
        .await
        .with_context(|| format!("failed to create {}", args.output_dir.display()))?;

    let client = HttpClient::new_with_timeouts(args.connect_timeout, args.timeout);
    let processor = HttpPageProcessor::new(client.clone(), Arc::new(config))
        .with_snapshot_dir(&args.output_dir)
        .keep_snapshots(args.keep);
    let pipeline = Pipeline::new(
        Arc::new(processor),
        Arc::new(client),
        PipelineOptions {
            output_dir: args.output_dir.clone(),
            concurrency: usize::from(args.concurrency),
        },
    )?;

    let report = pipeline.run(&args.urls).await?;
    report
        .render(verbose, &mut io::stdout().lock(), &mut io::stderr().lock())
        .context("failed to write report")?;

    Ok(report.exit_outcome())
}
