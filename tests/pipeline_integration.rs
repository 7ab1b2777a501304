//! Integration tests for the two-phase pipeline against a mock HTTP server.
//!
//! Mock servers listen on 127.0.0.1, so the configuration section for every
//! mocked seed is "0" (the second-to-last label of the host).

use std::path::Path;
use std::sync::Arc;

use regexdownload_core::{
    ConfigSection, HttpClient, HttpPageProcessor, Pipeline, PipelineOptions, PipelineReport,
    ProcessError, ProcessExit, SiteConfig,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::file_names;
use support::socket_guard::start_mock_server_or_skip;

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mock_server
    }};
}

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake";
const RAW_BYTES: &[u8] = b"raw asset body";

/// Serves a gallery page linking two assets plus the assets themselves.
async fn mount_gallery(server: &MockServer, title: &str) {
    let page = format!(
        r#"<html><head><title>{title}</title></head><body>
<img src="{uri}/assets/photo.png">
<img src="{uri}/assets/blob">
</body></html>"#,
        uri = server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/gallery"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/photo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(RAW_BYTES))
        .mount(server)
        .await;
}

fn local_section() -> ConfigSection {
    ConfigSection::new("0").with_entry("re_img", r#"<img src="([^"]+)""#)
}

fn pipeline(config: SiteConfig, output_dir: &Path, keep: bool) -> Pipeline {
    let client = HttpClient::new();
    let processor = HttpPageProcessor::new(client.clone(), Arc::new(config))
        .with_snapshot_dir(output_dir)
        .keep_snapshots(keep);
    Pipeline::new(
        Arc::new(processor),
        Arc::new(client),
        PipelineOptions {
            output_dir: output_dir.to_path_buf(),
            concurrency: 4,
        },
    )
    .unwrap()
}

async fn run(pipeline: &Pipeline, seeds: &[String]) -> PipelineReport {
    pipeline.run(seeds).await.unwrap()
}

#[tokio::test]
async fn test_pipeline_downloads_assets_named_by_prefix() {
    let mock_server = require_mock_server!();
    mount_gallery(&mock_server, "Summer | Sale").await;
    let temp_dir = TempDir::new().unwrap();
    let config = SiteConfig::new()
        .with_section(local_section().with_entry("prefix", "<title>(.*?)</title>"));
    let pipeline = pipeline(config, temp_dir.path(), false);

    let report = run(&pipeline, &[format!("{}/gallery", mock_server.uri())]).await;

    assert_eq!(report.exit_outcome(), ProcessExit::Success);
    assert_eq!(report.completed_downloads(), 2);
    assert_eq!(
        file_names(temp_dir.path()),
        vec!["Summer Sale-01.png", "Summer Sale-02.unknown"]
    );
    assert_eq!(
        std::fs::read(temp_dir.path().join("Summer Sale-01.png")).unwrap(),
        PNG_BYTES
    );
    assert_eq!(
        std::fs::read(temp_dir.path().join("Summer Sale-02.unknown")).unwrap(),
        RAW_BYTES
    );
}

#[tokio::test]
async fn test_pipeline_without_prefix_pattern_uses_section_timestamp() {
    let mock_server = require_mock_server!();
    mount_gallery(&mock_server, "ignored").await;
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(
        SiteConfig::new().with_section(local_section()),
        temp_dir.path(),
        false,
    );

    let report = run(&pipeline, &[format!("{}/gallery", mock_server.uri())]).await;

    assert_eq!(report.completed_downloads(), 2);
    let names = file_names(temp_dir.path());
    assert_eq!(names.len(), 2, "files: {names:?}");

    let stem = report.processed[0].prefix.clone();
    let seconds = stem.strip_prefix("0-").unwrap();
    assert!(seconds.chars().all(|c| c.is_ascii_digit()), "prefix: {stem}");
    assert_eq!(names, vec![format!("{stem}-01.png"), format!("{stem}-02.unknown")]);
}

#[tokio::test]
async fn test_pipeline_isolates_failures() {
    let mock_server = require_mock_server!();
    mount_gallery(&mock_server, "Good").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<img src="{}/assets/none.png">"#,
            mock_server.uri()
        )))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let config = SiteConfig::new()
        .with_section(local_section().with_entry("prefix", "<title>(.*?)</title>"));
    let pipeline = pipeline(config, temp_dir.path(), false);

    let seeds = vec![
        format!("{}/gallery", mock_server.uri()),
        format!("{}/missing", mock_server.uri()),
        "::not a url".to_string(),
        "http://www.unconfigured.org/".to_string(),
        format!("{}/broken", mock_server.uri()),
    ];
    let report = run(&pipeline, &seeds).await;

    assert_eq!(report.processed.len(), 5);
    assert_eq!(report.failed_pages(), 3);
    assert!(matches!(
        report.processed[2].error,
        Some(ProcessError::InvalidUrl { .. })
    ));
    assert!(matches!(
        report.processed[3].error,
        Some(ProcessError::SectionNotFound { ref section }) if section == "unconfigured"
    ));

    // The gallery's two assets succeed; the broken page's asset 404s.
    assert_eq!(report.completed_downloads(), 2);
    assert_eq!(report.failed_downloads(), 1);
    assert_eq!(report.exit_outcome(), ProcessExit::Partial);
    assert!(file_names(temp_dir.path()).contains(&"Good-01.png".to_string()));
}

#[tokio::test]
async fn test_pipeline_keep_snapshot_retains_page() {
    let mock_server = require_mock_server!();
    mount_gallery(&mock_server, "Kept").await;
    let temp_dir = TempDir::new().unwrap();
    let config = SiteConfig::new()
        .with_section(local_section().with_entry("prefix", "<title>(.*?)</title>"));
    let pipeline = pipeline(config, temp_dir.path(), true);

    run(&pipeline, &[format!("{}/gallery", mock_server.uri())]).await;

    let names = file_names(temp_dir.path());
    let snapshots: Vec<_> = names
        .iter()
        .filter(|n| n.starts_with("0-") && n.ends_with(".html"))
        .collect();
    assert_eq!(snapshots.len(), 1, "files: {names:?}");
    assert_eq!(names.len(), 3);
}

#[tokio::test]
async fn test_pipeline_single_label_host_makes_no_request() {
    let mock_server = require_mock_server!();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let config = SiteConfig::new().with_section(ConfigSection::new("localhost"));
    let pipeline = pipeline(config, temp_dir.path(), false);
    let port = mock_server.address().port();

    let report = run(&pipeline, &[format!("http://localhost:{port}/gallery")]).await;

    assert!(matches!(
        report.processed[0].error,
        Some(ProcessError::InvalidDomain { .. })
    ));
    assert_eq!(report.exit_outcome(), ProcessExit::Failure);
    assert!(file_names(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_pipeline_page_without_matches_downloads_nothing() {
    let mock_server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>nothing here</p>"))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let pipeline = pipeline(
        SiteConfig::new().with_section(local_section()),
        temp_dir.path(),
        false,
    );

    let report = run(&pipeline, &[format!("{}/plain", mock_server.uri())]).await;

    assert!(report.processed[0].asset_urls.is_empty());
    assert!(report.downloads.is_empty());
    assert_eq!(report.exit_outcome(), ProcessExit::Success);

    let mut out = Vec::new();
    let mut err = Vec::new();
    report.render(true, &mut out, &mut err).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("no assets found"));
}

#[tokio::test]
async fn test_pipeline_same_prefix_keeps_first_asset_intact() {
    let mock_server = require_mock_server!();
    let large = vec![b'A'; 200_000];
    for (page, asset) in [("/p1", "/big.png"), ("/p2", "/small.png")] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<title>Shared</title><img src="{}{asset}">"#,
                mock_server.uri()
            )))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/big.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(large.clone()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/small.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'B'; 10]))
        .expect(0)
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let config = SiteConfig::new()
        .with_section(local_section().with_entry("prefix", "<title>(.*?)</title>"));
    let pipeline = pipeline(config, temp_dir.path(), false);

    let seeds = vec![
        format!("{}/p1", mock_server.uri()),
        format!("{}/p2", mock_server.uri()),
    ];
    let report = run(&pipeline, &seeds).await;

    assert_eq!(report.completed_downloads(), 1);
    assert_eq!(report.failed_downloads(), 1);
    assert_eq!(file_names(temp_dir.path()), vec!["Shared-01.png"]);
    assert_eq!(std::fs::read(temp_dir.path().join("Shared-01.png")).unwrap(), large);

    let mut out = Vec::new();
    let mut err = Vec::new();
    report.render(false, &mut out, &mut err).unwrap();
    assert!(String::from_utf8(err).unwrap().contains("already claimed by"));
}
