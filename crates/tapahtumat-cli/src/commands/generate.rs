//! The generation run: fetch every source, render, write.

use std::path::{Path, PathBuf};

use tapahtumat_core::{
    Artifact, DateNormalizer, Event, PageContext, Timestamp, render_all,
};
use tapahtumat_sources::{AggregateReport, Aggregator, HttpFetcher};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::CliResult;

/// What a run produced.
#[derive(Debug)]
pub struct GenerateSummary {
    pub report: AggregateReport,
    pub written: Vec<PathBuf>,
}

/// Builds an aggregator with every configured source.
pub fn build_aggregator(config: &AppConfig) -> CliResult<Aggregator> {
    let http = HttpFetcher::new(&config.fetch.to_fetch_config())?;
    let normalizer = DateNormalizer::with_offset_hours(config.output.utc_offset_hours);

    let mut aggregator = Aggregator::new(http, normalizer);
    for endpoint in &config.api_endpoints {
        aggregator.add_json_api(endpoint);
    }
    for feed in &config.rss_feeds {
        aggregator.add_feed(feed);
    }
    for page in &config.scrape_urls {
        aggregator.add_scrape(page);
    }
    Ok(aggregator)
}

/// Runs the pipeline and writes all artifacts into `output_dir`.
///
/// Invalid run settings fail before anything is fetched.
pub async fn run(
    config: &AppConfig,
    output_dir: &Path,
    repository: Option<&str>,
) -> CliResult<GenerateSummary> {
    config.validate_settings()?;
    let aggregator = build_aggregator(config)?;
    info!(sources = aggregator.source_count(), "Fetching events");

    let normalizer = DateNormalizer::with_offset_hours(config.output.utc_offset_hours);
    let now = normalizer.now();
    let (events, report) = aggregator.run_at(now).await;

    if report.is_degraded() {
        warn!(
            failed = report.failed_sources(),
            "Some sources failed, writing what was collected"
        );
    }

    let page = PageContext::from_repository(repository);
    let written = write_all(&events, &page, config.output.html_limit, now, output_dir)?;

    info!(
        events = events.len(),
        dir = %output_dir.display(),
        calendar_url = %page.calendar_url,
        "Artifacts written"
    );

    Ok(GenerateSummary { report, written })
}

/// Renders and writes every artifact, creating `output_dir` if needed.
pub fn write_all(
    events: &[Event],
    page: &PageContext,
    html_limit: usize,
    generated_at: Timestamp,
    output_dir: &Path,
) -> CliResult<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let rendered = render_all(events, page, html_limit, generated_at)?;
    let mut written = Vec::with_capacity(Artifact::ALL.len());
    for (artifact, content) in rendered {
        let path = output_dir.join(artifact.file_name());
        std::fs::write(&path, content)?;
        written.push(path);
    }
    Ok(written)
}

/// Prints a short human-readable summary.
pub fn print_summary(summary: &GenerateSummary) {
    let marker = if summary.report.is_degraded() { "⚠️" } else { "✅" };
    println!("{} {} tapahtumaa", marker, summary.report.total_events());
    for outcome in &summary.report.outcomes {
        match &outcome.failure {
            Some(failure) => println!("   ⚠️  {} ({}): {}", outcome.name, outcome.kind, failure),
            None => println!(
                "   {} ({}): {} hyväksytty, {} hylätty",
                outcome.name, outcome.kind, outcome.accepted, outcome.rejected
            ),
        }
    }
    for path in &summary.written {
        println!("   📄 {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapahtumat_core::JsonSnapshot;

    fn offline_config() -> AppConfig {
        AppConfig {
            rss_feeds: Vec::new(),
            scrape_urls: Vec::new(),
            api_endpoints: Vec::new(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn aggregator_gets_every_configured_source() {
        let mut config = offline_config();
        config.api_endpoints.push("https://example.fi/api".to_string());
        config.rss_feeds.push("https://example.fi/rss".to_string());
        config.scrape_urls.push("not a url".to_string());

        let aggregator = build_aggregator(&config).unwrap();
        assert_eq!(aggregator.source_count(), 3);
    }

    #[tokio::test]
    async fn offline_run_writes_builtin_events() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("docs");

        let summary = run(&offline_config(), &out, Some("matti/kalenteri"))
            .await
            .unwrap();

        assert_eq!(summary.report.total_events(), 6);
        assert_eq!(summary.written.len(), 3);
        assert!(!summary.report.is_degraded());

        let ics = std::fs::read_to_string(out.join("calendar.ics")).unwrap();
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 6);

        let html = std::fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains("https://matti.github.io/kalenteri/calendar.ics"));

        let json = std::fs::read_to_string(out.join("events.json")).unwrap();
        let snapshot: JsonSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.count, 6);
    }

    #[tokio::test]
    async fn invalid_source_degrades_but_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = offline_config();
        config.api_endpoints.push("::".to_string());

        let summary = run(&config, tmp.path(), None).await.unwrap();
        assert_eq!(summary.report.total_events(), 6);
        assert_eq!(summary.report.failed_sources(), 1);
        assert!(summary.report.is_degraded());
    }

    #[tokio::test]
    async fn out_of_range_offset_fails_before_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("docs");
        let mut config = offline_config();
        config.output.utc_offset_hours = 20;

        let err = run(&config, &out, None).await.unwrap_err();
        assert!(matches!(err, crate::error::CliError::Config(_)));
        assert!(!out.exists());
    }

    #[test]
    fn unwritable_output_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let now = DateNormalizer::default().now();
        let result = write_all(
            &[],
            &PageContext::from_repository(None),
            15,
            now,
            &blocker.join("docs"),
        );
        assert!(matches!(result, Err(crate::error::CliError::Io(_))));
    }
}
