//! Application configuration.
//!
//! All settings live in a single `config.toml`, by default at
//! `~/.config/tapahtumat/config.toml`. A missing file is created with the
//! defaults on the first run so it can be edited afterwards.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tapahtumat_core::DEFAULT_UTC_OFFSET_HOURS;
use tapahtumat_core::format::html::DEFAULT_HTML_LIMIT;
use tapahtumat_sources::FetchConfig;
use tapahtumat_sources::http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use tracing::{info, warn};
use url::Url;

use crate::error::{CliError, CliResult};

/// Configuration for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// RSS or Atom feed URLs.
    pub rss_feeds: Vec<String>,

    /// Event listing pages to scrape.
    pub scrape_urls: Vec<String>,

    /// JSON event API endpoints.
    pub api_endpoints: Vec<String>,

    pub fetch: FetchSettings,

    pub output: OutputSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rss_feeds: Vec::new(),
            scrape_urls: vec!["https://www.jyvaskyla.fi/tapahtumat".to_string()],
            api_endpoints: vec!["https://kalenteri.jyvaskyla.fi/api/events".to_string()],
            fetch: FetchSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

/// HTTP settings shared by all sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchSettings {
    pub fn to_fetch_config(&self) -> FetchConfig {
        FetchConfig::default()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_user_agent(&self.user_agent)
    }
}

/// Where and how artifacts are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output directory for `calendar.ics`, `index.html` and `events.json`.
    pub dir: PathBuf,

    /// Fixed UTC offset applied to dates without a zone.
    pub utc_offset_hours: i32,

    /// Maximum number of events listed on the page.
    pub html_limit: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("docs"),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            html_limit: DEFAULT_HTML_LIMIT,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> CliResult<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from `path`, writing the defaults there first when
    /// the file does not exist.
    ///
    /// A failure to write the default file is logged and does not fail the
    /// load.
    pub fn load_or_create(path: &Path) -> CliResult<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::default();
        match config.persist(path) {
            Ok(()) => info!(path = %path.display(), "Wrote default configuration"),
            Err(e) => warn!(path = %path.display(), error = %e, "Could not write default configuration"),
        }
        Ok(config)
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Writes the configuration as TOML, creating parent directories.
    pub fn persist(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))
    }

    /// Checks source URLs and run settings.
    pub fn validate(&self) -> CliResult<()> {
        let urls = self
            .api_endpoints
            .iter()
            .chain(&self.rss_feeds)
            .chain(&self.scrape_urls);
        let mut problems: Vec<String> = urls
            .filter_map(|url| {
                Url::parse(url)
                    .err()
                    .map(|e| format!("invalid source URL {:?}: {}", url, e))
            })
            .collect();
        problems.extend(self.settings_problems());
        into_result(problems)
    }

    /// Checks the settings a run cannot work around.
    ///
    /// Bad source URLs are left out: they only degrade a run.
    pub fn validate_settings(&self) -> CliResult<()> {
        into_result(self.settings_problems())
    }

    fn settings_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.fetch.timeout_secs == 0 {
            problems.push("fetch.timeout_secs must be greater than zero".to_string());
        }
        if !(-12..=14).contains(&self.output.utc_offset_hours) {
            problems.push(format!(
                "output.utc_offset_hours {} is out of range (-12..=14)",
                self.output.utc_offset_hours
            ));
        }
        if self.output.html_limit == 0 {
            problems.push("output.html_limit must be greater than zero".to_string());
        }
        problems
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tapahtumat")
    }
}

fn into_result(problems: Vec<String>) -> CliResult<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(CliError::Config(problems.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert!(config.rss_feeds.is_empty());
        assert_eq!(config.scrape_urls, vec!["https://www.jyvaskyla.fi/tapahtumat"]);
        assert_eq!(
            config.api_endpoints,
            vec!["https://kalenteri.jyvaskyla.fi/api/events"]
        );
        assert_eq!(config.fetch.timeout_secs, 15);
        assert_eq!(config.output.dir, PathBuf::from("docs"));
        assert_eq!(config.output.utc_offset_hours, 2);
        assert_eq!(config.output.html_limit, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
rss_feeds = ["https://example.fi/rss"]

[output]
html_limit = 5
"#,
        )
        .unwrap();

        assert_eq!(config.rss_feeds, vec!["https://example.fi/rss"]);
        assert_eq!(config.scrape_urls, AppConfig::default().scrape_urls);
        assert_eq!(config.output.html_limit, 5);
        assert_eq!(config.output.dir, PathBuf::from("docs"));
        assert_eq!(config.fetch, FetchSettings::default());
    }

    #[test]
    fn toml_round_trip() {
        let mut config = AppConfig::default();
        config.rss_feeds.push("https://example.fi/feed.xml".to_string());
        config.fetch.timeout_secs = 30;

        let text = config.to_toml().unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn load_or_create_writes_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let config = AppConfig::load_or_create(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());

        let reloaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn load_or_create_keeps_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "scrape_urls = []\n").unwrap();

        let config = AppConfig::load_or_create(&path).unwrap();
        assert!(config.scrape_urls.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "scrape_urls = []\n");
    }

    #[test]
    fn load_or_default_does_not_write() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let config = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!path.exists());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "rss_feeds = \"not a list\"\n").unwrap();

        let err = AppConfig::load_or_create(&path).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut config = AppConfig::default();
        config.scrape_urls.push("not a url".to_string());
        config.fetch.timeout_secs = 0;
        config.output.utc_offset_hours = 20;
        config.output.html_limit = 0;

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("timeout_secs"));
        assert!(message.contains("utc_offset_hours"));
        assert!(message.contains("html_limit"));
    }

    #[test]
    fn settings_check_ignores_source_urls() {
        let mut config = AppConfig::default();
        config.scrape_urls.push("not a url".to_string());
        assert!(config.validate_settings().is_ok());
        assert!(config.validate().is_err());

        config.output.utc_offset_hours = 20;
        let message = config.validate_settings().unwrap_err().to_string();
        assert!(message.contains("utc_offset_hours 20"));
    }

    #[test]
    fn fetch_config_conversion() {
        let settings = FetchSettings {
            timeout_secs: 7,
            user_agent: "agent".to_string(),
        };
        let fetch = settings.to_fetch_config();
        assert_eq!(fetch.timeout, Duration::from_secs(7));
        assert_eq!(fetch.user_agent, "agent");
    }
}
