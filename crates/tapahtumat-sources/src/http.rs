//! Shared HTTP client for all sources.

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{debug, trace};
use url::Url;

use crate::error::{SourceError, SourceResult};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; JyvaskylaEventsBot/1.0)";

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Builder method to set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to set the User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// A GET-only client with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the underlying client.
    pub fn new(config: &FetchConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                SourceError::internal(format!("Failed to create HTTP client: {}", e)).with_cause(e)
            })?;

        Ok(Self { client })
    }

    /// Fetches `url` and returns the decoded body.
    pub async fn get_text(&self, url: &Url) -> SourceResult<String> {
        let response = self.send(url).await?;
        response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, url, "Failed to read response"))
    }

    /// Fetches `url` and returns the raw body.
    pub async fn get_bytes(&self, url: &Url) -> SourceResult<Vec<u8>> {
        let response = self.send(url).await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| map_reqwest_error(e, url, "Failed to read response"))
    }

    async fn send(&self, url: &Url) -> SourceResult<Response> {
        debug!(url = %url, "Fetching");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, url, "Request failed"))?;

        let status = response.status();
        trace!(status = %status, url = %url, "Received response");
        if status.is_success() {
            Ok(response)
        } else {
            Err(SourceError::http_status(format!("HTTP {}", status)).with_source_name(url.as_str()))
        }
    }
}

fn map_reqwest_error(error: reqwest::Error, url: &Url, context: &str) -> SourceError {
    let base = if error.is_timeout() {
        SourceError::timeout(format!("{}: timed out", context))
    } else {
        SourceError::network(format!("{}: {}", context, error))
    };
    base.with_source_name(url.as_str()).with_cause(error)
}
