// src/crawl/job.rs
// =============================================================================
// What to crawl (CrawlJob) and how to crawl it (CrawlOptions).
//
// CrawlJob mirrors the request the calling service receives:
//   { "startUrl": "...", "maxPages": 50, "followExternal": false }
// so it deserializes straight from that JSON, defaults included.
//
// CrawlOptions holds the engine knobs the request does not carry: worker
// count, politeness delay, timeouts and which HTML extractor to use.
// =============================================================================

use crate::analyze::ParserKind;
use crate::error::CrawlError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_MAX_PAGES: usize = 50;
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_POLITENESS_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str =
    concat!("site-audit/", env!("CARGO_PKG_VERSION"), " (SEO crawler)");

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

/// One crawl request. Immutable once the crawl starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlJob {
    /// Missing in the JSON means empty here, which validate() rejects
    #[serde(default)]
    pub start_url: String,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Record external links on each page (they are never crawled)
    #[serde(default)]
    pub follow_external: bool,
}

impl CrawlJob {
    pub fn new(start_url: impl Into<String>) -> Self {
        CrawlJob {
            start_url: start_url.into(),
            max_pages: DEFAULT_MAX_PAGES,
            follow_external: false,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_follow_external(mut self, follow_external: bool) -> Self {
        self.follow_external = follow_external;
        self
    }

    // Checks the job before anything touches the network.
    //
    // Returns the parsed start URL so the engine does not parse it twice.
    pub fn validate(&self) -> Result<Url, CrawlError> {
        let raw = self.start_url.trim();
        if raw.is_empty() {
            return Err(CrawlError::InvalidJob("startUrl is required".to_string()));
        }

        let start = Url::parse(raw)
            .map_err(|e| CrawlError::InvalidJob(format!("invalid startUrl '{}': {}", raw, e)))?;

        if start.scheme() != "http" && start.scheme() != "https" {
            return Err(CrawlError::InvalidJob(format!(
                "startUrl must use http or https, got '{}'",
                start.scheme()
            )));
        }
        if start.host_str().is_none() {
            return Err(CrawlError::InvalidJob(format!("startUrl has no host: {}", raw)));
        }
        if self.max_pages == 0 {
            return Err(CrawlError::InvalidJob(
                "maxPages must be greater than 0".to_string(),
            ));
        }

        Ok(start)
    }
}

/// Engine settings. `Default` gives the reference behavior plus a small
/// worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Fetches allowed in flight at once (values below 1 act as 1)
    pub concurrency: usize,
    /// Minimum spacing between fetch starts; zero disables throttling
    pub politeness_delay: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Stop the whole crawl after this long
    pub deadline: Option<Duration>,
    pub parser: ParserKind,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        CrawlOptions {
            concurrency: DEFAULT_CONCURRENCY,
            politeness_delay: DEFAULT_POLITENESS_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            deadline: None,
            parser: ParserKind::default(),
        }
    }
}
