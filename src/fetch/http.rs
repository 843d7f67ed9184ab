// src/fetch/http.rs
// =============================================================================
// This module fetches a single page over HTTP.
//
// Key functionality:
// - Makes one GET request per page with a fixed timeout
// - Identifies itself with a User-Agent header
// - Follows a few redirects (the final page is what we analyze)
// - Measures how long the page took, including the body download
// - Turns transport failures into FetchError variants
//
// What it does NOT do:
// - Treat HTTP error statuses as failures. A 500 page with an HTML body is
//   still a page; the status code is simply recorded.
//
// Rust concepts:
// - Client reuse: reqwest::Client pools connections, so we build it once
// - Result<T, E>: fetch() returns Ok(page) or Err(FetchError)
// =============================================================================

use crate::crawl::CrawlOptions;
use crate::error::{CrawlError, FetchError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Instant;
use tracing::debug;

/// Maximum redirect hops before a fetch fails with TooManyRedirects.
const MAX_REDIRECTS: usize = 5;

/// A page as it came off the wire.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Where the response actually came from, after redirects
    pub final_url: String,
    pub status_code: u16,
    /// Raw Content-Type header, empty when the server sent none
    pub content_type: String,
    pub body: String,
    /// Wall time from sending the request to finishing the body
    pub load_time_ms: u64,
}

impl FetchedPage {
    /// Only HTML pages get analyzed; everything else is skipped.
    pub fn is_html(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("text/html")
    }
}

/// HTTP client wrapper shared by every in-flight fetch of one crawl.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // Builds the client from the crawl options.
    //
    // Fails only if reqwest cannot set up its TLS backend, which is a
    // job-level problem: nothing could be fetched anyway.
    pub fn new(options: &CrawlOptions) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(options.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(options.user_agent.clone())
            .build()?;

        Ok(Fetcher { client })
    }

    /// Issues a GET for `url` and reads the whole body.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        let final_url = response.url().to_string();
        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))?;

        let load_time_ms = started.elapsed().as_millis() as u64;
        debug!(url, status_code, load_time_ms, "fetched page");

        Ok(FetchedPage {
            final_url,
            status_code,
            content_type,
            body,
            load_time_ms,
        })
    }
}
