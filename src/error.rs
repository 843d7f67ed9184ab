// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// There are two layers of failure:
// - CrawlError: the whole job is rejected (bad start URL, HTTP client could
//   not be built). Returned to the caller before any page is fetched.
// - FetchError: a single page could not be fetched. The crawl loop turns it
//   into a degraded PageResult and keeps going, so it never reaches the caller
//   as an Err.
//
// Malformed hrefs are a third, smaller layer: they are logged and dropped
// inside the link extractor and have no error type at all.
// =============================================================================

use thiserror::Error;

/// Job-level errors. Anything returned here means no crawling happened.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The job itself is invalid (missing/unparsable start URL, zero page budget).
    #[error("invalid crawl job: {0}")]
    InvalidJob(String),

    /// The HTTP client could not be constructed (e.g. TLS backend failure).
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Why a single page fetch failed.
///
/// The variants follow the same buckets a link checker reports to users, so
/// the message placed on the critical issue is readable on its own.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("could not resolve hostname")]
    Dns,
    #[error("SSL certificate error")]
    Tls,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    // Sorts a reqwest error into one of our buckets.
    //
    // reqwest only exposes a few predicates (is_timeout, is_connect, ...), so
    // DNS and TLS failures are recognized from the error text.
    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        let error_string = error.to_string().to_lowercase();
        // The chain usually holds the interesting part ("dns error", "certificate")
        let source_string = std::error::Error::source(error)
            .map(|s| s.to_string().to_lowercase())
            .unwrap_or_default();
        let mentions = |needle: &str| error_string.contains(needle) || source_string.contains(needle);

        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_redirect() {
            FetchError::TooManyRedirects
        } else if mentions("certificate") || mentions("ssl") || mentions("tls") {
            FetchError::Tls
        } else if error.is_connect() {
            if mentions("dns") {
                FetchError::Dns
            } else {
                FetchError::Connect(source_string_or(&source_string, &error_string))
            }
        } else if error.is_body() || error.is_decode() {
            FetchError::Body(error_string)
        } else {
            FetchError::Other(error_string)
        }
    }
}

fn source_string_or(source: &str, fallback: &str) -> String {
    if source.is_empty() {
        fallback.to_string()
    } else {
        source.to_string()
    }
}
