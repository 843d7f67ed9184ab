// src/analyze/links.rs
// =============================================================================
// This module turns the hrefs found on a page into crawlable URLs.
//
// How it works:
// 1. Skip targets that are not pages (#anchors, mailto:, tel:, javascript:)
// 2. Resolve the href against the page URL (handles absolute, //host/path,
//    /root-relative and plain relative forms)
// 3. Normalize the result so it matches frontier keys
// 4. Classify it: internal if its origin (scheme + host + port) equals the
//    start URL's origin, external otherwise
//
// Internal links feed the frontier and the link graph. External links are
// only recorded when the job asks for them, and are never crawled.
//
// Rust concepts:
// - Url::join: resolves relative references like a browser does
// - Url::origin: compares scheme, host and port in one go
// =============================================================================

use crate::crawl::normalize;
use std::collections::HashSet;
use tracing::warn;
use url::{Origin, Url};

/// The links found on one page, split by origin and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

/// Resolves and classifies hrefs relative to the crawl's start origin.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    origin: Origin,
    follow_external: bool,
}

impl LinkExtractor {
    pub fn new(start: &Url, follow_external: bool) -> Self {
        LinkExtractor {
            origin: start.origin(),
            follow_external,
        }
    }

    /// Resolves every href found on `page_url`.
    ///
    /// Each list keeps first-seen order and holds each URL once.
    pub fn extract(&self, page_url: &str, hrefs: &[String]) -> PageLinks {
        let mut links = PageLinks::default();

        let base = match Url::parse(page_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(page_url, error = %e, "cannot resolve links on unparsable page URL");
                return links;
            }
        };

        let mut seen = HashSet::new();
        for href in hrefs {
            let resolved = match resolve_link(&base, href) {
                Ok(Some(url)) => url,
                Ok(None) => continue,
                Err(e) => {
                    warn!(page_url, href = href.as_str(), error = %e, "skipping malformed link");
                    continue;
                }
            };

            let normalized = normalize(resolved.as_str());
            if !seen.insert(normalized.clone()) {
                continue;
            }

            if resolved.origin() == self.origin {
                links.internal.push(normalized);
            } else if self.follow_external {
                links.external.push(normalized);
            }
        }

        links
    }
}

// Resolves a link (possibly relative) to an absolute http(s) URL.
//
// Returns:
//   Ok(Some(url)) for a crawlable link
//   Ok(None) for targets we skip on purpose (anchors, mailto:, other schemes)
//   Err(..) when the href cannot be parsed at all
fn resolve_link(base: &Url, href: &str) -> Result<Option<Url>, url::ParseError> {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("javascript:")
    {
        return Ok(None);
    }

    let url = base.join(href)?;
    if url.scheme() == "http" || url.scheme() == "https" {
        Ok(Some(url))
    } else {
        Ok(None)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why compare origins instead of domains?
//    - http://example.com and https://example.com are different origins
//    - so are example.com:8080 and example.com
//    - the crawl stays on exactly the scheme/host/port it started on
//
// 2. Why does "//cdn.example.com/x" work without special casing?
//    - it is a protocol-relative reference; Url::join borrows the scheme
//      from the page URL, exactly like a browser
// -----------------------------------------------------------------------------
