// src/lib.rs
// =============================================================================
// site-audit: crawl a website, audit each page's on-page SEO and find pages
// nothing else on the site links to.
//
// Modules:
// - crawl: the crawl loop, frontier, URL normalization, job/options
// - fetch: the HTTP fetcher
// - analyze: HTML signal extraction, SEO rules, link extraction
// - report: result types, orphan detection, summary
// - error: job-level and page-level error types
//
// The entry point is `crawl(CrawlJob) -> Result<CrawlReport, CrawlError>`.
// It has no transport or persistence dependencies; the binary in main.rs
// is just one caller.
// =============================================================================

pub mod analyze;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod report;

pub use crawl::{crawl, crawl_with, CrawlJob, CrawlOptions, Crawler};
pub use error::{CrawlError, FetchError};
pub use report::{CrawlReport, Issue, IssueKind, PageResult, Severity, Summary};
