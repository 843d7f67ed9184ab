// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a URL
// - Same-origin restriction (never crawls other sites)
// - Hard page budget (max_pages)
// - Small worker pool with a politeness throttle between fetches
// - Cancellation token and optional overall deadline
//
// Submodules:
// - normalize: canonical URL keys
// - frontier: FIFO queue plus visited/enqueued sets
// - job: CrawlJob (what to crawl) and CrawlOptions (how)
// - throttle: spacing between fetch starts
// - engine: the crawl loop itself
// =============================================================================

mod engine;
mod frontier;
mod job;
mod normalize;
mod throttle;

// Re-export the public crawling API
pub use engine::{crawl, crawl_with, Crawler};
pub use frontier::Frontier;
pub use job::{
    CrawlJob, CrawlOptions, DEFAULT_CONCURRENCY, DEFAULT_MAX_PAGES, DEFAULT_POLITENESS_DELAY,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT,
};
pub use normalize::normalize;
