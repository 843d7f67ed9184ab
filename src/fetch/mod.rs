// src/fetch/mod.rs
// =============================================================================
// This module downloads pages.
//
// Submodules:
// - http: one reqwest Client, one GET per page, transport failures sorted
//   into FetchError buckets
//
// The fetcher knows nothing about SEO or links. It returns bytes, a status
// code and a timing; deciding what to do with them is the crawl loop's job.
// =============================================================================

mod http;

pub use http::{FetchedPage, Fetcher};
