// src/report/graph.rs
// =============================================================================
// Orphan detection over the internal link graph.
//
// Every PageResult carries the list of internal URLs it links to. Together
// those lists are the site's link graph. A page is an orphan when no OTHER
// crawled page points at it. The start URL is never an orphan: it is the
// entry point, so nobody needs to link to it.
// =============================================================================

use super::PageResult;
use crate::crawl::normalize;
use std::collections::HashSet;

/// Returns the crawled pages that no other crawled page links to.
///
/// A page linking to itself does not rescue it. Output keeps crawl order.
pub fn find_orphans(results: &[PageResult], start_url: &str) -> Vec<PageResult> {
    let start = normalize(start_url);

    // (target, source) would be enough, but we only need "is it referenced
    // by someone other than itself", so skip self-edges while collecting.
    let mut referenced: HashSet<&str> = HashSet::new();
    for page in results {
        for link in &page.internal_links {
            if link != &page.url {
                referenced.insert(link.as_str());
            }
        }
    }

    results
        .iter()
        .filter(|page| page.url != start && !referenced.contains(page.url.as_str()))
        .cloned()
        .collect()
}
