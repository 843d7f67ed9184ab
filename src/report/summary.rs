// src/report/summary.rs
// =============================================================================
// The aggregator: one pass over the results producing the summary numbers.
// =============================================================================

use super::{PageResult, Severity, Summary};
use std::collections::BTreeMap;

/// Reduces the result set into a `Summary`.
///
/// Averages divide by the number of results; an empty crawl (for example an
/// invalid host that produced nothing) yields zeros instead of NaN.
pub fn summarize(results: &[PageResult], orphaned_page_count: usize) -> Summary {
    let mut issue_breakdown: BTreeMap<Severity, usize> =
        Severity::ALL.iter().map(|severity| (*severity, 0)).collect();

    let mut pages_with_issues = 0;
    let mut total_issues = 0;
    let mut word_total: u64 = 0;
    let mut load_total: u64 = 0;

    for page in results {
        if page.has_issues() {
            pages_with_issues += 1;
        }
        total_issues += page.issues.len();
        for issue in &page.issues {
            *issue_breakdown.entry(issue.severity).or_insert(0) += 1;
        }
        word_total += page.word_count as u64;
        load_total += page.load_time_ms;
    }

    let total_pages = results.len();
    let average = |total: u64| {
        if total_pages == 0 {
            0.0
        } else {
            total as f64 / total_pages as f64
        }
    };

    Summary {
        total_pages,
        pages_with_issues,
        avg_word_count: average(word_total),
        avg_load_time_ms: average(load_total),
        orphaned_page_count,
        total_issues,
        issue_breakdown,
    }
}
