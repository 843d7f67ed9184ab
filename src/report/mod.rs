// src/report/mod.rs
// =============================================================================
// The data the crawl produces: issues, per-page results and the final report.
//
// Submodules:
// - graph: orphan detection over the internal link graph
// - summary: the single reduction pass that builds the summary statistics
//
// Everything here derives Serialize so the binary (or any other caller) can
// hand it straight to serde_json. Field names are camelCase on the wire
// because that is what the calling service expects.
// =============================================================================

mod graph;
mod summary;

pub use graph::find_orphans;
pub use summary::summarize;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How bad an issue is. Ordered, so `Severity::High > Severity::Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Which rule produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingTitle,
    TitleTooShort,
    TitleTooLong,
    MissingMetaDescription,
    MetaDescriptionTooShort,
    MissingH1,
    MultipleH1,
    ThinContent,
    ImagesMissingAlt,
    RobotsBlocked,
    MissingViewport,
    SlowLoad,
    FetchFailed,
}

/// A single rule violation found on a page. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }
}

/// Everything we learned about one visited URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// Normalized URL, unique within one report
    pub url: String,
    /// HTTP status, or 0 when the fetch itself failed
    pub status_code: u16,
    pub title: String,
    pub meta_description: String,
    pub h1: Vec<String>,
    pub h2_count: usize,
    pub h3_count: usize,
    pub word_count: usize,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
    pub image_count: usize,
    pub images_missing_alt: usize,
    pub canonical: Option<String>,
    pub robots_meta: Option<String>,
    pub has_viewport: bool,
    pub load_time_ms: u64,
    pub content_type: String,
    pub issues: Vec<Issue>,
}

impl PageResult {
    // Builds the degraded result for a page we could not fetch:
    // zeroed fields plus exactly one critical issue naming the failure.
    pub fn failed(url: impl Into<String>, reason: &impl std::fmt::Display) -> Self {
        PageResult {
            url: url.into(),
            issues: vec![Issue::new(
                IssueKind::FetchFailed,
                Severity::Critical,
                format!("Failed to fetch page: {}", reason),
            )],
            ..PageResult::default()
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Highest severity among this page's issues, if any.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|issue| issue.severity).max()
    }
}

/// Aggregate statistics over every page in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_pages: usize,
    pub pages_with_issues: usize,
    pub avg_word_count: f64,
    pub avg_load_time_ms: f64,
    pub orphaned_page_count: usize,
    pub total_issues: usize,
    pub issue_breakdown: BTreeMap<Severity, usize>,
}

/// Bookkeeping about the crawl itself rather than the pages it found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlStats {
    /// URLs taken off the frontier (fetched, failed or skipped)
    pub pages_visited: usize,
    /// Visited URLs whose content type was not HTML
    pub skipped_non_html: usize,
    /// True when a cancellation token or deadline stopped the crawl early
    pub cancelled: bool,
}

/// The complete output of one crawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    pub start_url: String,
    pub results: Vec<PageResult>,
    pub orphaned_pages: Vec<PageResult>,
    pub summary: Summary,
    pub stats: CrawlStats,
}

/// What the calling service returns to its client: a bounded slice of results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPreview<'a> {
    pub summary: &'a Summary,
    pub results: &'a [PageResult],
    pub orphaned_pages: &'a [PageResult],
}

impl CrawlReport {
    // Runs the whole-graph post-analysis over a finished result set.
    pub fn build(start_url: String, results: Vec<PageResult>, stats: CrawlStats) -> Self {
        let orphaned_pages = find_orphans(&results, &start_url);
        let summary = summarize(&results, orphaned_pages.len());
        CrawlReport {
            start_url,
            results,
            orphaned_pages,
            summary,
            stats,
        }
    }

    /// Summary, the first `limit` results and all orphans.
    pub fn preview(&self, limit: usize) -> ReportPreview<'_> {
        let end = limit.min(self.results.len());
        ReportPreview {
            summary: &self.summary,
            results: &self.results[..end],
            orphaned_pages: &self.orphaned_pages,
        }
    }

    /// Page URL -> internal URLs it links to, ready to persist as rows.
    pub fn link_graph(&self) -> BTreeMap<&str, &[String]> {
        self.results
            .iter()
            .map(|page| (page.url.as_str(), page.internal_links.as_slice()))
            .collect()
    }

    /// Every issue across the crawl at or above `threshold`.
    pub fn count_at_least(&self, threshold: Severity) -> usize {
        self.results
            .iter()
            .flat_map(|page| page.issues.iter())
            .filter(|issue| issue.severity >= threshold)
            .count()
    }
}
