// src/analyze/mod.rs
// =============================================================================
// This module contains the on-page analysis.
//
// Submodules:
// - signals: the HtmlSignals interface and the regex-based extractor
// - dom: an alternative extractor built on scraper
// - rules: the SEO rule table that turns signals into issues
// - links: resolving and classifying the hrefs a page contains
//
// analyze() is a pure function: HTML and a load time in, fields and issues
// out. No network, no shared state.
// =============================================================================

mod dom;
pub mod links;
pub mod rules;
mod signals;

pub use dom::DomSignals;
pub use links::{LinkExtractor, PageLinks};
pub use signals::{HtmlSignals, PageSignals, PatternSignals};

use crate::report::Issue;
use serde::{Deserialize, Serialize};

/// Which HtmlSignals implementation a crawl uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// Regular expressions over the raw HTML
    #[default]
    Pattern,
    /// Full HTML5 parse via scraper
    Dom,
}

impl ParserKind {
    pub fn extractor(self) -> Box<dyn HtmlSignals> {
        match self {
            ParserKind::Pattern => Box::new(PatternSignals),
            ParserKind::Dom => Box::new(DomSignals),
        }
    }
}

/// Signals plus the issues the rule table found in them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAnalysis {
    pub signals: PageSignals,
    pub issues: Vec<Issue>,
}

/// Analyzes a page with the default (pattern) extractor.
pub fn analyze(html: &str, load_time_ms: u64) -> PageAnalysis {
    analyze_with(&PatternSignals, html, load_time_ms)
}

pub fn analyze_with(extractor: &dyn HtmlSignals, html: &str, load_time_ms: u64) -> PageAnalysis {
    let signals = extractor.extract(html);
    let issues = rules::evaluate(&signals, load_time_ms);
    PageAnalysis { signals, issues }
}
