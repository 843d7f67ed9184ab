// src/analyze/rules.rs
// =============================================================================
// The SEO rule table.
//
// Each rule looks at the extracted signals and may add one issue. Rules are
// independent: a page can (and usually does) break several at once. The
// thresholds are part of the report contract, so they are constants here,
// not options.
// =============================================================================

use super::signals::PageSignals;
use crate::report::{Issue, IssueKind, Severity};

pub const TITLE_MIN_LEN: usize = 30;
pub const TITLE_MAX_LEN: usize = 60;
pub const META_DESCRIPTION_MIN_LEN: usize = 120;
pub const THIN_CONTENT_WORDS: usize = 300;
pub const SLOW_LOAD_MS: u64 = 3000;
pub const VERY_SLOW_LOAD_MS: u64 = 5000;

/// Applies every rule, in table order, and returns the issues found.
pub fn evaluate(signals: &PageSignals, load_time_ms: u64) -> Vec<Issue> {
    let mut issues = Vec::new();

    match &signals.title {
        None => issues.push(Issue::new(
            IssueKind::MissingTitle,
            Severity::High,
            "Missing title tag",
        )),
        Some(title) => {
            let len = title.chars().count();
            if len < TITLE_MIN_LEN {
                issues.push(Issue::new(
                    IssueKind::TitleTooShort,
                    Severity::Medium,
                    format!(
                        "Title too short ({} chars), recommend {}-{}",
                        len, TITLE_MIN_LEN, TITLE_MAX_LEN
                    ),
                ));
            } else if len > TITLE_MAX_LEN {
                issues.push(Issue::new(
                    IssueKind::TitleTooLong,
                    Severity::Low,
                    format!("Title too long ({} chars), may be truncated in search results", len),
                ));
            }
        }
    }

    match &signals.meta_description {
        None => issues.push(Issue::new(
            IssueKind::MissingMetaDescription,
            Severity::Medium,
            "Missing meta description",
        )),
        Some(description) => {
            let len = description.chars().count();
            if len < META_DESCRIPTION_MIN_LEN {
                issues.push(Issue::new(
                    IssueKind::MetaDescriptionTooShort,
                    Severity::Low,
                    format!(
                        "Meta description too short ({} chars), recommend at least {}",
                        len, META_DESCRIPTION_MIN_LEN
                    ),
                ));
            }
        }
    }

    match signals.h1.len() {
        0 => issues.push(Issue::new(IssueKind::MissingH1, Severity::High, "Missing H1 tag")),
        1 => {}
        n => issues.push(Issue::new(
            IssueKind::MultipleH1,
            Severity::Medium,
            format!("Multiple H1 tags found ({})", n),
        )),
    }

    if signals.word_count < THIN_CONTENT_WORDS {
        issues.push(Issue::new(
            IssueKind::ThinContent,
            Severity::Medium,
            format!(
                "Thin content ({} words), recommend at least {}",
                signals.word_count, THIN_CONTENT_WORDS
            ),
        ));
    }

    if signals.images_missing_alt > 0 {
        issues.push(Issue::new(
            IssueKind::ImagesMissingAlt,
            Severity::Medium,
            format!("{} image(s) missing alt text", signals.images_missing_alt),
        ));
    }

    if let Some(robots) = &signals.robots_meta {
        let robots = robots.to_ascii_lowercase();
        if robots.contains("noindex") || robots.contains("nofollow") {
            issues.push(Issue::new(
                IssueKind::RobotsBlocked,
                Severity::High,
                format!("Robots meta tag restricts indexing: {}", robots),
            ));
        }
    }

    if !signals.has_viewport {
        issues.push(Issue::new(
            IssueKind::MissingViewport,
            Severity::High,
            "Missing viewport meta tag (not mobile-friendly)",
        ));
    }

    // Higher threshold wins; never both
    if load_time_ms > VERY_SLOW_LOAD_MS {
        issues.push(Issue::new(
            IssueKind::SlowLoad,
            Severity::High,
            format!("Very slow page load ({}ms)", load_time_ms),
        ));
    } else if load_time_ms > SLOW_LOAD_MS {
        issues.push(Issue::new(
            IssueKind::SlowLoad,
            Severity::Medium,
            format!("Slow page load ({}ms)", load_time_ms),
        ));
    }

    issues
}
