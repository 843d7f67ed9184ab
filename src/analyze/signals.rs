// src/analyze/signals.rs
// =============================================================================
// Pulling SEO signals out of raw HTML.
//
// The rule table (rules.rs) never looks at HTML. It looks at a PageSignals
// value, and the HtmlSignals trait is the only way to get one. That keeps
// the extraction strategy swappable:
// - PatternSignals (this file): regular expressions over the raw text. Fast,
//   forgiving and fragile in the usual ways (a '>' inside an attribute value
//   cuts a tag short). This is the default.
// - DomSignals (dom.rs): a real HTML5 parse with scraper.
//
// Rust concepts:
// - Traits: one interface, two implementations
// - once_cell::sync::Lazy: each Regex is compiled once, on first use
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;

/// Everything the rule table and the link extractor need from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    /// Trimmed <title> text, None when missing or empty
    pub title: Option<String>,
    /// Trimmed meta description content, None when missing or empty
    pub meta_description: Option<String>,
    /// Text of every <h1>, tags stripped and whitespace collapsed
    pub h1: Vec<String>,
    pub h2_count: usize,
    pub h3_count: usize,
    /// Visible words, after dropping <script>, <style> and all tags
    pub word_count: usize,
    pub image_count: usize,
    pub images_missing_alt: usize,
    pub canonical: Option<String>,
    pub robots_meta: Option<String>,
    pub has_viewport: bool,
    /// Raw href values of every <a>, in document order
    pub hrefs: Vec<String>,
}

/// Extraction strategy: raw HTML in, signals out.
pub trait HtmlSignals: Send + Sync {
    fn extract(&self, html: &str) -> PageSignals;
}

/// Regex-based extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternSignals;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).expect("valid pattern"));
    };
}

pattern!(TITLE, r"(?is)<title\b[^>]*>(.*?)</title\s*>");
pattern!(H1, r"(?is)<h1\b[^>]*>(.*?)</h1\s*>");
pattern!(H2_OPEN, r"(?i)<h2\b");
pattern!(H3_OPEN, r"(?i)<h3\b");
pattern!(SCRIPT, r"(?is)<script\b[^>]*>.*?</script\s*>");
pattern!(STYLE, r"(?is)<style\b[^>]*>.*?</style\s*>");
pattern!(ANY_TAG, r"(?s)<[^>]*>");
pattern!(META_TAG, r"(?is)<meta\b([^>]*)>");
pattern!(LINK_TAG, r"(?is)<link\b([^>]*)>");
pattern!(IMG_TAG, r"(?is)<img\b([^>]*)>");
pattern!(ANCHOR_TAG, r"(?is)<a\b([^>]*)>");
// name, then an optional =value in double, single or no quotes
pattern!(
    ATTRIBUTE,
    r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#
);

// Parses the attribute section of a tag ("href='/x' class=nav hidden").
//
// Names are lowercased; valueless attributes get an empty value.
fn attributes(tag_body: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(tag_body)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (name, value)
        })
        .collect()
}

fn attribute(tag_body: &str, name: &str) -> Option<String> {
    attributes(tag_body)
        .into_iter()
        .find(|(attr, _)| attr == name)
        .map(|(_, value)| value)
}

/// Replaces every tag with a space and collapses runs of whitespace.
pub(crate) fn strip_tags(fragment: &str) -> String {
    collapse_whitespace(&ANY_TAG.replace_all(fragment, " "))
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// Content of the first <meta name="..."> matching `name` (case-insensitive).
fn meta_content(html: &str, name: &str) -> Option<String> {
    META_TAG.captures_iter(html).find_map(|caps| {
        let attrs = attributes(&caps[1]);
        let matches = attrs
            .iter()
            .any(|(attr, value)| attr == "name" && value.eq_ignore_ascii_case(name));
        if !matches {
            return None;
        }
        Some(
            attrs
                .into_iter()
                .find(|(attr, _)| attr == "content")
                .map(|(_, value)| value.trim().to_string())
                .unwrap_or_default(),
        )
    })
}

fn canonical_href(html: &str) -> Option<String> {
    LINK_TAG.captures_iter(html).find_map(|caps| {
        let body = &caps[1];
        let is_canonical = attribute(body, "rel")
            .map(|rel| {
                rel.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
            .unwrap_or(false);
        if is_canonical {
            attribute(body, "href").map(|href| href.trim().to_string())
        } else {
            None
        }
    })
}

impl HtmlSignals for PatternSignals {
    fn extract(&self, html: &str) -> PageSignals {
        let title = TITLE
            .captures(html)
            .map(|caps| collapse_whitespace(&caps[1]))
            .and_then(non_empty);

        let meta_description = meta_content(html, "description").and_then(non_empty);

        let h1 = H1
            .captures_iter(html)
            .map(|caps| strip_tags(&caps[1]))
            .collect();

        let visible = STYLE.replace_all(&SCRIPT.replace_all(html, " "), " ").into_owned();
        let word_count = ANY_TAG.replace_all(&visible, " ").split_whitespace().count();

        let mut image_count = 0;
        let mut images_missing_alt = 0;
        for caps in IMG_TAG.captures_iter(html) {
            image_count += 1;
            if !attributes(&caps[1]).iter().any(|(name, _)| name == "alt") {
                images_missing_alt += 1;
            }
        }

        let hrefs = ANCHOR_TAG
            .captures_iter(html)
            .filter_map(|caps| attribute(&caps[1], "href"))
            .map(|href| href.trim().to_string())
            .collect();

        PageSignals {
            title,
            meta_description,
            h1,
            h2_count: H2_OPEN.find_iter(html).count(),
            h3_count: H3_OPEN.find_iter(html).count(),
            word_count,
            image_count,
            images_missing_alt,
            canonical: canonical_href(html),
            robots_meta: meta_content(html, "robots"),
            has_viewport: meta_content(html, "viewport").is_some(),
            hrefs,
        }
    }
}
