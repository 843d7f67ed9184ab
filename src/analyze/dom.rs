// src/analyze/dom.rs
// =============================================================================
// DOM-based signal extraction.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model) the way a browser would
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Compared to PatternSignals this copes with attributes containing '>',
// unclosed tags and odd nesting. It produces the same PageSignals, so the
// rule table cannot tell which extractor ran.
//
// Rust concepts:
// - Iterators over the parsed tree (descendants, ancestors)
// - Closures: small helpers like `count` capture the parsed document
// =============================================================================

use super::signals::{collapse_whitespace, strip_tags, HtmlSignals, PageSignals};
use scraper::{ElementRef, Html, Selector};

/// Extractor backed by a full HTML5 parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomSignals;

// Selector::parse only fails on invalid CSS, and every selector below is a
// constant we control.
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

// Content of the first <meta name=...> whose name matches (case-insensitive).
fn meta_content(document: &Html, name: &str) -> Option<String> {
    let metas = selector("meta[name]");
    document
        .select(&metas)
        .find(|meta| {
            meta.value()
                .attr("name")
                .map(|n| n.eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .map(|meta| meta.value().attr("content").unwrap_or("").trim().to_string())
}

// Counts words in text nodes that are not inside <script> or <style>.
// html5ever keeps <noscript> content as raw text, so any markup in it is
// stripped before counting, the same as everywhere else on the page.
fn visible_word_count(document: &Html) -> usize {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter_map(|(node, text)| {
            let parent = node.ancestors().find_map(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|el| el.name())
                    .filter(|name| matches!(*name, "script" | "style" | "noscript"))
            });
            match parent {
                Some("noscript") => Some(strip_tags(text).split_whitespace().count()),
                Some(_) => None,
                None => Some(text.split_whitespace().count()),
            }
        })
        .sum()
}

impl HtmlSignals for DomSignals {
    fn extract(&self, html: &str) -> PageSignals {
        let document = Html::parse_document(html);
        let count = |css: &str| document.select(&selector(css)).count();

        let title = document
            .select(&selector("title"))
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty());

        let meta_description = meta_content(&document, "description").filter(|d| !d.is_empty());

        let h1 = document.select(&selector("h1")).map(element_text).collect();

        let images: Vec<_> = document.select(&selector("img")).collect();
        let images_missing_alt = images
            .iter()
            .filter(|img| img.value().attr("alt").is_none())
            .count();

        let canonical = document
            .select(&selector("link[rel][href]"))
            .find(|link| {
                link.value()
                    .attr("rel")
                    .map(|rel| {
                        rel.split_whitespace()
                            .any(|token| token.eq_ignore_ascii_case("canonical"))
                    })
                    .unwrap_or(false)
            })
            .and_then(|link| link.value().attr("href"))
            .map(|href| href.trim().to_string());

        let hrefs = document
            .select(&selector("a[href]"))
            .filter_map(|a| a.value().attr("href"))
            .map(|href| href.trim().to_string())
            .collect();

        PageSignals {
            title,
            meta_description,
            h1,
            h2_count: count("h2"),
            h3_count: count("h3"),
            word_count: visible_word_count(&document),
            image_count: images.len(),
            images_missing_alt,
            canonical,
            robots_meta: meta_content(&document, "robots"),
            has_viewport: meta_content(&document, "viewport").is_some(),
            hrefs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::PatternSignals;

    const PAGE: &str = r#"<html><head>
        <title>Dom Extraction</title>
        <meta name="description" content="Parsed with html5ever">
        <meta name="viewport" content="width=device-width">
        <link rel="canonical" href="https://example.com/dom">
        <script>one two three</script>
        </head><body>
        <h1>First</h1><h1>Second <b>one</b></h1>
        <h2>a</h2><h3>b</h3><h3>c</h3>
        <img src="x.png"><img src="y.png" alt="">
        <a href="/a">A</a><a href="https://other.com">B</a>
        </body></html>"#;

    #[test]
    fn test_extracts_signals() {
        let signals = DomSignals.extract(PAGE);
        assert_eq!(signals.title.as_deref(), Some("Dom Extraction"));
        assert_eq!(signals.meta_description.as_deref(), Some("Parsed with html5ever"));
        assert_eq!(signals.h1, vec!["First".to_string(), "Second one".to_string()]);
        assert_eq!(signals.h2_count, 1);
        assert_eq!(signals.h3_count, 2);
        assert_eq!(signals.image_count, 2);
        assert_eq!(signals.images_missing_alt, 1);
        assert_eq!(signals.canonical.as_deref(), Some("https://example.com/dom"));
        assert!(signals.has_viewport);
        assert_eq!(signals.robots_meta, None);
        assert_eq!(signals.hrefs, vec!["/a", "https://other.com"]);
    }

    #[test]
    fn test_script_text_is_not_counted() {
        let signals = DomSignals.extract(PAGE);
        assert!(!signals.hrefs.is_empty());
        // Title (2) + h1s (3) + h2/h3 (3) + links (2)
        assert_eq!(signals.word_count, 10);
    }

    #[test]
    fn test_noscript_text_counts_like_pattern_extractor() {
        let html = "<html><body><p>Hello world</p>\
            <noscript><p>Please enable JavaScript</p></noscript></body></html>";
        let dom = DomSignals.extract(html);
        assert_eq!(dom.word_count, 5);
        assert_eq!(dom.word_count, PatternSignals.extract(html).word_count);
    }

    #[test]
    fn test_handles_gt_inside_attribute() {
        let html = r#"<img alt="a > b" src="x.png"><a title="x>y" href="/z">z</a>"#;
        let signals = DomSignals.extract(html);
        assert_eq!(signals.images_missing_alt, 0);
        assert_eq!(signals.hrefs, vec!["/z"]);
    }

    #[test]
    fn test_agrees_with_pattern_extractor_on_simple_pages() {
        let dom = DomSignals.extract(PAGE);
        let pattern = PatternSignals.extract(PAGE);
        assert_eq!(dom.title, pattern.title);
        assert_eq!(dom.meta_description, pattern.meta_description);
        assert_eq!(dom.h1, pattern.h1);
        assert_eq!(dom.image_count, pattern.image_count);
        assert_eq!(dom.images_missing_alt, pattern.images_missing_alt);
        assert_eq!(dom.hrefs, pattern.hrefs);
        assert_eq!(dom.word_count, pattern.word_count);
    }
}
