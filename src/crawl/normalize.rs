// src/crawl/normalize.rs
// =============================================================================
// URL normalization: the identity key for "have we seen this page?".
//
// Two URLs that normalize to the same string are the same page. We:
// - drop the fragment (#section never changes what the server returns)
// - drop trailing slashes from the path, except for the root "/"
//
// Parsing through the `url` crate also lowercases the scheme and host and
// removes default ports, so HTTP://Example.com:80/a/ and http://example.com/a
// end up identical.
//
// Rust concepts:
// - Returning String (owned) because the result is stored in sets and results
// - Falling back to the input instead of returning a Result: callers always
//   get a usable key, even for garbage input
// =============================================================================

use url::Url;

/// Canonicalizes a URL for deduplication.
///
/// Malformed input is returned unchanged, so it can still be used as a key
/// (it just may not dedup against its well-formed twin).
///
/// Examples:
///   "https://example.com/docs/#intro" -> "https://example.com/docs"
///   "https://example.com"             -> "https://example.com/"
///   "not a url"                       -> "not a url"
pub fn normalize(url: &str) -> String {
    let mut parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return url.to_string(),
    };

    parsed.set_fragment(None);

    // mailto:, data: and friends have an opaque path we must not touch
    if !parsed.cannot_be_a_base() {
        let path = parsed.path();
        if path != "/" && path.ends_with('/') {
            // Strip every trailing slash so normalize() stays idempotent
            let trimmed = path.trim_end_matches('/').to_string();
            parsed.set_path(&trimmed);
        }
    }

    parsed.to_string()
}
