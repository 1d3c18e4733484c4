//! Page processing: email and link extraction
//!
//! Everything in here is pure. Extraction failures never escape: a page that
//! cannot be parsed, or a link that cannot be resolved, simply contributes
//! nothing.

use crate::url::is_in_scope;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Textual email pattern, not an address grammar
///
/// The TLD part only accepts lowercase letters, so `jane@EXAMPLE.COM` is
/// missed. Matches inside unrelated text are accepted as well.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-z]{2,}").expect("email pattern is valid")
});

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Extensions of resources that are never worth fetching
const BINARY_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar", "7z", "tar", "gz", "mp4",
    "mov", "avi", "wmv", "mp3", "wav", "jpg", "jpeg", "png", "gif", "svg",
];

/// Extracts every email-like substring from a page body
///
/// The raw body is scanned, markup included. Matches are returned exactly as
/// they appear in the page.
///
/// # Example
///
/// ```
/// use jobscript_harvester::crawler::extract_emails;
///
/// let emails = extract_emails("<p>contact: jane@example.com</p>");
/// assert!(emails.contains("jane@example.com"));
/// ```
pub fn extract_emails(body: &str) -> HashSet<String> {
    EMAIL_REGEX
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extracts the in-scope links of an HTML page
///
/// Every `<a href>` is resolved against `base_origin` (not against the page's
/// own URL) and kept only if the absolute result starts with `base_origin`.
/// Unresolvable hrefs are skipped. Blank input yields an empty set.
///
/// # Arguments
///
/// * `base_origin` - Serialized origin of the crawl, e.g. `https://example.com`
/// * `html` - The page markup
///
/// # Example
///
/// ```
/// use jobscript_harvester::crawler::extract_links;
///
/// let html = r#"<a href="/about">About</a><a href="https://other.com/x">Other</a>"#;
/// let links = extract_links("https://example.com", html);
/// assert!(links.contains("https://example.com/about"));
/// assert_eq!(links.len(), 1);
/// ```
pub fn extract_links(base_origin: &str, html: &str) -> HashSet<String> {
    if html.trim().is_empty() {
        return HashSet::new();
    }

    let base = match Url::parse(base_origin) {
        Ok(base) => base,
        Err(e) => {
            tracing::debug!("Cannot resolve links against '{}': {}", base_origin, e);
            return HashSet::new();
        }
    };

    let document = Html::parse_document(html);

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, &base))
        .filter(|absolute| is_in_scope(absolute, base_origin))
        .collect()
}

/// Resolves an href against the base URL
///
/// Returns None if the href cannot be turned into an absolute URL.
fn resolve_link(href: &str, base: &Url) -> Option<String> {
    match base.join(href) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(e) => {
            tracing::trace!("Skipping unresolvable href '{}': {}", href, e);
            None
        }
    }
}

/// Checks whether a URL points at a known non-HTML resource
///
/// The check is a case-insensitive suffix test on the URL string, so a query
/// string after the extension defeats it.
///
/// ```
/// use jobscript_harvester::crawler::is_binary_file;
///
/// assert!(is_binary_file("https://example.com/brochure.PDF"));
/// assert!(!is_binary_file("https://example.com/about"));
/// ```
pub fn is_binary_file(url: &str) -> bool {
    let lowered = url.to_ascii_lowercase();

    match lowered.rsplit_once('.') {
        Some((_, extension)) => BINARY_EXTENSIONS.contains(&extension),
        None => false,
    }
}
