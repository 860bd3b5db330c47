//! Directory listing scrape.
//!
//! The archive server is a plain static file server; its directory index is
//! an HTML page of anchor tags. Discovery extracts the anchors and keeps
//! only transcript files. There is no listing API to speak of, so this is
//! deliberately a scrape, not a protocol.

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Extract transcript filenames from a directory index page.
///
/// Keeps the last path segment of each anchor's href, dropping entries that
/// are empty, hidden (leading dot), parent links, or anything that is not a
/// `transcript_*.json` file. Duplicate anchors (common in fancy index
/// pages) collapse to one entry, preserving first-seen order.
pub fn transcript_files(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| href.split('/').last())
        .filter(|name| !name.is_empty() && !name.starts_with('.') && *name != "..")
        .filter(|name| name.ends_with(".json") && name.starts_with("transcript_"))
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}
