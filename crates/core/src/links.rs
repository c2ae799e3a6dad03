//! Free-text link extraction for llms.txt-style lists.
//!
//! Accepts arbitrary text containing Markdown-style links, HTML anchors, or
//! bare URLs, and converts the lot into a deduplicated Markdown list.

use regex::Regex;
use url::Url;

use crate::metadata::squash_whitespace;

/// One extracted link: a display label and the URL it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub label: String,
    pub url: String,
}

/// Punctuation that bare-URL matches drag along from surrounding prose.
const TRAILING_PUNCTUATION: &[char] = &[')', ']', ',', '.', ';', ':', '\'', '"', '>'];

/// Extract all links from free-form text, deduplicated by URL.
///
/// Markdown links are scanned first, then HTML anchors, then bare URLs, so a
/// labeled occurrence wins over a later bare repeat of the same address.
/// The label defaults to the URL itself when no text is present. Only
/// addresses that parse with a scheme and host are kept.
pub fn extract_link_entries(input: &str) -> Vec<LinkEntry> {
    let markdown = Regex::new(r"\[([^\]]*)\]\(([^)\s]+)\)").unwrap();
    let anchor = Regex::new(r#"(?si)<a\s+[^>]*href\s*=\s*"([^"]+)"[^>]*>(.*?)</a>"#).unwrap();
    let bare = Regex::new(r#"https?://[^\s<>"]+"#).unwrap();

    let mut candidates: Vec<(String, String)> = Vec::new();

    for caps in markdown.captures_iter(input) {
        candidates.push((caps[1].to_string(), caps[2].to_string()));
    }
    for caps in anchor.captures_iter(input) {
        candidates.push((caps[2].to_string(), caps[1].to_string()));
    }
    for m in bare.find_iter(input) {
        let url = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        candidates.push((url.to_string(), url.to_string()));
    }

    let mut seen = std::collections::HashSet::new();
    let mut entries = Vec::new();
    for (label, url) in candidates {
        let url = url.trim().to_string();
        if !is_valid_link(&url) || !seen.insert(url.clone()) {
            continue;
        }
        let label = squash_whitespace(&label);
        let label = if label.is_empty() { url.clone() } else { label };
        entries.push(LinkEntry { label, url });
    }

    entries
}

fn is_valid_link(url: &str) -> bool {
    Url::parse(url).map(|u| u.has_host()).unwrap_or(false)
}

/// Render extracted entries as Markdown list items, one per line.
pub fn render_link_list(entries: &[LinkEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("- [{}]({})", e.label, e.url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convenience wrapper: extract and render in one step.
pub fn convert_link_text(input: &str) -> String {
    render_link_list(&extract_link_entries(input))
}
