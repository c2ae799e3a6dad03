//! Bounded page-to-Markdown digests.
//!
//! Given a URL, fetch the page over plain HTTP and emit a short Markdown
//! digest: meta description, title, the main content's headings, and the
//! first few paragraphs. A failed fetch produces an error placeholder
//! document instead of aborting the batch.

use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::fetch::{FetchConfig, fetch_url};

/// One digested page, ready to be written or bundled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDigest {
    /// Sanitized, `.md`-suffixed slug derived from the URL path.
    pub filename: String,
    /// Markdown content.
    pub content: String,
}

const PARAGRAPH_LIMIT: usize = 5;
const MAX_FILENAME_CHARS: usize = 200;

/// Containers whose text is page chrome rather than content.
const CHROME_TAGS: &[&str] = &["head", "header", "footer", "nav", "aside", "script", "style"];

/// Extract the most important content of a page for LLM consumption.
///
/// Prioritizes the meta description, the page title, headings from the main
/// content container, and the first [`PARAGRAPH_LIMIT`] non-empty
/// paragraphs.
pub fn digest_html(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut sections = Vec::new();

    let meta_sel = Selector::parse(r#"meta[name="description"]"#).unwrap();
    if let Some(desc) = doc
        .select(&meta_sel)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|c| !c.is_empty())
    {
        sections.push(format!("# Page Description\n\n{}\n", desc));
    }

    let title_sel = Selector::parse("title").unwrap();
    let title = doc
        .select(&title_sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled Page".to_string());
    sections.push(format!("# {}\n", title));

    let main_sel = Selector::parse("main, article, div.content, section.content").unwrap();
    let body_sel = Selector::parse("body").unwrap();
    let container = doc.select(&main_sel).next().or_else(|| doc.select(&body_sel).next());

    if let Some(container) = container {
        let heading_sel = Selector::parse("h1, h2, h3").unwrap();
        for heading in container.select(&heading_sel).filter(|el| !inside_chrome(el)) {
            let text = heading.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                sections.push(format!("## {}\n", text));
            }
        }

        let p_sel = Selector::parse("p").unwrap();
        for paragraph in container
            .select(&p_sel)
            .filter(|el| !inside_chrome(el))
            .filter_map(|el| {
                let text = el.text().collect::<String>().trim().to_string();
                (!text.is_empty()).then_some(text)
            })
            .take(PARAGRAPH_LIMIT)
        {
            sections.push(format!("{}\n", paragraph));
        }
    }

    sections.join("\n")
}

fn inside_chrome(el: &ElementRef) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| CHROME_TAGS.contains(&a.value().name()))
}

/// Create a clean, URL-safe filename from a URL.
///
/// Strips the scheme and host, replaces anything outside word characters,
/// dashes, and dots, collapses underscore runs, truncates, and appends
/// `.md`. A URL with no usable path falls back to a host-derived stem.
pub fn sanitize_filename(url: &str) -> String {
    let host_re = Regex::new(r"^https?://[^/]+").unwrap();
    let stem = sanitize_stem(&host_re.replace(url, ""));

    let stem = if stem.is_empty() {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(sanitize_stem))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "page".to_string())
    } else {
        stem
    };

    format!("{}.md", stem)
}

fn sanitize_stem(input: &str) -> String {
    let unsafe_re = Regex::new(r"[^\w\-.]").unwrap();
    let runs_re = Regex::new(r"_+").unwrap();

    let cleaned = unsafe_re.replace_all(input, "_");
    let cleaned = runs_re.replace_all(&cleaned, "_");
    let truncated: String = cleaned.chars().take(MAX_FILENAME_CHARS).collect();
    let trimmed = truncated.trim_matches(|c| c == '_' || c == '.');
    let trimmed = trimmed.strip_suffix(".md").unwrap_or(trimmed);

    trimmed.to_string()
}

/// Digest one page. Never fails: fetch errors become an explicit error
/// placeholder document under an `_error`-suffixed filename.
pub async fn digest_url(url: &str, config: &FetchConfig) -> PageDigest {
    match fetch_url(url, config).await {
        Ok(html) => PageDigest { filename: sanitize_filename(url), content: digest_html(&html) },
        Err(e) => {
            tracing::debug!(url, error = %e, "page digest fetch failed");
            PageDigest {
                filename: sanitize_filename(&format!("{}_error", url)),
                content: format!("Error processing {}: {}", url, e),
            }
        }
    }
}

/// Digest a batch of URLs sequentially, guaranteeing unique filenames.
///
/// Collisions get a `-1`, `-2`... suffix before the `.md` extension so
/// distinct URLs never overwrite each other in a bundle.
pub async fn digest_batch(urls: &[String], config: &FetchConfig) -> Vec<PageDigest> {
    let mut taken = HashSet::new();
    let mut digests = Vec::with_capacity(urls.len());

    for url in urls {
        let mut digest = digest_url(url, config).await;
        digest.filename = uniquify(&digest.filename, &mut taken);
        digests.push(digest);
    }

    digests
}

fn uniquify(filename: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(filename.to_string()) {
        return filename.to_string();
    }

    let stem = filename.strip_suffix(".md").unwrap_or(filename);
    let mut counter = 1;
    loop {
        let candidate = format!("{}-{}.md", stem, counter);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Parse a URL list in the shape the llms.txt workflow produces: one URL per
/// line, either bare or wrapped in a Markdown link. Blank and unrecognized
/// lines are skipped.
pub fn parse_url_list(input: &str) -> Vec<String> {
    let md_link = Regex::new(r"\[[^\]]*\]\(([^)\s]+)\)").unwrap();

    input
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            if let Some(caps) = md_link.captures(line) {
                return Some(caps[1].to_string());
            }
            if line.starts_with("http://") || line.starts_with("https://") {
                return Some(line.to_string());
            }
            None
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_prefers_main_content() {
        let html = r#"
            <html><head>
                <title>Widget Co</title>
                <meta name="description" content="We make widgets">
            </head><body>
                <nav><p>Navigation junk</p></nav>
                <main>
                    <h1>Widgets</h1>
                    <h2>Why widgets</h2>
                    <p>First paragraph.</p>
                    <p>Second paragraph.</p>
                </main>
                <footer><p>Footer junk</p></footer>
            </body></html>
        "#;
        let md = digest_html(html);
        assert!(md.contains("# Page Description\n\nWe make widgets"));
        assert!(md.contains("# Widget Co"));
        assert!(md.contains("## Widgets"));
        assert!(md.contains("## Why widgets"));
        assert!(md.contains("First paragraph."));
        assert!(!md.contains("Navigation junk"));
        assert!(!md.contains("Footer junk"));
    }

    #[test]
    fn test_digest_paragraph_limit() {
        let paragraphs: String = (1..=8).map(|i| format!("<p>Paragraph {}.</p>", i)).collect();
        let html = format!("<html><body><main>{}</main></body></html>", paragraphs);
        let md = digest_html(&html);
        assert!(md.contains("Paragraph 5."));
        assert!(!md.contains("Paragraph 6."));
    }

    #[test]
    fn test_digest_body_fallback_skips_chrome() {
        let html = r#"
            <html><body>
                <header><h1>Site Header</h1></header>
                <h2>Visible Heading</h2>
                <p>Visible paragraph.</p>
            </body></html>
        "#;
        let md = digest_html(html);
        assert!(!md.contains("Site Header"));
        assert!(md.contains("## Visible Heading"));
        assert!(md.contains("Visible paragraph."));
    }

    #[test]
    fn test_sanitize_filename_from_path() {
        assert_eq!(
            sanitize_filename("https://example.com/docs/getting-started"),
            "docs_getting-started.md"
        );
    }

    #[test]
    fn test_sanitize_filename_bare_host() {
        assert_eq!(sanitize_filename("https://example.com"), "example.com.md");
    }

    #[test]
    fn test_sanitize_filename_collapses_runs() {
        assert_eq!(sanitize_filename("https://example.com/a//b??c"), "a_b_c.md");
    }

    #[test]
    fn test_sanitize_filename_truncates() {
        let url = format!("https://example.com/{}", "x".repeat(400));
        let name = sanitize_filename(&url);
        assert!(name.len() <= MAX_FILENAME_CHARS + 3);
        assert!(name.ends_with(".md"));
    }

    #[test]
    fn test_sanitize_filename_keeps_single_md_suffix() {
        assert_eq!(sanitize_filename("https://example.com/notes.md"), "notes.md");
    }

    #[test]
    fn test_uniquify_suffixes_collisions() {
        let mut taken = HashSet::new();
        assert_eq!(uniquify("page.md", &mut taken), "page.md");
        assert_eq!(uniquify("page.md", &mut taken), "page-1.md");
        assert_eq!(uniquify("page.md", &mut taken), "page-2.md");
    }

    #[test]
    fn test_parse_url_list() {
        let input = "https://a.example.com/one\n\n- [Two](https://b.example.com/two)\nnot a url\n";
        let urls = parse_url_list(input);
        assert_eq!(urls, vec!["https://a.example.com/one", "https://b.example.com/two"]);
    }
}
