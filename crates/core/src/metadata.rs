//! Page title and description lookup for the document header.

use scraper::{Html, Selector};

use crate::fetch::{FetchConfig, fetch_url};

/// Sentinel title used when a page exposes none.
pub const NO_TITLE: &str = "No Title";
/// Sentinel description used when a page exposes none.
pub const NO_DESCRIPTION: &str = "No Description";

/// Title and meta description of an entry page, fetched over plain HTTP
/// independently of any browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub title: String,
    pub description: String,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self { title: NO_TITLE.to_string(), description: NO_DESCRIPTION.to_string() }
    }
}

/// Collapse internal whitespace runs and trim.
pub(crate) fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract title and description from raw HTML.
///
/// Title fallback chain: `<title>` -> first `<h1>` -> [`NO_TITLE`].
/// Description: `meta[name="description"]` -> `meta[property="og:description"]`
/// -> [`NO_DESCRIPTION`].
pub fn page_info(html: &str) -> PageInfo {
    let doc = Html::parse_document(html);

    let title_sel = Selector::parse("title").unwrap();
    let h1_sel = Selector::parse("h1").unwrap();
    let title = doc
        .select(&title_sel)
        .map(|el| squash_whitespace(&el.text().collect::<String>()))
        .find(|t| !t.is_empty())
        .or_else(|| {
            doc.select(&h1_sel)
                .map(|el| squash_whitespace(&el.text().collect::<String>()))
                .find(|t| !t.is_empty())
        })
        .unwrap_or_else(|| NO_TITLE.to_string());

    let description = meta_content(&doc, r#"meta[name="description"]"#)
        .or_else(|| meta_content(&doc, r#"meta[property="og:description"]"#))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    PageInfo { title, description }
}

fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel)
        .filter_map(|el| el.value().attr("content"))
        .map(squash_whitespace)
        .find(|c| !c.is_empty())
}

/// Fetch the entry page over HTTP and extract its [`PageInfo`].
///
/// Any fetch failure falls back to the sentinels; the caller still gets a
/// usable document header.
pub async fn fetch_page_info(url: &str, config: &FetchConfig) -> PageInfo {
    match fetch_url(url, config).await {
        Ok(html) => page_info(&html),
        Err(e) => {
            tracing::debug!(url, error = %e, "page info fetch failed, using sentinels");
            PageInfo::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_title_tag() {
        let html = "<html><head><title>  Example   Site </title></head><body></body></html>";
        let info = page_info(html);
        assert_eq!(info.title, "Example Site");
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let html = "<html><body><h1>Welcome Page</h1></body></html>";
        let info = page_info(html);
        assert_eq!(info.title, "Welcome Page");
    }

    #[test]
    fn test_title_sentinel() {
        let html = "<html><body><p>nothing here</p></body></html>";
        let info = page_info(html);
        assert_eq!(info.title, NO_TITLE);
    }

    #[test]
    fn test_description_from_meta() {
        let html = r#"<html><head><meta name="description" content="A  test page"></head></html>"#;
        let info = page_info(html);
        assert_eq!(info.description, "A test page");
    }

    #[test]
    fn test_description_falls_back_to_og() {
        let html = r#"<html><head><meta property="og:description" content="Open graph text"></head></html>"#;
        let info = page_info(html);
        assert_eq!(info.description, "Open graph text");
    }

    #[test]
    fn test_description_sentinel() {
        let html = "<html><head><title>T</title></head></html>";
        let info = page_info(html);
        assert_eq!(info.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_empty_title_tag_skipped() {
        let html = "<html><head><title>   </title></head><body><h1>Real Title</h1></body></html>";
        let info = page_info(html);
        assert_eq!(info.title, "Real Title");
    }

    #[test]
    fn test_squash_whitespace() {
        assert_eq!(squash_whitespace("  a \n\t b  c "), "a b c");
        assert_eq!(squash_whitespace(""), "");
    }
}
