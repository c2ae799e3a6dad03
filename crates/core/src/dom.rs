//! DOM access seam for the extraction engine.
//!
//! The traversal algorithm never talks to an automation driver directly; it
//! runs against [`DomAccess`], a small interface exposing query,
//! attribute-read, and nested-menu discovery over opaque element handles.
//! The live implementation drives an in-page probe over WebDriver
//! (`browser::LiveDom`); [`StaticDom`] implements the same semantics over
//! parsed HTML so the algorithm is testable without a browser and usable
//! against fetched static pages.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::Result;

/// Opaque element handle: for [`StaticDom`] the document-order index of the
/// element, for the live implementation an index into the in-page registry.
pub type NodeId = usize;

/// Attributes and text of one element, collected in a single round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct NodeFacts {
    /// Lowercase tag name.
    #[serde(default)]
    pub tag: String,
    /// Resolved absolute address, present for hyperlinks that carry one.
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub aria_label: Option<String>,
    /// Trimmed text content.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub data_testid: Option<String>,
    #[serde(default)]
    pub data_test: Option<String>,
    #[serde(default)]
    pub title_attr: Option<String>,
}

/// Query and inspection capabilities over a document.
///
/// Invalid selectors never error: they simply match nothing, so one
/// malformed caller-supplied selector cannot sink the whole strategy list.
#[async_trait(?Send)]
pub trait DomAccess {
    /// Hostname of the document location; empty when unknown.
    async fn hostname(&self) -> Result<String>;

    /// Whether at least one element matches `selector`.
    async fn matches(&self, selector: &str) -> Result<bool>;

    /// Document-order matches for the union of `selectors`.
    async fn query_roots(&self, selectors: &[String]) -> Result<Vec<NodeId>>;

    /// Descendants of `root` matching `selector`, in document order. The
    /// live implementation queries from the containing shadow root when the
    /// element lives inside one.
    async fn query_clickables(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>>;

    /// Attributes and text for a handle.
    async fn describe(&self, node: NodeId) -> Result<NodeFacts>;

    /// The nested menu owned by `node`'s nearest `li` ancestor: its direct
    /// `ul` child when present, otherwise the first match among `fallbacks`
    /// searched within that ancestor.
    async fn nested_container(&self, node: NodeId, fallbacks: &[String]) -> Result<Option<NodeId>>;
}

/// [`DomAccess`] over parsed static HTML.
///
/// Handles are document-order element indices, so results are deterministic
/// for a given input. When a base URL is provided, hrefs are resolved the
/// way a live DOM would resolve them.
pub struct StaticDom {
    html: Html,
    base: Option<Url>,
}

impl StaticDom {
    pub fn new(html: &str, base: Option<Url>) -> Self {
        Self { html: Html::parse_document(html), base }
    }

    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.root_element().descendants().filter_map(ElementRef::wrap)
    }

    fn element_at(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.elements().nth(id)
    }

    fn id_of(&self, target: ElementRef<'_>) -> Option<NodeId> {
        self.elements().position(|el| el.id() == target.id())
    }

    fn parse_selector(selector: &str) -> Option<Selector> {
        Selector::parse(selector).ok()
    }

    fn resolve_href(&self, raw: &str) -> String {
        match &self.base {
            Some(base) => base.join(raw).map(String::from).unwrap_or_else(|_| raw.to_string()),
            None => raw.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl DomAccess for StaticDom {
    async fn hostname(&self) -> Result<String> {
        Ok(self
            .base
            .as_ref()
            .and_then(|u| u.host_str())
            .unwrap_or_default()
            .to_string())
    }

    async fn matches(&self, selector: &str) -> Result<bool> {
        let Some(sel) = Self::parse_selector(selector) else {
            return Ok(false);
        };
        Ok(self.html.select(&sel).next().is_some())
    }

    async fn query_roots(&self, selectors: &[String]) -> Result<Vec<NodeId>> {
        let parsed: Vec<Selector> = selectors.iter().filter_map(|s| Self::parse_selector(s)).collect();

        let mut ids = Vec::new();
        for sel in &parsed {
            ids.extend(self.html.select(sel).filter_map(|el| self.id_of(el)));
        }
        // Union of all selectors, deduplicated, in document order.
        ids.sort_unstable();
        ids.dedup();

        Ok(ids)
    }

    async fn query_clickables(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let Some(root_el) = self.element_at(root) else {
            return Ok(Vec::new());
        };
        let Some(sel) = Self::parse_selector(selector) else {
            return Ok(Vec::new());
        };

        let mut ids: Vec<NodeId> = root_el.select(&sel).filter_map(|el| self.id_of(el)).collect();
        ids.retain(|id| *id != root);

        Ok(ids)
    }

    async fn describe(&self, node: NodeId) -> Result<NodeFacts> {
        let Some(el) = self.element_at(node) else {
            return Ok(NodeFacts::default());
        };

        let attr = |name: &str| el.value().attr(name).map(String::from);

        Ok(NodeFacts {
            tag: el.value().name().to_ascii_lowercase(),
            href: el.value().attr("href").map(|raw| self.resolve_href(raw)),
            aria_label: attr("aria-label"),
            text: el.text().collect::<String>().trim().to_string(),
            data_testid: attr("data-testid"),
            data_test: attr("data-test"),
            title_attr: attr("title"),
        })
    }

    async fn nested_container(&self, node: NodeId, fallbacks: &[String]) -> Result<Option<NodeId>> {
        let Some(el) = self.element_at(node) else {
            return Ok(None);
        };

        let Some(item) = el
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| a.value().name() == "li")
        else {
            return Ok(None);
        };

        let direct_list = item
            .children()
            .filter_map(ElementRef::wrap)
            .find(|c| c.value().name() == "ul");

        let menu = direct_list.or_else(|| {
            fallbacks
                .iter()
                .filter_map(|s| Self::parse_selector(s))
                .find_map(|sel| item.select(&sel).next())
        });

        Ok(menu.and_then(|m| self.id_of(m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Runtime::new().unwrap().block_on(fut)
    }

    fn base() -> Option<Url> {
        Some(Url::parse("https://example.com").unwrap())
    }

    #[test]
    fn test_matches() {
        let dom = StaticDom::new("<nav><a href='/x'>X</a></nav>", None);
        assert!(block_on(dom.matches("nav")).unwrap());
        assert!(!block_on(dom.matches(".missing")).unwrap());
    }

    #[test]
    fn test_matches_invalid_selector_is_false() {
        let dom = StaticDom::new("<nav></nav>", None);
        assert!(!block_on(dom.matches("[v-]")).unwrap());
    }

    #[test]
    fn test_query_roots_union_in_document_order() {
        let html = "<header><nav id='a'></nav></header><div role='navigation' id='b'></div>";
        let dom = StaticDom::new(html, None);
        let roots = block_on(dom.query_roots(&["[role=\"navigation\"]".to_string(), "nav".to_string()])).unwrap();
        assert_eq!(roots.len(), 2);

        let first = block_on(dom.describe(roots[0])).unwrap();
        assert_eq!(first.tag, "nav");
    }

    #[test]
    fn test_query_roots_skips_invalid_selector() {
        let dom = StaticDom::new("<nav></nav>", None);
        let roots = block_on(dom.query_roots(&["[v-]".to_string(), "nav".to_string()])).unwrap();
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn test_query_clickables_scoped_to_root() {
        let html = "<nav><a href='/in'>In</a></nav><a href='/out'>Out</a>";
        let dom = StaticDom::new(html, base());
        let roots = block_on(dom.query_roots(&["nav".to_string()])).unwrap();
        let clickables = block_on(dom.query_clickables(roots[0], "a[href]")).unwrap();
        assert_eq!(clickables.len(), 1);

        let facts = block_on(dom.describe(clickables[0])).unwrap();
        assert_eq!(facts.text, "In");
    }

    #[test]
    fn test_describe_resolves_href() {
        let dom = StaticDom::new("<nav><a href='/about'>About</a></nav>", base());
        let roots = block_on(dom.query_roots(&["nav".to_string()])).unwrap();
        let links = block_on(dom.query_clickables(roots[0], "a[href]")).unwrap();
        let facts = block_on(dom.describe(links[0])).unwrap();
        assert_eq!(facts.href.as_deref(), Some("https://example.com/about"));
        assert_eq!(facts.tag, "a");
    }

    #[test]
    fn test_nested_container_direct_ul() {
        let html = "<nav><ul><li><a href='/a'>A</a><ul><li><a href='/a/1'>A1</a></li></ul></li></ul></nav>";
        let dom = StaticDom::new(html, base());
        let roots = block_on(dom.query_roots(&["nav".to_string()])).unwrap();
        let links = block_on(dom.query_clickables(roots[0], "a[href]")).unwrap();

        let menu = block_on(dom.nested_container(links[0], &[])).unwrap();
        assert!(menu.is_some());

        let nested = block_on(dom.query_clickables(menu.unwrap(), "a[href]")).unwrap();
        let facts = block_on(dom.describe(nested[0])).unwrap();
        assert_eq!(facts.text, "A1");
    }

    #[test]
    fn test_nested_container_fallback_selector() {
        let html = r#"<nav><ul><li><a href='/a'>A</a><div class="submenu"><a href='/a/1'>A1</a></div></li></ul></nav>"#;
        let dom = StaticDom::new(html, base());
        let roots = block_on(dom.query_roots(&["nav".to_string()])).unwrap();
        let links = block_on(dom.query_clickables(roots[0], "a[href]")).unwrap();

        let none = block_on(dom.nested_container(links[0], &[])).unwrap();
        assert!(none.is_none());

        let menu = block_on(dom.nested_container(links[0], &[".submenu".to_string()])).unwrap();
        assert!(menu.is_some());
    }

    #[test]
    fn test_nested_container_without_li_ancestor() {
        let dom = StaticDom::new("<nav><a href='/a'>A</a></nav>", base());
        let roots = block_on(dom.query_roots(&["nav".to_string()])).unwrap();
        let links = block_on(dom.query_clickables(roots[0], "a[href]")).unwrap();
        let menu = block_on(dom.nested_container(links[0], &[".submenu".to_string()])).unwrap();
        assert!(menu.is_none());
    }

    #[test]
    fn test_hostname() {
        let dom = StaticDom::new("<html></html>", base());
        assert_eq!(block_on(dom.hostname()).unwrap(), "example.com");

        let bare = StaticDom::new("<html></html>", None);
        assert_eq!(block_on(bare.hostname()).unwrap(), "");
    }
}
