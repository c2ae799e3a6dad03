//! Navigation extraction engine.
//!
//! Heuristic DOM traversal over a [`DomAccess`] implementation: fingerprint
//! the rendering framework, discover root candidates, collect clickable
//! elements, build the raw [`NavNode`] tree, and deduplicate by URL. The
//! algorithm never errors on "nothing found": an empty document yields an
//! empty tree; only environment failures propagate.

pub mod fingerprint;
pub mod retry;
pub mod strategy;

use std::collections::HashSet;

use futures::future::LocalBoxFuture;

use crate::dom::{DomAccess, NodeId};
use crate::request::ExtractionRequest;
use crate::tree::NavNode;
use crate::Result;

/// Sentinel title for elements exposing no usable label.
pub const UNTITLED: &str = "Untitled Link";

/// Recursion bound for nested menus; guards against self-referential menu
/// markup.
const MAX_MENU_DEPTH: usize = 8;

/// Run the full traversal and return the deduplicated raw tree.
pub async fn extract_navigation(dom: &dyn DomAccess, request: &ExtractionRequest) -> Result<Vec<NavNode>> {
    let fingerprint = fingerprint::detect(dom).await?;
    if !fingerprint.is_empty() {
        tracing::debug!(frameworks = ?fingerprint.names(), "framework markers detected");
    }

    let hostname = dom.hostname().await?;
    let profiles = strategy::active_profiles(dom, &hostname).await?;

    let roots = dom.query_roots(&strategy::root_selectors(&request.root_selector, &profiles)).await?;
    if roots.is_empty() {
        tracing::debug!("no root candidates matched");
        return Ok(Vec::new());
    }

    let clickable = request.clickable_selector();
    let nested_fallbacks = strategy::nested_menu_selectors(&fingerprint, &profiles);

    let mut nodes = Vec::new();
    for root in roots {
        for element in dom.query_clickables(root, clickable).await? {
            nodes.push(build_node(dom, element, clickable, &nested_fallbacks, 0).await?);
        }
    }

    let mut seen = HashSet::new();
    Ok(dedup_nodes(nodes, &mut seen))
}

fn build_node<'a>(
    dom: &'a dyn DomAccess,
    element: NodeId,
    clickable: &'a str,
    nested_fallbacks: &'a [String],
    depth: usize,
) -> LocalBoxFuture<'a, Result<NavNode>> {
    Box::pin(async move {
        let facts = dom.describe(element).await?;

        let title = [
            facts.aria_label,
            Some(facts.text),
            facts.data_testid,
            facts.data_test,
            facts.title_attr,
        ]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

        let url = facts
            .tag
            .eq_ignore_ascii_case("a")
            .then_some(facts.href)
            .flatten()
            .filter(|href| !href.is_empty());

        let mut children = Vec::new();
        if depth < MAX_MENU_DEPTH
            && let Some(menu) = dom.nested_container(element, nested_fallbacks).await?
        {
            for child in dom.query_clickables(menu, clickable).await? {
                children.push(build_node(dom, child, clickable, nested_fallbacks, depth + 1).await?);
            }
        }

        Ok(NavNode { title, url, children })
    })
}

/// Keep the first occurrence per distinct URL, in depth-first document
/// order; a duplicate is dropped wholesale, children included. Nodes
/// without a URL are never deduplicated against each other.
fn dedup_nodes(nodes: Vec<NavNode>, seen: &mut HashSet<String>) -> Vec<NavNode> {
    let mut kept = Vec::with_capacity(nodes.len());
    for mut node in nodes {
        if let Some(url) = &node.url
            && !seen.insert(url.clone())
        {
            continue;
        }
        node.children = dedup_nodes(std::mem::take(&mut node.children), seen);
        kept.push(node);
    }
    kept
}
