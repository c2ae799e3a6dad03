//! Tree normalizer and Markdown outline renderer.
//!
//! Converts a raw [`NavNode`] tree into a filtered, deduplicated, indented
//! Markdown outline, resolving every link against a base URL. Filtering here
//! is independent of the extraction engine's own checks: vacuous nodes are
//! dropped again even though the engine should not emit them.

use url::Url;

use crate::metadata::squash_whitespace;
use crate::tree::NavNode;

/// Titles that carry no navigational information, compared case-insensitively
/// after whitespace collapsing.
pub const TITLE_STOPLIST: &[&str] = &["more", "menu", "click here", "home", "new"];

/// Longest resolved path the renderer will keep.
const MAX_PATH_LEN: usize = 100;

const INDENT: &str = "  ";

/// Render a navigation tree as a Markdown outline.
///
/// Depth-first, preserving input order, two spaces of indent per level.
/// Returns an empty string when nothing survives filtering; the caller
/// treats that as "nothing usable", not as an error.
///
/// # Example
///
/// ```rust
/// use llmstxt_core::{NavNode, render_tree};
/// use url::Url;
///
/// let base = Url::parse("https://example.com").unwrap();
/// let tree = vec![NavNode::link("About Us", "/about")];
/// assert_eq!(render_tree(&tree, &base), "- [About Us](https://example.com/about)\n");
/// ```
pub fn render_tree(tree: &[NavNode], base_url: &Url) -> String {
    let mut out = String::new();
    render_level(tree, base_url, 0, &mut out);
    out
}

fn render_level(nodes: &[NavNode], base_url: &Url, depth: usize, out: &mut String) {
    for node in nodes {
        if node.is_vacuous() {
            continue;
        }

        let title = squash_whitespace(&node.title);
        if title.chars().count() < 2 || TITLE_STOPLIST.iter().any(|s| title.eq_ignore_ascii_case(s)) {
            continue;
        }

        let prefix = INDENT.repeat(depth);
        match &node.url {
            Some(raw) => match resolve_link(base_url, raw) {
                Some(resolved) => {
                    out.push_str(&format!("{}- [{}]({})\n", prefix, title, resolved));
                }
                None => {
                    tracing::debug!(url = %raw, "dropping node with unusable link");
                    continue;
                }
            },
            None => {
                out.push_str(&format!("{}- {}\n", prefix, title));
            }
        }

        render_level(&node.children, base_url, depth + 1, out);
    }
}

/// Resolve `raw` against the base and apply the link guards.
///
/// Dropped: unresolvable addresses, addresses without a host, paths over
/// [`MAX_PATH_LEN`] characters, anything carrying a fragment or query, and
/// paths containing the "javascript" token (pseudo-link guard).
fn resolve_link(base_url: &Url, raw: &str) -> Option<Url> {
    let resolved = base_url.join(raw).ok()?;

    if !resolved.has_host() {
        return None;
    }
    let path = resolved.path();
    if path.len() > MAX_PATH_LEN {
        return None;
    }
    if resolved.fragment().is_some() || resolved.query().is_some() {
        return None;
    }
    if path.to_ascii_lowercase().contains("javascript") {
        return None;
    }

    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn base() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn test_renders_link_node() {
        let tree = vec![NavNode::link("About Us", "/about")];
        assert_eq!(render_tree(&tree, &base()), "- [About Us](https://example.com/about)\n");
    }

    #[test]
    fn test_renders_container_with_children() {
        let tree = vec![NavNode::container(
            "Products",
            vec![NavNode::link("Widgets", "https://example.com/widgets")],
        )];
        let md = render_tree(&tree, &base());
        assert_eq!(md, "- Products\n  - [Widgets](https://example.com/widgets)\n");
    }

    #[test]
    fn test_drops_vacuous_node_at_root() {
        let tree = vec![NavNode::container("Toggle", Vec::new())];
        assert_eq!(render_tree(&tree, &base()), "");
    }

    #[test]
    fn test_drops_vacuous_node_nested() {
        let tree = vec![NavNode::container(
            "Products",
            vec![
                NavNode::container("Empty Toggle", Vec::new()),
                NavNode::link("Widgets", "/widgets"),
            ],
        )];
        let md = render_tree(&tree, &base());
        assert!(!md.contains("Empty Toggle"));
        assert!(md.contains("Widgets"));
    }

    #[rstest]
    #[case("More")]
    #[case("MENU")]
    #[case("click   here")]
    #[case("Home")]
    #[case("new")]
    fn test_drops_stoplisted_titles(#[case] title: &str) {
        let tree = vec![NavNode::link(title, "https://example.com/somewhere")];
        assert_eq!(render_tree(&tree, &base()), "");
    }

    #[test]
    fn test_drops_single_char_title() {
        let tree = vec![NavNode::link("X", "https://example.com/x")];
        assert_eq!(render_tree(&tree, &base()), "");
    }

    #[test]
    fn test_collapses_title_whitespace() {
        let tree = vec![NavNode::link("  About \n  Us ", "/about")];
        assert_eq!(render_tree(&tree, &base()), "- [About Us](https://example.com/about)\n");
    }

    #[test]
    fn test_absolute_url_resolution_is_idempotent() {
        let other_base = Url::parse("https://unrelated.org/deep/path/").unwrap();
        let resolved = resolve_link(&other_base, "https://example.com/about").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_drops_fragment_links() {
        let tree = vec![NavNode::link("Skip", "#")];
        assert_eq!(render_tree(&tree, &base()), "");
    }

    #[test]
    fn test_drops_query_links() {
        let tree = vec![NavNode::link("Search", "/find?q=hats")];
        assert_eq!(render_tree(&tree, &base()), "");
    }

    #[test]
    fn test_drops_javascript_pseudo_links() {
        let tree = vec![NavNode::link("Open Menu", "javascript:void(0)")];
        assert_eq!(render_tree(&tree, &base()), "");
    }

    #[test]
    fn test_drops_overlong_paths() {
        let long = format!("/{}", "a".repeat(MAX_PATH_LEN + 1));
        let tree = vec![NavNode::link("Deep Link", long)];
        assert_eq!(render_tree(&tree, &base()), "");
    }

    #[test]
    fn test_keeps_children_of_dropped_parent_out() {
        // When the parent link is unusable the whole node goes, children
        // included.
        let mut parent = NavNode::link("Broken", "javascript:void(0)");
        parent.children.push(NavNode::link("Child", "/child"));
        assert_eq!(render_tree(&[parent], &base()), "");
    }

    #[test]
    fn test_protocol_relative_href() {
        let tree = vec![NavNode::link("CDN Docs", "//cdn.example.com/docs")];
        assert_eq!(render_tree(&tree, &base()), "- [CDN Docs](https://cdn.example.com/docs)\n");
    }

    #[test]
    fn test_plain_label_node_needs_no_url() {
        let tree = vec![NavNode::container(
            "Company",
            vec![NavNode::link("Careers", "/careers")],
        )];
        let md = render_tree(&tree, &base());
        assert!(md.starts_with("- Company\n"));
    }

    #[test]
    fn test_empty_tree_renders_empty_string() {
        assert_eq!(render_tree(&[], &base()), "");
    }
}
