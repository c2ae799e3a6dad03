//! The raw navigation tree produced by the extraction engine.

use serde::{Deserialize, Serialize};

/// A node in the raw extracted navigation tree.
///
/// Nodes cross the browser boundary as JSON, so the shape mirrors what the
/// in-page probe reports: a best-effort label, an optional resolved URL
/// (present only for hyperlinks), and nested menu items in document order.
///
/// # Example
///
/// ```rust
/// use llmstxt_core::NavNode;
///
/// let node = NavNode::link("About Us", "https://example.com/about");
/// assert!(!node.is_vacuous());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNode {
    /// Best-effort accessible label; never empty (the engine falls back to a
    /// sentinel).
    pub title: String,
    /// Fully resolved address, set only when the source element is a
    /// hyperlink. Containers and toggles carry no URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Nested menu items, in document order.
    #[serde(default)]
    pub children: Vec<NavNode>,
}

impl NavNode {
    /// A link node with no children.
    pub fn link(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self { title: title.into(), url: Some(url.into()), children: Vec::new() }
    }

    /// A container node: a label grouping nested items, with no URL of its own.
    pub fn container(title: impl Into<String>, children: Vec<NavNode>) -> Self {
        Self { title: title.into(), url: None, children }
    }

    /// A node with neither a URL nor children carries no information and
    /// must not reach the renderer.
    pub fn is_vacuous(&self) -> bool {
        self.url.is_none() && self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_node_is_not_vacuous() {
        assert!(!NavNode::link("Docs", "https://example.com/docs").is_vacuous());
    }

    #[test]
    fn test_container_with_children_is_not_vacuous() {
        let node = NavNode::container("Products", vec![NavNode::link("A", "https://example.com/a")]);
        assert!(!node.is_vacuous());
    }

    #[test]
    fn test_empty_container_is_vacuous() {
        assert!(NavNode::container("Toggle", Vec::new()).is_vacuous());
    }

    #[test]
    fn test_deserializes_probe_shape() {
        let json = r#"{"title": "Home", "url": "https://example.com/", "children": []}"#;
        let node: NavNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.title, "Home");
        assert_eq!(node.url.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn test_deserializes_without_url() {
        let json = r#"{"title": "Menu"}"#;
        let node: NavNode = serde_json::from_str(json).unwrap();
        assert!(node.url.is_none());
        assert!(node.children.is_empty());
    }
}
