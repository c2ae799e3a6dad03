//! The extraction input contract.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{LlmstxtError, Result};

/// Selector used for clickable elements when the caller supplies no context
/// selector.
pub const DEFAULT_CLICKABLE_SELECTOR: &str = "a[href]";

/// Input contract for one navigation-extraction request.
///
/// `entry_url` and `root_selector` are mandatory and validated before any
/// browser work starts; the remaining selectors are optional refinements.
///
/// # Example
///
/// ```rust
/// use llmstxt_core::ExtractionRequest;
///
/// let request = ExtractionRequest::new("https://example.com", "nav");
/// let base = request.validate().unwrap();
/// assert_eq!(base.host_str(), Some("example.com"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Absolute address of the page to extract from.
    pub entry_url: String,
    /// CSS selector(s) identifying candidate navigation containers.
    pub root_selector: String,
    /// Best-effort dismissal target for an age gate, clicked before extraction.
    #[serde(default)]
    pub age_gate_selector: Option<String>,
    /// Best-effort dismissal target for a cookie banner.
    #[serde(default)]
    pub cookie_selector: Option<String>,
    /// Narrows which descendant elements count as clickable. Blank or absent
    /// means any hyperlink with an href.
    #[serde(default)]
    pub context_selector: Option<String>,
}

impl ExtractionRequest {
    pub fn new(entry_url: impl Into<String>, root_selector: impl Into<String>) -> Self {
        Self { entry_url: entry_url.into(), root_selector: root_selector.into(), ..Default::default() }
    }

    /// Check the mandatory fields and parse the entry URL.
    ///
    /// Returns the parsed URL, which doubles as the base for link resolution
    /// during rendering.
    pub fn validate(&self) -> Result<Url> {
        if self.entry_url.trim().is_empty() {
            return Err(LlmstxtError::MissingField("entry_url"));
        }
        if self.root_selector.trim().is_empty() {
            return Err(LlmstxtError::MissingField("root_selector"));
        }

        let url = Url::parse(self.entry_url.trim()).map_err(|e| LlmstxtError::InvalidUrl(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(LlmstxtError::InvalidUrl(format!(
                "entry URL must use http or https, got {}",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(LlmstxtError::InvalidUrl("entry URL must include a host".to_string()));
        }

        Ok(url)
    }

    /// The selector used to collect clickable elements inside each root
    /// candidate: the caller's context selector when non-blank, otherwise
    /// [`DEFAULT_CLICKABLE_SELECTOR`].
    pub fn clickable_selector(&self) -> &str {
        self.context_selector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_CLICKABLE_SELECTOR)
    }
}
