//! Error types for llmstxt operations.
//!
//! This module defines the main error type [`LlmstxtError`] which represents
//! all possible errors that can occur during navigation extraction, page
//! fetching, and artifact bundling.
//!
//! # Example
//!
//! ```rust
//! use llmstxt_core::{LlmstxtError, Result};
//!
//! fn check_selector(selector: &str) -> Result<()> {
//!     if selector.trim().is_empty() {
//!         return Err(LlmstxtError::MissingField("root_selector"));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Main error type for extraction and conversion operations.
///
/// Only two variants are fatal to an extraction request: [`BrowserLaunch`]
/// and [`Navigation`]. Everything else either degrades to partial output at
/// the call site or surfaces as a per-item placeholder.
///
/// [`BrowserLaunch`]: LlmstxtError::BrowserLaunch
/// [`Navigation`]: LlmstxtError::Navigation
#[derive(Error, Debug)]
pub enum LlmstxtError {
    /// HTTP request errors from reqwest.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A required request field was blank or absent.
    ///
    /// Reported before any browser work starts.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The browser process or its automation driver could not be started.
    ///
    /// Fatal to the request; never retried.
    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    /// The entry URL could not be reached within the page-load budget.
    ///
    /// Fatal to the request; the session is still released.
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// A WebDriver command failed mid-session.
    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    /// The in-page probe returned a payload that does not match the protocol.
    #[error("Malformed in-page payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// HTML parsing errors.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Archive construction errors.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for LlmstxtError.
pub type Result<T> = std::result::Result<T, LlmstxtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LlmstxtError::InvalidUrl("not a url".to_string());
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_missing_field_error() {
        let err = LlmstxtError::MissingField("entry_url");
        assert!(err.to_string().contains("entry_url"));
    }

    #[test]
    fn test_navigation_error() {
        let err = LlmstxtError::Navigation {
            url: "https://example.com".to_string(),
            reason: "page load exceeded 90s".to_string(),
        };
        assert!(err.to_string().contains("example.com"));
        assert!(err.to_string().contains("90s"));
    }

    #[test]
    fn test_timeout_error() {
        let err = LlmstxtError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
    }
}
