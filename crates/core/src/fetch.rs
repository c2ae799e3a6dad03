//! Content fetching from URLs, files, and stdin.
//!
//! This module provides functions for retrieving HTML or text content from
//! various sources: HTTP/HTTPS URLs, local files, and standard input. The
//! HTTP path here is deliberately browser-free; it backs page metadata
//! lookup and page digests, which never need a rendered DOM.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::{LlmstxtError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (compatible; llmstxt/0.3; +https://github.com/stormlightlabs/llmstxt)"
                .to_string(),
        }
    }
}

/// Fetches HTML content from a URL.
///
/// This function performs an HTTP GET request and returns the response body
/// as text. It follows redirects, respects the configured timeout, and uses
/// a browser-like User-Agent for better compatibility.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| LlmstxtError::InvalidUrl(e.to_string()))?;

    if parsed_url.scheme().is_empty() {
        return Err(LlmstxtError::InvalidUrl(
            "URL must include a scheme (http:// or https://)".to_string(),
        ));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(LlmstxtError::HttpError)?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                LlmstxtError::Timeout { timeout: config.timeout }
            } else {
                LlmstxtError::HttpError(e)
            }
        })?;

    let response = response.error_for_status()?;
    let content = response.text().await?;

    Ok(content)
}

/// Reads content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(LlmstxtError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file not found: {}", path_buf.display()),
        )))
    } else {
        fs::read_to_string(&path_buf).map_err(LlmstxtError::from)
    }
}

/// Reads content from standard input.
///
/// This function reads all available input from stdin until EOF.
/// Useful for piping content from other commands.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(LlmstxtError::from)?;

    Ok(buffer)
}
