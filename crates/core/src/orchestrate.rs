//! Request orchestration: session, dismissal, retried extraction, rendering.
//!
//! The orchestrator owns the sequencing guarantees of a request: input is
//! validated before any browser work, the session is released on every exit
//! path, and failure modes map onto the documented taxonomy: only launch
//! and navigation failures are fatal; an empty result is an outcome, not an
//! error.

use tokio::time::sleep;

use crate::browser::{BrowserSession, LiveDom, SessionConfig};
use crate::engine;
use crate::engine::retry::{AttemptOutcome, RetryPolicy, RetryState};
use crate::fetch::FetchConfig;
use crate::metadata::{self, PageInfo};
use crate::overlay;
use crate::render::render_tree;
use crate::request::ExtractionRequest;
use crate::tree::NavNode;
use crate::Result;

/// Outcome of a successful orchestration run.
///
/// `NothingFound` signals that no usable navigation survived extraction and
/// filtering; the caller should adjust selectors, not treat it as a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// The finished llms.txt-style Markdown document.
    Document(String),
    NothingFound,
}

/// Sequences one extraction request end-to-end.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    session: SessionConfig,
    fetch: FetchConfig,
    retry: RetryPolicy,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(session: SessionConfig, fetch: FetchConfig, retry: RetryPolicy) -> Self {
        Self { session, fetch, retry }
    }

    /// Run the full pipeline for one request.
    ///
    /// The browser session is released unconditionally: extraction errors
    /// are held until after teardown and propagated afterwards.
    pub async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionOutcome> {
        let base_url = request.validate()?;

        let session = BrowserSession::acquire(&self.session).await?;
        let extracted = self.run_extraction(&session, request).await;
        if let Err(e) = session.release().await {
            tracing::debug!(error = %e, "browser release reported an error");
        }

        let tree = extracted?;
        let rendered = render_tree(&tree, &base_url);
        if rendered.trim().is_empty() {
            tracing::info!(url = %base_url, "no usable navigation found");
            return Ok(ExtractionOutcome::NothingFound);
        }

        let info = metadata::fetch_page_info(request.entry_url.trim(), &self.fetch).await;
        Ok(ExtractionOutcome::Document(compose_document(&info, &rendered)))
    }

    async fn run_extraction(&self, session: &BrowserSession, request: &ExtractionRequest) -> Result<Vec<NavNode>> {
        session.navigate(request.entry_url.trim()).await?;

        overlay::dismiss_overlays(
            session,
            &[request.age_gate_selector.as_deref(), request.cookie_selector.as_deref()],
        )
        .await;

        let mut state = self.retry.initial();
        let mut tree = Vec::new();

        loop {
            match state {
                RetryState::Attempting { attempt } => {
                    let result = async {
                        let dom = LiveDom::prepare(session).await?;
                        engine::extract_navigation(&dom, request).await
                    }
                    .await;

                    let outcome = match result {
                        Ok(nodes) if nodes.is_empty() => {
                            tracing::debug!(attempt, "extraction attempt found nothing");
                            AttemptOutcome::Empty
                        }
                        Ok(nodes) => {
                            tracing::debug!(attempt, count = nodes.len(), "extraction attempt succeeded");
                            tree = nodes;
                            AttemptOutcome::Found
                        }
                        Err(e) if attempt >= self.retry.max_attempts => return Err(e),
                        Err(e) => {
                            tracing::debug!(attempt, error = %e, "extraction attempt failed, retrying");
                            AttemptOutcome::Failed
                        }
                    };

                    state = self.retry.after_attempt(attempt, outcome);
                }
                RetryState::WaitingForRender { next } => {
                    sleep(self.retry.pause).await;
                    state = self.retry.after_wait(next);
                }
                RetryState::Interacting { next } => {
                    if let Err(e) = session.keyboard_nudge().await {
                        tracing::debug!(error = %e, "keyboard interaction failed");
                    }
                    state = self.retry.after_interaction(next);
                }
                RetryState::Succeeded | RetryState::Exhausted => break,
            }
        }

        Ok(tree)
    }
}

/// Assemble the llms.txt-style document from page info and the rendered
/// navigation outline.
pub fn compose_document(info: &PageInfo, nav_markdown: &str) -> String {
    format!(
        "# {}\n\n> {}\n\n## Navigation\n\n{}",
        info.title, info.description, nav_markdown
    )
}
