//! Best-effort dismissal of consent and age-gate overlays.
//!
//! Runs after navigation settles and before extraction. Every failure mode
//! here (selector not found, element not clickable, timeout) is an
//! expected outcome, reported as `dismissed: false` and never propagated:
//! a stubborn overlay must not block extraction of whatever is visible.

use std::time::Duration;

use fantoccini::Locator;
use tokio::time::sleep;

use crate::browser::BrowserSession;

/// Budget per dismissal attempt.
const DISMISS_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause after a successful click so the overlay can clear.
const POST_CLICK_PAUSE: Duration = Duration::from_secs(1);

/// Result of one dismissal attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DismissOutcome {
    pub selector: String,
    pub dismissed: bool,
}

/// Attempt to click each present selector in order, independently.
///
/// Selectors are attempted in the given order (age gate first, then cookie
/// banner); one failing attempt never blocks the next.
pub async fn dismiss_overlays(session: &BrowserSession, selectors: &[Option<&str>]) -> Vec<DismissOutcome> {
    let mut outcomes = Vec::new();

    for selector in selectors.iter().flatten() {
        let selector = selector.trim();
        if selector.is_empty() {
            continue;
        }

        let dismissed = click_overlay(session, selector).await;
        tracing::debug!(selector, dismissed, "overlay dismissal attempt");
        outcomes.push(DismissOutcome { selector: selector.to_string(), dismissed });
    }

    outcomes
}

async fn click_overlay(session: &BrowserSession, selector: &str) -> bool {
    let attempt = async {
        let element = session
            .client()
            .wait()
            .at_most(DISMISS_TIMEOUT)
            .for_element(Locator::Css(selector))
            .await?;
        element.click().await?;
        Ok::<_, fantoccini::error::CmdError>(())
    };

    match tokio::time::timeout(DISMISS_TIMEOUT, attempt).await {
        Ok(Ok(())) => {
            sleep(POST_CLICK_PAUSE).await;
            true
        }
        Ok(Err(_)) | Err(_) => false,
    }
}
