//! Retry state machine for transient empty extractions.
//!
//! Some navigations only render after client-side hydration or an initial
//! interaction. The orchestrator drives this machine around the engine:
//! every transition is a pure function of the policy, so the "interact
//! before the middle attempt" behavior is testable without a browser.

use std::time::Duration;

/// Where the retry loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Run the engine for the given 1-based attempt number.
    Attempting { attempt: u32 },
    /// Pause before the next attempt so client-side rendering can catch up.
    WaitingForRender { next: u32 },
    /// Send the keyboard focus-and-activate sequence, then re-attempt.
    Interacting { next: u32 },
    /// An attempt produced a non-empty tree.
    Succeeded,
    /// All attempts are spent.
    Exhausted,
}

/// What a single engine run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Found,
    Empty,
    Failed,
}

/// Tunable retry behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, counting the first.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub pause: Duration,
    /// Attempt number preceded by the keyboard interaction.
    pub interact_before: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, pause: Duration::from_secs(1), interact_before: 2 }
    }
}

impl RetryPolicy {
    pub fn initial(&self) -> RetryState {
        RetryState::Attempting { attempt: 1 }
    }

    /// Transition after an engine run.
    pub fn after_attempt(&self, attempt: u32, outcome: AttemptOutcome) -> RetryState {
        match outcome {
            AttemptOutcome::Found => RetryState::Succeeded,
            AttemptOutcome::Empty | AttemptOutcome::Failed if attempt >= self.max_attempts => RetryState::Exhausted,
            AttemptOutcome::Empty | AttemptOutcome::Failed => RetryState::WaitingForRender { next: attempt + 1 },
        }
    }

    /// Transition after the inter-attempt pause.
    pub fn after_wait(&self, next: u32) -> RetryState {
        if next == self.interact_before {
            RetryState::Interacting { next }
        } else {
            RetryState::Attempting { attempt: next }
        }
    }

    /// Transition after the keyboard interaction.
    pub fn after_interaction(&self, next: u32) -> RetryState {
        RetryState::Attempting { attempt: next }
    }
}
