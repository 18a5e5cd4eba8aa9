//! Retry state machine around an `LlmClient`.
//!
//! Only rate-limit rejections are retried: auth failures, malformed requests and
//! network errors do not change on a second attempt. Rate-limited attempt `n`
//! waits `backoff_factor * n` units before attempt `n + 1`.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use super::types::LlmClient;
use super::GenerationError;

/// Retry configuration for rate-limited calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_factor: u32,
    /// Length of one backoff unit.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_factor: 2,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait after rate-limited attempt `attempt` (1-based), in units.
    pub fn backoff_units(&self, attempt: u32) -> u32 {
        self.backoff_factor.saturating_mul(attempt)
    }

    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(self.backoff_units(attempt))
    }
}

/// Blocks between attempts. Injected so tests do not sleep for real.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocks the calling thread for the full duration; not cancellable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// What one attempt produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    RateLimited,
    OtherError,
}

/// One pass through the retry loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiAttempt {
    /// 1-based.
    pub index: u32,
    /// Backoff slept before this attempt.
    pub waited: Duration,
    pub outcome: AttemptOutcome,
}

/// Terminal failure of the retry loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceFailure {
    #[error("Still rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Service call failed: {0}")]
    Unavailable(GenerationError),

    #[error("No attempt resolved the call")]
    RetriesExhausted,
}

/// Result of `ResilientClient::call` together with its attempt history.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub result: Result<String, ServiceFailure>,
    pub attempts: Vec<ApiAttempt>,
}

impl CallOutcome {
    /// Total backoff slept across all attempts.
    pub fn total_wait(&self) -> Duration {
        self.attempts.iter().map(|a| a.waited).sum()
    }
}

/// Loop state. `Attempting(n)` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallState {
    Attempting(u32),
    Succeeded,
    RateLimitedTerminal,
    OtherTerminal,
}

/// Wraps an `LlmClient` with rate-limit retry and error classification.
pub struct ResilientClient<C, S = ThreadSleeper> {
    inner: C,
    policy: RetryPolicy,
    sleeper: S,
}

impl<C: LlmClient> ResilientClient<C, ThreadSleeper> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self::with_sleeper(inner, policy, ThreadSleeper)
    }
}

impl<C: LlmClient, S: Sleeper> ResilientClient<C, S> {
    pub fn with_sleeper(inner: C, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            inner,
            policy,
            sleeper,
        }
    }

    pub fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The wrapped client, for single calls that must bypass the retry loop.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Send `prompt`, retrying only on rate limiting.
    pub fn call(&self, prompt: &str) -> CallOutcome {
        let mut attempts: Vec<ApiAttempt> = Vec::new();
        let mut waited = Duration::ZERO;
        let mut state = CallState::Attempting(1);
        let mut last_error: Option<GenerationError> = None;
        let mut response: Option<String> = None;

        while let CallState::Attempting(n) = state {
            if n > self.policy.max_attempts {
                break;
            }

            match self.inner.generate(prompt) {
                Ok(text) => {
                    attempts.push(ApiAttempt {
                        index: n,
                        waited,
                        outcome: AttemptOutcome::Success,
                    });
                    response = Some(text);
                    state = CallState::Succeeded;
                }
                Err(e) if e.is_rate_limited() => {
                    attempts.push(ApiAttempt {
                        index: n,
                        waited,
                        outcome: AttemptOutcome::RateLimited,
                    });
                    if n < self.policy.max_attempts {
                        let wait = self.policy.backoff_for(n);
                        tracing::warn!(
                            model = %self.inner.model_name(),
                            attempt = n,
                            wait_secs = wait.as_secs_f64(),
                            "Rate limit hit, retrying after backoff"
                        );
                        self.sleeper.sleep(wait);
                        waited = wait;
                        state = CallState::Attempting(n + 1);
                    } else {
                        tracing::warn!(
                            model = %self.inner.model_name(),
                            attempt = n,
                            "Rate limit persists after final attempt"
                        );
                        state = CallState::RateLimitedTerminal;
                    }
                    last_error = Some(e);
                }
                Err(e) => {
                    attempts.push(ApiAttempt {
                        index: n,
                        waited,
                        outcome: AttemptOutcome::OtherError,
                    });
                    tracing::error!(
                        model = %self.inner.model_name(),
                        attempt = n,
                        error = %e,
                        "Generation request failed"
                    );
                    last_error = Some(e);
                    state = CallState::OtherTerminal;
                }
            }
        }

        let result = match (state, response, last_error) {
            (CallState::Succeeded, Some(text), _) => Ok(text),
            (CallState::RateLimitedTerminal, _, _) => Err(ServiceFailure::RateLimited {
                attempts: attempts.len() as u32,
            }),
            (CallState::OtherTerminal, _, Some(e)) => Err(ServiceFailure::Unavailable(e)),
            _ => {
                tracing::error!(
                    attempts = attempts.len(),
                    "Generation retry loop ended without resolution"
                );
                Err(ServiceFailure::RetriesExhausted)
            }
        };

        CallOutcome { result, attempts }
    }
}
