//! Retry policy for backend calls.
//!
//! Semantics:
//! - `max_retries` counts retries on top of the initial attempt, so a
//!   policy makes at most `max_retries + 1` attempts in total.
//! - Only failures whose [`ErrorKind`](crate::ErrorKind) is retryable
//!   (network, timeout, server, rate-limit) are retried; every other
//!   kind propagates on first occurrence.
//! - Attempts are strictly sequential: attempt N+1 never starts before
//!   attempt N's outcome, including its backoff delay, has resolved.
//! - When attempts run out the last classified error is surfaced as-is;
//!   callers always see [`ApiError`], never a wrapper.
//! - Backoff calculates the delay per retry; jitter (default off)
//!   randomizes it. The sleeper controls how delays are applied so
//!   tests can assert the schedule without waiting.
//!
//! Example
//! ```rust
//! use std::time::Duration;
//! use brigade::{ApiError, Backoff, RetryPolicy};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let policy = RetryPolicy::builder()
//!     .max_retries(3)
//!     .backoff(Backoff::exponential(Duration::from_millis(100)))
//!     .build();
//! let result: Result<(), ApiError> =
//!     policy.execute(|| async { Err(ApiError::timeout()) }).await;
//! assert!(result.is_err());
//! # });
//! ```

use crate::error::ApiError;
use crate::{Backoff, Jitter, Sleeper, TokioSleeper};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Default number of retries on top of the initial attempt.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Retry policy combining attempt budget, backoff, jitter, and sleeper.
#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: usize,
    backoff: Backoff,
    jitter: Jitter,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .field("jitter", &self.jitter)
            .field("sleeper", &"<sleeper>")
            .finish()
    }
}

impl RetryPolicy {
    /// Construct a new builder with the documented defaults.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    /// A policy that never retries (single attempt).
    pub fn none() -> Self {
        Self::builder().max_retries(0).build()
    }

    /// Retries on top of the initial attempt.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Execute an async operation under this policy.
    pub async fn execute<T, Fut, Op>(&self, mut operation: Op) -> Result<T, ApiError>
    where
        T: Send,
        Fut: Future<Output = Result<T, ApiError>> + Send,
        Op: FnMut() -> Fut + Send,
    {
        let attempts = self.max_retries + 1;
        let mut last_error: Option<ApiError> = None;

        for attempt in 1..=attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !e.retryable() || attempt == attempts {
                        return Err(e);
                    }
                    // Before attempt k+1 the delay is backoff.delay(k)
                    let delay = self.jitter.apply(self.backoff.delay(attempt));
                    debug!(
                        attempt,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        kind = %e.kind(),
                        "retrying after failure"
                    );
                    last_error = Some(e);
                    self.sleeper.sleep(delay).await;
                }
            }
        }

        // The loop always returns from its final iteration; reaching
        // here would mean the attempt accounting is broken.
        match last_error {
            Some(e) => Err(e),
            None => unreachable!("retry loop exited without an outcome"),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`RetryPolicy`].
#[derive(Debug)]
pub struct RetryPolicyBuilder {
    max_retries: usize,
    backoff: Backoff,
    jitter: Jitter,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryPolicyBuilder {
    /// Create a builder with the documented defaults: 3 retries,
    /// exponential backoff from 1 s capped at 10 s, no jitter.
    pub fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Backoff::default(),
            jitter: Jitter::None,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Set the number of retries on top of the initial attempt.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the backoff schedule.
    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Opt into jittered delays.
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// Provide a custom sleeper implementation.
    pub fn with_sleeper<S>(mut self, sleeper: S) -> Self
    where
        S: Sleeper + 'static,
    {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Build the policy.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff: self.backoff,
            jitter: self.jitter,
            sleeper: self.sleeper,
        }
    }
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
