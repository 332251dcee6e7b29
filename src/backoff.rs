//! Exponential backoff for retry delays.
//!
//! Attempt semantics: attempt index `0` is the initial call (no delay);
//! retries start at `attempt = 1`, so `delay(k) = base * 2^(k-1)`, capped
//! at the configured maximum. Delays saturate at a documented ceiling to
//! avoid overflow.
//!
//! Example
//! ```rust
//! use std::time::Duration;
//! use brigade::Backoff;
//!
//! let backoff = Backoff::exponential(Duration::from_millis(100))
//!     .with_max(Duration::from_secs(1))
//!     .unwrap();
//! assert_eq!(backoff.delay(0), Duration::ZERO); // initial call
//! assert_eq!(backoff.delay(1), Duration::from_millis(100));
//! assert_eq!(backoff.delay(2), Duration::from_millis(200));
//! assert_eq!(backoff.delay(6), Duration::from_secs(1)); // capped
//! ```

use std::fmt;
use std::time::Duration;

/// Delay used when calculations would otherwise overflow (1 day).
pub const MAX_BACKOFF: Duration = Duration::from_secs(24 * 60 * 60);

/// Default base delay between attempts.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Default cap on the delay growth.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);

/// Errors returned by backoff configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffError {
    /// The cap must be greater than zero.
    MaxMustBePositive,
    /// The cap must not undercut the base delay.
    MaxLessThanBase {
        /// Configured base delay.
        base: Duration,
        /// Rejected cap.
        max: Duration,
    },
}

impl fmt::Display for BackoffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackoffError::MaxMustBePositive => write!(f, "max must be greater than zero"),
            BackoffError::MaxLessThanBase { base, max } => {
                write!(f, "max ({:?}) must be >= base ({:?})", max, base)
            }
        }
    }
}

impl std::error::Error for BackoffError {}

/// Capped exponential backoff schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    max: Duration,
}

impl Backoff {
    /// Exponential backoff from the given base, capped at the default
    /// maximum delay.
    pub fn exponential(base: Duration) -> Self {
        Self { base, max: DEFAULT_MAX_DELAY.max(base) }
    }

    /// Replace the delay cap. Errors if `max` is zero or below the base.
    pub fn with_max(mut self, max: Duration) -> Result<Self, BackoffError> {
        if max.is_zero() {
            return Err(BackoffError::MaxMustBePositive);
        }
        if max < self.base {
            return Err(BackoffError::MaxLessThanBase { base: self.base, max });
        }
        self.max = max;
        Ok(self)
    }

    /// The configured base delay.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// The configured cap.
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Delay before the given attempt (0-based; 0 = initial call, no
    /// delay). Saturates instead of overflowing.
    pub fn delay(&self, attempt: usize) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponent = attempt.saturating_sub(1).min(u32::MAX as usize) as u32;
        let multiplier = 2u128.saturating_pow(exponent);
        let nanos = self.base.as_nanos().saturating_mul(multiplier);
        let uncapped = Duration::from_nanos(nanos.min(MAX_BACKOFF.as_nanos()) as u64);
        uncapped.min(self.max).min(MAX_BACKOFF)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::exponential(DEFAULT_BASE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_each_retry() {
        let backoff = Backoff::exponential(Duration::from_millis(100));
        assert_eq!(backoff.delay(1), Duration::from_millis(100)); // 100 * 2^0
        assert_eq!(backoff.delay(2), Duration::from_millis(200)); // 100 * 2^1
        assert_eq!(backoff.delay(3), Duration::from_millis(400)); // 100 * 2^2
        assert_eq!(backoff.delay(4), Duration::from_millis(800)); // 100 * 2^3
    }

    #[test]
    fn initial_attempt_has_no_delay() {
        let backoff = Backoff::exponential(Duration::from_millis(100));
        assert_eq!(backoff.delay(0), Duration::ZERO);
    }

    #[test]
    fn respects_cap() {
        let backoff = Backoff::exponential(Duration::from_millis(100))
            .with_max(Duration::from_secs(1))
            .unwrap();
        assert_eq!(backoff.delay(4), Duration::from_millis(800));
        assert_eq!(backoff.delay(5), Duration::from_secs(1)); // capped
        assert_eq!(backoff.delay(10), Duration::from_secs(1)); // still capped
    }

    #[test]
    fn default_matches_documented_policy() {
        let backoff = Backoff::default();
        assert_eq!(backoff.base(), Duration::from_millis(1000));
        assert_eq!(backoff.max(), Duration::from_millis(10_000));
        // 1s, 2s, 4s, 8s, then pinned at the 10s cap
        assert_eq!(backoff.delay(4), Duration::from_secs(8));
        assert_eq!(backoff.delay(5), Duration::from_secs(10));
    }

    #[test]
    fn saturates_on_huge_attempts() {
        let backoff =
            Backoff::exponential(Duration::from_secs(1)).with_max(MAX_BACKOFF).unwrap();
        assert_eq!(backoff.delay(1_000_000_000), MAX_BACKOFF);
        assert_eq!(backoff.delay((u32::MAX as usize) + 10_000), MAX_BACKOFF);
    }

    #[test]
    fn zero_cap_is_rejected() {
        let err = Backoff::exponential(Duration::from_millis(100))
            .with_max(Duration::ZERO)
            .unwrap_err();
        assert_eq!(err, BackoffError::MaxMustBePositive);
    }

    #[test]
    fn cap_below_base_is_rejected() {
        let err = Backoff::exponential(Duration::from_secs(5))
            .with_max(Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, BackoffError::MaxLessThanBase { .. }));
    }

    #[test]
    fn zero_base_stays_zero() {
        let backoff = Backoff::exponential(Duration::ZERO);
        assert_eq!(backoff.delay(3), Duration::ZERO);
    }
}
