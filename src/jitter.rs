//! Jitter strategies for retry delays.
//!
//! Defaults to `None`: the retry schedule is deterministic unless a call
//! site opts into randomization. `Full` spreads load uniformly in
//! `[0, delay]`; `Equal` keeps a floor at `delay/2`.
//!
//! RNG: `rand`'s thread-local RNG by default; deterministic RNGs can be
//! injected via `apply_with_rng`. Millisecond conversions saturate to
//! `u64::MAX` on very large durations.

use rand::{rng, Rng};
use std::time::Duration;

/// Jitter strategy for randomizing retry delays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Jitter {
    /// No jitter: use the exact backoff delay.
    #[default]
    None,
    /// Random between 0 and the delay.
    Full,
    /// Random between delay/2 and the delay.
    Equal,
}

impl Jitter {
    /// Apply jitter to a delay duration.
    pub fn apply(&self, delay: Duration) -> Duration {
        let mut rng = rng();
        self.apply_internal(delay, &mut rng)
    }

    /// Apply jitter with a custom RNG (for testing).
    pub fn apply_with_rng<R: Rng>(&self, delay: Duration, rng: &mut R) -> Duration {
        self.apply_internal(delay, rng)
    }

    fn as_millis_saturated(duration: Duration) -> u64 {
        duration.as_millis().try_into().unwrap_or(u64::MAX)
    }

    fn apply_internal<R: Rng>(&self, delay: Duration, rng: &mut R) -> Duration {
        match self {
            Jitter::None => delay,
            Jitter::Full => {
                let millis = Self::as_millis_saturated(delay);
                if millis == 0 {
                    return Duration::ZERO;
                }
                Duration::from_millis(rng.random_range(0..=millis))
            }
            Jitter::Equal => {
                let millis = Self::as_millis_saturated(delay);
                if millis == 0 {
                    return Duration::ZERO;
                }
                Duration::from_millis(rng.random_range(millis / 2..=millis))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn none_returns_exact_delay() {
        let delay = Duration::from_secs(1);
        assert_eq!(Jitter::None.apply(delay), delay);
    }

    #[test]
    fn full_stays_between_zero_and_delay() {
        let delay = Duration::from_secs(1);
        for _ in 0..100 {
            let jittered = Jitter::Full.apply(delay);
            assert!(jittered <= delay);
        }
    }

    #[test]
    fn equal_keeps_half_delay_floor() {
        let delay = Duration::from_secs(1);
        let half = Duration::from_millis(500);
        for _ in 0..100 {
            let jittered = Jitter::Equal.apply(delay);
            assert!(jittered <= delay);
            assert!(jittered >= half);
        }
    }

    #[test]
    fn deterministic_with_seeded_rng() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let delay = Duration::from_millis(1000);
        assert_eq!(
            Jitter::Full.apply_with_rng(delay, &mut a),
            Jitter::Full.apply_with_rng(delay, &mut b)
        );
    }

    #[test]
    fn zero_delay_stays_zero() {
        assert_eq!(Jitter::Full.apply(Duration::ZERO), Duration::ZERO);
        assert_eq!(Jitter::Equal.apply(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn saturates_large_durations_without_panicking() {
        let huge = Duration::from_millis(u64::MAX);
        let mut rng = StdRng::seed_from_u64(999);
        let jittered = Jitter::Full.apply_with_rng(huge, &mut rng);
        assert!(jittered <= huge);
    }
}
