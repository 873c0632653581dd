//! # Jitter policy for backoff delays.
//!
//! [`JitterPolicy`] adds randomness to backoff delays to prevent thundering
//! herd effects when many loops retry against the same resource.
//!
//! - [`JitterPolicy::None`] — no randomization, predictable delays
//! - [`JitterPolicy::Full`] — random delay in [0, backoff_delay]
//! - [`JitterPolicy::Equal`] — random delay in [backoff_delay/2, backoff_delay]
//!
//! Jitter is applied to the delay handed to the timer; it never feeds back
//! into the growth of the underlying backoff base.

use std::time::Duration;

use rand::Rng;

/// Policy controlling randomization of backoff delays.
///
/// ## Trade-offs
/// - **None**: predictable, but risks thundering herd
/// - **Full**: maximum randomness, aggressive load spreading
/// - **Equal**: balanced (preserves ~75% of the base delay on average)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use the exact backoff delay.
    #[default]
    None,

    /// Full jitter: random delay in [0, backoff_delay].
    Full,

    /// Equal jitter: random delay in [backoff_delay/2, backoff_delay].
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => full_jitter(delay),
            JitterPolicy::Equal => equal_jitter(delay),
        }
    }
}

/// Full jitter: random[0, delay]
fn full_jitter(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=ms))
}

/// Equal jitter: delay/2 + random[0, delay - delay/2]
///
/// The random part spans `delay - half`, not `half`, so odd millisecond
/// delays can still reach the full base.
fn equal_jitter(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    let half = ms / 2;
    let jitter = rand::rng().random_range(0..=ms - half);
    Duration::from_millis(half + jitter)
}
