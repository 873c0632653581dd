//! # Exponential backoff policy.
//!
//! [`ExponentialBackoff`] is a waiting policy: each failed round it
//! contributes a timer token, and the delay behind that token grows by
//! [`ExponentialBackoff::factor`] from round to round, clamped to
//! [`ExponentialBackoff::max`].
//!
//! The per-loop instance keeps the *un-jittered* base delay and grows that;
//! jitter is applied only to the value handed to the timer. Because jitter
//! output never feeds back into the base, randomized delays cannot shrink
//! the schedule over time.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use retrier::{ExponentialBackoff, JitterPolicy};
//!
//! let backoff = ExponentialBackoff {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//! // Rounds wait 100ms, 200ms, 400ms, ... capped at 10s.
//! ```

use std::time::Duration;

use tokio::time;

use crate::error::SharedError;
use crate::policies::jitter::JitterPolicy;
use crate::policy::{Policy, PolicyInstance, WaitToken};

/// Waiting policy whose delay multiplies by `factor` after each round.
#[derive(Clone, Copy, Debug)]
pub struct ExponentialBackoff {
    /// Delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter applied to each issued delay.
    pub jitter: JitterPolicy,
}

impl ExponentialBackoff {
    /// Creates a backoff policy with the given growth factor and the default
    /// base delay (1s), cap (30s), and no jitter.
    pub fn new(factor: u32) -> Self {
        Self {
            factor: f64::from(factor),
            ..Self::default()
        }
    }
}

impl Default for ExponentialBackoff {
    /// Returns a policy with:
    /// - `first = 1s`;
    /// - `max = 30s`;
    /// - `factor = 2.0`;
    /// - `jitter = None`.
    fn default() -> Self {
        Self {
            first: Duration::from_secs(1),
            max: Duration::from_secs(30),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl Policy for ExponentialBackoff {
    fn waits(&self) -> bool {
        true
    }

    fn instantiate(&self) -> Box<dyn PolicyInstance> {
        Box::new(ExponentialBackoffInstance {
            base: self.first.min(self.max),
            max: self.max,
            factor: self.factor,
            jitter: self.jitter,
        })
    }
}

struct ExponentialBackoffInstance {
    base: Duration,
    max: Duration,
    factor: f64,
    jitter: JitterPolicy,
}

impl ExponentialBackoffInstance {
    /// Returns the delay for this round and grows the base for the next one.
    fn advance(&mut self) -> Duration {
        let current = self.base;
        let grown = self.base.as_secs_f64() * self.factor;
        self.base = if !grown.is_finite() || grown < 0.0 || grown > self.max.as_secs_f64() {
            self.max
        } else {
            Duration::from_secs_f64(grown)
        };
        current
    }
}

impl PolicyInstance for ExponentialBackoffInstance {
    fn wait(&mut self, _err: &SharedError) -> Option<WaitToken> {
        let base = self.advance();
        let delay = self.jitter.apply(base);
        Some(Box::pin(time::sleep(delay)))
    }
}
