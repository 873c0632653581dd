//! Reference policies.
//!
//! Concrete implementations of the [`Policy`](crate::Policy) contract that
//! cover the common retry behaviors:
//!
//! - [`ExponentialBackoff`] — waits between attempts, delay grows by a factor
//! - [`MaxTries`] — aborts after a fixed number of retries
//! - [`CallTimeout`] — aborts once a wall-clock budget is exhausted
//! - [`Cancellation`] — aborts when an external [`CancellationToken`] fires
//! - [`JitterPolicy`] — randomization knob for [`ExponentialBackoff`]
//!
//! ## Quick wiring
//! ```text
//! retrier.retry(action, op, &[policies...])
//!      └─► engine consults each policy instance:
//!           - can_retry        (MaxTries, CallTimeout veto here)
//!           - wait             (ExponentialBackoff, Cancellation contribute tokens)
//!           - on_wait_expired  (Cancellation turns its win into a fatal error)
//! ```
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

mod backoff;
mod cancel;
mod jitter;
mod timeout;
mod tries;

pub use backoff::ExponentialBackoff;
pub use cancel::Cancellation;
pub use jitter::JitterPolicy;
pub use timeout::CallTimeout;
pub use tries::MaxTries;
