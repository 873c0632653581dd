//! Policy contract: the extension point of the retry engine.
//!
//! A [`Policy`] is an immutable, reusable descriptor of one retry behavior.
//! It declares which capabilities it provides (error classification,
//! waiting, timeout enforcement) and manufactures a fresh [`PolicyInstance`]
//! for every retry loop invocation. All mutable state (attempt counters,
//! deadlines, current backoff delay) lives in the instance, which is owned
//! exclusively by one loop — descriptors can therefore be shared across any
//! number of concurrent loops without locking.
//!
//! ## Contents
//! - [`Policy`] / [`PolicyInstance`] — the two-layer contract
//! - [`PolicyFn`] — closure-backed policy for ad-hoc behaviors
//! - [`WaitToken`] — opaque one-shot wait signal
//!
//! Reference implementations ([`ExponentialBackoff`](crate::ExponentialBackoff),
//! [`MaxTries`](crate::MaxTries), [`CallTimeout`](crate::CallTimeout),
//! [`Cancellation`](crate::Cancellation)) live in the `policies` module.

mod contract;
mod policy_fn;

pub use contract::{Policy, PolicyInstance, PolicyRef, WaitToken};
pub use policy_fn::PolicyFn;
