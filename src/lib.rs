//! # retrier
//!
//! **Retrier** is a composable retry orchestration library for Rust.
//!
//! It repeatedly invokes a fallible async operation until it succeeds, a
//! pluggable policy vetoes further attempts, or a wait condition expires
//! with a fatal verdict. Policies for error classification, backoff timing,
//! and timeout enforcement are defined independently and composed into one
//! loop with well-defined precedence.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Policy    │   │    Policy    │   │    Policy    │
//!     │  (backoff)   │   │  (max tries) │   │ (cancel/...) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ instantiate()    │                  │   (fresh state per call)
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Retrier::retry(action, operation, policies)                  │
//! │  - gap-fills defaults per missing capability                  │
//! │  - Active Instance Set (caller order, defaults appended)      │
//! │  - Logger (progress lines)   - WrapFn (error context)         │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                ▼
//!                    loop {
//!                      operation.call()
//!                        ├─ Ok  ─► return Ok
//!                        └─ Err ─► can_retry (each, in order; first veto wins)
//!                                  wait tokens (timers, cancellation, ...)
//!                                  select_all ─► on_wait_expired (winner only)
//!                    }
//! ```
//!
//! ### Capability model
//! A [`Policy`] declares up to three capabilities; the engine appends its
//! configured defaults independently for each capability the caller's
//! policy list lacks:
//!
//! | Capability   | Question it answers                  | Reference policy       |
//! |--------------|--------------------------------------|------------------------|
//! | `classifies` | is this error retryable?             | (user-supplied)        |
//! | `waits`      | how long until the next attempt?     | [`ExponentialBackoff`] |
//! | `times_out`  | should the loop stop trying?         | [`MaxTries`], [`CallTimeout`], [`Cancellation`] |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use retrier::{BoxError, CallTimeout, ExponentialBackoff, PolicyRef, Retrier};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), BoxError> {
//!     // The pre-built engine: backoff factor 2, at most 30 retries.
//!     let retry = Retrier::default();
//!
//!     let policies: Vec<PolicyRef> = vec![
//!         Arc::new(ExponentialBackoff::new(2)),
//!         Arc::new(CallTimeout::new(Duration::from_secs(300))),
//!     ];
//!
//!     retry
//!         .retry("creating the widget", || async {
//!             // ...call the flaky service...
//!             Ok::<(), BoxError>(())
//!         }, &policies)
//!         .await
//! }
//! ```
//!
//! ## Guarantees
//! - One retry loop runs sequentially; policy instances are exclusive to it.
//! - Descriptors ([`Policy`]) are immutable and safe to share across any
//!   number of concurrent loops.
//! - Vetoes are checked eagerly, before any waiting, in list order.
//! - Among simultaneously-ready wait tokens, the first-registered wins.
//! - A failed round with no wait token panics: a policy set that cannot
//!   bound its waits is a programming error, not a runtime failure.

mod core;
mod error;
mod logging;
mod policies;
mod policy;

// ---- Public re-exports ----

pub use crate::core::{Operation, Retrier, RetrierBuilder};
pub use crate::error::{default_wrap_fn, BoxError, SharedError, WrapError, WrapFn};
pub use crate::logging::{LogWriter, Logger, LoggerRef, NopLogger};
pub use crate::policies::{CallTimeout, Cancellation, ExponentialBackoff, JitterPolicy, MaxTries};
pub use crate::policy::{Policy, PolicyFn, PolicyInstance, PolicyRef, WaitToken};
