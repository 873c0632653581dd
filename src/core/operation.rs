//! # The fallible operation seam.
//!
//! [`Operation`] is the contract for the work a retry loop drives: one async
//! attempt per call, succeeding with `Ok(())` or failing with any boxed
//! error. The engine owns the operation for the duration of the loop and
//! calls it sequentially, so implementations may hold mutable state.
//!
//! A blanket impl covers `FnMut` closures returning futures, which is how
//! most call sites look:
//!
//! ```
//! use retrier::{BoxError, Retrier};
//!
//! # async fn demo() -> Result<(), BoxError> {
//! let retrier = Retrier::default();
//! retrier
//!     .retry("creating the widget", || async {
//!         // ...call the flaky service...
//!         Ok::<(), BoxError>(())
//!     }, &[])
//!     .await
//! # }
//! ```

use std::future::Future;

use async_trait::async_trait;

use crate::error::BoxError;

/// One retryable unit of work.
#[async_trait]
pub trait Operation: Send {
    /// Executes a single attempt.
    async fn call(&mut self) -> Result<(), BoxError>;
}

#[async_trait]
impl<F, Fut> Operation for F
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<(), BoxError>> + Send,
{
    async fn call(&mut self) -> Result<(), BoxError> {
        (self)().await
    }
}
