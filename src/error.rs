//! Error plumbing for the retry engine.
//!
//! The engine does not define a closed error taxonomy: the fallible operation
//! returns whatever error type the caller uses, boxed as [`BoxError`]. Within
//! one failed round the same error is handed to several policy instances, so
//! it is shared as [`SharedError`].
//!
//! Errors surfaced to the caller are produced through a [`WrapFn`], which
//! attaches the action name to the underlying error. The default wrap
//! function builds a [`WrapError`]; a custom one can be installed via
//! [`RetrierBuilder::wrap_fn`](crate::RetrierBuilder::wrap_fn).

use std::sync::Arc;

use thiserror::Error;

/// Boxed error type returned by operations and surfaced by the engine.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The per-round failure, shared between all policy instances of the round.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Function used to attach a contextual message to an underlying error.
///
/// Policies call this with the round's error and a pre-formatted message
/// (typically embedding the action name). The result becomes the final
/// error of the retry call.
pub type WrapFn = Arc<dyn Fn(SharedError, String) -> BoxError + Send + Sync>;

/// Error produced by the default wrap function.
///
/// Formats as `"{message} ({source})"` and keeps the underlying error
/// reachable through [`std::error::Error::source`].
///
/// # Example
/// ```
/// use retrier::{default_wrap_fn, BoxError, SharedError, WrapError};
/// use std::error::Error as _;
/// use std::sync::Arc;
///
/// let wrap = default_wrap_fn();
/// let cause: SharedError = Arc::from(BoxError::from("connection refused"));
/// let err = wrap(cause, "timeout while creating the widget".into());
///
/// assert_eq!(
///     err.to_string(),
///     "timeout while creating the widget (connection refused)"
/// );
/// assert!(err.source().is_some());
/// ```
#[derive(Error, Debug)]
#[error("{message} ({source})")]
pub struct WrapError {
    message: String,
    #[source]
    source: SharedError,
}

impl WrapError {
    /// Creates a wrapped error from a message and its underlying cause.
    pub fn new(message: impl Into<String>, source: SharedError) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }

    /// Returns the contextual message without the cause suffix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Returns the default wrap function, producing [`WrapError`] values.
pub fn default_wrap_fn() -> WrapFn {
    Arc::new(|err, message| Box::new(WrapError::new(message, err)))
}
