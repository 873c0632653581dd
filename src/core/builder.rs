//! # Builder for [`Retrier`].
//!
//! Every part is optional: an unset logger means silent operation, an unset
//! wrap function means the default `"{message} ({source})"` wrapping, and
//! unset default policy lists mean no gap-filling for that capability.
//!
//! ## Example
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use retrier::{CallTimeout, ExponentialBackoff, Retrier};
//!
//! let retrier = Retrier::builder()
//!     .default_backoff(vec![Arc::new(ExponentialBackoff::new(2))])
//!     .default_timeout(vec![Arc::new(CallTimeout::new(Duration::from_secs(60)))])
//!     .build();
//! ```

use std::sync::Arc;

use crate::core::retrier::Retrier;
use crate::error::{default_wrap_fn, WrapFn};
use crate::logging::{Logger, LoggerRef, NopLogger};
use crate::policy::PolicyRef;

/// Configures and constructs a [`Retrier`].
#[derive(Default)]
pub struct RetrierBuilder {
    logger: Option<LoggerRef>,
    wrap: Option<WrapFn>,
    default_classifiers: Vec<PolicyRef>,
    default_backoff: Vec<PolicyRef>,
    default_timeout: Vec<PolicyRef>,
}

impl RetrierBuilder {
    /// Creates a builder with everything unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the logging sink. Unset means silent.
    pub fn logger(mut self, logger: impl Logger) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Sets the error-wrap function. Unset means the default wrapping.
    pub fn wrap_fn(mut self, wrap: WrapFn) -> Self {
        self.wrap = Some(wrap);
        self
    }

    /// Sets the policies appended when the caller's list cannot classify
    /// errors.
    pub fn default_classifiers(mut self, policies: Vec<PolicyRef>) -> Self {
        self.default_classifiers = policies;
        self
    }

    /// Sets the policies appended when the caller's list cannot wait.
    pub fn default_backoff(mut self, policies: Vec<PolicyRef>) -> Self {
        self.default_backoff = policies;
        self
    }

    /// Sets the policies appended when the caller's list cannot time out.
    pub fn default_timeout(mut self, policies: Vec<PolicyRef>) -> Self {
        self.default_timeout = policies;
        self
    }

    /// Builds the engine.
    pub fn build(self) -> Retrier {
        Retrier {
            logger: self.logger.unwrap_or_else(|| Arc::new(NopLogger)),
            wrap: self.wrap.unwrap_or_else(default_wrap_fn),
            default_classifiers: self.default_classifiers,
            default_backoff: self.default_backoff,
            default_timeout: self.default_timeout,
        }
    }
}
