//! # Logging seam for the retry engine.
//!
//! The engine reports loop progress through a [`Logger`]: one line when an
//! action starts, one when it completes, one per surfaced error, and one
//! when the policy set is misconfigured. Logging is side-effect-only and
//! never influences control flow.
//!
//! Three implementations cover the common cases:
//! - [`NopLogger`] — silent (the builder default);
//! - [`LogWriter`] — prints each line to stdout (demo/reference);
//! - any `Fn(&str)` closure, via the blanket impl (handy in tests).
//!
//! ## Example output (`LogWriter`)
//! ```text
//! Creating the widget...
//! Error while creating the widget. (maximum retries reached while creating the widget, giving up (boom))
//! ```

use std::sync::Arc;

/// Sink for engine progress messages.
///
/// Implementations must be cheap or hand the message off quickly: the engine
/// calls [`Logger::log`] inline from the retry loop.
pub trait Logger: Send + Sync + 'static {
    /// Consumes a single fully-formatted message.
    fn log(&self, message: &str);
}

/// Shared handle to a logger.
pub type LoggerRef = Arc<dyn Logger>;

impl<F> Logger for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Silent logger; drops every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn log(&self, _message: &str) {}
}

/// Message printer. Writes each engine message to stdout.
///
/// Use it for demos and manual runs; production callers usually adapt their
/// own logging framework behind the [`Logger`] trait instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogWriter;

impl LogWriter {
    /// Constructs a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Logger for LogWriter {
    fn log(&self, message: &str) {
        println!("{message}");
    }
}
