//! The [`Policy`] / [`PolicyInstance`] traits and the wait token type.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::{BoxError, SharedError, WrapFn};

/// One-shot signal that a policy's current wait interval has elapsed.
///
/// Returned by [`PolicyInstance::wait`] once per round; the engine races all
/// collected tokens and drops the losers. Tokens own their data (timers,
/// cancellation watchers), so they outlive the borrow of the instance that
/// produced them.
pub type WaitToken = BoxFuture<'static, ()>;

/// Shared handle to a policy descriptor.
pub type PolicyRef = Arc<dyn Policy>;

/// Immutable descriptor of one retry behavior.
///
/// Declares capabilities and manufactures per-loop instances. The capability
/// flags drive default gap-filling in the engine: if the caller-supplied
/// policy list lacks a capability, the engine appends its configured default
/// policies for it. The flags are declarations, not guarantees — a policy
/// may contribute a wait token without declaring `waits` (see
/// [`Cancellation`](crate::Cancellation)), in which case default
/// backoff policies are still appended.
///
/// # Example
/// ```
/// use retrier::{Policy, PolicyInstance};
///
/// struct RetryNetworkErrors;
/// struct RetryNetworkErrorsInstance;
///
/// impl Policy for RetryNetworkErrors {
///     fn classifies(&self) -> bool { true }
///     fn instantiate(&self) -> Box<dyn PolicyInstance> {
///         Box::new(RetryNetworkErrorsInstance)
///     }
/// }
///
/// impl PolicyInstance for RetryNetworkErrorsInstance {
///     // can_retry would inspect the error here; the default passes.
/// }
/// ```
pub trait Policy: Send + Sync + 'static {
    /// Whether this policy can decide if an error is retryable.
    fn classifies(&self) -> bool {
        false
    }

    /// Whether this policy can bound the wait between attempts.
    fn waits(&self) -> bool {
        false
    }

    /// Whether this policy can abort the loop (attempt caps, deadlines).
    fn times_out(&self) -> bool {
        false
    }

    /// Manufactures the stateful, single-use instance for one retry loop.
    fn instantiate(&self) -> Box<dyn PolicyInstance>;
}

/// Stateful, single-use runtime object derived from a [`Policy`].
///
/// Created at the start of one `retry` call, owned exclusively by it, and
/// discarded when the call returns. All three operations have passive
/// defaults so implementations only override what they need.
pub trait PolicyInstance: Send {
    /// Decides whether another attempt may happen after a failure.
    ///
    /// Called once per failed round for every instance, in list order,
    /// before any waiting occurs. Returning `Err` vetoes the loop: the
    /// returned error (built via `wrap`, typically embedding `action` and
    /// the triggering `err`) becomes the final result, and remaining
    /// instances are not consulted this round.
    fn can_retry(&mut self, wrap: &WrapFn, err: &SharedError, action: &str) -> Result<(), BoxError> {
        let _ = (wrap, err, action);
        Ok(())
    }

    /// Contributes this round's wait condition, if any.
    ///
    /// Called once per instance per round, after every `can_retry` passed.
    /// `None` means the instance has nothing to wait for this round.
    fn wait(&mut self, err: &SharedError) -> Option<WaitToken> {
        let _ = err;
        None
    }

    /// Verdict hook, called only on the instance whose token won the race.
    ///
    /// Returning `Err` is fatal for the loop (e.g. an external deadline
    /// elapsed); `Ok` means the wait was an ordinary backoff tick and the
    /// loop continues.
    fn on_wait_expired(
        &mut self,
        wrap: &WrapFn,
        err: &SharedError,
        action: &str,
    ) -> Result<(), BoxError> {
        let _ = (wrap, err, action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::default_wrap_fn;

    struct Passive;
    impl PolicyInstance for Passive {}

    struct NoCaps;
    impl Policy for NoCaps {
        fn instantiate(&self) -> Box<dyn PolicyInstance> {
            Box::new(Passive)
        }
    }

    #[test]
    fn capability_flags_default_to_false() {
        let p = NoCaps;
        assert!(!p.classifies());
        assert!(!p.waits());
        assert!(!p.times_out());
    }

    #[test]
    fn instance_defaults_are_passive() {
        let wrap = default_wrap_fn();
        let err: SharedError = Arc::from(BoxError::from("boom".to_string()));
        let mut inst = Passive;

        assert!(inst.can_retry(&wrap, &err, "testing").is_ok());
        assert!(inst.wait(&err).is_none());
        assert!(inst.on_wait_expired(&wrap, &err, "testing").is_ok());
    }
}
