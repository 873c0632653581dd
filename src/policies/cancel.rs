//! # External-cancellation policy.
//!
//! [`Cancellation`] aborts a retry loop when an external
//! [`CancellationToken`] fires. Unlike [`CallTimeout`](crate::CallTimeout),
//! detection is deferred: `can_retry` always passes, and the policy instead
//! contributes the token's `cancelled_owned` future as its wait condition. When
//! that future wins the race, `on_wait_expired` converts the win into a
//! fatal error — so cancellation is observed only at a wait boundary, and
//! a loop already sleeping on a long backoff wakes immediately.
//!
//! The policy declares only the `times_out` capability. Its wait token does
//! not count as a waiting capability for default gap-filling: a policy set
//! containing only `Cancellation` still receives the engine's default
//! backoff, otherwise the loop would spin as fast as the operation fails
//! until the token fires.

use tokio_util::sync::CancellationToken;

use crate::error::{BoxError, SharedError, WrapFn};
use crate::policy::{Policy, PolicyInstance, WaitToken};

/// Timeout-capable policy tied to an external [`CancellationToken`].
///
/// # Example
/// ```
/// use retrier::Cancellation;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let policy = Cancellation::new(token.clone());
/// // Later, from anywhere: token.cancel() aborts the loop.
/// ```
#[derive(Clone, Debug)]
pub struct Cancellation {
    token: CancellationToken,
}

impl Cancellation {
    /// Creates a policy bound to the given token.
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl Policy for Cancellation {
    fn times_out(&self) -> bool {
        true
    }

    fn instantiate(&self) -> Box<dyn PolicyInstance> {
        Box::new(CancellationInstance {
            token: self.token.clone(),
        })
    }
}

struct CancellationInstance {
    token: CancellationToken,
}

impl PolicyInstance for CancellationInstance {
    fn wait(&mut self, _err: &SharedError) -> Option<WaitToken> {
        Some(Box::pin(self.token.clone().cancelled_owned()))
    }

    fn on_wait_expired(
        &mut self,
        wrap: &WrapFn,
        err: &SharedError,
        action: &str,
    ) -> Result<(), BoxError> {
        Err(wrap(err.clone(), format!("timeout while {action}")))
    }
}
