//! # Wall-clock budget policy.
//!
//! [`CallTimeout`] aborts a retry loop once the time elapsed since the loop
//! started exceeds a fixed budget. Detection is eager: the check runs in
//! `can_retry` on every failed round, so an exhausted budget is reported
//! before any further waiting — the policy never needs a wait token.
//!
//! Timestamps come from [`tokio::time::Instant`], so the budget honors a
//! paused test clock.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::{BoxError, SharedError, WrapFn};
use crate::policy::{Policy, PolicyInstance};

/// Timeout-capable policy bounding the total wall-clock time of a loop.
///
/// The clock starts when the loop instantiates the policy, not when the
/// descriptor is created — a shared descriptor serves any number of loops.
#[derive(Clone, Copy, Debug)]
pub struct CallTimeout {
    timeout: Duration,
}

impl CallTimeout {
    /// Creates a policy with the given total budget.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Policy for CallTimeout {
    fn times_out(&self) -> bool {
        true
    }

    fn instantiate(&self) -> Box<dyn PolicyInstance> {
        Box::new(CallTimeoutInstance {
            timeout: self.timeout,
            started: Instant::now(),
        })
    }
}

struct CallTimeoutInstance {
    timeout: Duration,
    started: Instant,
}

impl PolicyInstance for CallTimeoutInstance {
    fn can_retry(
        &mut self,
        wrap: &WrapFn,
        err: &SharedError,
        action: &str,
    ) -> Result<(), BoxError> {
        if self.started.elapsed() > self.timeout {
            return Err(wrap(err.clone(), format!("timeout while {action}, giving up")));
        }
        Ok(())
    }
}
