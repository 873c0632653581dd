//! # Attempt-ceiling policy.
//!
//! [`MaxTries`] aborts a retry loop once a fixed number of retries has been
//! spent. The ceiling counts *retries*: with `MaxTries::new(n)` the
//! operation runs at most `n + 1` times (the first attempt plus `n`
//! retries). The veto happens eagerly in `can_retry`, before any waiting,
//! so the loop never sleeps on an attempt it would not make.

use crate::error::{BoxError, SharedError, WrapFn};
use crate::policy::{Policy, PolicyInstance};

/// Timeout-capable policy that limits the number of retries.
///
/// # Example
/// ```
/// use retrier::MaxTries;
/// use std::sync::Arc;
///
/// // At most 5 retries beyond the first attempt.
/// let policy: retrier::PolicyRef = Arc::new(MaxTries::new(5));
/// assert!(policy.times_out());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MaxTries {
    tries: u32,
}

impl MaxTries {
    /// Creates a policy allowing at most `tries` retries.
    pub fn new(tries: u32) -> Self {
        Self { tries }
    }
}

impl Policy for MaxTries {
    fn times_out(&self) -> bool {
        true
    }

    fn instantiate(&self) -> Box<dyn PolicyInstance> {
        Box::new(MaxTriesInstance {
            max_tries: self.tries,
            tries: 0,
        })
    }
}

struct MaxTriesInstance {
    max_tries: u32,
    tries: u32,
}

impl PolicyInstance for MaxTriesInstance {
    fn can_retry(
        &mut self,
        wrap: &WrapFn,
        err: &SharedError,
        action: &str,
    ) -> Result<(), BoxError> {
        self.tries += 1;
        if self.tries > self.max_tries {
            return Err(wrap(
                err.clone(),
                format!("maximum retries reached while {action}, giving up"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::default_wrap_fn;
    use std::sync::Arc;

    fn boom() -> SharedError {
        Arc::from(BoxError::from("boom".to_string()))
    }

    #[test]
    fn vetoes_after_ceiling_is_exceeded() {
        let wrap = default_wrap_fn();
        let err = boom();
        let mut inst = MaxTries::new(2).instantiate();

        assert!(inst.can_retry(&wrap, &err, "testing").is_ok());
        assert!(inst.can_retry(&wrap, &err, "testing").is_ok());

        let veto = inst.can_retry(&wrap, &err, "testing").unwrap_err();
        assert_eq!(
            veto.to_string(),
            "maximum retries reached while testing, giving up (boom)"
        );
    }

    #[test]
    fn zero_tries_vetoes_immediately() {
        let wrap = default_wrap_fn();
        let err = boom();
        let mut inst = MaxTries::new(0).instantiate();
        assert!(inst.can_retry(&wrap, &err, "testing").is_err());
    }

    #[test]
    fn instances_do_not_share_counters() {
        let wrap = default_wrap_fn();
        let err = boom();
        let policy = MaxTries::new(1);

        let mut first = policy.instantiate();
        let mut second = policy.instantiate();
        assert!(first.can_retry(&wrap, &err, "testing").is_ok());
        assert!(first.can_retry(&wrap, &err, "testing").is_err());
        // A fresh instance starts from zero.
        assert!(second.can_retry(&wrap, &err, "testing").is_ok());
    }

    #[test]
    fn contributes_no_wait_token() {
        let err = boom();
        let mut inst = MaxTries::new(3).instantiate();
        assert!(inst.wait(&err).is_none());
    }

    #[test]
    fn capability_flags() {
        let policy = MaxTries::new(3);
        assert!(policy.times_out());
        assert!(!policy.waits());
        assert!(!policy.classifies());
    }
}
