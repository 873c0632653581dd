//! # Closure-backed policy (`PolicyFn`)
//!
//! [`PolicyFn`] wraps a factory closure `F: Fn() -> Box<dyn PolicyInstance>`
//! together with explicit capability flags, producing a fresh instance per
//! retry loop. This lets callers plug in novel behaviors without declaring a
//! new descriptor type.
//!
//! Capability flags are plain booleans given at construction, in the order
//! `(classifies, waits, times_out)`.
//!
//! ## Example
//! ```
//! use retrier::{PolicyFn, PolicyInstance, PolicyRef};
//!
//! struct Gate;
//! impl PolicyInstance for Gate {}
//!
//! let p: PolicyRef = PolicyFn::arc(true, false, false, || Box::new(Gate));
//! assert!(p.classifies());
//! ```

use std::sync::Arc;

use crate::policy::contract::{Policy, PolicyInstance};

/// Policy descriptor backed by an instance-factory closure.
///
/// Capability flags are given at construction in the order
/// `(classifies, waits, times_out)`.
///
/// # Example
/// ```
/// use retrier::{PolicyFn, PolicyInstance, PolicyRef};
///
/// struct Gate;
/// impl PolicyInstance for Gate {}
///
/// let p: PolicyRef = PolicyFn::arc(true, false, false, || Box::new(Gate));
/// assert!(p.classifies());
/// assert!(!p.waits());
/// ```
pub struct PolicyFn<F> {
    classifies: bool,
    waits: bool,
    times_out: bool,
    factory: F,
}

impl<F> PolicyFn<F>
where
    F: Fn() -> Box<dyn PolicyInstance> + Send + Sync + 'static,
{
    /// Creates a new closure-backed policy.
    ///
    /// Prefer [`PolicyFn::arc`] when you immediately need a
    /// [`PolicyRef`](crate::PolicyRef).
    pub fn new(classifies: bool, waits: bool, times_out: bool, factory: F) -> Self {
        Self {
            classifies,
            waits,
            times_out,
            factory,
        }
    }

    /// Creates the policy and returns it as a shared handle.
    pub fn arc(classifies: bool, waits: bool, times_out: bool, factory: F) -> Arc<Self> {
        Arc::new(Self::new(classifies, waits, times_out, factory))
    }
}

impl<F> Policy for PolicyFn<F>
where
    F: Fn() -> Box<dyn PolicyInstance> + Send + Sync + 'static,
{
    fn classifies(&self) -> bool {
        self.classifies
    }

    fn waits(&self) -> bool {
        self.waits
    }

    fn times_out(&self) -> bool {
        self.times_out
    }

    fn instantiate(&self) -> Box<dyn PolicyInstance> {
        (self.factory)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Probe;
    impl PolicyInstance for Probe {}

    #[test]
    fn flags_are_forwarded() {
        let p = PolicyFn::new(true, false, true, || {
            Box::new(Probe) as Box<dyn PolicyInstance>
        });
        assert!(p.classifies());
        assert!(!p.waits());
        assert!(p.times_out());
    }

    #[test]
    fn each_instantiation_calls_the_factory() {
        let built = Arc::new(AtomicU32::new(0));
        let counter = built.clone();
        let p = PolicyFn::new(false, true, false, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(Probe) as Box<dyn PolicyInstance>
        });

        let _a = p.instantiate();
        let _b = p.instantiate();
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }
}
