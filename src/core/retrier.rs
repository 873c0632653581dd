//! # Retrier: the retry orchestration loop.
//!
//! Drives one fallible [`Operation`] under a composed set of policies:
//!
//! ```text
//! retry(action, operation, policies)
//!
//! ├─► gap-fill defaults (per missing capability: waits / times_out / classifies)
//! ├─► instantiate every policy, preserving order
//! ├─► log "{Action}..."
//! └─► loop {
//!       ├─► operation.call()
//!       │     ├─ Ok  ──► log "Completed {action}." → return Ok
//!       │     └─ Err ──► share the error for this round
//!       ├─► can_retry on every instance, in order
//!       │     └─ first veto ──► log → return Err
//!       ├─► collect wait tokens (instance, token)
//!       │     └─ none ──► log → panic (misconfiguration)
//!       ├─► race all tokens (select_all)
//!       └─► on_wait_expired on the winner's owner
//!             ├─ Err ──► log → return Err
//!             └─ Ok  ──► next round
//!     }
//! ```
//!
//! ## Rules
//! - Rounds run **sequentially**; instances are exclusive to one loop.
//! - Veto precedence is **list order**; the first veto wins.
//! - Among simultaneously-ready wait tokens the **first-registered** one
//!   wins: the race polls tokens in registration order.
//! - Logging is best-effort and never affects control flow.

use std::sync::Arc;

use futures::future::select_all;

use crate::core::builder::RetrierBuilder;
use crate::core::operation::Operation;
use crate::error::{BoxError, SharedError, WrapFn};
use crate::logging::{LogWriter, LoggerRef};
use crate::policies::{ExponentialBackoff, MaxTries};
use crate::policy::{PolicyInstance, PolicyRef, WaitToken};

/// Retry engine bound to a logger, a wrap function, and default policies.
///
/// Cheap to clone; every clone shares the same configuration. A single
/// engine serves any number of concurrent [`Retrier::retry`] calls — the
/// per-loop mutable state lives entirely in policy instances created per
/// call.
#[derive(Clone)]
pub struct Retrier {
    pub(super) logger: LoggerRef,
    pub(super) wrap: WrapFn,
    pub(super) default_classifiers: Vec<PolicyRef>,
    pub(super) default_backoff: Vec<PolicyRef>,
    pub(super) default_timeout: Vec<PolicyRef>,
}

impl Default for Retrier {
    /// Returns the engine configured with sensible defaults:
    ///
    /// - exponential backoff with a factor of 2;
    /// - maximum tries set to 30;
    /// - no default classifiers;
    /// - stdout logging via [`LogWriter`].
    fn default() -> Self {
        Self::builder()
            .logger(LogWriter::new())
            .default_backoff(vec![Arc::new(ExponentialBackoff::new(2))])
            .default_timeout(vec![Arc::new(MaxTries::new(30))])
            .build()
    }
}

impl Retrier {
    /// Returns a builder for a customized engine.
    pub fn builder() -> RetrierBuilder {
        RetrierBuilder::new()
    }

    /// Runs `operation` until it succeeds or a policy ends the loop.
    ///
    /// `action` names the operation in the present-participle form
    /// ("creating the widget"); it appears verbatim in log and error
    /// messages. `policies` are consulted in the given order; for every
    /// capability absent from the list the engine appends its configured
    /// defaults.
    ///
    /// # Panics
    /// Panics if a failed round produces no wait token at all — a policy
    /// set without waiting capability (and no default to fill the gap)
    /// cannot bound the loop and is a programming error, not a runtime
    /// failure.
    pub async fn retry<O>(
        &self,
        action: &str,
        mut operation: O,
        policies: &[PolicyRef],
    ) -> Result<(), BoxError>
    where
        O: Operation,
    {
        let active = self.fill_defaults(policies);
        let mut instances: Vec<Box<dyn PolicyInstance>> =
            active.iter().map(|p| p.instantiate()).collect();

        self.logger.log(&format!("{}...", capitalize(action)));
        loop {
            let err: SharedError = match operation.call().await {
                Ok(()) => {
                    self.logger.log(&format!("Completed {action}."));
                    return Ok(());
                }
                Err(e) => Arc::from(e),
            };

            for instance in instances.iter_mut() {
                if let Err(veto) = instance.can_retry(&self.wrap, &err, action) {
                    self.logger.log(&format!("Error while {action}. ({veto})"));
                    return Err(veto);
                }
            }

            let mut owners: Vec<usize> = Vec::new();
            let mut tokens: Vec<WaitToken> = Vec::new();
            for (idx, instance) in instances.iter_mut().enumerate() {
                if let Some(token) = instance.wait(&err) {
                    owners.push(idx);
                    tokens.push(token);
                }
            }
            if tokens.is_empty() {
                self.logger.log(&format!(
                    "No retry policies with waiting capability specified for {action}."
                ));
                panic!("no retry policies with waiting capability specified for {action}");
            }

            let (_, winner, _losers) = select_all(tokens).await;
            let owner = owners[winner];
            if let Err(fatal) = instances[owner].on_wait_expired(&self.wrap, &err, action) {
                self.logger.log(&format!("Error while {action}. ({fatal})"));
                return Err(fatal);
            }
        }
    }

    /// Appends default policies for every capability the caller's list lacks.
    ///
    /// Checked independently per capability, in append order: backoff,
    /// timeout, classifiers. Caller-supplied policies always come first.
    fn fill_defaults(&self, policies: &[PolicyRef]) -> Vec<PolicyRef> {
        let mut active: Vec<PolicyRef> = policies.to_vec();

        let found_wait = active.iter().any(|p| p.waits());
        let found_timeout = active.iter().any(|p| p.times_out());
        let found_classifier = active.iter().any(|p| p.classifies());

        if !found_wait {
            active.extend(self.default_backoff.iter().cloned());
        }
        if !found_timeout {
            active.extend(self.default_timeout.iter().cloned());
        }
        if !found_classifier {
            active.extend(self.default_classifiers.iter().cloned());
        }
        active
    }
}

/// Uppercases the first character of `action` for the start-of-loop line.
fn capitalize(action: &str) -> String {
    let mut chars = action.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::{CallTimeout, Cancellation};
    use crate::policy::PolicyFn;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    /// Engine with silent logging and fast defaults for loop tests.
    fn quiet_engine() -> Retrier {
        Retrier::builder()
            .default_backoff(vec![Arc::new(ExponentialBackoff {
                first: Duration::from_millis(1),
                ..ExponentialBackoff::default()
            })])
            .default_timeout(vec![Arc::new(MaxTries::new(30))])
            .build()
    }

    fn counting_op(
        failures_before_success: u32,
    ) -> (Arc<AtomicU32>, impl FnMut() -> futures::future::BoxFuture<'static, Result<(), BoxError>>)
    {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();
        let op = move || {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            let fut: futures::future::BoxFuture<'static, Result<(), BoxError>> =
                Box::pin(async move {
                    if n < failures_before_success {
                        Err(BoxError::from("boom".to_string()))
                    } else {
                        Ok(())
                    }
                });
            fut
        };
        (calls, op)
    }

    fn always_fail() -> impl FnMut() -> futures::future::BoxFuture<'static, Result<(), BoxError>>
    {
        || {
            let fut: futures::future::BoxFuture<'static, Result<(), BoxError>> =
                Box::pin(async { Err(BoxError::from("boom".to_string())) });
            fut
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let (calls, op) = counting_op(3);
        let result = quiet_engine().retry("testing", op, &[]).await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 4, "3 failures + 1 success");
    }

    #[tokio::test]
    async fn immediate_success_invokes_operation_once() {
        let (calls, op) = counting_op(0);
        let result = quiet_engine().retry("testing", op, &[]).await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn max_tries_bounds_the_attempt_count() {
        let (calls, op) = counting_op(u32::MAX);
        let policies: Vec<PolicyRef> = vec![
            Arc::new(MaxTries::new(2)),
            Arc::new(ExponentialBackoff {
                first: Duration::from_millis(1),
                ..ExponentialBackoff::default()
            }),
        ];
        let err = quiet_engine()
            .retry("testing", op, &policies)
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3, "first attempt + 2 retries");
        assert_eq!(
            err.to_string(),
            "maximum retries reached while testing, giving up (boom)"
        );
    }

    #[tokio::test]
    async fn classifier_veto_stops_after_one_invocation() {
        struct VetoEverything;
        impl PolicyInstance for VetoEverything {
            fn can_retry(
                &mut self,
                wrap: &WrapFn,
                err: &SharedError,
                action: &str,
            ) -> Result<(), BoxError> {
                Err(wrap(err.clone(), format!("unrecoverable error while {action}")))
            }
        }

        let (calls, op) = counting_op(u32::MAX);
        let policies: Vec<PolicyRef> = vec![PolicyFn::arc(true, false, false, || {
            Box::new(VetoEverything)
        })];
        let err = quiet_engine()
            .retry("testing", op, &policies)
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(err.to_string(), "unrecoverable error while testing (boom)");
    }

    #[tokio::test(start_paused = true)]
    async fn call_timeout_fires_after_its_budget() {
        let budget = Duration::from_millis(50);
        let policies: Vec<PolicyRef> = vec![
            Arc::new(CallTimeout::new(budget)),
            Arc::new(ExponentialBackoff {
                first: Duration::from_millis(10),
                factor: 1.0,
                ..ExponentialBackoff::default()
            }),
        ];

        let started = Instant::now();
        let err = quiet_engine()
            .retry("testing", always_fail(), &policies)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "timeout while testing, giving up (boom)");
        let elapsed = started.elapsed();
        assert!(elapsed >= budget, "fired early: {elapsed:?}");
        // One backoff interval past the budget at most.
        assert!(elapsed <= budget + Duration::from_millis(20), "fired late: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_a_backoff_in_flight() {
        let token = CancellationToken::new();
        let policies: Vec<PolicyRef> = vec![
            Arc::new(Cancellation::new(token.clone())),
            Arc::new(ExponentialBackoff {
                first: Duration::from_secs(3600),
                ..ExponentialBackoff::default()
            }),
        ];

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let started = Instant::now();
        let err = quiet_engine()
            .retry("testing", always_fail(), &policies)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "timeout while testing (boom)");
        assert!(
            started.elapsed() < Duration::from_secs(3600),
            "cancellation must not wait out the backoff"
        );
    }

    #[tokio::test]
    #[should_panic(expected = "no retry policies with waiting capability")]
    async fn missing_wait_capability_is_fatal() {
        let engine = Retrier::builder()
            .default_timeout(vec![Arc::new(MaxTries::new(3))])
            .build();
        // MaxTries cannot wait, and the engine has no default backoff.
        let policies: Vec<PolicyRef> = vec![Arc::new(MaxTries::new(3))];
        let _ = engine.retry("testing", always_fail(), &policies).await;
    }

    #[tokio::test(start_paused = true)]
    async fn gap_filling_is_per_capability() {
        struct PassClassifier;
        impl PolicyInstance for PassClassifier {}

        // A custom classifier only: default backoff and timeout still apply.
        let engine = Retrier::builder()
            .default_backoff(vec![Arc::new(ExponentialBackoff {
                first: Duration::from_millis(1),
                ..ExponentialBackoff::default()
            })])
            .default_timeout(vec![Arc::new(MaxTries::new(2))])
            .build();
        let policies: Vec<PolicyRef> = vec![PolicyFn::arc(true, false, false, || {
            Box::new(PassClassifier)
        })];

        let (calls, op) = counting_op(u32::MAX);
        let err = engine.retry("testing", op, &policies).await.unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3, "default MaxTries(2) applied");
        assert!(err.to_string().contains("maximum retries reached"));
    }

    #[test]
    fn fill_defaults_preserves_caller_order_and_appends_missing() {
        let engine = Retrier::default();
        let custom_backoff: PolicyRef = Arc::new(ExponentialBackoff::new(3));
        let active = engine.fill_defaults(std::slice::from_ref(&custom_backoff));

        // Caller's policy first, then only the missing capabilities.
        assert!(Arc::ptr_eq(&active[0], &custom_backoff));
        assert_eq!(active.len(), 2);
        assert!(active[1].times_out(), "default timeout appended");
        assert!(
            !active.iter().skip(1).any(|p| p.waits()),
            "no default backoff when the caller already waits"
        );
    }

    #[tokio::test]
    async fn simultaneous_tokens_resolve_to_first_registered() {
        struct ReadyWait {
            verdict: &'static str,
        }
        impl PolicyInstance for ReadyWait {
            fn wait(&mut self, _err: &SharedError) -> Option<WaitToken> {
                Some(Box::pin(futures::future::ready(())))
            }
            fn on_wait_expired(
                &mut self,
                wrap: &WrapFn,
                err: &SharedError,
                _action: &str,
            ) -> Result<(), BoxError> {
                Err(wrap(err.clone(), self.verdict.to_string()))
            }
        }

        let policies: Vec<PolicyRef> = vec![
            PolicyFn::arc(false, true, false, || {
                Box::new(ReadyWait { verdict: "first" })
            }),
            PolicyFn::arc(false, true, false, || {
                Box::new(ReadyWait { verdict: "second" })
            }),
        ];
        let err = quiet_engine()
            .retry("testing", always_fail(), &policies)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "first (boom)");
    }

    #[tokio::test(start_paused = true)]
    async fn logs_start_progress_and_completion() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = lines.clone();
        let engine = Retrier::builder()
            .logger(move |msg: &str| sink.lock().unwrap().push(msg.to_string()))
            .default_backoff(vec![Arc::new(ExponentialBackoff {
                first: Duration::from_millis(1),
                ..ExponentialBackoff::default()
            })])
            .default_timeout(vec![Arc::new(MaxTries::new(30))])
            .build();

        let (_, op) = counting_op(1);
        engine.retry("creating the widget", op, &[]).await.unwrap();

        let lines = lines.lock().unwrap();
        assert_eq!(lines.first().unwrap(), "Creating the widget...");
        assert_eq!(lines.last().unwrap(), "Completed creating the widget.");
    }

    #[tokio::test(start_paused = true)]
    async fn logs_the_surfaced_error() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = lines.clone();
        let engine = Retrier::builder()
            .logger(move |msg: &str| sink.lock().unwrap().push(msg.to_string()))
            .default_backoff(vec![Arc::new(ExponentialBackoff {
                first: Duration::from_millis(1),
                ..ExponentialBackoff::default()
            })])
            .default_timeout(vec![Arc::new(MaxTries::new(1))])
            .build();

        let err = engine
            .retry("creating the widget", always_fail(), &[])
            .await
            .unwrap_err();

        let lines = lines.lock().unwrap();
        assert_eq!(
            lines.last().unwrap(),
            &format!("Error while creating the widget. ({err})")
        );
    }

    #[test]
    fn capitalize_handles_edge_cases() {
        assert_eq!(capitalize("creating the widget"), "Creating the widget");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("x"), "X");
    }
}
