//! Guard predicates for controlling state transitions.
//!
//! Guards run after a transition has been found structurally legal.
//! They inspect the current state, the action payload and the caller's
//! entity snapshot, and may block the transition with a reason code.
//! They never choose a different target.

use super::action::{Action, ActionKind};
use super::rule::Rule;
use super::state::State;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

/// Boxed cause carried by a fallible guard.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Predicate<S, A, Snap> = Arc<dyn Fn(&S, &A, &Snap) -> Result<bool, BoxError> + Send + Sync>;
type MessageFn<S, A, Snap> = Arc<dyn Fn(&S, &A, &Snap) -> String + Send + Sync>;

enum FailureMessage<S, A, Snap> {
    Fixed(String),
    Computed(MessageFn<S, A, Snap>),
}

impl<S, A, Snap> Clone for FailureMessage<S, A, Snap> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(message) => Self::Fixed(message.clone()),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
        }
    }
}

/// Pure predicate that can block a structurally legal transition.
///
/// A guard carries the reason code and message reported when it fails.
/// The predicate must be deterministic, free of side effects and must
/// not block.
///
/// # Example
///
/// ```rust
/// use verdict::core::Guard;
///
/// #[derive(Debug)]
/// enum Op {
///     Suspend { reason: String },
/// }
///
/// let needs_reason: Guard<(), Op, ()> = Guard::new(
///     "MISSING_REASON",
///     "A suspension requires a reason",
///     |_, op: &Op, _| match op {
///         Op::Suspend { reason } => !reason.trim().is_empty(),
///     },
/// );
///
/// let ok = Op::Suspend { reason: "fraud".to_string() };
/// let blank = Op::Suspend { reason: " ".to_string() };
/// assert!(needs_reason.check(&(), &ok, &()).unwrap());
/// assert!(!needs_reason.check(&(), &blank, &()).unwrap());
/// ```
pub struct Guard<S, A, Snap> {
    code: String,
    message: FailureMessage<S, A, Snap>,
    predicate: Predicate<S, A, Snap>,
}

impl<S, A, Snap> Guard<S, A, Snap> {
    /// Create a guard from an infallible predicate.
    pub fn new<F>(code: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&S, &A, &Snap) -> bool + Send + Sync + 'static,
    {
        Guard {
            code: code.into(),
            message: FailureMessage::Fixed(message.into()),
            predicate: Arc::new(move |s: &S, a: &A, snap: &Snap| {
                Ok::<bool, BoxError>(predicate(s, a, snap))
            }),
        }
    }

    /// Create a guard whose predicate can fail.
    ///
    /// An `Err` is not a rejection: it means the guard itself is broken
    /// and surfaces from the engine as a [`GuardExecutionError`].
    pub fn fallible<F, E>(code: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&S, &A, &Snap) -> Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Guard {
            code: code.into(),
            message: FailureMessage::Fixed(message.into()),
            predicate: Arc::new(move |s: &S, a: &A, snap: &Snap| {
                predicate(s, a, snap).map_err(Into::<BoxError>::into)
            }),
        }
    }

    /// Compute the failure message from the inputs instead of a fixed string.
    pub fn message_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&S, &A, &Snap) -> String + Send + Sync + 'static,
    {
        self.message = FailureMessage::Computed(Arc::new(f));
        self
    }

    /// Reason code reported when this guard rejects.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Evaluate the predicate.
    pub fn check(&self, state: &S, action: &A, snapshot: &Snap) -> Result<bool, BoxError> {
        (self.predicate)(state, action, snapshot)
    }

    fn failure_message(&self, state: &S, action: &A, snapshot: &Snap) -> String {
        match &self.message {
            FailureMessage::Fixed(message) => message.clone(),
            FailureMessage::Computed(f) => f(state, action, snapshot),
        }
    }
}

impl<S, A, Snap> Clone for Guard<S, A, Snap> {
    fn clone(&self) -> Self {
        Self {
            code: self.code.clone(),
            message: self.message.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S, A, Snap> std::fmt::Debug for Guard<S, A, Snap> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard").field("code", &self.code).finish()
    }
}

/// Verdict of the guard chain for one rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardResult {
    /// Every guard accepted (or the rule has none).
    Pass,
    /// The first failing guard's reason.
    Fail { code: String, message: String },
}

/// What went wrong inside a guard.
#[derive(Debug, Error)]
pub enum GuardFault {
    #[error("{0}")]
    Error(#[source] BoxError),

    #[error("guard panicked: {0}")]
    Panicked(String),
}

/// A guard broke its contract: it returned an error or panicked.
///
/// This is a bug in caller-supplied code, not a business outcome, so it
/// is never folded into a `Rejected` outcome.
#[derive(Debug, Error)]
#[error("guard '{guard}' failed while evaluating {kind} from {state}: {cause}")]
pub struct GuardExecutionError {
    /// Reason code of the faulting guard.
    pub guard: String,
    /// Name of the state the transition started from.
    pub state: String,
    /// Name of the action kind.
    pub kind: String,
    #[source]
    pub cause: GuardFault,
}

/// Runs a rule's guard chain.
///
/// Guards are combined with logical AND in registration order and
/// short-circuit: once one rejects, later guards are not invoked.
#[derive(Clone, Copy, Debug)]
pub struct GuardEvaluator {
    capture_panics: bool,
}

impl Default for GuardEvaluator {
    fn default() -> Self {
        Self {
            capture_panics: true,
        }
    }
}

impl GuardEvaluator {
    /// Create an evaluator.
    ///
    /// With `capture_panics` set, a panicking guard is reported as a
    /// [`GuardExecutionError`]; otherwise the panic unwinds to the caller.
    pub fn new(capture_panics: bool) -> Self {
        Self { capture_panics }
    }

    /// Evaluate every guard of `rule` against the inputs.
    pub fn evaluate<S, A, Snap>(
        &self,
        rule: &Rule<S, A, Snap>,
        state: &S,
        action: &A,
        snapshot: &Snap,
    ) -> Result<GuardResult, GuardExecutionError>
    where
        S: State,
        A: Action,
    {
        for guard in rule.guards() {
            match self.run(guard, state, action, snapshot) {
                Ok(true) => continue,
                Ok(false) => {
                    return Ok(GuardResult::Fail {
                        code: guard.code().to_string(),
                        message: guard.failure_message(state, action, snapshot),
                    })
                }
                Err(cause) => {
                    return Err(GuardExecutionError {
                        guard: guard.code().to_string(),
                        state: state.name().to_string(),
                        kind: rule.kind().name().to_string(),
                        cause,
                    })
                }
            }
        }
        Ok(GuardResult::Pass)
    }

    fn run<S, A, Snap>(
        &self,
        guard: &Guard<S, A, Snap>,
        state: &S,
        action: &A,
        snapshot: &Snap,
    ) -> Result<bool, GuardFault> {
        if !self.capture_panics {
            return guard.check(state, action, snapshot).map_err(GuardFault::Error);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| guard.check(state, action, snapshot))) {
            Ok(result) => result.map_err(GuardFault::Error),
            Err(payload) => Err(GuardFault::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::ActionKind;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Active,
        Suspended,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Active => "Active",
                Self::Suspended => "Suspended",
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum Kind {
        Suspend,
    }

    impl ActionKind for Kind {
        fn name(&self) -> &str {
            "Suspend"
        }
    }

    #[derive(Debug)]
    struct Suspend {
        reason: String,
    }

    impl Action for Suspend {
        type Kind = Kind;

        fn kind(&self) -> Kind {
            Kind::Suspend
        }
    }

    struct Snapshot {
        flagged: bool,
    }

    type TestRule = Rule<TestState, Suspend, Snapshot>;

    fn rule() -> TestRule {
        Rule::new(TestState::Active, Kind::Suspend, TestState::Suspended)
    }

    fn suspend(reason: &str) -> Suspend {
        Suspend {
            reason: reason.to_string(),
        }
    }

    #[test]
    fn rule_without_guards_passes() {
        let result = GuardEvaluator::default()
            .evaluate(&rule(), &TestState::Active, &suspend(""), &Snapshot { flagged: false })
            .unwrap();

        assert_eq!(result, GuardResult::Pass);
    }

    #[test]
    fn failing_guard_reports_its_code() {
        let rule = rule().with_guard(Guard::new(
            "MISSING_REASON",
            "A suspension requires a reason",
            |_, a: &Suspend, _| !a.reason.is_empty(),
        ));

        let result = GuardEvaluator::default()
            .evaluate(&rule, &TestState::Active, &suspend(""), &Snapshot { flagged: false })
            .unwrap();

        assert_eq!(
            result,
            GuardResult::Fail {
                code: "MISSING_REASON".to_string(),
                message: "A suspension requires a reason".to_string(),
            }
        );
    }

    #[test]
    fn first_failure_wins_and_later_guards_are_skipped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let spy = Arc::clone(&calls);

        let rule = rule()
            .with_guard(Guard::new("FIRST", "first", |_, _, _| false))
            .with_guard(Guard::new("SECOND", "second", move |_, _, _| {
                spy.fetch_add(1, Ordering::SeqCst);
                false
            }));

        let result = GuardEvaluator::default()
            .evaluate(&rule, &TestState::Active, &suspend("x"), &Snapshot { flagged: false })
            .unwrap();

        assert!(matches!(result, GuardResult::Fail { ref code, .. } if code == "FIRST"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn guards_see_the_snapshot() {
        let rule = rule().with_guard(Guard::new(
            "ACCOUNT_FLAGGED",
            "flagged",
            |_, _, snap: &Snapshot| !snap.flagged,
        ));
        let evaluator = GuardEvaluator::default();

        let clean = evaluator
            .evaluate(&rule, &TestState::Active, &suspend("x"), &Snapshot { flagged: false })
            .unwrap();
        let flagged = evaluator
            .evaluate(&rule, &TestState::Active, &suspend("x"), &Snapshot { flagged: true })
            .unwrap();

        assert_eq!(clean, GuardResult::Pass);
        assert!(matches!(flagged, GuardResult::Fail { .. }));
    }

    #[test]
    fn computed_message_uses_payload() {
        let rule = rule().with_guard(
            Guard::new("REASON_TOO_SHORT", "", |_, a: &Suspend, _| a.reason.len() >= 3)
                .message_with(|_, a, _| format!("Reason '{}' is too short", a.reason)),
        );

        let result = GuardEvaluator::default()
            .evaluate(&rule, &TestState::Active, &suspend("ab"), &Snapshot { flagged: false })
            .unwrap();

        assert_eq!(
            result,
            GuardResult::Fail {
                code: "REASON_TOO_SHORT".to_string(),
                message: "Reason 'ab' is too short".to_string(),
            }
        );
    }

    #[test]
    fn fallible_guard_error_is_not_a_rejection() {
        let rule = rule().with_guard(Guard::fallible(
            "LIMIT_LOOKUP",
            "limit exceeded",
            |_, _, _| -> Result<bool, std::io::Error> {
                Err(std::io::Error::other("limit table missing"))
            },
        ));

        let err = GuardEvaluator::default()
            .evaluate(&rule, &TestState::Active, &suspend("x"), &Snapshot { flagged: false })
            .unwrap_err();

        assert_eq!(err.guard, "LIMIT_LOOKUP");
        assert_eq!(err.state, "Active");
        assert_eq!(err.kind, "Suspend");
        assert!(matches!(err.cause, GuardFault::Error(_)));
        assert!(err.to_string().contains("limit table missing"));
    }

    #[test]
    fn panicking_guard_is_captured() {
        let rule = rule().with_guard(Guard::new("BROKEN", "broken", |_, _, _| {
            panic!("index out of range")
        }));

        let err = GuardEvaluator::default()
            .evaluate(&rule, &TestState::Active, &suspend("x"), &Snapshot { flagged: false })
            .unwrap_err();

        match err.cause {
            GuardFault::Panicked(message) => assert_eq!(message, "index out of range"),
            other => panic!("expected panic fault, got {other:?}"),
        }
    }

    #[test]
    fn panics_propagate_when_capture_is_disabled() {
        let rule = rule().with_guard(Guard::new("BROKEN", "broken", |_, _, _| panic!("boom")));

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            GuardEvaluator::new(false).evaluate(
                &rule,
                &TestState::Active,
                &suspend("x"),
                &Snapshot { flagged: false },
            )
        }));

        assert!(result.is_err());
    }

    #[test]
    fn guard_is_deterministic() {
        let guard: Guard<TestState, Suspend, Snapshot> =
            Guard::new("R", "r", |_, a: &Suspend, _| a.reason.len() > 2);
        let action = suspend("fraud");
        let snap = Snapshot { flagged: false };

        let first = guard.check(&TestState::Active, &action, &snap).unwrap();
        let second = guard.check(&TestState::Active, &action, &snap).unwrap();

        assert_eq!(first, second);
    }
}
