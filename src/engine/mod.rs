//! The transition engine: the single entry point for applying actions.
//!
//! An engine can only be built from a table that passed the completeness
//! check, so a running engine never meets an undecided pair.

pub mod config;

pub use config::{AuditFailurePolicy, ConfigLoadError, EngineConfig, RejectionLogLevel};

use crate::core::{
    Action, ActionKind, Finite, GuardEvaluator, GuardExecutionError, GuardResult, State,
    TransitionOutcome,
};
use crate::table::{ConfigError, Lookup, TransitionTable};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Validates actions against a complete transition table.
///
/// `apply` is a pure function of its inputs: it reads the immutable
/// table, runs guards and returns a fresh outcome. It never stores
/// outcomes and never touches entity storage. The engine is `Send +
/// Sync` and cheap to clone, so one instance can serve many threads.
///
/// # Example
///
/// ```rust
/// use verdict::table::TransitionTable;
/// use verdict::engine::TransitionEngine;
/// use verdict::{action_enum, state_enum};
///
/// state_enum! {
///     pub enum Payment {
///         Pending,
///         Settled,
///     }
///     final: [Settled]
/// }
///
/// action_enum! {
///     pub enum PaymentAction => PaymentKind {
///         Settle,
///     }
/// }
///
/// let mut table: TransitionTable<Payment, PaymentAction, ()> = TransitionTable::new();
/// table.register(Payment::Pending, PaymentKind::Settle, Payment::Settled, vec![]).unwrap();
/// table.forbid(Payment::Settled, PaymentKind::Settle).unwrap();
///
/// let engine = TransitionEngine::from_universe(table).unwrap();
/// let outcome = engine.apply(&Payment::Pending, &PaymentAction::Settle, &()).unwrap();
/// assert_eq!(outcome.state(), Some(&Payment::Settled));
/// ```
pub struct TransitionEngine<S, A: Action, Snap> {
    table: Arc<TransitionTable<S, A, Snap>>,
    evaluator: GuardEvaluator,
    config: EngineConfig,
}

impl<S, A: Action, Snap> Clone for TransitionEngine<S, A, Snap> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            evaluator: self.evaluator,
            config: self.config.clone(),
        }
    }
}

impl<S: State, A: Action, Snap> TransitionEngine<S, A, Snap> {
    /// Build an engine, failing fast if any `states × kinds` pair is undecided.
    pub fn new(
        table: TransitionTable<S, A, Snap>,
        states: &[S],
        kinds: &[A::Kind],
    ) -> Result<Self, ConfigError> {
        if let Err(err) = table.assert_complete(states, kinds) {
            error!(error = %err, "refusing to start transition engine");
            return Err(err);
        }

        info!(
            states = states.len(),
            kinds = kinds.len(),
            entries = table.len(),
            "transition engine ready"
        );

        let config = EngineConfig::default();
        Ok(Self {
            table: Arc::new(table),
            evaluator: GuardEvaluator::new(config.capture_guard_panics),
            config,
        })
    }

    /// Build an engine checked against every declared state and kind.
    pub fn from_universe(table: TransitionTable<S, A, Snap>) -> Result<Self, ConfigError>
    where
        S: Finite,
        A::Kind: Finite,
    {
        Self::new(table, S::variants(), <A::Kind as Finite>::variants())
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.evaluator = GuardEvaluator::new(config.capture_guard_panics);
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn table(&self) -> &TransitionTable<S, A, Snap> {
        &self.table
    }

    /// Apply `action` to an entity currently in `current`.
    ///
    /// Returns `Applied` with the registered target, or `Rejected` when
    /// the pair is not allowed or a guard refuses. `Err` is reserved for
    /// guards that error or panic.
    pub fn apply(
        &self,
        current: &S,
        action: &A,
        snapshot: &Snap,
    ) -> Result<TransitionOutcome<S>, GuardExecutionError> {
        let kind = action.kind();

        let rule = match self.table.lookup(current, kind) {
            Lookup::Allowed(rule) => rule,
            Lookup::NotAllowed => {
                let outcome = TransitionOutcome::illegal(current.name(), kind.name());
                self.log_rejection(current, kind, &outcome);
                return Ok(outcome);
            }
        };

        match self.evaluator.evaluate(rule, current, action, snapshot) {
            Ok(GuardResult::Pass) => {
                debug!(
                    from = current.name(),
                    kind = kind.name(),
                    to = rule.target().name(),
                    "transition applied"
                );
                Ok(TransitionOutcome::applied(
                    rule.target().clone(),
                    rule.effect_message(action, snapshot),
                ))
            }
            Ok(GuardResult::Fail { code, message }) => {
                let outcome = TransitionOutcome::rejected(code, message);
                self.log_rejection(current, kind, &outcome);
                Ok(outcome)
            }
            Err(err) => {
                error!(
                    guard = %err.guard,
                    from = current.name(),
                    kind = kind.name(),
                    error = %err.cause,
                    "guard failed to execute"
                );
                Err(err)
            }
        }
    }

    /// Whether `kind` is structurally allowed from `current`, ignoring guards.
    pub fn check(&self, current: &S, kind: A::Kind) -> bool {
        self.table.lookup(current, kind).is_allowed()
    }

    /// Kinds with an allowed rule from `current`.
    pub fn available_actions(&self, current: &S) -> Vec<A::Kind> {
        self.table.allowed_kinds(current)
    }

    fn log_rejection(&self, current: &S, kind: A::Kind, outcome: &TransitionOutcome<S>) {
        let from = current.name();
        let kind = kind.name();
        let code = outcome.code().unwrap_or_default();
        match self.config.rejection_log_level {
            RejectionLogLevel::Off => {}
            RejectionLogLevel::Debug => debug!(from, kind, code, "transition rejected"),
            RejectionLogLevel::Info => info!(from, kind, code, "transition rejected"),
            RejectionLogLevel::Warn => warn!(from, kind, code, "transition rejected"),
        }
    }
}
