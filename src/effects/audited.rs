//! Audited application of actions.

use crate::audit::{AuditEntry, AuditError, AuditRecorder};
use crate::core::{Action, ActionKind, GuardExecutionError, State, TransitionOutcome};
use crate::engine::{AuditFailurePolicy, TransitionEngine};
use stillwater::effect::Effect;
use stillwater::prelude::*;
use tracing::warn;

/// Errors from the audited shell.
#[derive(Debug, thiserror::Error)]
pub enum AuditedApplyError {
    #[error(transparent)]
    Guard(#[from] GuardExecutionError),

    #[error("Transition decided but not recorded: {0}")]
    Audit(#[from] AuditError),
}

/// Apply `action` and record the decision with the environment's recorder.
///
/// The outcome is computed eagerly by the pure engine. The returned
/// effect only performs the write, and the audit entry is stamped when
/// the effect runs, not when it is built. Guard faults fail the effect
/// without recording anything.
pub fn apply_audited<S, A, Snap, Env>(
    engine: &TransitionEngine<S, A, Snap>,
    entity_id: impl Into<String>,
    current: &S,
    action: &A,
    snapshot: &Snap,
) -> impl Effect<Output = TransitionOutcome<S>, Error = AuditedApplyError, Env = Env>
where
    S: State + 'static,
    A: Action,
    A::Kind: 'static,
    Env: AuditRecorder<S, A::Kind> + Clone + Send + Sync + 'static,
{
    let outcome = match engine.apply(current, action, snapshot) {
        Ok(outcome) => outcome,
        Err(err) => return fail(AuditedApplyError::Guard(err)).boxed(),
    };

    let entity_id = entity_id.into();
    let from = current.clone();
    let kind = action.kind();
    let policy = engine.config().audit_failure;

    from_fn(move |env: &Env| {
        let entry = AuditEntry::new(entity_id.clone(), from.clone(), kind, outcome.clone());
        match env.record(entry) {
            Ok(()) => Ok(outcome.clone()),
            Err(err) => match policy {
                AuditFailurePolicy::Propagate => Err(AuditedApplyError::Audit(err)),
                AuditFailurePolicy::LogAndContinue => {
                    warn!(
                        entity = %entity_id,
                        from = from.name(),
                        kind = kind.name(),
                        error = %err,
                        "audit write failed, continuing"
                    );
                    Ok(outcome.clone())
                }
            },
        }
    })
    .boxed()
}
