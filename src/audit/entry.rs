//! One recorded decision.

use crate::core::{ActionKind, State, TransitionOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of one `apply` call: who, from where, with what, and the verdict.
///
/// Entries are immutable values. Rejections are recorded as faithfully
/// as applied transitions.
///
/// # Example
///
/// ```rust
/// use verdict::audit::AuditEntry;
/// use verdict::core::TransitionOutcome;
/// use verdict::{action_enum, state_enum};
///
/// state_enum! {
///     enum Light {
///         Off,
///         On,
///     }
/// }
///
/// action_enum! {
///     enum LightAction => LightKind {
///         Toggle,
///     }
/// }
///
/// let entry = AuditEntry::new(
///     "lamp-1",
///     Light::Off,
///     LightKind::Toggle,
///     TransitionOutcome::applied(Light::On, "Light switched on"),
/// );
///
/// assert_eq!(entry.entity_id, "lamp-1");
/// assert!(entry.outcome.is_applied());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct AuditEntry<S: State, K: ActionKind> {
    /// Unique entry identifier
    pub id: Uuid,
    /// When the decision was made
    pub timestamp: DateTime<Utc>,
    /// Caller-supplied identity of the entity
    pub entity_id: String,
    /// State the entity was in when the action arrived
    pub from: S,
    /// Kind of the action that was applied
    pub kind: K,
    /// What the engine decided
    pub outcome: TransitionOutcome<S>,
}

impl<S: State, K: ActionKind> AuditEntry<S, K> {
    /// Stamp a new entry with a fresh id and the current time.
    pub fn new(
        entity_id: impl Into<String>,
        from: S,
        kind: K,
        outcome: TransitionOutcome<S>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            entity_id: entity_id.into(),
            from,
            kind,
            outcome,
        }
    }

    /// The state the entity is in after this decision.
    pub fn resulting_state(&self) -> &S {
        self.outcome.state().unwrap_or(&self.from)
    }
}
