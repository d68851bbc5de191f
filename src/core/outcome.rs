//! The value returned by one `apply` call.

use serde::{Deserialize, Serialize};

/// Reason code for an action that has no allowed rule from the current state.
pub const ILLEGAL_TRANSITION: &str = "ILLEGAL_TRANSITION";

/// Result of applying one action to one state.
///
/// Rejections are ordinary values: an illegal action is a routine
/// business occurrence, not a fault. Outcomes serialize as a tagged
/// object so they can be handed to an audit sink or a response
/// serializer unchanged.
///
/// ```rust
/// use verdict::core::TransitionOutcome;
///
/// let outcome: TransitionOutcome<String> = TransitionOutcome::rejected("LIMIT", "Over limit");
/// let json = serde_json::to_value(&outcome).unwrap();
/// assert_eq!(json["outcome"], "rejected");
/// assert_eq!(json["code"], "LIMIT");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome<S> {
    /// The action was accepted; `state` is the new current state.
    Applied { state: S, message: String },
    /// The action was refused; the entity keeps its state.
    Rejected { code: String, message: String },
}

impl<S> TransitionOutcome<S> {
    pub fn applied(state: S, message: impl Into<String>) -> Self {
        Self::Applied {
            state,
            message: message.into(),
        }
    }

    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: code.into(),
            message: message.into(),
        }
    }

    /// `ILLEGAL_TRANSITION` rejection worded as "<state> cannot accept <kind>".
    pub fn illegal(state: &str, kind: &str) -> Self {
        Self::rejected(ILLEGAL_TRANSITION, format!("{state} cannot accept {kind}"))
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// The new state, if the action was applied.
    pub fn state(&self) -> Option<&S> {
        match self {
            Self::Applied { state, .. } => Some(state),
            Self::Rejected { .. } => None,
        }
    }

    /// The reason code, if the action was rejected.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Applied { .. } => None,
            Self::Rejected { code, .. } => Some(code),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Applied { message, .. } | Self::Rejected { message, .. } => message,
        }
    }

    /// The state the entity is in after this outcome.
    pub fn resulting_state<'a>(&'a self, current: &'a S) -> &'a S {
        self.state().unwrap_or(current)
    }
}
