//! Construction-time errors for transition tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A `(state, kind)` combination with no entry in the table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissingPair {
    pub state: String,
    pub kind: String,
}

impl MissingPair {
    pub fn new(state: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for MissingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.state, self.kind)
    }
}

/// Errors raised while building a table. All are fatal: an engine is
/// never constructed from a table that produced one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Duplicate rule for ({state}, {kind}). Each pair may be registered once")]
    DuplicateRule { state: String, kind: String },

    #[error("Transition table is incomplete. Missing {}: {}", .missing.len(), list(.missing))]
    IncompleteTable { missing: Vec<MissingPair> },

    #[error("Final state {state} cannot allow {kind} (to {target}). Forbid it instead")]
    RuleFromFinalState {
        state: String,
        kind: String,
        target: String,
    },
}

impl ConfigError {
    /// The missing pairs, if this is an incomplete-table error.
    pub fn missing_pairs(&self) -> &[MissingPair] {
        match self {
            Self::IncompleteTable { missing } => missing,
            Self::DuplicateRule { .. } | Self::RuleFromFinalState { .. } => &[],
        }
    }
}

fn list(missing: &[MissingPair]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_table_lists_every_pair() {
        let err = ConfigError::IncompleteTable {
            missing: vec![
                MissingPair::new("Deactivated", "Close"),
                MissingPair::new("Closed", "Approve"),
            ],
        };

        assert_eq!(
            err.to_string(),
            "Transition table is incomplete. Missing 2: (Deactivated, Close), (Closed, Approve)"
        );
        assert_eq!(err.missing_pairs().len(), 2);
    }

    #[test]
    fn duplicate_rule_names_the_pair() {
        let err = ConfigError::DuplicateRule {
            state: "Active".to_string(),
            kind: "Suspend".to_string(),
        };

        assert!(err.to_string().contains("(Active, Suspend)"));
        assert!(err.missing_pairs().is_empty());
    }

    #[test]
    fn rule_from_final_state_names_the_edge() {
        let err = ConfigError::RuleFromFinalState {
            state: "Closed".to_string(),
            kind: "Reactivate".to_string(),
            target: "Active".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Final state Closed cannot allow Reactivate (to Active). Forbid it instead"
        );
        assert!(err.missing_pairs().is_empty());
    }
}
