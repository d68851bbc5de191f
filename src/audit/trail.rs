//! Per-entity trail of applied transitions.
//!
//! Provides immutable tracking of an entity's lifecycle over time,
//! built from audit entries or recorded step by step.

use super::entry::AuditEntry;
use crate::core::{ActionKind, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One applied transition in a trail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TrailStep<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Name of the action kind that caused it
    pub kind: String,
    /// When the transition was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered, immutable record of one entity's applied transitions.
///
/// The `record` method returns a new trail with the step added.
/// Rejected decisions never appear in a trail.
///
/// # Example
///
/// ```rust
/// use verdict::audit::{AuditTrail, TrailStep};
/// use verdict::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Phase {
///         Draft,
///         Review,
///         Published,
///     }
/// }
///
/// let trail = AuditTrail::new()
///     .record(TrailStep {
///         from: Phase::Draft,
///         to: Phase::Review,
///         kind: "Submit".to_string(),
///         timestamp: Utc::now(),
///     })
///     .record(TrailStep {
///         from: Phase::Review,
///         to: Phase::Published,
///         kind: "Publish".to_string(),
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(trail.path(), vec![&Phase::Draft, &Phase::Review, &Phase::Published]);
/// assert_eq!(trail.current(), Some(&Phase::Published));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct AuditTrail<S: State> {
    steps: Vec<TrailStep<S>>,
}

impl<S: State> Default for AuditTrail<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> AuditTrail<S> {
    /// Create a new empty trail.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Build a trail from the applied entries among `entries`, in order.
    pub fn from_entries<'a, K, I>(entries: I) -> Self
    where
        K: ActionKind + 'a,
        S: 'a,
        I: IntoIterator<Item = &'a AuditEntry<S, K>>,
    {
        let steps = entries
            .into_iter()
            .filter_map(|entry| {
                entry.outcome.state().map(|to| TrailStep {
                    from: entry.from.clone(),
                    to: to.clone(),
                    kind: entry.kind.name().to_string(),
                    timestamp: entry.timestamp,
                })
            })
            .collect();

        Self { steps }
    }

    /// Record a step, returning a new trail.
    ///
    /// This does not mutate the existing trail.
    pub fn record(&self, step: TrailStep<S>) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// States traversed: the first source, then each target.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.steps.first() {
            path.push(&first.from);
        }
        for step in &self.steps {
            path.push(&step.to);
        }
        path
    }

    /// The last target state, if anything was recorded.
    pub fn current(&self) -> Option<&S> {
        self.steps.last().map(|step| &step.to)
    }

    /// Elapsed time between the first and last step.
    ///
    /// Returns `None` for an empty trail.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.steps.first(), self.steps.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[TrailStep<S>] {
        &self.steps
    }
}
