//! Exportable snapshots of a transition table.
//!
//! A manifest records every `(state, kind)` decision of a table so it
//! can be reviewed, stored next to a release and compared against the
//! table a later build compiles. It is an export only; tables are never
//! built from manifests.

use crate::core::{Action, ActionKind, State};
use crate::table::{EntryView, TransitionTable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub mod error;

pub use error::{ManifestDifference, ManifestError};

/// Version identifier for manifest format
pub const MANIFEST_VERSION: u32 = 1;

/// How one pair is decided.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum Decision<S: State> {
    /// Allowed to `target`, behind the guards with these codes (in order).
    Allowed { target: S, guards: Vec<String> },
    Forbidden,
}

impl<S: State> fmt::Display for Decision<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed { target, guards } if guards.is_empty() => {
                write!(f, "allowed to {}", target.name())
            }
            Self::Allowed { target, guards } => {
                write!(f, "allowed to {} [{}]", target.name(), guards.join(", "))
            }
            Self::Forbidden => f.write_str("forbidden"),
        }
    }
}

/// One row of a manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ManifestEntry<S: State, K: ActionKind> {
    pub source: S,
    pub kind: K,
    pub decision: Decision<S>,
}

/// Serializable export of a transition table.
/// Does NOT include guard predicates or message templates (not serializable).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TableManifest<S: State, K: ActionKind> {
    /// Manifest format version
    pub version: u32,

    /// When the manifest was generated
    pub generated_at: DateTime<Utc>,

    /// Every table entry in registration order
    pub entries: Vec<ManifestEntry<S, K>>,
}

impl<S: State, K: ActionKind> TableManifest<S, K> {
    /// Export `table`.
    pub fn from_table<A, Snap>(table: &TransitionTable<S, A, Snap>) -> Self
    where
        A: Action<Kind = K>,
    {
        let entries = table
            .entries()
            .map(|entry| match entry {
                EntryView::Allowed(rule) => ManifestEntry {
                    source: rule.source().clone(),
                    kind: rule.kind(),
                    decision: Decision::Allowed {
                        target: rule.target().clone(),
                        guards: rule.guard_codes(),
                    },
                },
                EntryView::Forbidden { state, kind } => ManifestEntry {
                    source: state.clone(),
                    kind,
                    decision: Decision::Forbidden,
                },
            })
            .collect();

        Self {
            version: MANIFEST_VERSION,
            generated_at: Utc::now(),
            entries,
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ManifestError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from JSON, rejecting unknown versions.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)
            .map_err(|e| ManifestError::DeserializationFailed(e.to_string()))?;
        manifest.check_version()?;
        Ok(manifest)
    }

    /// Serialize to compact binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ManifestError> {
        bincode::serialize(self).map_err(|e| ManifestError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from binary, rejecting unknown versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ManifestError> {
        let manifest: Self = bincode::deserialize(bytes)
            .map_err(|e| ManifestError::DeserializationFailed(e.to_string()))?;
        manifest.check_version()?;
        Ok(manifest)
    }

    fn check_version(&self) -> Result<(), ManifestError> {
        if self.version != MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion {
                found: self.version,
                supported: MANIFEST_VERSION,
            });
        }
        Ok(())
    }

    /// Compare this manifest with a live table.
    ///
    /// Every difference is reported: pairs only the manifest lists, then
    /// pairs whose decision changed, then pairs only the table declares.
    pub fn verify<A, Snap>(&self, table: &TransitionTable<S, A, Snap>) -> Result<(), ManifestError>
    where
        A: Action<Kind = K>,
    {
        self.check_version()?;

        let live = Self::from_table(table);
        let mut live_decisions: HashMap<(&S, K), &Decision<S>> = live
            .entries
            .iter()
            .map(|entry| ((&entry.source, entry.kind), &entry.decision))
            .collect();

        let mut differences = Vec::new();
        for entry in &self.entries {
            let state = entry.source.name().to_string();
            let kind = entry.kind.name().to_string();
            match live_decisions.remove(&(&entry.source, entry.kind)) {
                None => differences.push(ManifestDifference::Missing { state, kind }),
                Some(found) if *found != entry.decision => {
                    differences.push(ManifestDifference::Changed {
                        state,
                        kind,
                        expected: entry.decision.to_string(),
                        found: found.to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        for entry in &live.entries {
            if live_decisions.contains_key(&(&entry.source, entry.kind)) {
                differences.push(ManifestDifference::Unexpected {
                    state: entry.source.name().to_string(),
                    kind: entry.kind.name().to_string(),
                });
            }
        }

        if differences.is_empty() {
            Ok(())
        } else {
            Err(ManifestError::Drift { differences })
        }
    }
}
