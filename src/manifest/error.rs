//! Manifest error types.

use std::fmt;
use thiserror::Error;

/// One disagreement between an approved manifest and a live table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestDifference {
    /// The manifest lists a pair the table does not declare.
    Missing { state: String, kind: String },
    /// The table declares a pair the manifest does not list.
    Unexpected { state: String, kind: String },
    /// Both declare the pair but decide it differently.
    Changed {
        state: String,
        kind: String,
        expected: String,
        found: String,
    },
}

impl fmt::Display for ManifestDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { state, kind } => write!(f, "({state}, {kind}) missing from table"),
            Self::Unexpected { state, kind } => write!(f, "({state}, {kind}) not in manifest"),
            Self::Changed {
                state,
                kind,
                expected,
                found,
            } => write!(f, "({state}, {kind}) expected {expected}, found {found}"),
        }
    }
}

/// Errors that can occur during manifest operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Manifest version is not supported by this version
    #[error("Unsupported manifest version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The live table no longer matches the manifest
    #[error("Table drifted from manifest: {}", describe(.differences))]
    Drift { differences: Vec<ManifestDifference> },
}

fn describe(differences: &[ManifestDifference]) -> String {
    differences
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
