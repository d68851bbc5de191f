//! Build errors for rule and table builders.

use crate::table::ConfigError;
use thiserror::Error;

/// Errors that can occur when building rules and tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Rule source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Rule action kind not specified. Call .on(kind)")]
    MissingKind,

    #[error("Rule target state not specified. Call .to(state)")]
    MissingToState,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
