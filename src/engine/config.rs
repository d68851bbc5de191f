//! Engine configuration.
//!
//! Nothing here changes which transitions are legal; the table alone
//! decides that. These knobs cover diagnostics and fault handling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Level at which rejected transitions are logged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionLogLevel {
    Off,
    #[default]
    Debug,
    Info,
    Warn,
}

/// What the audited shell does when the recorder fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditFailurePolicy {
    /// Return the recorder's error to the caller.
    #[default]
    Propagate,
    /// Log a warning and return the outcome anyway.
    LogAndContinue,
}

/// Runtime settings for a `TransitionEngine`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Where `Rejected` outcomes are logged.
    pub rejection_log_level: RejectionLogLevel,

    /// Report panicking guards as `GuardExecutionError` instead of unwinding.
    pub capture_guard_panics: bool,

    /// Recorder failure handling in `effects::apply_audited`.
    pub audit_failure: AuditFailurePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rejection_log_level: RejectionLogLevel::Debug,
            capture_guard_panics: true,
            audit_failure: AuditFailurePolicy::Propagate,
        }
    }
}

/// Errors loading an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Invalid engine configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl EngineConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_rejection_log_level(mut self, level: RejectionLogLevel) -> Self {
        self.rejection_log_level = level;
        self
    }

    pub fn with_capture_guard_panics(mut self, capture: bool) -> Self {
        self.capture_guard_panics = capture;
        self
    }

    pub fn with_audit_failure(mut self, policy: AuditFailurePolicy) -> Self {
        self.audit_failure = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.capture_guard_panics);
    }

    #[test]
    fn fields_override_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{"rejection_log_level": "warn", "audit_failure": "log_and_continue"}"#,
        )
        .unwrap();

        assert_eq!(config.rejection_log_level, RejectionLogLevel::Warn);
        assert_eq!(config.audit_failure, AuditFailurePolicy::LogAndContinue);
        assert!(config.capture_guard_panics);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = EngineConfig::from_json_str(r#"{"strict": true}"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid engine configuration"));
    }

    #[test]
    fn builder_methods_set_fields() {
        let config = EngineConfig::default()
            .with_rejection_log_level(RejectionLogLevel::Off)
            .with_capture_guard_panics(false)
            .with_audit_failure(AuditFailurePolicy::LogAndContinue);

        assert_eq!(config.rejection_log_level, RejectionLogLevel::Off);
        assert!(!config.capture_guard_panics);
        assert_eq!(config.audit_failure, AuditFailurePolicy::LogAndContinue);
    }
}
