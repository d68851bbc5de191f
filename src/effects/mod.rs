//! Effectful shell around the pure engine using Stillwater 0.11.0.
//!
//! The engine decides; this module records. Audit writes are the only
//! side effect in the crate and they live here, behind an `Effect`
//! whose environment supplies the [`AuditRecorder`](crate::audit::AuditRecorder).
//!
//! Following Stillwater 0.11.0 conventions:
//! - Functions return `impl Effect` for zero-cost composition
//! - Use free-standing constructors: `fail()`, `from_fn()`

mod audited;

pub use audited::{apply_audited, AuditedApplyError};
