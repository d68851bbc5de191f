//! Audit recording for transition decisions.
//!
//! The engine never records anything itself. Hosts that want a durable
//! log of every decision hand an [`AuditRecorder`] to the effectful shell
//! in [`crate::effects`], which writes one [`AuditEntry`] per `apply`.

mod entry;
mod trail;

pub use entry::AuditEntry;
pub use trail::{AuditTrail, TrailStep};

use crate::core::{ActionKind, State};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors raised by audit sinks.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Audit sink unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to encode audit entry: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Failed to write audit entry: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for audit entries.
pub trait AuditRecorder<S: State, K: ActionKind>: Send + Sync {
    fn record(&self, entry: AuditEntry<S, K>) -> Result<(), AuditError>;
}

impl<S, K, R> AuditRecorder<S, K> for Arc<R>
where
    S: State,
    K: ActionKind,
    R: AuditRecorder<S, K> + ?Sized,
{
    fn record(&self, entry: AuditEntry<S, K>) -> Result<(), AuditError> {
        (**self).record(entry)
    }
}

/// Recorder that keeps entries in memory. Clones share the same log.
#[derive(Debug)]
pub struct InMemoryAuditLog<S: State, K: ActionKind> {
    entries: Arc<Mutex<Vec<AuditEntry<S, K>>>>,
}

impl<S: State, K: ActionKind> Clone for InMemoryAuditLog<S, K> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<S: State, K: ActionKind> Default for InMemoryAuditLog<S, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, K: ActionKind> InMemoryAuditLog<S, K> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AuditEntry<S, K>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of every entry, oldest first.
    pub fn entries(&self) -> Vec<AuditEntry<S, K>> {
        self.lock().clone()
    }

    /// Entries recorded for one entity, oldest first.
    pub fn for_entity(&self, entity_id: &str) -> Vec<AuditEntry<S, K>> {
        self.lock()
            .iter()
            .filter(|entry| entry.entity_id == entity_id)
            .cloned()
            .collect()
    }

    /// Applied transitions of one entity as a trail.
    pub fn trail(&self, entity_id: &str) -> AuditTrail<S> {
        AuditTrail::from_entries(&self.for_entity(entity_id))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<S: State, K: ActionKind> AuditRecorder<S, K> for InMemoryAuditLog<S, K> {
    fn record(&self, entry: AuditEntry<S, K>) -> Result<(), AuditError> {
        self.lock().push(entry);
        Ok(())
    }
}

/// Recorder that writes each entry as one JSON line.
pub struct JsonLinesRecorder<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> Result<W, AuditError> {
        self.writer
            .into_inner()
            .map_err(|_| AuditError::Unavailable("writer lock poisoned".to_string()))
    }
}

impl<S, K, W> AuditRecorder<S, K> for JsonLinesRecorder<W>
where
    S: State,
    K: ActionKind,
    W: Write + Send,
{
    fn record(&self, entry: AuditEntry<S, K>) -> Result<(), AuditError> {
        let line = serde_json::to_string(&entry)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| AuditError::Unavailable("writer lock poisoned".to_string()))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransitionOutcome;
    use crate::{action_enum, state_enum};

    state_enum! {
        enum Lock {
            Locked,
            Unlocked,
        }
    }

    action_enum! {
        #[allow(dead_code)]
        enum LockAction => LockKind {
            Unlock,
            Lock,
        }
    }

    fn unlocked(entity: &str) -> AuditEntry<Lock, LockKind> {
        AuditEntry::new(
            entity,
            Lock::Locked,
            LockKind::Unlock,
            TransitionOutcome::applied(Lock::Unlocked, "unlocked"),
        )
    }

    #[test]
    fn clones_share_one_log() {
        let log = InMemoryAuditLog::new();
        let handle = log.clone();

        handle.record(unlocked("door-1")).unwrap();
        handle.record(unlocked("door-2")).unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.for_entity("door-2").len(), 1);
    }

    #[test]
    fn trail_is_built_per_entity() {
        let log = InMemoryAuditLog::new();
        log.record(unlocked("door-1")).unwrap();
        log.record(AuditEntry::new(
            "door-1",
            Lock::Unlocked,
            LockKind::Lock,
            TransitionOutcome::applied(Lock::Locked, "locked"),
        ))
        .unwrap();
        log.record(unlocked("door-2")).unwrap();

        let trail = log.trail("door-1");
        assert_eq!(trail.path(), vec![&Lock::Locked, &Lock::Unlocked, &Lock::Locked]);
    }

    #[test]
    fn json_lines_writes_one_line_per_entry() {
        let recorder = JsonLinesRecorder::new(Vec::new());

        AuditRecorder::<Lock, LockKind>::record(&recorder, unlocked("door-1")).unwrap();
        AuditRecorder::<Lock, LockKind>::record(&recorder, unlocked("door-1")).unwrap();

        let bytes = recorder.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        let first: AuditEntry<Lock, LockKind> = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.entity_id, "door-1");
    }

    #[test]
    fn shared_recorder_forwards() {
        let log: InMemoryAuditLog<Lock, LockKind> = InMemoryAuditLog::new();
        let shared = Arc::new(log.clone());

        shared.record(unlocked("door-3")).unwrap();

        assert_eq!(log.len(), 1);
    }
}
