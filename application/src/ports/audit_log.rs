//! Port for the append-only audit trail.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port keeps the per-session history
//! of lifecycle transitions for display and review.
//!
//! `append` is intentionally synchronous and non-fallible. The transition has
//! already been persisted when it is called, so a failing adapter logs the
//! problem instead of unwinding the caller.

use chamber_domain::{EventLogEntry, SessionId};

/// Append-only audit trail
pub trait AuditLog: Send + Sync {
    /// Record an entry; entries are never mutated or deleted.
    fn append(&self, entry: EventLogEntry);

    /// Entries of one session, in append order.
    fn entries(&self, session_id: SessionId) -> Vec<EventLogEntry>;
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLog;

impl AuditLog for NoAuditLog {
    fn append(&self, _entry: EventLogEntry) {}

    fn entries(&self, _session_id: SessionId) -> Vec<EventLogEntry> {
        Vec::new()
    }
}
