//! Append-only audit trail of lifecycle transitions, queryable per session.

pub mod entities;

pub use entities::{AuditKind, EventLogEntry};
