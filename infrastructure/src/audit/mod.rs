//! Audit trail adapters.
//!
//! [`InMemoryAuditLog`] keeps entries for the lifetime of the process;
//! [`JsonlAuditLog`] appends one JSON line per entry so the trail survives
//! restarts. Both implement the [`AuditLog`](chamber_application::AuditLog) port.

mod jsonl;
mod memory;

pub use jsonl::JsonlAuditLog;
pub use memory::InMemoryAuditLog;
