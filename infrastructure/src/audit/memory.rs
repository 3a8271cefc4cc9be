use chamber_application::AuditLog;
use chamber_domain::{EventLogEntry, SessionId};
use std::sync::RwLock;

/// Process-local audit trail
#[derive(Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<EventLogEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, entry: EventLogEntry) {
        if let Ok(mut entries) = self.entries.write() {
            entries.push(entry);
        }
    }

    fn entries(&self, session_id: SessionId) -> Vec<EventLogEntry> {
        self.entries
            .read()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.session_id == session_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
