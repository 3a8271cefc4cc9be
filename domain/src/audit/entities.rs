//! Audit trail entries

use crate::core::ids::{MemberId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle transition recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditKind {
    SessionCreated,
    SessionActivated,
    SessionPaused,
    SessionResumed,
    SessionClosed,
    InitiativesCreated,
    InitiativeOpened,
    InitiativeClosed,
    VoteRemoved,
}

impl AuditKind {
    pub fn as_str(&self) -> &str {
        match self {
            AuditKind::SessionCreated => "session-created",
            AuditKind::SessionActivated => "session-activated",
            AuditKind::SessionPaused => "session-paused",
            AuditKind::SessionResumed => "session-resumed",
            AuditKind::SessionClosed => "session-closed",
            AuditKind::InitiativesCreated => "initiatives-created",
            AuditKind::InitiativeOpened => "initiative-opened",
            AuditKind::InitiativeClosed => "initiative-closed",
            AuditKind::VoteRemoved => "vote-removed",
        }
    }
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One append-only audit record; never mutated once written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub session_id: SessionId,
    pub kind: AuditKind,
    pub description: String,
    pub actor_id: MemberId,
    pub timestamp: DateTime<Utc>,
}

impl EventLogEntry {
    pub fn new(
        session_id: SessionId,
        kind: AuditKind,
        description: impl Into<String>,
        actor_id: impl Into<MemberId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            kind,
            description: description.into(),
            actor_id: actor_id.into(),
            timestamp,
        }
    }
}
