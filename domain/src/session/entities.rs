//! Session domain entities

use crate::core::error::DomainError;
use crate::core::ids::{MemberId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a session
///
/// ```text
/// prepared ──┐
///            ├──► active ◄──► paused
/// scheduled ─┘      │           │
///                   └──► closed ◄┘
/// ```
///
/// `closed` is terminal. At most one session is `active` at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Prepared,
    Scheduled,
    Active,
    Paused,
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &str {
        match self {
            SessionState::Prepared => "prepared",
            SessionState::Scheduled => "scheduled",
            SessionState::Active => "active",
            SessionState::Paused => "paused",
            SessionState::Closed => "closed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of sitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    #[default]
    Ordinary,
    Extraordinary,
    Solemn,
}

impl SessionKind {
    pub fn as_str(&self) -> &str {
        match self {
            SessionKind::Ordinary => "ordinary",
            SessionKind::Extraordinary => "extraordinary",
            SessionKind::Solemn => "solemn",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ordinary" => Ok(SessionKind::Ordinary),
            "extraordinary" => Ok(SessionKind::Extraordinary),
            "solemn" => Ok(SessionKind::Solemn),
            other => Err(format!(
                "Unknown session kind: {}. Valid: ordinary, extraordinary, solemn",
                other
            )),
        }
    }
}

/// Session metadata supplied by document ingestion or manual entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    pub code: String,
    pub name: String,
    pub kind: SessionKind,
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl NewSession {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            kind: SessionKind::default(),
            description: None,
            scheduled_at: None,
        }
    }

    pub fn with_kind(mut self, kind: SessionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn scheduled_for(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_at = Some(at);
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.code.trim().is_empty() {
            return Err(DomainError::validation("session code cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("session name cannot be empty"));
        }
        Ok(())
    }
}

/// A sitting of the chamber, owning an ordered agenda of initiatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Unique and immutable once created
    pub code: String,
    pub name: String,
    pub kind: SessionKind,
    pub description: Option<String>,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub started_by: Option<MemberId>,
    pub closed_by: Option<MemberId>,
}

impl Session {
    /// Build a session; it starts `scheduled` when a date was supplied
    pub fn create(id: SessionId, new: NewSession, now: DateTime<Utc>) -> Self {
        let state = if new.scheduled_at.is_some() {
            SessionState::Scheduled
        } else {
            SessionState::Prepared
        };

        Self {
            id,
            code: new.code.trim().to_string(),
            name: new.name.trim().to_string(),
            kind: new.kind,
            description: new.description,
            state,
            created_at: now,
            scheduled_at: new.scheduled_at,
            started_at: None,
            closed_at: None,
            started_by: None,
            closed_by: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Make this the active session.
    ///
    /// The caller is responsible for suspending whichever session was active.
    pub fn activate(&mut self, actor: &MemberId, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.state {
            SessionState::Closed => Err(DomainError::SessionAlreadyClosed(self.id)),
            SessionState::Active => Err(DomainError::SessionAlreadyActive(self.id)),
            SessionState::Prepared | SessionState::Scheduled | SessionState::Paused => {
                self.state = SessionState::Active;
                self.started_by = Some(actor.clone());
                self.started_at.get_or_insert(now);
                Ok(())
            }
        }
    }

    /// Return a paused session to active
    pub fn resume(&mut self) -> Result<(), DomainError> {
        self.expect_state(SessionState::Paused)?;
        self.state = SessionState::Active;
        Ok(())
    }

    /// Operator-driven interruption of the active session
    pub fn pause(&mut self) -> Result<(), DomainError> {
        self.expect_state(SessionState::Active)?;
        self.state = SessionState::Paused;
        Ok(())
    }

    /// Drop the active designation because another session took it
    pub fn suspend(&mut self) {
        if self.state == SessionState::Active {
            self.state = SessionState::Paused;
        }
    }

    /// Close for good; refused while any owned initiative is open
    pub fn close(
        &mut self,
        actor: &MemberId,
        now: DateTime<Utc>,
        open_initiatives: usize,
    ) -> Result<(), DomainError> {
        if self.is_closed() {
            return Err(DomainError::SessionAlreadyClosed(self.id));
        }
        if open_initiatives > 0 {
            return Err(DomainError::OpenInitiativesRemain {
                session: self.id,
                count: open_initiatives,
            });
        }

        self.state = SessionState::Closed;
        self.closed_at = Some(now);
        self.closed_by = Some(actor.clone());
        Ok(())
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), DomainError> {
        if self.state == expected {
            return Ok(());
        }
        if self.is_closed() {
            return Err(DomainError::SessionAlreadyClosed(self.id));
        }
        Err(DomainError::UnexpectedSessionState {
            id: self.id,
            actual: self.state,
            expected,
        })
    }
}
