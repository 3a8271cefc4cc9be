//! Domain error types

use crate::core::ids::{InitiativeId, MemberId, SessionId};
use crate::member::Role;
use crate::session::SessionState;
use thiserror::Error;

/// Category an error belongs to, as surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input (bad vote value, blank field)
    Validation,
    /// Session, initiative or member absent
    NotFound,
    /// Transition not allowed from the current state
    StateConflict,
    /// Actor role insufficient
    Permission,
    /// Voter is not an active legislator
    NotEligible,
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::StateConflict => "state_conflict",
            ErrorKind::Permission => "permission",
            ErrorKind::NotEligible => "not_eligible",
        }
    }
}

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid vote value '{0}' (expected favor, against or abstain)")]
    InvalidVoteValue(String),

    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    #[error("Initiative {0} not found")]
    InitiativeNotFound(InitiativeId),

    #[error("Member {0} not found")]
    MemberNotFound(MemberId),

    #[error("Session code '{0}' is already in use")]
    CodeAlreadyExists(String),

    #[error("Session {0} is already active")]
    SessionAlreadyActive(SessionId),

    #[error("Session {0} is already closed")]
    SessionAlreadyClosed(SessionId),

    #[error("Session {id} is {actual}, expected {expected}")]
    UnexpectedSessionState {
        id: SessionId,
        actual: SessionState,
        expected: SessionState,
    },

    #[error("Session {0} is not active")]
    SessionNotActive(SessionId),

    #[error("Session {session} still has {count} open initiative(s)")]
    OpenInitiativesRemain { session: SessionId, count: usize },

    #[error("Initiative {0} is already open")]
    InitiativeAlreadyOpen(InitiativeId),

    #[error("Initiative {0} is already closed")]
    InitiativeAlreadyClosed(InitiativeId),

    #[error("Initiative {0} is not open for voting")]
    InitiativeNotOpen(InitiativeId),

    #[error("Member {actor} requires the {required} role for this operation")]
    PermissionDenied { actor: MemberId, required: Role },

    #[error("Member {0} is not an active legislator")]
    NotEligible(MemberId),
}

impl DomainError {
    /// Map this error onto the caller-facing taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) | DomainError::InvalidVoteValue(_) => ErrorKind::Validation,
            DomainError::SessionNotFound(_)
            | DomainError::InitiativeNotFound(_)
            | DomainError::MemberNotFound(_) => ErrorKind::NotFound,
            DomainError::CodeAlreadyExists(_)
            | DomainError::SessionAlreadyActive(_)
            | DomainError::SessionAlreadyClosed(_)
            | DomainError::UnexpectedSessionState { .. }
            | DomainError::SessionNotActive(_)
            | DomainError::OpenInitiativesRemain { .. }
            | DomainError::InitiativeAlreadyOpen(_)
            | DomainError::InitiativeAlreadyClosed(_)
            | DomainError::InitiativeNotOpen(_) => ErrorKind::StateConflict,
            DomainError::PermissionDenied { .. } => ErrorKind::Permission,
            DomainError::NotEligible(_) => ErrorKind::NotEligible,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}
