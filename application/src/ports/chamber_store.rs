//! Chamber store port
//!
//! Persistence contract for the roster, sessions, initiatives and votes.
//!
//! # Atomicity
//!
//! Every mutating method is a single check-then-write: the adapter validates
//! the transition and applies it as one unit, so two concurrent callers can
//! never both pass a uniqueness check (one active session, one open
//! initiative per session, one vote per voter per initiative). On error no
//! part of the write is observable.

use async_trait::async_trait;
use chamber_domain::{
    DomainError, Initiative, InitiativeId, Member, MemberId, NewInitiative, NewSession, Session,
    SessionId, Tally, Vote,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors reported by a [`ChamberStore`] adapter
#[derive(Error, Debug)]
pub enum StoreError {
    /// The transition was refused; nothing was written
    #[error(transparent)]
    Rejected(#[from] DomainError),

    /// The backend failed; nothing was written
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Outcome of [`ChamberStore::activate_session`] and [`ChamberStore::resume_session`]
#[derive(Debug, Clone)]
pub struct SessionActivation {
    pub session: Session,
    /// Sessions that lost the active designation in the same write
    pub suspended: Vec<Session>,
}

/// Outcome of [`ChamberStore::open_initiative`]
#[derive(Debug, Clone)]
pub struct InitiativeOpening {
    pub initiative: Initiative,
    /// Initiatives of the same session closed (and resolved) in the same write
    pub demoted: Vec<Initiative>,
}

/// Outcome of [`ChamberStore::delete_vote`]
#[derive(Debug, Clone)]
pub struct VoteRemoval {
    pub initiative: Initiative,
    pub existed: bool,
    /// Live tally after the deletion
    pub tally: Tally,
}

/// Backing store for the chamber
#[async_trait]
pub trait ChamberStore: Send + Sync {
    // ==================== Roster ====================

    /// Insert or replace a roster entry
    async fn upsert_member(&self, member: Member) -> Result<(), StoreError>;

    async fn find_member(&self, id: &MemberId) -> Result<Option<Member>, StoreError>;

    async fn list_members(&self) -> Result<Vec<Member>, StoreError>;

    /// Active legislators right now
    async fn count_eligible_voters(&self) -> Result<u32, StoreError>;

    // ==================== Sessions ====================

    /// Insert a session; fails `CodeAlreadyExists` when the code is taken
    async fn insert_session(
        &self,
        new: NewSession,
        now: DateTime<Utc>,
    ) -> Result<Session, StoreError>;

    async fn find_session(&self, id: SessionId) -> Result<Option<Session>, StoreError>;

    async fn list_sessions(&self) -> Result<Vec<Session>, StoreError>;

    async fn find_active_session(&self) -> Result<Option<Session>, StoreError>;

    /// Make `id` the only active session, suspending the previous one
    async fn activate_session(
        &self,
        id: SessionId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<SessionActivation, StoreError>;

    /// Paused → active, suspending any other active session
    async fn resume_session(&self, id: SessionId) -> Result<SessionActivation, StoreError>;

    /// Active → paused
    async fn pause_session(&self, id: SessionId) -> Result<Session, StoreError>;

    /// Close; fails `OpenInitiativesRemain` while an owned initiative is open
    async fn close_session(
        &self,
        id: SessionId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<Session, StoreError>;

    // ==================== Initiatives ====================

    /// Append items to the session's agenda with sequential ordinals
    async fn insert_initiatives(
        &self,
        session_id: SessionId,
        items: Vec<NewInitiative>,
    ) -> Result<Vec<Initiative>, StoreError>;

    async fn find_initiative(&self, id: InitiativeId) -> Result<Option<Initiative>, StoreError>;

    /// Initiatives of a session in ordinal order
    async fn list_initiatives(&self, session_id: SessionId)
    -> Result<Vec<Initiative>, StoreError>;

    /// Open `id`, closing any other open initiative of its session first
    async fn open_initiative(
        &self,
        id: InitiativeId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<InitiativeOpening, StoreError>;

    /// Tally the ledger, resolve against the live eligible count, and close
    async fn close_initiative(
        &self,
        id: InitiativeId,
        actor: &MemberId,
        now: DateTime<Utc>,
    ) -> Result<Initiative, StoreError>;

    // ==================== Votes ====================

    /// Upsert keyed by (initiative, voter); fails unless the initiative is open.
    /// Returns the live tally after the write.
    async fn upsert_vote(&self, vote: Vote) -> Result<Tally, StoreError>;

    /// Delete a ballot while the initiative is open
    async fn delete_vote(
        &self,
        initiative_id: InitiativeId,
        voter_id: &MemberId,
    ) -> Result<VoteRemoval, StoreError>;

    /// Ballots of an initiative, newest first
    async fn list_votes(&self, initiative_id: InitiativeId) -> Result<Vec<Vote>, StoreError>;

    /// Live aggregation of the ledger
    async fn tally(&self, initiative_id: InitiativeId) -> Result<Tally, StoreError>;
}
