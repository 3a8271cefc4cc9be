//! Domain layer for chamber-vote
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A sitting of the chamber. Sessions move through
//! `prepared | scheduled → active ⇄ paused → closed`, and at most one
//! session is active at a time.
//!
//! ## Initiative
//!
//! An agenda item owned by a session and resolved by one roll call.
//! At most one initiative per session is open; `closed` is terminal.
//!
//! ## Vote / Tally / Resolution
//!
//! One ballot per (initiative, voter), overwritable until closure.
//! Tallies are always rebuilt from the ballots, and
//! [`resolution::compute_result`] turns a tally into a [`VoteOutcome`].

pub mod audit;
pub mod core;
pub mod event;
pub mod initiative;
pub mod member;
pub mod resolution;
pub mod session;
pub mod vote;

// Re-export commonly used types
pub use audit::{AuditKind, EventLogEntry};
pub use core::{
    error::{DomainError, ErrorKind},
    ids::{InitiativeId, MemberId, SessionId},
};
pub use event::{ChamberEvent, Notification};
pub use initiative::{Initiative, InitiativeStatus, NewInitiative};
pub use member::{Member, Principal, Role};
pub use resolution::{MajorityType, VoteOutcome, compute_result};
pub use session::{
    InitiativeSummary, NewSession, OutcomeCounts, Session, SessionKind, SessionReport,
    SessionState,
};
pub use vote::{Tally, Vote, VoteRecord, VoteValue, participation_rate};
