//! Application layer for chamber-vote
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.
//!
//! # Flow
//!
//! ```text
//! SessionLifecycleUseCase::activate
//!        ↓
//! InitiativeLifecycleUseCase::open
//!        ↓
//! VoteLedgerUseCase::cast (repeat, overwrite allowed)
//!        ↓
//! InitiativeLifecycleUseCase::close  → tally + resolution, persisted
//!        ↓
//! SessionLifecycleUseCase::close     → refused while an initiative is open
//! ```

pub mod error;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use error::ChamberError;
pub use ports::{
    audit_log::{AuditLog, NoAuditLog},
    chamber_store::{ChamberStore, InitiativeOpening, SessionActivation, StoreError, VoteRemoval},
    notification_bus::{CompositeNotificationBus, NoNotifications, NotificationBus},
};
pub use use_cases::initiative_lifecycle::InitiativeLifecycleUseCase;
pub use use_cases::session_lifecycle::SessionLifecycleUseCase;
pub use use_cases::session_report::SessionReportUseCase;
pub use use_cases::vote_ledger::VoteLedgerUseCase;
