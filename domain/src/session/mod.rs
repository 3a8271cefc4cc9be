//! Sessions: the sittings of the chamber and their lifecycle.

pub mod entities;
pub mod report;

pub use entities::{NewSession, Session, SessionKind, SessionState};
pub use report::{InitiativeSummary, OutcomeCounts, SessionReport};
