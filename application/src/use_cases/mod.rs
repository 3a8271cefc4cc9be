//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod initiative_lifecycle;
pub mod session_lifecycle;
pub mod session_report;
pub(crate) mod shared;
pub mod vote_ledger;
