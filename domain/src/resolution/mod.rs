//! Majority resolution
//!
//! Turns a closed initiative's tally into a [`VoteOutcome`].
//!
//! ```text
//! MajorityType ─┐
//! Tally ────────┼──► compute_result ──► VoteOutcome
//! eligible ─────┘
//! ```
//!
//! The thresholds are asymmetric: qualified majority is measured against the
//! whole eligible roll, the other types against the votes actually cast.

pub mod engine;
pub mod outcome;
pub mod rule;

pub use engine::compute_result;
pub use outcome::VoteOutcome;
pub use rule::MajorityType;
