//! Vote ledger domain: ballot values, stored votes and live tallies.

pub mod entities;
pub mod tally;

pub use entities::{Vote, VoteRecord, VoteValue};
pub use tally::{Tally, participation_rate};
