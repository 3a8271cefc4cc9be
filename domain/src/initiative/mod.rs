//! Initiatives: agenda items owned by a session, each resolved by one roll call.

pub mod entities;

pub use entities::{Initiative, InitiativeStatus, NewInitiative};
