//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: session, initiative and member identifiers
//! - [`error::DomainError`]: domain-level errors and their [`error::ErrorKind`]

pub mod error;
pub mod ids;
