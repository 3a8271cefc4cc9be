//! Chamber roster: members, roles and the acting principal.

pub mod entities;

pub use entities::{Member, Principal, Role};
