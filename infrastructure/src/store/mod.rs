//! Chamber store adapters

mod memory;
mod snapshot;
mod state;

pub use memory::InMemoryChamberStore;
