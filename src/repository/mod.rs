//! Repository Layer
//!
//! Data access abstractions and the in-memory implementation.

mod memory_repo;
mod seed;
mod store;
mod traits;

#[cfg(test)]
mod tests;

pub use memory_repo::MemoryRepository;
pub use seed::{seed_demo, DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD};
pub use store::RecordStore;
pub use traits::{Repository, ScopedRepository};
