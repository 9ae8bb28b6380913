//! Process-local store used when no database URL is configured.

mod in_memory_store;

pub use in_memory_store::InMemoryStore;
