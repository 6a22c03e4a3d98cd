//! Platform abstraction layer
//!
//! Handles browser/native differences for storage (LocalStorage on web,
//! in-memory elsewhere).

pub mod storage;

pub use storage::{KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
