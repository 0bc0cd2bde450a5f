//! Client-side Persistence
//!
//! Small string key-value stores standing in for the browser's tab-scoped
//! and durable storage. Nothing here takes part in authentication; the
//! service re-checks the phrase on every write.

mod file;
mod memory;
mod theme;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use theme::{Theme, THEME_KEY};

use thiserror::Error;

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// Errors that can occur reading or writing a store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
