//! Key-value store interface and implementations.
//!
//! Profiles and sessions are stored as JSON bytes under string keys. The
//! trait keeps the persistence collaborator swappable: [`MemoryStore`]
//! for tests, [`RedbStore`] when records must survive a restart.
//! Durability and crash visibility are the implementation's concern; the
//! pipeline only relies on single-record atomic put/delete.

mod memory;
mod redb;

use std::fmt;
use thiserror::Error;

pub use memory::MemoryStore;
pub use redb::RedbStore;

/// Errors that can occur in KV store operations.
#[derive(Error, Debug)]
pub enum KVError {
    #[error("kv: not found")]
    NotFound,

    #[error("kv: storage error: {0}")]
    Storage(String),
}

/// Result type for KV operations.
pub type KVResult<T> = Result<T, KVError>;

/// Key-value store over string keys and byte values.
pub trait KVStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> KVResult<Option<Vec<u8>>>;

    /// Set a key-value pair, replacing any existing value.
    fn set(&self, key: &str, value: &[u8]) -> KVResult<()>;

    /// Delete a key. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> KVResult<()>;

    /// List all entries whose key starts with `prefix`, sorted by key.
    fn scan(&self, prefix: &str) -> KVResult<Vec<(String, Vec<u8>)>>;

    /// Set multiple entries in one call. Implementations should apply
    /// the batch atomically where the backend allows it.
    fn batch_set(&self, entries: &[(&str, &[u8])]) -> KVResult<()>;

    /// Delete multiple keys in one call.
    fn batch_delete(&self, keys: &[&str]) -> KVResult<()>;
}

impl fmt::Debug for dyn KVStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KVStore {{ ... }}")
    }
}
