//! Profile persistence for the voice pipeline.
//!
//! Storage is layered: a byte-oriented [`KVStore`] trait with an
//! in-memory implementation for testing and a redb-backed one for
//! durability, and a typed [`ProfileStore`] facade on top that owns
//! profile create/read/delete and the JSON export/import format.

pub mod export;
pub mod kv;
mod error;
mod profile;
mod profiles;

pub use error::StoreError;
pub use kv::{KVError, KVResult, KVStore, MemoryStore, RedbStore};
pub use profile::Profile;
pub use profiles::ProfileStore;
