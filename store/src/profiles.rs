//! Typed profile facade over the KV collaborator.

use std::sync::Arc;

use crate::kv::KVStore;
use crate::{Profile, StoreError};

/// Key prefix for profile records.
const PROFILE_PREFIX: &str = "profile:";

/// Owns profile create/read/delete over a byte-oriented [`KVStore`].
///
/// Records are JSON under `profile:{id}`. Enumeration order is the key
/// order, i.e. ascending by id; the matcher relies on this as the fixed
/// tie-breaking order.
#[derive(Clone)]
pub struct ProfileStore {
    kv: Arc<dyn KVStore>,
}

impl ProfileStore {
    /// Wraps a KV store.
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// Stores a profile, replacing any record with the same id.
    pub fn put(&self, profile: &Profile) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(profile)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.kv.set(&profile_key(&profile.id), &bytes)?;
        Ok(())
    }

    /// Reads one profile by id.
    pub fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        match self.kv.get(&profile_key(id))? {
            Some(bytes) => {
                let profile = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    /// Reads all profiles, ascending by id.
    pub fn get_all(&self) -> Result<Vec<Profile>, StoreError> {
        let entries = self.kv.scan(PROFILE_PREFIX)?;
        let mut profiles = Vec::with_capacity(entries.len());
        for (key, bytes) in entries {
            let profile: Profile = serde_json::from_slice(&bytes).map_err(|e| {
                StoreError::Serialization(format!("record {key}: {e}"))
            })?;
            profiles.push(profile);
        }
        Ok(profiles)
    }

    /// Deletes one profile. Deleting an absent id is not an error.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.kv.delete(&profile_key(id))?;
        Ok(())
    }

    /// Deletes every profile record.
    pub fn clear(&self) -> Result<(), StoreError> {
        let entries = self.kv.scan(PROFILE_PREFIX)?;
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        self.kv.batch_delete(&keys)?;
        Ok(())
    }

    /// Number of stored profiles.
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.kv.scan(PROFILE_PREFIX)?.len())
    }

    pub(crate) fn kv(&self) -> &Arc<dyn KVStore> {
        &self.kv
    }
}

fn profile_key(id: &str) -> String {
    format!("{PROFILE_PREFIX}{id}")
}
