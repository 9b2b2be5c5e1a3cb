//! Profile backup interchange format.
//!
//! A backup is a JSON array of profile objects; each embedding is a plain
//! array of 512 numbers. The format carries no extraction-path tag, so
//! imported embeddings are tagged as neural-path. Import is atomic:
//! malformed input fails the whole operation with one error and nothing
//! is written.

use serde::{Deserialize, Serialize};

use voicelock_voiceprint::{Embedding, EmbeddingSource, EMBEDDING_DIM};

use crate::{Profile, ProfileStore, StoreError};

/// Wire form of a profile in a backup file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportProfile {
    id: String,
    name: String,
    created_at: i64,
    embeddings: Vec<Vec<f32>>,
}

impl From<&Profile> for ExportProfile {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            created_at: profile.created_at,
            embeddings: profile
                .embeddings
                .iter()
                .map(|e| e.values().to_vec())
                .collect(),
        }
    }
}

impl ProfileStore {
    /// Serializes every stored profile to the interchange format.
    pub fn export_json(&self) -> Result<String, StoreError> {
        let profiles = self.get_all()?;
        let wire: Vec<ExportProfile> = profiles.iter().map(ExportProfile::from).collect();
        serde_json::to_string(&wire).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Imports profiles from the interchange format.
    ///
    /// The whole file is parsed and validated before anything is stored;
    /// any malformed entry aborts the import with [`StoreError::ImportParse`]
    /// and no partial writes. Returns the number of imported profiles.
    pub fn import_json(&self, json: &str) -> Result<usize, StoreError> {
        let wire: Vec<ExportProfile> =
            serde_json::from_str(json).map_err(|e| StoreError::ImportParse(e.to_string()))?;

        let mut profiles = Vec::with_capacity(wire.len());
        for entry in wire {
            let mut embeddings = Vec::with_capacity(entry.embeddings.len());
            for vector in entry.embeddings {
                if vector.len() != EMBEDDING_DIM {
                    return Err(StoreError::ImportParse(format!(
                        "profile {}: embedding has {} values, expected {}",
                        entry.id,
                        vector.len(),
                        EMBEDDING_DIM
                    )));
                }
                embeddings.push(Embedding::new(vector, EmbeddingSource::Neural));
            }
            profiles.push(Profile {
                id: entry.id,
                name: entry.name,
                created_at: entry.created_at,
                embeddings,
            });
        }

        let records: Vec<(String, Vec<u8>)> = profiles
            .iter()
            .map(|p| {
                serde_json::to_vec(p)
                    .map(|bytes| (format!("profile:{}", p.id), bytes))
                    .map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect::<Result<_, _>>()?;

        let entries: Vec<(&str, &[u8])> = records
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect();
        self.kv().batch_set(&entries)?;
        tracing::info!(count = profiles.len(), "profiles imported");
        Ok(profiles.len())
    }
}
