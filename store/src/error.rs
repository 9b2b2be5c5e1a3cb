use thiserror::Error;

use crate::kv::KVError;

/// Errors returned by the typed profile layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Kv(#[from] KVError),

    #[error("store: serialization error: {0}")]
    Serialization(String),

    #[error("store: import failed: {0}")]
    ImportParse(String),
}
