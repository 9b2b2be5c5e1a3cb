use serde::{Deserialize, Serialize};

use voicelock_voiceprint::Embedding;

/// An enrolled identity with its reference embeddings.
///
/// Created whole at enrollment with the raw per-sample embeddings (never
/// pre-averaged, so best-sample matching stays possible). Mutated only by
/// delete-and-recreate; readers get snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Opaque unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
    /// Reference embeddings, one per enrollment sample, in capture order.
    pub embeddings: Vec<Embedding>,
}
