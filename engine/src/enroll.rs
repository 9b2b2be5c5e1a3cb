//! Multi-sample enrollment.

use voicelock_store::{Profile, ProfileStore};
use voicelock_voiceprint::{Embedding, EmbeddingExtractor};

use crate::error::EngineError;
use crate::recorder::ProcessedClip;

/// Number of valid clips a profile is built from.
pub const SAMPLES_REQUIRED: usize = 3;

/// Collects embeddings for one profile-in-progress.
///
/// Each accepted clip is embedded immediately, so a model that becomes
/// unavailable mid-enrollment only degrades the remaining samples. The
/// collection lives in memory until [`Enrollment::complete`] persists it;
/// dropping the value abandons the enrollment with no stored trace.
#[derive(Default)]
pub struct Enrollment {
    embeddings: Vec<Embedding>,
}

impl Enrollment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clips accepted so far.
    pub fn collected(&self) -> usize {
        self.embeddings.len()
    }

    /// Clips still needed before [`Enrollment::complete`] will succeed.
    pub fn remaining(&self) -> usize {
        SAMPLES_REQUIRED.saturating_sub(self.embeddings.len())
    }

    pub fn is_complete(&self) -> bool {
        self.embeddings.len() >= SAMPLES_REQUIRED
    }

    /// Embeds one conditioned clip and adds it to the collection.
    ///
    /// Clips that failed the quality gate are rejected with
    /// [`EngineError::QualityRejected`]; clips offered after the
    /// collection is full are ignored. Returns the new count.
    pub async fn add_clip(
        &mut self,
        extractor: &EmbeddingExtractor<'_>,
        clip: &ProcessedClip,
    ) -> Result<usize, EngineError> {
        if !clip.report.is_valid() {
            return Err(EngineError::QualityRejected(clip.report.messages()));
        }
        if self.is_complete() {
            tracing::debug!("enrollment already has {SAMPLES_REQUIRED} samples, clip ignored");
            return Ok(self.embeddings.len());
        }

        let embedding = extractor.extract(&clip.samples).await;
        tracing::debug!(
            source = ?embedding.source(),
            sample = self.embeddings.len() + 1,
            "enrollment sample embedded"
        );
        self.embeddings.push(embedding);
        Ok(self.embeddings.len())
    }

    /// Persists the collection as a new profile.
    ///
    /// Requires a non-empty name (after trimming) and a full collection.
    /// On success the enrollment is emptied and can be reused.
    pub fn complete(
        &mut self,
        name: &str,
        profiles: &ProfileStore,
    ) -> Result<Profile, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        if !self.is_complete() {
            return Err(EngineError::EnrollmentIncomplete {
                collected: self.embeddings.len(),
                required: SAMPLES_REQUIRED,
            });
        }

        let profile = Profile {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
            embeddings: std::mem::take(&mut self.embeddings),
        };
        profiles.put(&profile)?;

        tracing::info!(id = profile.id, name = profile.name, "profile enrolled");
        Ok(profile)
    }
}
