//! Matching a live embedding against the enrolled profiles.

use serde::{Deserialize, Serialize};

use voicelock_store::Profile;
use voicelock_voiceprint::Embedding;

use crate::risk::{classify, RiskLevel};

/// Outcome of one verification attempt. Transient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Best similarity across all profiles, in `[-1, 1]`.
    pub score: f32,
    /// Risk tier derived from the score.
    pub risk: RiskLevel,
    /// Id of the best-matching profile, when any profile was scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    /// User-facing explanation, with the matched name appended.
    pub details: String,
}

impl VerificationResult {
    /// The fixed outcome when nothing is enrolled yet.
    pub fn no_profiles() -> Self {
        Self {
            score: 0.0,
            risk: RiskLevel::High,
            profile_id: None,
            details: "No profiles enrolled.".to_string(),
        }
    }
}

/// Scores a live embedding against every enrolled profile.
///
/// Per profile the score is the maximum cosine similarity over its stored
/// embeddings (best-sample matching, not averaging); the overall winner
/// is the maximum across profiles. Profiles are evaluated ascending by
/// id and ties keep the first one seen, so the outcome is deterministic.
///
/// With no profiles enrolled the attempt short-circuits to a High-risk
/// result without computing any similarity. The matched profile is
/// reported for every tier; opening a session on the accepting tiers is
/// the caller's job.
pub fn verify_embedding(live: &Embedding, profiles: &[Profile]) -> VerificationResult {
    if profiles.is_empty() {
        return VerificationResult::no_profiles();
    }

    let mut ordered: Vec<&Profile> = profiles.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    let mut best: Option<(f32, &Profile)> = None;
    for profile in ordered {
        let profile_best = profile
            .embeddings
            .iter()
            .map(|stored| live.similarity(stored))
            .fold(f32::MIN, f32::max);

        // Strictly greater keeps the first profile in id order on ties.
        match best {
            Some((score, _)) if profile_best <= score => {}
            _ => best = Some((profile_best, profile)),
        }
    }

    let (score, matched) = match best {
        Some((score, profile)) if score > f32::MIN => (score, Some(profile)),
        _ => (0.0, None),
    };

    let risk = classify(score);
    let mut details = risk.detail().to_string();
    if let Some(profile) = matched {
        details.push_str(&format!(" (Matched: {})", profile.name));
    }

    tracing::debug!(score, risk = %risk, "verification scored");

    VerificationResult {
        score,
        risk,
        profile_id: matched.map(|p| p.id.clone()),
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voicelock_voiceprint::{EmbeddingSource, EMBEDDING_DIM};

    fn unit_vec(hot: usize) -> Vec<f32> {
        let mut v = vec![0.0f32; EMBEDDING_DIM];
        v[hot] = 1.0;
        v
    }

    fn neural(hot: usize) -> Embedding {
        Embedding::new(unit_vec(hot), EmbeddingSource::Neural)
    }

    fn profile(id: &str, name: &str, embeddings: Vec<Embedding>) -> Profile {
        Profile {
            id: id.into(),
            name: name.into(),
            created_at: 0,
            embeddings,
        }
    }

    #[test]
    fn no_profiles_short_circuits_high() {
        let live = neural(0);
        let result = verify_embedding(&live, &[]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.risk, RiskLevel::High);
        assert!(result.profile_id.is_none());
        assert_eq!(result.details, "No profiles enrolled.");
    }

    #[test]
    fn exact_match_wins_with_low_risk() {
        // Scenario A: P1 embeddings equal to V, P2 orthogonal; live = V.
        let p1 = profile("p1", "Alice", vec![neural(0), neural(0), neural(0)]);
        let p2 = profile("p2", "Bob", vec![neural(1), neural(2), neural(3)]);

        let result = verify_embedding(&neural(0), &[p2, p1]);
        assert!((result.score - 1.0).abs() < 1e-6);
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.profile_id.as_deref(), Some("p1"));
        assert_eq!(result.details, "High confidence match. (Matched: Alice)");
    }

    #[test]
    fn best_sample_not_average() {
        // Two poor samples and one perfect one: max wins, so the profile
        // still scores 1.0.
        let p = profile("p1", "Alice", vec![neural(5), neural(6), neural(0)]);
        let result = verify_embedding(&neural(0), &[p]);
        assert!((result.score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tie_breaks_to_lowest_id() {
        let live = neural(0);
        let a = profile("a", "First", vec![neural(0)]);
        let z = profile("z", "Last", vec![neural(0)]);

        // Input order must not matter.
        let result = verify_embedding(&live, &[z.clone(), a.clone()]);
        assert_eq!(result.profile_id.as_deref(), Some("a"));
        let result = verify_embedding(&live, &[a, z]);
        assert_eq!(result.profile_id.as_deref(), Some("a"));
    }

    #[test]
    fn rejected_attempt_still_names_best_profile() {
        let mut far = vec![0.0f32; EMBEDDING_DIM];
        far[1] = 1.0;
        let p = profile("p1", "Alice", vec![Embedding::new(far, EmbeddingSource::Neural)]);

        let result = verify_embedding(&neural(0), &[p]);
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.profile_id.as_deref(), Some("p1"));
        assert!(result.details.ends_with("(Matched: Alice)"));
    }

    #[test]
    fn cross_source_profiles_score_zero() {
        let spectral = Embedding::new(unit_vec(0), EmbeddingSource::Spectral);
        let p = profile("p1", "Alice", vec![neural(0)]);

        let result = verify_embedding(&spectral, &[p]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.risk, RiskLevel::High);
    }

    #[test]
    fn moderate_similarity_is_medium() {
        // cos = 0.6 between live and stored.
        let mut stored = vec![0.0f32; EMBEDDING_DIM];
        stored[0] = 0.6;
        stored[1] = 0.8;
        let p = profile(
            "p1",
            "Alice",
            vec![Embedding::new(stored, EmbeddingSource::Neural)],
        );

        let result = verify_embedding(&neural(0), &[p]);
        assert!((result.score - 0.6).abs() < 1e-6);
        assert_eq!(result.risk, RiskLevel::Medium);
    }
}
