use serde::{Deserialize, Serialize};

use crate::cosine::cosine_similarity;

/// Which extraction path produced an embedding.
///
/// Neural and spectral vectors share a shape but not a meaning; comparing
/// across sources is invalid and scores 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingSource {
    /// Produced by the neural inference collaborator.
    Neural,
    /// Produced by the deterministic spectral fallback.
    Spectral,
}

/// A fixed-length voice embedding.
///
/// Invariant: the vector has L2 norm within epsilon of 1.0, except the
/// degenerate all-zero vector, which has no direction and is left
/// unnormalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    vector: Vec<f32>,
    source: EmbeddingSource,
}

impl Embedding {
    /// Wraps an already-normalized vector.
    pub fn new(vector: Vec<f32>, source: EmbeddingSource) -> Self {
        Self { vector, source }
    }

    /// The embedding values.
    pub fn values(&self) -> &[f32] {
        &self.vector
    }

    /// The extraction path that produced this embedding.
    pub fn source(&self) -> EmbeddingSource {
        self.source
    }

    /// Vector dimensionality.
    pub fn dim(&self) -> usize {
        self.vector.len()
    }

    /// L2 norm of the vector.
    pub fn norm(&self) -> f64 {
        self.vector
            .iter()
            .map(|&v| (v as f64) * (v as f64))
            .sum::<f64>()
            .sqrt()
    }

    /// Cosine similarity against another embedding.
    ///
    /// Returns 0 when the sources differ, the lengths differ, or either
    /// vector has zero norm.
    pub fn similarity(&self, other: &Embedding) -> f32 {
        if self.source != other.source {
            return 0.0;
        }
        cosine_similarity(&self.vector, &other.vector)
    }
}

/// Scales a vector to unit L2 norm in place.
/// A zero-norm vector is left untouched.
pub fn l2_normalize(vec: &mut [f32]) {
    let norm: f64 = vec.iter().map(|&v| (v as f64) * (v as f64)).sum::<f64>().sqrt();
    if norm > 0.0 {
        let scale = (1.0 / norm) as f32;
        for v in vec {
            *v *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_to_unit_length() {
        let mut vec = vec![3.0, 4.0];
        l2_normalize(&mut vec);
        assert!((vec[0] - 0.6).abs() < 1e-6);
        assert!((vec[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_vector_is_noop() {
        let mut vec = vec![0.0; 8];
        l2_normalize(&mut vec);
        assert!(vec.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn similarity_same_source() {
        let a = Embedding::new(vec![1.0, 0.0], EmbeddingSource::Neural);
        let b = Embedding::new(vec![1.0, 0.0], EmbeddingSource::Neural);
        assert!((a.similarity(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn similarity_across_sources_is_zero() {
        let a = Embedding::new(vec![1.0, 0.0], EmbeddingSource::Neural);
        let b = Embedding::new(vec![1.0, 0.0], EmbeddingSource::Spectral);
        assert_eq!(a.similarity(&b), 0.0);
    }

    #[test]
    fn source_roundtrips_through_serde() {
        let a = Embedding::new(vec![0.6, 0.8], EmbeddingSource::Spectral);
        let json = serde_json::to_string(&a).unwrap();
        assert!(json.contains("spectral"));
        let restored: Embedding = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, a);
    }
}
