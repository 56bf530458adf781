//! Deterministic hash-based embedding provider.
//!
//! Derives vectors from SHA-256 digests of the input text instead of a
//! trained model. Identical text always maps to the identical vector, which
//! keeps search behavior reproducible across runs and in tests. This is a
//! stand-in for a real embedding service: there is no semantic relationship
//! between the vectors of *different* texts. Swap in
//! [`remote::RemoteEmbeddingProvider`](super::remote::RemoteEmbeddingProvider)
//! for real embeddings.

use sha2::{Digest, Sha256};

use super::{estimate_tokens, Embedding, EmbeddingProvider};
use crate::config::EmbeddingConfig;

/// Domain separation tag mixed into every digest.
const SEED: &[u8] = b"corpus-hash-embedding-v1";

/// Hash-based embedding provider. Cheap, local, deterministic.
pub struct HashEmbeddingProvider {
    model: String,
    dimensions: usize,
}

impl HashEmbeddingProvider {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            model: config.model.clone(),
            dimensions: config.dimensions,
        }
    }

    /// Expand the text into `dimensions` components in `[-1, 1]`.
    ///
    /// Each SHA-256 digest yields 16 two-byte lanes; a counter re-keys the
    /// hasher until the vector is full. The result is L2-normalized so
    /// cosine scores stay stable and self-similarity is exactly 1.0.
    fn fill_vector(&self, text: &str) -> Vec<f32> {
        let mut out = vec![0.0f32; self.dimensions];
        let mut counter: u64 = 0;
        let mut written = 0usize;

        while written < self.dimensions {
            let mut hasher = Sha256::new();
            hasher.update(SEED);
            hasher.update(text.as_bytes());
            hasher.update(counter.to_le_bytes());
            let digest = hasher.finalize();

            for chunk in digest.chunks_exact(2) {
                if written >= self.dimensions {
                    break;
                }
                let raw = u16::from_le_bytes([chunk[0], chunk[1]]);
                out[written] = (raw as f32 / 32767.5) - 1.0;
                written += 1;
            }
            counter += 1;
        }

        let norm = out.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 1e-12 {
            for v in &mut out {
                *v /= norm;
            }
        } else {
            out[0] = 1.0;
        }
        out
    }
}

impl EmbeddingProvider for HashEmbeddingProvider {
    fn embed(&self, text: &str) -> anyhow::Result<Embedding> {
        Ok(Embedding {
            vector: self.fill_vector(text),
            model: self.model.clone(),
            dimensions: self.dimensions,
            token_estimate: estimate_tokens(text),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(dimensions: usize) -> HashEmbeddingProvider {
        HashEmbeddingProvider::new(&EmbeddingConfig {
            model: "test-embedding".into(),
            dimensions,
            ..EmbeddingConfig::default()
        })
    }

    #[test]
    fn identical_text_yields_identical_vectors() {
        let p = provider(256);
        let a = p.embed("the quick brown fox").unwrap();
        let b = p.embed("the quick brown fox").unwrap();
        assert_eq!(a.vector, b.vector);
    }

    #[test]
    fn different_texts_yield_different_vectors() {
        let p = provider(256);
        let a = p.embed("alpha").unwrap();
        let b = p.embed("beta").unwrap();
        assert_ne!(a.vector, b.vector);
    }

    #[test]
    fn vector_has_declared_dimensions() {
        for dims in [8, 16, 100, 1536] {
            let p = provider(dims);
            let embedding = p.embed("dimension check").unwrap();
            assert_eq!(embedding.vector.len(), dims);
            assert_eq!(embedding.dimensions, dims);
        }
    }

    #[test]
    fn components_stay_in_unit_interval() {
        let p = provider(512);
        let embedding = p.embed("bounds check input").unwrap();
        for component in &embedding.vector {
            assert!((-1.0..=1.0).contains(component), "component {component} out of range");
        }
    }

    #[test]
    fn vector_is_l2_normalized() {
        let p = provider(384);
        let embedding = p.embed("normalization check").unwrap();
        let norm: f32 = embedding.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "norm was {norm}");
    }

    #[test]
    fn token_estimate_is_quarter_of_length() {
        let p = provider(64);
        let embedding = p.embed("x".repeat(100).as_str()).unwrap();
        assert_eq!(embedding.token_estimate, 25);
    }

    #[test]
    fn empty_text_still_embeds() {
        let p = provider(64);
        let embedding = p.embed("").unwrap();
        assert_eq!(embedding.vector.len(), 64);
        assert_eq!(embedding.token_estimate, 0);
    }
}
