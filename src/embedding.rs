//! Deterministic sentence embeddings.
//!
//! Each sentence maps to a fixed-length unit vector seeded from its text hash.
//! There is no learned model: the vector stands in for a semantic
//! representation so that the attention machinery has something to score.
//!
//! # Implementing a different embedder
//!
//! ```rust
//! use attention_lens::embedding::{Embedder, Embedding};
//! use attention_lens::sentence::Sentence;
//!
//! struct LengthEmbedder;
//!
//! impl Embedder<2> for LengthEmbedder {
//!     fn embed(&self, sentence: &Sentence) -> Embedding<2> {
//!         Embedding::from_raw([sentence.char_len() as f64, 1.0])
//!     }
//! }
//! ```
//!
//! # Invariants
//! - Identical sentence text yields an identical embedding.
//! - Non-degenerate embeddings have Euclidean norm 1 (within float tolerance).
//! - A zero-magnitude raw vector becomes the all-zero embedding, never NaN.

use tracing::warn;

use crate::seed::{pseudo_random, string_hash};
use crate::sentence::Sentence;

/// Dimensionality of sentence embeddings.
pub const EMBEDDING_DIM: usize = 50;

/// Fixed-length embedding vector.
///
/// Built through [`Embedding::from_raw`], which normalises to unit length.
#[derive(Clone, Debug, PartialEq)]
pub struct Embedding<const N: usize> {
    components: [f64; N],
}

/// The embedding width used by the pipeline.
pub type SentenceEmbedding = Embedding<EMBEDDING_DIM>;

impl<const N: usize> Embedding<N> {
    /// Dimensionality of this embedding type.
    pub const DIM: usize = N;

    /// The all-zero embedding used as the degenerate fallback.
    pub fn zero() -> Self {
        Self { components: [0.0; N] }
    }

    /// Normalise a raw vector to unit length.
    ///
    /// A raw vector with zero magnitude yields [`Embedding::zero`].
    pub fn from_raw(raw: [f64; N]) -> Self {
        let magnitude = raw.iter().map(|v| v * v).sum::<f64>().sqrt();
        if magnitude == 0.0 || !magnitude.is_finite() {
            warn!(dim = N, "degenerate raw embedding; substituting zero vector");
            return Self::zero();
        }
        let mut components = raw;
        for c in components.iter_mut() {
            *c /= magnitude;
        }
        Self { components }
    }

    /// The vector components.
    pub fn components(&self) -> &[f64; N] {
        &self.components
    }

    /// Dot product `Σ a[k]·b[k]`.
    pub fn dot(&self, other: &Self) -> f64 {
        self.components
            .iter()
            .zip(other.components.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// `true` for the all-zero fallback vector.
    pub fn is_degenerate(&self) -> bool {
        self.components.iter().all(|&c| c == 0.0)
    }
}

/// Maps a sentence to an embedding.
///
/// Implementations must be deterministic: the same sentence text always yields
/// the same vector.
pub trait Embedder<const N: usize> {
    /// Embed one sentence.
    fn embed(&self, sentence: &Sentence) -> Embedding<N>;

    /// Embed every sentence, preserving order.
    fn embed_all(&self, sentences: &[Sentence]) -> Vec<Embedding<N>> {
        sentences.iter().map(|s| self.embed(s)).collect()
    }
}

/// Hash-seeded embedder: component `i` is `pseudo_random(hash + i) × 2 − 1`,
/// then the vector is normalised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HashEmbedder;

impl<const N: usize> Embedder<N> for HashEmbedder {
    fn embed(&self, sentence: &Sentence) -> Embedding<N> {
        let seed = string_hash(sentence.as_str()) as f64;
        let mut raw = [0.0_f64; N];
        for (i, v) in raw.iter_mut().enumerate() {
            *v = pseudo_random(seed + i as f64) * 2.0 - 1.0;
        }
        Embedding::from_raw(raw)
    }
}

/// Embed a sentence with the default [`HashEmbedder`].
pub fn embed<const N: usize>(sentence: &Sentence) -> Embedding<N> {
    HashEmbedder.embed(sentence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(text: &str) -> Sentence {
        Sentence::new(text).unwrap()
    }

    #[test]
    fn test_embedding_is_deterministic() {
        let s = sentence("I love cats.");
        let a: SentenceEmbedding = embed(&s);
        let b: SentenceEmbedding = embed(&s);
        assert_eq!(a, b);
        assert_eq!(a.components().len(), EMBEDDING_DIM);
    }

    #[test]
    fn test_embedding_is_unit_norm() {
        for text in ["I love cats.", "Cats are great.", "?", "Dogs bark loudly."] {
            let e: SentenceEmbedding = embed(&sentence(text));
            assert!((e.norm() - 1.0).abs() < 1e-9, "norm({text}) = {}", e.norm());
            assert!(!e.is_degenerate());
        }
    }

    #[test]
    fn test_embedding_known_components() {
        let e: SentenceEmbedding = embed(&sentence("I love cats."));
        assert!((e.components()[0] - 0.041_976_120_228_154_52).abs() < 1e-9);
        assert!((e.components()[49] + 0.019_042_021_767_304_688).abs() < 1e-9);
    }

    #[test]
    fn test_components_lie_in_signed_unit_range() {
        let e: SentenceEmbedding = embed(&sentence("Stocks fell sharply today."));
        assert!(e.components().iter().all(|c| (-1.0..=1.0).contains(c)));
    }

    #[test]
    fn test_distinct_text_gives_distinct_vectors() {
        let a: SentenceEmbedding = embed(&sentence("I love cats."));
        let b: SentenceEmbedding = embed(&sentence("Cats are great."));
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_raw_vector_falls_back_to_zero_embedding() {
        let e = Embedding::<4>::from_raw([0.0; 4]);
        assert!(e.is_degenerate());
        assert!(e.components().iter().all(|c| c.is_finite()));
        assert_eq!(e, Embedding::zero());
    }

    #[test]
    fn test_from_raw_normalises() {
        let e = Embedding::<2>::from_raw([3.0, 4.0]);
        assert!((e.components()[0] - 0.6).abs() < 1e-12);
        assert!((e.components()[1] - 0.8).abs() < 1e-12);
        assert_eq!(Embedding::<2>::DIM, 2);
    }

    #[test]
    fn test_embed_all_preserves_order() {
        let sentences = [sentence("One."), sentence("Two."), sentence("One.")];
        let all: Vec<Embedding<8>> = HashEmbedder.embed_all(&sentences);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], all[2]);
        assert_ne!(all[0], all[1]);
    }
}
