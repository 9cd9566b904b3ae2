//! Pairwise attention scoring.
//!
//! Every ordered cell `(i, j)` of the matrix, the diagonal included, is scored
//! independently. Cosine and dot-product scores happen to be symmetric for unit
//! vectors, but nothing here relies on that.
//!
//! | Mode | Raw score | Cell value |
//! |------|-----------|------------|
//! | [`ScoringMode::Cosine`] | `dot(a, b)` | `(raw + 1) / 2` |
//! | [`ScoringMode::DotProduct`] | `dot(a, b)` | `(raw + 1) / 2` |
//! | [`ScoringMode::Scaled`] | `dot(a, b) / sqrt(N)` | `(raw + 1) / 2` |
//!
//! Cosine reduces to the plain dot product because embeddings are already unit
//! length. Cell values are clamped to [0.0, 1.0]. A pair involving a degenerate
//! (all-zero) embedding scores 0.0.

use core::fmt;

use tracing::debug;

use crate::embedding::Embedding;
#[cfg(feature = "serde")]
use crate::error::AttentionError;

/// Scoring mode for the attention matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", from = "String"))]
pub enum ScoringMode {
    /// Cosine similarity remapped to [0, 1]. Fallback for unknown tokens.
    #[default]
    Cosine,
    /// Raw dot product remapped to [0, 1].
    DotProduct,
    /// Dot product divided by `sqrt(dim)`, remapped to [0, 1].
    Scaled,
}

impl ScoringMode {
    /// All modes in display order.
    pub const ALL: [ScoringMode; 3] = [Self::Cosine, Self::DotProduct, Self::Scaled];

    /// Resolve a mode token (`cosine`, `dotProduct`, `scaled`).
    ///
    /// Unrecognised tokens resolve to [`ScoringMode::Cosine`].
    pub fn from_token(token: &str) -> Self {
        match token {
            "cosine" => Self::Cosine,
            "dotProduct" => Self::DotProduct,
            "scaled" => Self::Scaled,
            other => {
                debug!(token = other, "unrecognised scoring mode; using cosine");
                Self::Cosine
            }
        }
    }

    /// The canonical token for this mode.
    pub fn token(self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::DotProduct => "dotProduct",
            Self::Scaled => "scaled",
        }
    }

    /// Pre-remap score for a pair of embeddings.
    pub fn raw_score<const N: usize>(self, a: &Embedding<N>, b: &Embedding<N>) -> f64 {
        let dot = a.dot(b);
        match self {
            Self::Cosine | Self::DotProduct => dot,
            Self::Scaled => dot / (N as f64).sqrt(),
        }
    }

    /// Cell value in [0.0, 1.0] for a pair of embeddings.
    pub fn score<const N: usize>(self, a: &Embedding<N>, b: &Embedding<N>) -> f64 {
        if a.is_degenerate() || b.is_degenerate() {
            return 0.0;
        }
        ((self.raw_score(a, b) + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

impl From<&str> for ScoringMode {
    fn from(token: &str) -> Self {
        Self::from_token(token)
    }
}

impl From<String> for ScoringMode {
    fn from(token: String) -> Self {
        Self::from_token(&token)
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Square attention matrix, row-major.
///
/// `get(i, j)` is the attention sentence `i` (source) pays to sentence `j`
/// (target).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttentionMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl AttentionMatrix {
    /// Build a matrix from explicit rows.
    ///
    /// Returns `None` unless every row has exactly `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            size,
            scores: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a matrix from a side length and row-major scores.
    ///
    /// Returns `None` unless `scores` holds exactly `size * size` entries.
    pub fn from_parts(size: usize, scores: Vec<f64>) -> Option<Self> {
        (size.checked_mul(size) == Some(scores.len())).then_some(Self { size, scores })
    }

    /// Side length (sentence count).
    pub fn size(&self) -> usize {
        self.size
    }

    /// `true` for a 0×0 matrix.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Score at `(source, target)`, or `None` if out of range.
    pub fn get(&self, source: usize, target: usize) -> Option<f64> {
        if source < self.size && target < self.size {
            self.scores.get(source * self.size + target).copied()
        } else {
            None
        }
    }

    /// Row `source`: the attention it pays to every target.
    pub fn row(&self, source: usize) -> &[f64] {
        let start = (source * self.size).min(self.scores.len());
        let end = (start + self.size).min(self.scores.len());
        &self.scores[start..end]
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics; an empty matrix has no rows anyway.
        self.scores.chunks(self.size.max(1))
    }

    /// Diagonal (self-attention) values in index order.
    pub fn diagonal(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.size).filter_map(move |i| self.get(i, i))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AttentionMatrix {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Wire {
            size: usize,
            scores: Vec<f64>,
        }

        let Wire { size, scores } = Wire::deserialize(deserializer)?;
        let len = scores.len();
        Self::from_parts(size, scores).ok_or_else(|| {
            serde::de::Error::custom(AttentionError::MalformedMatrix { size, len })
        })
    }
}

/// Score every ordered pair of embeddings under `mode`.
pub fn score_matrix<const N: usize>(
    embeddings: &[Embedding<N>],
    mode: ScoringMode,
) -> AttentionMatrix {
    let size = embeddings.len();
    let mut scores = Vec::with_capacity(size * size);
    for source in embeddings {
        for target in embeddings {
            scores.push(mode.score(source, target));
        }
    }
    debug!(size, mode = mode.token(), "scored attention matrix");
    AttentionMatrix { size, scores }
}
