//! Error taxonomy for the attention pipeline.
//!
//! Only the input boundary can fail, along with deserialising a report from
//! an external source. Hashing, splitting, scoring and insight extraction are
//! total over their inputs; an unrecognised scoring-mode token is not an error
//! (it resolves to [`ScoringMode::Cosine`]).
//!
//! [`ScoringMode::Cosine`]: crate::attention::ScoringMode::Cosine

use thiserror::Error;

/// Errors surfaced at the pipeline boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttentionError {
    /// Fewer sentences were parsed than the pipeline requires.
    #[error("insufficient input: found {found} sentence(s), at least {required} required")]
    InsufficientInput {
        /// Number of sentences parsed from the input.
        found: usize,
        /// Minimum number of sentences for a run.
        required: usize,
    },

    /// A matrix cell outside the current report was selected.
    #[error("cell ({source_index}, {target_index}) is outside a {size}×{size} matrix")]
    CellOutOfRange {
        /// Requested source (row) index.
        source_index: usize,
        /// Requested target (column) index.
        target_index: usize,
        /// Side length of the matrix.
        size: usize,
    },

    /// A selection was made before any run succeeded.
    #[error("no attention report has been produced yet")]
    NoReport,

    /// A serialised matrix whose score count is not `size * size`.
    #[error("malformed matrix: {len} score(s) cannot fill a {size}×{size} matrix")]
    MalformedMatrix {
        /// Declared side length.
        size: usize,
        /// Number of scores supplied.
        len: usize,
    },

    /// A serialised sentence that is empty after trimming.
    #[error("sentence text is empty")]
    EmptySentence,
}

impl AttentionError {
    /// User-facing notice for display surfaces.
    pub fn notice(&self) -> String {
        match self {
            Self::InsufficientInput { required, .. } => {
                let count = match required {
                    1 => "one sentence".to_string(),
                    2 => "two sentences".to_string(),
                    3 => "three sentences".to_string(),
                    n => format!("{n} sentences"),
                };
                format!("Please enter at least {count} to visualize attention between them.")
            }
            other => other.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type AttentionResult<T> = Result<T, AttentionError>;
