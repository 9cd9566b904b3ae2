//! The processing boundary: text in, attention report out.
//!
//! ```text
//! text → split_sentences → Embedder → score_matrix → extract_insights → AttentionReport
//! ```
//!
//! A run is a pure function of its input. It either produces a complete
//! [`AttentionReport`] or fails with [`AttentionError::InsufficientInput`];
//! there is no partial output.

use tracing::{debug, warn};

use crate::attention::{score_matrix, AttentionMatrix, ScoringMode};
use crate::embedding::{Embedder, HashEmbedder, EMBEDDING_DIM};
use crate::error::{AttentionError, AttentionResult};
use crate::insight::{extract_insights_with_threshold, Insights, CLUSTER_THRESHOLD};
use crate::sentence::{split_sentences, Sentence};

/// Minimum number of sentences for a run.
pub const MIN_SENTENCES: usize = 2;

/// Characters kept in a cell's sentence previews.
pub const PREVIEW_CHARS: usize = 30;

/// Pipeline configuration.
///
/// Default values:
/// - `min_sentences`: 2
/// - `cluster_threshold`: 0.7
/// - `preview_chars`: 30
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisConfig {
    /// Runs with fewer parsed sentences are rejected.
    pub min_sentences: usize,
    /// Score a link must exceed to join two sentences in a cluster.
    pub cluster_threshold: f64,
    /// Preview length for cell metadata.
    pub preview_chars: usize,
}

impl AnalysisConfig {
    /// Construct the standard configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_sentences: MIN_SENTENCES,
            cluster_threshold: CLUSTER_THRESHOLD,
            preview_chars: PREVIEW_CHARS,
        }
    }
}

/// Display label for a sentence index: `S1`, `S2`, …
pub fn sentence_label(index: usize) -> String {
    format!("S{}", index + 1)
}

/// Complete output of one run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttentionReport {
    /// Mode the matrix was scored under.
    pub mode: ScoringMode,
    /// Parsed sentences, in input order.
    pub sentences: Vec<Sentence>,
    /// Full-precision score matrix.
    pub matrix: AttentionMatrix,
    /// Derived statistics.
    pub insights: Insights,
    /// Preview length used by [`AttentionReport::cell`].
    pub preview_chars: usize,
}

impl AttentionReport {
    /// Number of sentences (matrix side length).
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Metadata for cell `(source, target)`, or `None` if out of range.
    pub fn cell(&self, source: usize, target: usize) -> Option<CellView> {
        let score = self.matrix.get(source, target)?;
        let source_sentence = self.sentences.get(source)?;
        let target_sentence = self.sentences.get(target)?;
        Some(CellView {
            source,
            target,
            score,
            source_preview: source_sentence.preview(self.preview_chars),
            target_preview: target_sentence.preview(self.preview_chars),
        })
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellView> + '_ {
        let n = self.sentence_count();
        (0..n).flat_map(move |i| (0..n).filter_map(move |j| self.cell(i, j)))
    }
}

/// Hover metadata for one matrix cell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellView {
    /// Source (row) index.
    pub source: usize,
    /// Target (column) index.
    pub target: usize,
    /// Full-precision score.
    pub score: f64,
    /// Truncated source sentence.
    pub source_preview: String,
    /// Truncated target sentence.
    pub target_preview: String,
}

impl CellView {
    /// Score to two decimal places, as shown in the grid.
    pub fn display(&self) -> String {
        format!("{:.2}", self.score)
    }

    /// Score as a percentage to one decimal place, without the `%` sign.
    pub fn percentage(&self) -> String {
        format!("{:.1}", self.score * 100.0)
    }

    /// Heat colour `(255, 255 − k, 255 − k)` with `k = round(score × 255)`.
    pub fn heat_rgb(&self) -> (u8, u8, u8) {
        let intensity = (self.score.clamp(0.0, 1.0) * 255.0).round() as u8;
        (255, 255 - intensity, 255 - intensity)
    }

    /// Three-line tooltip text.
    pub fn tooltip(&self) -> String {
        format!(
            "Source: {}\nTarget: {}\nSimilarity: {}%",
            self.source_preview,
            self.target_preview,
            self.percentage()
        )
    }
}

/// Analyse `text` with the default configuration and embedder.
pub fn analyze(text: &str, mode: ScoringMode) -> AttentionResult<AttentionReport> {
    analyze_with(text, mode, &AnalysisConfig::default(), &HashEmbedder)
}

/// Analyse `text` with an explicit configuration and embedder.
pub fn analyze_with<E>(
    text: &str,
    mode: ScoringMode,
    config: &AnalysisConfig,
    embedder: &E,
) -> AttentionResult<AttentionReport>
where
    E: Embedder<EMBEDDING_DIM>,
{
    let sentences = split_sentences(text.trim());
    if sentences.len() < config.min_sentences {
        warn!(
            found = sentences.len(),
            required = config.min_sentences,
            "rejecting run: not enough sentences"
        );
        return Err(AttentionError::InsufficientInput {
            found: sentences.len(),
            required: config.min_sentences,
        });
    }
    debug!(sentences = sentences.len(), mode = %mode, "analysing text");

    let embeddings = embedder.embed_all(&sentences);
    let matrix = score_matrix(&embeddings, mode);
    let insights = extract_insights_with_threshold(&sentences, &matrix, config.cluster_threshold);
    debug!(
        clusters = insights.clusters.len(),
        average = insights.average_attention,
        "derived insights"
    );

    Ok(AttentionReport {
        mode,
        sentences,
        matrix,
        insights,
        preview_chars: config.preview_chars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let c = AnalysisConfig::new();
        assert_eq!(c.min_sentences, 2);
        assert!((c.cluster_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(c.preview_chars, 30);
    }

    #[test]
    fn test_sentence_labels_are_one_based() {
        assert_eq!(sentence_label(0), "S1");
        assert_eq!(sentence_label(9), "S10");
    }

    #[test]
    fn test_rejects_single_sentence() {
        let err = analyze("Just one sentence.", ScoringMode::Cosine).unwrap_err();
        assert_eq!(err, AttentionError::InsufficientInput { found: 1, required: 2 });
    }

    #[test]
    fn test_min_sentences_is_configurable() {
        let config = AnalysisConfig { min_sentences: 1, ..AnalysisConfig::default() };
        let report = analyze_with("Alone.", ScoringMode::Cosine, &config, &HashEmbedder).unwrap();
        assert_eq!(report.sentence_count(), 1);
        assert_eq!(report.insights.highest_attention, None);

        let strict = AnalysisConfig { min_sentences: 3, ..AnalysisConfig::default() };
        assert!(analyze_with("One. Two.", ScoringMode::Cosine, &strict, &HashEmbedder).is_err());
    }

    #[test]
    fn test_cell_metadata() {
        let report = analyze(
            "The quick brown fox jumps over the lazy dog. Short one.",
            ScoringMode::Cosine,
        )
        .unwrap();
        let cell = report.cell(0, 1).unwrap();
        assert_eq!(cell.source_preview, "The quick brown fox jumps over...");
        assert_eq!(cell.target_preview, "Short one.");
        let tooltip = cell.tooltip();
        let prefix = "Source: The quick brown fox jumps over...\nTarget: Short one.\nSimilarity: ";
        assert!(tooltip.starts_with(prefix), "tooltip = {tooltip:?}");
        assert!(tooltip.ends_with('%'));
        assert!(report.cell(2, 0).is_none());
        assert_eq!(report.cells().count(), 4);
    }

    #[test]
    fn test_cell_formatting() {
        let cell = CellView {
            source: 0,
            target: 1,
            score: 0.346_539_955,
            source_preview: String::new(),
            target_preview: String::new(),
        };
        assert_eq!(cell.display(), "0.35");
        assert_eq!(cell.percentage(), "34.7");
        assert_eq!(cell.heat_rgb(), (255, 167, 167));

        let full = CellView { score: 1.0, ..cell.clone() };
        assert_eq!(full.heat_rgb(), (255, 0, 0));
        assert_eq!(full.percentage(), "100.0");
        let none = CellView { score: 0.0, ..cell };
        assert_eq!(none.heat_rgb(), (255, 255, 255));
    }
}
