//! Presentation interface: selection state and renderers.
//!
//! The [`Workbench`] owns the currently displayed report and the active cell.
//! Nothing here is process-wide: every workbench is independent, and the core
//! pipeline stays stateless.
//!
//! A new successful run replaces the report in one assignment and clears the
//! selection. A rejected run leaves the previous report and selection as they
//! were.

use core::fmt;

use hashbrown::HashSet;
use tracing::{debug, info};

use crate::attention::ScoringMode;
use crate::embedding::{HashEmbedder, EMBEDDING_DIM};
use crate::error::{AttentionError, AttentionResult};
use crate::pipeline::{analyze_with, sentence_label, AnalysisConfig, AttentionReport};

/// Words shorter than this are ignored when looking for shared words.
const MIN_SHARED_WORD_LEN: usize = 3;

/// Index of a matrix cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellIndex {
    /// Source (row) index.
    pub source: usize,
    /// Target (column) index.
    pub target: usize,
}

/// Detail view for the selected cell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relationship {
    /// The selected cell.
    pub cell: CellIndex,
    /// Full source sentence.
    pub source: String,
    /// Full target sentence.
    pub target: String,
    /// Full-precision score.
    pub score: f64,
    /// Source words (lowercased) that also occur in the target.
    pub shared_words: Vec<String>,
}

impl Relationship {
    /// Score as a percentage to one decimal place, without the `%` sign.
    pub fn percentage(&self) -> String {
        format!("{:.1}", self.score * 100.0)
    }
}

/// Lowercased runs of `[A-Za-z0-9_]`.
fn words(text: &str) -> impl Iterator<Item = String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into_iter()
}

/// Words of `source` (in order, repeats kept) that also occur in `target`,
/// case-insensitively, ignoring words of two characters or fewer.
pub fn shared_words(source: &str, target: &str) -> Vec<String> {
    let target_words: HashSet<String> = words(target).collect();
    words(source)
        .filter(|w| w.len() >= MIN_SHARED_WORD_LEN && target_words.contains(w))
        .collect()
}

/// Draws an attention report.
///
/// Receives structured data only; it never has to reverse-engineer markup.
pub trait Renderer {
    /// What a render produces (a string, a frame, a widget tree, …).
    type Output;

    /// Render `report`, highlighting `active` if a cell is selected.
    fn render(&mut self, report: &AttentionReport, active: Option<&Relationship>) -> Self::Output;
}

/// Interactive state for one attention view.
#[derive(Clone, Debug, Default)]
pub struct Workbench {
    config: AnalysisConfig,
    report: Option<AttentionReport>,
    active: Option<CellIndex>,
}

impl Workbench {
    /// Workbench with the default configuration and nothing displayed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Workbench with an explicit configuration.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config, report: None, active: None }
    }

    /// Run the pipeline on `text` and display the result.
    ///
    /// On success the selection is reset. On failure nothing changes.
    pub fn process(&mut self, text: &str, mode: ScoringMode) -> AttentionResult<&AttentionReport> {
        let report = analyze_with(text, mode, &self.config, &HashEmbedder)?;
        info!(sentences = report.sentence_count(), mode = %mode, "displaying new report");
        self.active = None;
        Ok(self.report.insert(report))
    }

    /// The displayed report, if any run has succeeded.
    pub fn report(&self) -> Option<&AttentionReport> {
        self.report.as_ref()
    }

    /// The active cell, if one is selected.
    pub fn active(&self) -> Option<CellIndex> {
        self.active
    }

    /// Select a cell and return its detail view.
    pub fn select(&mut self, source: usize, target: usize) -> AttentionResult<Relationship> {
        let report = self.report.as_ref().ok_or(AttentionError::NoReport)?;
        let cell = CellIndex { source, target };
        let relationship = relationship(report, cell).ok_or(AttentionError::CellOutOfRange {
            source_index: source,
            target_index: target,
            size: report.sentence_count(),
        })?;
        debug!(source, target, score = relationship.score, "selected cell");
        self.active = Some(cell);
        Ok(relationship)
    }

    /// Detail view of the active cell.
    pub fn relationship(&self) -> Option<Relationship> {
        relationship(self.report.as_ref()?, self.active?)
    }

    /// Drop the active cell.
    pub fn clear_selection(&mut self) {
        self.active = None;
    }

    /// Render the displayed report, if any.
    pub fn render<R: Renderer>(&self, renderer: &mut R) -> Option<R::Output> {
        let report = self.report.as_ref()?;
        let active = self.relationship();
        Some(renderer.render(report, active.as_ref()))
    }
}

fn relationship(report: &AttentionReport, cell: CellIndex) -> Option<Relationship> {
    let score = report.matrix.get(cell.source, cell.target)?;
    let source = report.sentences.get(cell.source)?.as_str();
    let target = report.sentences.get(cell.target)?.as_str();
    Some(Relationship {
        cell,
        source: source.to_string(),
        target: target.to_string(),
        score,
        shared_words: shared_words(source, target),
    })
}

/// Plain-text renderer: matrix grid, insights, sentence list, selection.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&mut self, report: &AttentionReport, active: Option<&Relationship>) -> String {
        TextView { report, active }.to_string()
    }
}

/// Display adapter behind [`TextRenderer`].
pub struct TextView<'a> {
    /// The report to draw.
    pub report: &'a AttentionReport,
    /// The selected cell, if any.
    pub active: Option<&'a Relationship>,
}

const CELL_WIDTH: usize = 7;

impl TextView<'_> {
    fn write_matrix(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.report.sentence_count();
        let label_width = sentence_label(n.saturating_sub(1)).len();
        let active = self.active.map(|r| r.cell);

        write!(f, "{:label_width$}", "")?;
        for j in 0..n {
            write!(f, "{:>CELL_WIDTH$}", sentence_label(j))?;
        }
        writeln!(f)?;

        for (i, row) in self.report.matrix.rows().enumerate().take(n) {
            write!(f, "{:<label_width$}", sentence_label(i))?;
            for (j, value) in row.iter().enumerate() {
                let text = if active == Some(CellIndex { source: i, target: j }) {
                    format!("[{value:.2}]")
                } else {
                    format!("{value:.2} ")
                };
                write!(f, "{text:>CELL_WIDTH$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_insights(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let insights = &self.report.insights;
        writeln!(f, "Processing steps:")?;
        writeln!(f, "  1. Text split into {} sentences", insights.sentence_count)?;
        writeln!(f, "  2. Generated sentence embeddings ({EMBEDDING_DIM}-dimensional vectors)")?;
        writeln!(f, "  3. Calculated attention scores between all pairs ({})", self.report.mode)?;
        writeln!(f, "  4. Found strongest and weakest relationships")?;
        writeln!(f, "  5. Identified potential sentence clusters")?;
        writeln!(
            f,
            "Average attention between sentences: {:.2}",
            insights.average_attention
        )?;
        if let Some(p) = insights.highest_attention {
            writeln!(
                f,
                "Strongest relationship: {} → {} (score: {:.2})",
                sentence_label(p.source),
                sentence_label(p.target),
                p.value
            )?;
        }
        if let Some(p) = insights.lowest_attention {
            writeln!(
                f,
                "Weakest relationship: {} → {} (score: {:.2})",
                sentence_label(p.source),
                sentence_label(p.target),
                p.value
            )?;
        }
        if insights.clusters.is_empty() {
            writeln!(f, "No clear sentence clusters detected.")?;
        } else {
            writeln!(f, "Detected {} sentence clusters:", insights.clusters.len())?;
            for (k, cluster) in insights.clusters.iter().enumerate() {
                let labels: Vec<String> =
                    cluster.members().iter().map(|&i| sentence_label(i)).collect();
                writeln!(f, "  Cluster {}: {}", k + 1, labels.join(", "))?;
            }
        }
        Ok(())
    }

    fn write_selection(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.active {
            Some(r) => {
                writeln!(f, "Source: {}", r.source)?;
                writeln!(f, "Target: {}", r.target)?;
                writeln!(f, "Attention score: {}%", r.percentage())?;
                if !r.shared_words.is_empty() {
                    writeln!(f, "Shared words: {}", r.shared_words.join(", "))?;
                }
                Ok(())
            }
            None => writeln!(f, "Attention score: Waiting for selection"),
        }
    }
}

impl fmt::Display for TextView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_matrix(f)?;
        writeln!(f)?;
        self.write_insights(f)?;
        writeln!(f)?;
        for (i, sentence) in self.report.sentences.iter().enumerate() {
            writeln!(f, "{}: {}", sentence_label(i), sentence)?;
        }
        writeln!(f)?;
        self.write_selection(f)
    }
}
