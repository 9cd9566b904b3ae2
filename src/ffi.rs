//! Python FFI bindings via PyO3.
//!
//! Exposes the attention pipeline to Python with the default configuration
//! and the 50-dimensional hash embedder. For a custom embedder or
//! configuration, use the Rust API directly.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from attention_lens import analyze_text
//!
//! report = analyze_text("I love cats. Cats are great.", mode="scaled")
//! print(report.sentences)          # ['I love cats.', 'Cats are great.']
//! print(report.matrix[0][1])       # full-precision score
//! print(report.highest_attention)  # (source, target, value) or None
//! print(report.tooltip(0, 1))
//! print(report.render())
//! ```

#![allow(non_snake_case)]

use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

use crate::attention::ScoringMode;
use crate::embedding::EMBEDDING_DIM;
use crate::insight::AttentionPair;
use crate::pipeline::{analyze, AttentionReport};
use crate::view::{Renderer, TextRenderer};

fn pair_tuple(pair: Option<AttentionPair>) -> Option<(usize, usize, f64)> {
    pair.map(|p| (p.source, p.target, p.value))
}

// ── AttentionReport ──────────────────────────────────────────────────────────

/// Result of one analysis run.
#[pyclass(name = "AttentionReport")]
#[derive(Clone)]
pub struct PyAttentionReport {
    inner: AttentionReport,
}

#[pymethods]
impl PyAttentionReport {
    /// Scoring mode token: "cosine", "dotProduct" or "scaled".
    #[getter]
    pub fn mode(&self) -> &'static str {
        self.inner.mode.token()
    }

    /// Parsed sentences, in input order.
    #[getter]
    pub fn sentences(&self) -> Vec<String> {
        self.inner.sentences.iter().map(|s| s.as_str().to_string()).collect()
    }

    /// Score matrix as a list of rows.
    #[getter]
    pub fn matrix(&self) -> Vec<Vec<f64>> {
        self.inner.matrix.rows().map(<[f64]>::to_vec).collect()
    }

    /// Mean off-diagonal score.
    #[getter]
    pub fn average_attention(&self) -> f64 {
        self.inner.insights.average_attention
    }

    /// Strongest off-diagonal cell as (source, target, value), or None.
    #[getter]
    pub fn highest_attention(&self) -> Option<(usize, usize, f64)> {
        pair_tuple(self.inner.insights.highest_attention)
    }

    /// Weakest off-diagonal cell as (source, target, value), or None.
    #[getter]
    pub fn lowest_attention(&self) -> Option<(usize, usize, f64)> {
        pair_tuple(self.inner.insights.lowest_attention)
    }

    /// Diagonal values in index order.
    #[getter]
    pub fn self_attention(&self) -> Vec<f64> {
        self.inner.insights.self_attention.iter().map(|s| s.value).collect()
    }

    /// Greedy clusters as lists of sentence indices.
    #[getter]
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        self.inner
            .insights
            .clusters
            .iter()
            .map(|c| c.members().to_vec())
            .collect()
    }

    /// Tooltip text for cell (source, target).
    ///
    /// Raises:
    ///     IndexError: if the cell is outside the matrix
    pub fn tooltip(&self, source: usize, target: usize) -> PyResult<String> {
        self.inner
            .cell(source, target)
            .map(|c| c.tooltip())
            .ok_or_else(|| {
                PyIndexError::new_err(format!(
                    "cell ({source}, {target}) is outside a {n}×{n} matrix",
                    n = self.inner.sentence_count()
                ))
            })
    }

    /// Plain-text rendering with no cell selected.
    pub fn render(&self) -> String {
        TextRenderer.render(&self.inner, None)
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "AttentionReport(mode={}, sentences={}, clusters={})",
            self.inner.mode,
            self.inner.sentence_count(),
            self.inner.insights.clusters.len()
        )
    }
}

// ── Functions ────────────────────────────────────────────────────────────────

/// Analyse text and return an AttentionReport.
///
/// Args:
///     text: free-form text; sentences end with '.', '!' or '?'
///     mode: "cosine" (default), "dotProduct" or "scaled"; unknown values use cosine
///
/// Raises:
///     ValueError: if fewer than two sentences are found
#[pyfunction]
#[pyo3(signature = (text, mode = "cosine"))]
pub fn analyze_text(text: &str, mode: &str) -> PyResult<PyAttentionReport> {
    analyze(text, ScoringMode::from_token(mode))
        .map(|inner| PyAttentionReport { inner })
        .map_err(|e| PyValueError::new_err(e.notice()))
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Sentence attention maps, Python bindings.
///
/// Embedding dimension is fixed at 50. For custom embedders use the Rust API.
#[pymodule]
pub fn attention_lens(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAttentionReport>()?;
    m.add_function(wrap_pyfunction!(analyze_text, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("EMBEDDING_DIM", EMBEDDING_DIM)?;
    Ok(())
}
