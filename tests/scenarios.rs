//! End-to-end scenarios through the public pipeline.
//!
//! Each test drives `analyze` (or the `Workbench`) with literal text and checks
//! the sentence list, the matrix and the derived insights together.

use attention_lens::{
    analyze, AttentionError, ScoringMode, TextRenderer, Workbench, EMBEDDING_DIM,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

const CATS: &str = "I love cats. Cats are great.";
const CLUSTERED: &str = "Cats purr. Cats purr. Dogs bark loudly.";
const MIXED: &str = "Stocks fell sharply today. Rain is expected tomorrow! \
                     The quick brown fox jumps over the lazy dog. Is it over? Yes.";

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn test_two_sentences_give_symmetric_cosine_matrix() {
    let report = analyze(CATS, ScoringMode::Cosine).unwrap();

    let texts: Vec<&str> = report.sentences.iter().map(|s| s.as_str()).collect();
    assert_eq!(texts, ["I love cats.", "Cats are great."]);
    assert_eq!(report.matrix.size(), 2);
    assert_eq!(report.matrix.get(0, 1), report.matrix.get(1, 0));
    assert_close(report.matrix.get(0, 0).unwrap(), 1.0);
    assert_close(report.matrix.get(1, 1).unwrap(), 1.0);
    assert_close(report.matrix.get(0, 1).unwrap(), 0.346_539_955_018_758_9);
}

#[test]
fn test_single_sentence_is_rejected() {
    let err = analyze("Just one sentence.", ScoringMode::Cosine).unwrap_err();
    assert_eq!(err, AttentionError::InsufficientInput { found: 1, required: 2 });
}

#[test]
fn test_unpunctuated_text_is_rejected() {
    let err = analyze("no punctuation here", ScoringMode::Scaled).unwrap_err();
    assert_eq!(err, AttentionError::InsufficientInput { found: 0, required: 2 });
}

#[test]
fn test_duplicate_sentences_cluster_and_third_stays_out() {
    let report = analyze(CLUSTERED, ScoringMode::Cosine).unwrap();
    let m = &report.matrix;
    assert!(m.get(0, 1).unwrap() > 0.7 && m.get(1, 0).unwrap() > 0.7);
    for other in [0, 1] {
        assert!(m.get(2, other).unwrap() <= 0.7);
        assert!(m.get(other, 2).unwrap() <= 0.7);
    }

    let clusters = &report.insights.clusters;
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].members(), &[0, 1]);
    assert!(!clusters[0].contains(2));
}

#[test]
fn test_scaled_mode_divides_by_sqrt_dim() {
    let dot = analyze(CATS, ScoringMode::DotProduct).unwrap();
    let scaled = analyze(CATS, ScoringMode::Scaled).unwrap();
    let factor = (EMBEDDING_DIM as f64).sqrt();

    for (i, j) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        let raw_dot = dot.matrix.get(i, j).unwrap() * 2.0 - 1.0;
        let raw_scaled = scaled.matrix.get(i, j).unwrap() * 2.0 - 1.0;
        assert!(
            (raw_scaled * factor - raw_dot).abs() < 1e-9,
            "cell ({i}, {j}): {raw_scaled} × √50 != {raw_dot}"
        );
    }
}

#[test]
fn test_cosine_and_dot_product_reports_match() {
    let cosine = analyze(MIXED, ScoringMode::Cosine).unwrap();
    let dot = analyze(MIXED, ScoringMode::DotProduct).unwrap();
    assert_eq!(cosine.matrix, dot.matrix);
    assert_eq!(cosine.insights, dot.insights);
}

#[test]
fn test_unknown_mode_token_behaves_like_cosine() {
    let fallback = analyze(MIXED, ScoringMode::from_token("attention-is-all-you-need")).unwrap();
    let cosine = analyze(MIXED, ScoringMode::Cosine).unwrap();
    assert_eq!(fallback.matrix, cosine.matrix);
}

#[test]
fn test_runs_are_deterministic() {
    for mode in ScoringMode::ALL {
        let a = analyze(MIXED, mode).unwrap();
        let b = analyze(MIXED, mode).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_insights_are_consistent_with_matrix() {
    let report = analyze(MIXED, ScoringMode::Cosine).unwrap();
    let n = report.sentence_count();
    assert_eq!(n, 5);
    assert_eq!(report.insights.sentence_count, n);

    let off: Vec<f64> = (0..n)
        .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
        .map(|(i, j)| report.matrix.get(i, j).unwrap())
        .collect();
    let max = off.iter().cloned().fold(f64::MIN, f64::max);
    let min = off.iter().cloned().fold(f64::MAX, f64::min);
    let mean = off.iter().sum::<f64>() / off.len() as f64;

    let hi = report.insights.highest_attention.unwrap();
    let lo = report.insights.lowest_attention.unwrap();
    assert_eq!(hi.value, max);
    assert_eq!(lo.value, min);
    assert_ne!(hi.source, hi.target);
    assert_close(report.insights.average_attention, mean);
    assert!((0.0..=1.0).contains(&report.insights.average_attention));

    let diag: Vec<usize> = report.insights.self_attention.iter().map(|s| s.index).collect();
    assert_eq!(diag, (0..n).collect::<Vec<_>>());
    for s in &report.insights.self_attention {
        assert_close(s.value, 1.0);
    }
}

#[test]
fn test_every_cell_is_in_unit_range_for_every_mode() {
    for mode in ScoringMode::ALL {
        let report = analyze(MIXED, mode).unwrap();
        for cell in report.cells() {
            assert!((0.0..=1.0).contains(&cell.score), "{mode}: {cell:?}");
        }
    }
}

#[test]
fn test_workbench_round_trip() {
    let mut wb = Workbench::new();
    wb.process(CLUSTERED, ScoringMode::Cosine).unwrap();
    let rel = wb.select(0, 1).unwrap();
    assert_eq!(rel.shared_words, ["cats", "purr"]);

    let out = wb.render(&mut TextRenderer).unwrap();
    assert!(out.contains("Cluster 1: S1, S2"), "{out}");
    assert!(out.contains("S3: Dogs bark loudly."), "{out}");

    // A rejected run keeps the clustered report on display.
    assert!(wb.process("Only this.", ScoringMode::Cosine).is_err());
    assert_eq!(wb.report().unwrap().sentence_count(), 3);
}
