//! Insight extraction: extremes, averages and naive clustering over an
//! attention matrix.
//!
//! # Scan order
//!
//! All cells are visited in row-major order. Off-diagonal cells feed the
//! average and the extremes; diagonal cells feed the self-attention list.
//! Extremes use strict comparisons, so the first extremum encountered wins a
//! tie. The highest is seeded at 0.0 and the lowest at 1.0: a matrix whose
//! off-diagonal cells never beat the seed (including any matrix with fewer than
//! two sentences) reports no extremum.
//!
//! # Clustering
//!
//! [`greedy_clusters`] grows one cluster per unvisited index, pulling in every
//! unvisited index linked to the *seed* above the threshold in either
//! direction. Links between non-seed members are never followed, so the
//! result depends on index order and is not a transitive closure. Singletons
//! are dropped but stay visited.
//!
//! [`connected_clusters`] is the transitive alternative, kept separate.

use hashbrown::HashSet;

use crate::attention::AttentionMatrix;
use crate::sentence::Sentence;

/// Score above which two sentences are grouped into one cluster.
pub const CLUSTER_THRESHOLD: f64 = 0.7;

/// A directed `(source, target, value)` cell.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttentionPair {
    /// Source (row) index.
    pub source: usize,
    /// Target (column) index.
    pub target: usize,
    /// Score in [0.0, 1.0].
    pub value: f64,
}

/// A diagonal (self-attention) entry.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelfAttention {
    /// Sentence index.
    pub index: usize,
    /// Score of the sentence against itself.
    pub value: f64,
}

/// A reported group of at least two sentence indices, in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Cluster {
    members: Vec<usize>,
}

impl Cluster {
    /// Member indices; the seed comes first.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of members (always ≥ 2 for reported clusters).
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// `true` if the cluster has no members. Never the case for reported clusters.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `index` belongs to this cluster.
    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }
}

impl From<Vec<usize>> for Cluster {
    fn from(members: Vec<usize>) -> Self {
        Self { members }
    }
}

/// Summary statistics derived from one attention matrix.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insights {
    /// Number of sentences analysed.
    pub sentence_count: usize,
    /// Strongest off-diagonal cell, if any beat 0.0.
    pub highest_attention: Option<AttentionPair>,
    /// Weakest off-diagonal cell, if any fell below 1.0.
    pub lowest_attention: Option<AttentionPair>,
    /// Diagonal entries in index order.
    pub self_attention: Vec<SelfAttention>,
    /// Mean of all off-diagonal cells; 0.0 when there are none.
    pub average_attention: f64,
    /// Greedy clusters with more than one member.
    pub clusters: Vec<Cluster>,
}

/// Derive [`Insights`] from an attention matrix with the default threshold.
///
/// `sentences` supplies the count; the matrix is expected to be
/// `sentences.len()` square. Cells outside the matrix are treated as absent.
pub fn extract_insights(sentences: &[Sentence], matrix: &AttentionMatrix) -> Insights {
    extract_insights_with_threshold(sentences, matrix, CLUSTER_THRESHOLD)
}

/// [`extract_insights`] with an explicit clustering threshold.
pub fn extract_insights_with_threshold(
    sentences: &[Sentence],
    matrix: &AttentionMatrix,
    threshold: f64,
) -> Insights {
    let n = sentences.len().min(matrix.size());

    let mut highest = AttentionPair { source: 0, target: 0, value: 0.0 };
    let mut lowest = AttentionPair { source: 0, target: 0, value: 1.0 };
    let mut highest_found = false;
    let mut lowest_found = false;
    let mut self_attention = Vec::with_capacity(n);
    let mut sum = 0.0_f64;
    let mut count = 0usize;

    for (i, row) in matrix.rows().take(n).enumerate() {
        for (j, &value) in row.iter().take(n).enumerate() {
            if i == j {
                self_attention.push(SelfAttention { index: i, value });
                continue;
            }
            sum += value;
            count += 1;
            if value > highest.value {
                highest = AttentionPair { source: i, target: j, value };
                highest_found = true;
            }
            if value < lowest.value {
                lowest = AttentionPair { source: i, target: j, value };
                lowest_found = true;
            }
        }
    }

    Insights {
        sentence_count: sentences.len(),
        highest_attention: highest_found.then_some(highest),
        lowest_attention: lowest_found.then_some(lowest),
        self_attention,
        average_attention: if count > 0 { sum / count as f64 } else { 0.0 },
        clusters: greedy_clusters_within(matrix, n, threshold),
    }
}

/// `true` if either direction between `i` and `j` exceeds `threshold`.
fn linked(matrix: &AttentionMatrix, i: usize, j: usize, threshold: f64) -> bool {
    matrix.get(i, j).is_some_and(|v| v > threshold)
        || matrix.get(j, i).is_some_and(|v| v > threshold)
}

/// Single-pass greedy clustering (see module docs). Order-dependent and not
/// transitive; [`connected_clusters`] is the closure variant.
pub fn greedy_clusters(matrix: &AttentionMatrix, threshold: f64) -> Vec<Cluster> {
    greedy_clusters_within(matrix, matrix.size(), threshold)
}

/// Greedy clustering over the leading `n` indices only.
fn greedy_clusters_within(matrix: &AttentionMatrix, n: usize, threshold: f64) -> Vec<Cluster> {
    let n = n.min(matrix.size());
    let mut visited: HashSet<usize> = HashSet::with_capacity(n);
    let mut clusters = Vec::new();

    for i in 0..n {
        if !visited.insert(i) {
            continue;
        }
        let mut members = vec![i];
        for j in 0..n {
            if j != i && !visited.contains(&j) && linked(matrix, i, j, threshold) {
                members.push(j);
                visited.insert(j);
            }
        }
        if members.len() > 1 {
            clusters.push(Cluster::from(members));
        }
    }

    clusters
}

/// Transitive alternative to [`greedy_clusters`]: connected components of the
/// above-threshold link graph, each sorted ascending. Singletons are dropped.
pub fn connected_clusters(matrix: &AttentionMatrix, threshold: f64) -> Vec<Cluster> {
    let n = matrix.size();
    let mut visited: HashSet<usize> = HashSet::with_capacity(n);
    let mut clusters = Vec::new();

    for root in 0..n {
        if !visited.insert(root) {
            continue;
        }
        let mut members = vec![root];
        let mut frontier = vec![root];
        while let Some(current) = frontier.pop() {
            for next in 0..n {
                if !visited.contains(&next) && linked(matrix, current, next, threshold) {
                    visited.insert(next);
                    members.push(next);
                    frontier.push(next);
                }
            }
        }
        if members.len() > 1 {
            members.sort_unstable();
            clusters.push(Cluster::from(members));
        }
    }

    clusters
}
