//! # attention-lens
//!
//! Sentence attention maps: how much does each sentence in a text "attend" to
//! every other one?
//!
//! ---
//!
//! ## This is not a language model. It is a deterministic toy.
//!
//! Embeddings are not learned. Each sentence is hashed, the hash seeds a
//! smooth sine-based generator, and the resulting 50-dimensional vector is
//! normalised to unit length. The same sentence always lands on the same
//! vector; different sentences land on effectively independent directions.
//!
//! What the crate *does* model faithfully is the shape of an attention
//! analysis: a square score matrix over every ordered sentence pair, the
//! strongest and weakest links, the average, and a naive clustering of
//! strongly-linked sentences.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! text → Sentences → Embeddings → AttentionMatrix → Insights → Renderer
//!           ↑             ↑              ↑              ↑
//!    split_sentences  HashEmbedder   ScoringMode   greedy_clusters
//! ```
//!
//! ```rust
//! use attention_lens::{analyze, ScoringMode};
//!
//! let report = analyze("I love cats. Cats are great.", ScoringMode::Cosine).unwrap();
//! assert_eq!(report.sentence_count(), 2);
//! assert_eq!(report.matrix.get(0, 1), report.matrix.get(1, 0));
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`seed`] | [`seed::string_hash`], [`seed::pseudo_random`] | Deterministic hash and stateless generator |
//! | [`sentence`] | [`Sentence`] | Split text on `.`, `!`, `?` |
//! | [`embedding`] | [`Embedding`], [`Embedder`], [`HashEmbedder`] | Hash-seeded unit vectors |
//! | [`attention`] | [`ScoringMode`], [`AttentionMatrix`] | Pairwise scoring in three modes |
//! | [`insight`] | [`Insights`], [`Cluster`] | Extremes, average, greedy clustering |
//! | [`pipeline`] | [`AttentionReport`], [`AnalysisConfig`], [`CellView`] | The processing boundary |
//! | [`view`] | [`Workbench`], [`Renderer`], [`TextRenderer`] | Selection state and rendering |
//! | [`error`] | [`AttentionError`] | Boundary errors |
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for reports, insights and configuration.
//! - `python-ffi`: PyO3 bindings (see `ffi`).
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod seed;
pub mod sentence;
pub mod embedding;
pub mod attention;
pub mod insight;
pub mod pipeline;
pub mod view;
pub mod error;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use attention::{score_matrix, AttentionMatrix, ScoringMode};
pub use embedding::{embed, Embedder, Embedding, HashEmbedder, SentenceEmbedding, EMBEDDING_DIM};
pub use error::{AttentionError, AttentionResult};
pub use insight::{
    connected_clusters, extract_insights, greedy_clusters, AttentionPair, Cluster, Insights,
    SelfAttention, CLUSTER_THRESHOLD,
};
pub use pipeline::{analyze, analyze_with, AnalysisConfig, AttentionReport, CellView};
pub use sentence::{split_sentences, Sentence};
pub use view::{Relationship, Renderer, TextRenderer, Workbench};
