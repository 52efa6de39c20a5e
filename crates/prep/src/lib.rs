#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Corpus preparation for embedding-based score models.
//!
//! Loads a GloVe word-vector table and a CSV of movie records, splits the
//! records into train/test sets and tokenizes each summary into units that
//! line up with the vector vocabulary.
//!
//! Layout:
//! - `corpus.rs`: `Corpus` (titles, summaries, scores) from CSV
//! - `embeddings.rs`: `Embeddings` table from GloVe text, lookup and coverage
//! - `pipeline.rs`: `prepare` (split + tokenize) and `run` (config-driven)
//! - `config.rs`: `prep.toml` settings
//! - `bin/prep.rs`: CLI
//!
//! Tokenization lives in the `tokenize` crate and partitioning in `sampler`.

/// Configuration file handling.
pub mod config;
/// CSV record loading.
pub mod corpus;
/// Word-vector table loading and lookup.
pub mod embeddings;
/// Error type shared by every step.
pub mod error;
/// Split + tokenize wiring.
pub mod pipeline;

pub use config::{LogLevel, LoggingConfig, Overrides, PrepConfig};
pub use corpus::Corpus;
pub use embeddings::{Coverage, Embeddings};
pub use error::{PrepError, Result};
pub use pipeline::{prepare, run, Outcome, Prepared, Report};

pub use sampler::{Partition, SamplerError, DEFAULT_TEST_FRACTION};
pub use tokenize::{Token, TokenKind, TokenizeError};
