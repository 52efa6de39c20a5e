#![forbid(unsafe_code)]

use std::path::PathBuf;

use sampler::SamplerError;

/// Error type for corpus preparation
#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    /// Opening or reading a named file failed
    #[error("I/O error for {path}: {source}")]
    Io {
        /// file that was being accessed
        path: PathBuf,
        /// underlying error
        #[source]
        source: std::io::Error,
    },

    /// Reading from an in-memory or already-open source failed
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent on a row
    #[error("line {line}: missing {field} field")]
    MissingField {
        /// 1-based line number
        line: u64,
        /// column name
        field: &'static str,
    },

    /// Score column is not a number
    #[error("line {line}: invalid score {value:?}")]
    ParseScore {
        /// 1-based line number
        line: u64,
        /// raw field
        value: String,
    },

    /// Embedding component is not a number
    #[error("line {line}: invalid vector component {value:?}")]
    ParseVector {
        /// 1-based line number
        line: u64,
        /// raw field
        value: String,
    },

    /// Embedding row has a different length than the first row
    #[error("line {line}: expected {expected} vector components, found {found}")]
    DimensionMismatch {
        /// 1-based line number
        line: u64,
        /// dimension of the table
        expected: usize,
        /// dimension of this row
        found: usize,
    },

    /// Parallel record columns have different lengths
    #[error("column lengths differ: {titles} titles, {summaries} summaries, {scores} scores")]
    MisalignedColumns {
        /// number of titles
        titles: usize,
        /// number of summaries
        summaries: usize,
        /// number of scores
        scores: usize,
    },

    /// Config file is not valid TOML for [`crate::config::PrepConfig`]
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// Partitioning failed
    #[error(transparent)]
    Sampler(#[from] SamplerError),
}

/// Result type alias for preparation steps.
pub type Result<T> = std::result::Result<T, PrepError>;
