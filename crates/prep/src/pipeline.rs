#![forbid(unsafe_code)]

//! Wiring: corpus -> partition -> tokens, with optional vocabulary coverage.

use rand::Rng;
use rayon::prelude::*;
use sampler::SamplerError;
use serde::Serialize;
use tokenize::Token;
use tracing::{debug, info};

use crate::config::PrepConfig;
use crate::corpus::Corpus;
use crate::embeddings::{Coverage, Embeddings};
use crate::error::{PrepError, Result};

/// Tokenized train/test split of a corpus.
///
/// `train_tokens[i]` and `train_scores[i]` belong to record `train_indices[i]`;
/// the same holds for the test side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prepared {
    /// ascending record indices used for training
    pub train_indices: Vec<usize>,
    /// held-out record indices, in draw order
    pub test_indices: Vec<usize>,
    /// tokenized training summaries
    pub train_tokens: Vec<Vec<Token>>,
    /// tokenized test summaries
    pub test_tokens: Vec<Vec<Token>>,
    /// training labels
    pub train_scores: Vec<f64>,
    /// test labels
    pub test_scores: Vec<f64>,
}

impl Prepared {
    /// Number of tokens across all training summaries
    pub fn train_token_count(&self) -> usize {
        self.train_tokens.iter().map(Vec::len).sum()
    }

    /// Number of tokens across all test summaries
    pub fn test_token_count(&self) -> usize {
        self.test_tokens.iter().map(Vec::len).sum()
    }

    /// How many produced tokens have a vector in `table`.
    pub fn coverage(&self, table: &Embeddings) -> Coverage {
        let mut total = Coverage::default();
        for tokens in self.train_tokens.iter().chain(&self.test_tokens) {
            total += table.coverage(tokens);
        }
        total
    }
}

/// Partition the corpus summaries and tokenize both sides.
pub fn prepare<R: Rng + ?Sized>(
    corpus: &Corpus,
    test_fraction: f64,
    rng: &mut R,
) -> Result<Prepared> {
    let split = sampler::partition(corpus.summaries(), test_fraction, rng)?;
    let (train_summaries, test_summaries, test_indices, train_indices) = split.into_parts();
    debug!(
        train = train_indices.len(),
        test = test_indices.len(),
        "corpus partitioned"
    );

    Ok(Prepared {
        train_tokens: tokenize_all(&train_summaries),
        test_tokens: tokenize_all(&test_summaries),
        train_scores: scores_at(corpus, &train_indices)?,
        test_scores: scores_at(corpus, &test_indices)?,
        train_indices,
        test_indices,
    })
}

fn tokenize_all(texts: &[String]) -> Vec<Vec<Token>> {
    texts
        .par_iter()
        .map(|text| tokenize::tokenize(text))
        .collect()
}

fn scores_at(corpus: &Corpus, indices: &[usize]) -> Result<Vec<f64>> {
    let scores = corpus.scores();
    indices
        .iter()
        .map(|&index| {
            scores.get(index).copied().ok_or_else(|| {
                PrepError::from(SamplerError::IndexOutOfRange {
                    index,
                    len: scores.len(),
                })
            })
        })
        .collect()
}

/// Summary of one run, printed by the CLI.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    /// number of records in the corpus
    pub records: usize,
    /// fraction used for the split
    pub test_fraction: f64,
    /// seed, when the run was reproducible
    pub seed: Option<u64>,
    /// held-out record indices, in draw order
    pub test_indices: Vec<usize>,
    /// training record indices, ascending
    pub train_indices: Vec<usize>,
    /// tokens produced for the training side
    pub train_tokens: usize,
    /// tokens produced for the test side
    pub test_tokens: usize,
    /// vocabulary coverage, when an embedding table was configured
    pub coverage: Option<Coverage>,
}

/// Everything a run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    /// run summary
    pub report: Report,
    /// full token sequences
    pub prepared: Prepared,
}

/// Load the configured corpus (and embedding table, if any) and prepare it.
pub fn run(config: &PrepConfig) -> Result<Outcome> {
    let corpus = Corpus::load(&config.corpus)?;
    let prepared = match config.seed {
        Some(seed) => {
            let mut rng = sampler::make_rng(seed);
            prepare(&corpus, config.test_fraction, &mut rng)?
        }
        None => prepare(&corpus, config.test_fraction, &mut rand::thread_rng())?,
    };

    let coverage = match &config.embeddings {
        Some(path) => {
            let table = Embeddings::load(path)?;
            let coverage = prepared.coverage(&table);
            info!(
                found = coverage.found,
                missing = coverage.missing,
                "vocabulary coverage"
            );
            Some(coverage)
        }
        None => None,
    };

    let report = Report {
        records: corpus.len(),
        test_fraction: config.test_fraction,
        seed: config.seed,
        test_indices: prepared.test_indices.clone(),
        train_indices: prepared.train_indices.clone(),
        train_tokens: prepared.train_token_count(),
        test_tokens: prepared.test_token_count(),
        coverage,
    };
    info!(
        records = report.records,
        train = report.train_indices.len(),
        test = report.test_indices.len(),
        "corpus prepared"
    );
    Ok(Outcome { report, prepared })
}
