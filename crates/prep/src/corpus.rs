#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{PrepError, Result};

/// Movie records as three parallel columns aligned by record index.
///
/// Example: `titles()[k]`, `summaries()[k]` and `scores()[k]` all describe
/// record `k`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Corpus {
    titles: Vec<String>,
    summaries: Vec<String>,
    scores: Vec<f64>,
}

impl Corpus {
    /// Build a corpus from columns of equal length.
    pub fn new(titles: Vec<String>, summaries: Vec<String>, scores: Vec<f64>) -> Result<Self> {
        if titles.len() != summaries.len() || summaries.len() != scores.len() {
            return Err(PrepError::MisalignedColumns {
                titles: titles.len(),
                summaries: summaries.len(),
                scores: scores.len(),
            });
        }
        Ok(Self {
            titles,
            summaries,
            scores,
        })
    }

    /// Load a CSV file. The first row is a header and is skipped; columns are
    /// read by position as `title, summary, score`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading corpus");
        let file = File::open(path).map_err(|source| PrepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = Self::from_reader(file)?;
        info!(records = corpus.len(), "corpus loaded");
        Ok(corpus)
    }

    /// Parse CSV from any reader (header row first).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut corpus = Self::default();
        for record in csv.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            let field = |i: usize, name: &'static str| {
                record
                    .get(i)
                    .ok_or(PrepError::MissingField { line, field: name })
            };
            let title = field(0, "title")?;
            let summary = field(1, "summary")?;
            let raw_score = field(2, "score")?;
            let score = raw_score
                .trim()
                .parse::<f64>()
                .map_err(|_| PrepError::ParseScore {
                    line,
                    value: raw_score.to_string(),
                })?;
            corpus.titles.push(title.to_string());
            corpus.summaries.push(summary.to_string());
            corpus.scores.push(score);
        }
        debug!(records = corpus.len(), "parsed CSV records");
        Ok(corpus)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// True when there are no records
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Record titles
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Record summaries (the text that gets tokenized)
    pub fn summaries(&self) -> &[String] {
        &self.summaries
    }

    /// Record scores (voter averages)
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }
}
