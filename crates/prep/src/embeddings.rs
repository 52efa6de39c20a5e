#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PrepError, Result};

/// Pretrained word vectors keyed by token text.
///
/// Every vector in a table has the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Embeddings {
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
}

/// How many tokens of a sequence have a vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Coverage {
    /// tokens present in the table
    pub found: usize,
    /// tokens absent from the table
    pub missing: usize,
}

impl Coverage {
    /// found / total, `None` when no tokens were seen
    pub fn ratio(&self) -> Option<f64> {
        let total = self.found + self.missing;
        (total > 0).then(|| self.found as f64 / total as f64)
    }
}

impl std::ops::AddAssign for Coverage {
    fn add_assign(&mut self, other: Self) {
        self.found += other.found;
        self.missing += other.missing;
    }
}

impl Embeddings {
    /// Load a GloVe text file: one `word v1 v2 ... vd` entry per line.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading embedding table");
        let file = File::open(path).map_err(|source| PrepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(BufReader::new(file))?;
        info!(
            words = table.len(),
            dim = table.dim(),
            "embedding table loaded"
        );
        Ok(table)
    }

    /// Parse GloVe text from a buffered reader. Blank lines are skipped; a
    /// repeated word keeps its last vector.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut table = Self::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i as u64 + 1;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let vector = fields
                .map(|v| {
                    v.parse::<f32>().map_err(|_| PrepError::ParseVector {
                        line: line_no,
                        value: v.to_string(),
                    })
                })
                .collect::<Result<Vec<f32>>>()?;

            if table.vectors.is_empty() {
                if vector.is_empty() {
                    return Err(PrepError::MissingField {
                        line: line_no,
                        field: "vector",
                    });
                }
                table.dim = vector.len();
            } else if vector.len() != table.dim {
                return Err(PrepError::DimensionMismatch {
                    line: line_no,
                    expected: table.dim,
                    found: vector.len(),
                });
            }
            if table.vectors.insert(word.to_string(), vector).is_some() {
                debug!(word, line = line_no, "duplicate word replaced");
            }
        }
        Ok(table)
    }

    /// Vector length, 0 for an empty table
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True when no words were loaded
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector for `token`
    pub fn get(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(Vec::as_slice)
    }

    /// True when `token` has a vector
    pub fn contains(&self, token: &str) -> bool {
        self.vectors.contains_key(token)
    }

    /// Look up every token in order. Absent tokens map to `None`.
    pub fn lookup<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<Option<&[f32]>> {
        tokens.iter().map(|t| self.get(t.as_ref())).collect()
    }

    /// Count present and absent tokens.
    pub fn coverage<S: AsRef<str>>(&self, tokens: &[S]) -> Coverage {
        let found = tokens.iter().filter(|t| self.contains(t.as_ref())).count();
        Coverage {
            found,
            missing: tokens.len() - found,
        }
    }
}
