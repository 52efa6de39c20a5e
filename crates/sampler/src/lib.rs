#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Train/test partitioning of a record sequence.
//!
//! Records are identified only by their position. A partition draws
//! `floor(N * f)` distinct test indices uniformly at random and puts every
//! other index in the training set.
//!
//! Contract: the random stream is always passed in by the caller. Same seed +
//! same input -> same partition.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Share of records held out for testing in the default configuration.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Error type for partitioning
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SamplerError {
    /// Test fraction is not strictly between 0 and 1 (or is NaN)
    #[error("invalid test fraction {0}: must lie strictly between 0 and 1")]
    InvalidFraction(f64),
    /// Nothing to partition
    #[error("cannot partition an empty corpus")]
    EmptyCorpus,
    /// An index outside `[0, len)` was produced. Internal invariant violation.
    #[error("index {index} out of range for {len} records")]
    IndexOutOfRange {
        /// offending index
        index: usize,
        /// number of records
        len: usize,
    },
}

/// Result of splitting a record sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition<T> {
    /// values at `train_indices`, ascending index order
    pub train_values: Vec<T>,
    /// values at `test_indices`, in draw order
    pub test_values: Vec<T>,
    /// distinct held-out indices, in draw order
    pub test_indices: Vec<usize>,
    /// complement of `test_indices`, ascending
    pub train_indices: Vec<usize>,
}

impl<T> Partition<T> {
    /// Total number of records covered
    pub fn len(&self) -> usize {
        self.train_indices.len() + self.test_indices.len()
    }

    /// True when the partition covers no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(train_values, test_values, test_indices, train_indices)`
    pub fn into_parts(self) -> (Vec<T>, Vec<T>, Vec<usize>, Vec<usize>) {
        (
            self.train_values,
            self.test_values,
            self.test_indices,
            self.train_indices,
        )
    }
}

/// Seeded stream for reproducible partitions.
pub fn make_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Number of test records for `n` records: `floor(n * test_fraction)`.
///
/// The fraction is checked before the corpus size.
pub fn test_count(n: usize, test_fraction: f64) -> Result<usize, SamplerError> {
    // written this way so NaN is rejected too
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SamplerError::InvalidFraction(test_fraction));
    }
    if n == 0 {
        return Err(SamplerError::EmptyCorpus);
    }
    Ok((n as f64 * test_fraction).floor() as usize)
}

/// Split `values` into train and test subsets.
///
/// Test indices come from a Fisher-Yates shuffle of `0..N` driven by `rng`;
/// the first `floor(N * test_fraction)` shuffled indices are held out. Every
/// swap position is drawn from an exclusive range, so no index equals `N`.
pub fn partition<T, R>(
    values: &[T],
    test_fraction: f64,
    rng: &mut R,
) -> Result<Partition<T>, SamplerError>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let n = values.len();
    let k = test_count(n, test_fraction)?;

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    order.truncate(k);
    let test_indices = order;

    let mut held_out = vec![false; n];
    for &index in &test_indices {
        let slot = held_out
            .get_mut(index)
            .ok_or(SamplerError::IndexOutOfRange { index, len: n })?;
        *slot = true;
    }
    let train_indices: Vec<usize> = held_out
        .iter()
        .enumerate()
        .filter(|&(_, &is_test)| !is_test)
        .map(|(i, _)| i)
        .collect();

    Ok(Partition {
        train_values: pick(values, &train_indices)?,
        test_values: pick(values, &test_indices)?,
        test_indices,
        train_indices,
    })
}

/// [`partition`] over a fresh stream seeded with `seed`.
pub fn partition_seeded<T: Clone>(
    values: &[T],
    test_fraction: f64,
    seed: u64,
) -> Result<Partition<T>, SamplerError> {
    partition(values, test_fraction, &mut make_rng(seed))
}

fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Result<Vec<T>, SamplerError> {
    indices
        .iter()
        .map(|&index| {
            values.get(index).cloned().ok_or(SamplerError::IndexOutOfRange {
                index,
                len: values.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("summary {i}")).collect()
    }

    #[test]
    fn default_split_sizes() -> Result<(), SamplerError> {
        let p = partition_seeded(&records(10), DEFAULT_TEST_FRACTION, 42)?;
        assert_eq!(p.test_indices.len(), 2);
        assert_eq!(p.train_indices.len(), 8);
        assert_eq!(p.len(), 10);
        Ok(())
    }

    #[test]
    fn single_record_goes_to_training() -> Result<(), SamplerError> {
        let p = partition_seeded(&records(1), 0.2, 7)?;
        assert!(p.test_indices.is_empty());
        assert_eq!(p.train_indices, vec![0]);
        assert_eq!(p.train_values, vec!["summary 0".to_string()]);
        Ok(())
    }

    #[test]
    fn values_follow_indices() -> Result<(), SamplerError> {
        let values = records(50);
        let p = partition_seeded(&values, 0.3, 3)?;
        for (value, &i) in p.test_values.iter().zip(&p.test_indices) {
            assert_eq!(Some(value), values.get(i));
        }
        for (value, &i) in p.train_values.iter().zip(&p.train_indices) {
            assert_eq!(Some(value), values.get(i));
        }
        assert!(p
            .train_indices
            .iter()
            .zip(p.train_indices.iter().skip(1))
            .all(|(a, b)| a < b));
        Ok(())
    }

    #[test]
    fn no_index_reaches_len() -> Result<(), SamplerError> {
        // regression: draws use an exclusive upper bound
        for seed in 0..200 {
            let p = partition_seeded(&records(5), 0.8, seed)?;
            assert!(p.test_indices.iter().all(|&i| i < 5));
        }
        Ok(())
    }

    #[test]
    fn rejects_invalid_fractions() {
        let values = records(4);
        for f in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(
                matches!(
                    partition_seeded(&values, f, 1),
                    Err(SamplerError::InvalidFraction(_))
                ),
                "{f}"
            );
        }
    }

    #[test]
    fn rejects_empty_corpus() {
        let empty: Vec<u32> = Vec::new();
        assert_eq!(
            partition_seeded(&empty, 0.2, 1),
            Err(SamplerError::EmptyCorpus)
        );
    }

    #[test]
    fn test_count_floors() {
        assert_eq!(test_count(10, 0.2), Ok(2));
        assert_eq!(test_count(1, 0.2), Ok(0));
        assert_eq!(test_count(9, 0.5), Ok(4));
    }

    #[test]
    fn same_seed_same_partition() {
        let values = records(100);
        assert_eq!(
            partition_seeded(&values, 0.2, 99),
            partition_seeded(&values, 0.2, 99)
        );
    }

    #[test]
    fn different_seeds_differ() -> Result<(), SamplerError> {
        let values = records(100);
        let a = partition_seeded(&values, 0.2, 1)?;
        let b = partition_seeded(&values, 0.2, 2)?;
        assert_ne!(a.test_indices, b.test_indices);
        Ok(())
    }

    #[test]
    fn draws_are_roughly_uniform() -> Result<(), SamplerError> {
        let values = records(5);
        let mut hits = vec![0usize; 5];
        let mut rng = make_rng(2024);
        for _ in 0..5000 {
            let p = partition(&values, 0.2, &mut rng)?;
            for &i in &p.test_indices {
                if let Some(count) = hits.get_mut(i) {
                    *count += 1;
                }
            }
        }
        assert_eq!(hits.iter().sum::<usize>(), 5000);
        assert!(hits.iter().all(|&h| (800..1200).contains(&h)), "{hits:?}");
        Ok(())
    }

    #[test]
    fn into_parts_order() -> Result<(), SamplerError> {
        let p = partition_seeded(&records(10), 0.2, 5)?;
        let expected = p.clone();
        let (train_v, test_v, test_i, train_i) = p.into_parts();
        assert_eq!(train_v, expected.train_values);
        assert_eq!(test_v, expected.test_values);
        assert_eq!(test_i, expected.test_indices);
        assert_eq!(train_i, expected.train_indices);
        Ok(())
    }
}
