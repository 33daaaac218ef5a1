//! Deterministic Train/Test Splitting

use crate::ModelError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices for the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    /// Training rows
    pub train: Vec<usize>,
    /// Held-out rows
    pub test: Vec<usize>,
}

/// Shuffle row indices with a fixed seed and carve off the test partition.
///
/// The test partition takes `ceil(rows * test_fraction)` rows. Same row
/// count and seed always produce the same partitions.
pub fn train_test_split(
    rows: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices, ModelError> {
    if rows < 2 {
        return Err(ModelError::TooFewRows { rows });
    }

    let mut n_test = (rows as f64 * test_fraction).ceil() as usize;
    n_test = n_test.clamp(1, rows - 1);

    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(SplitIndices {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_sizes() {
        let split = train_test_split(10, 0.2, 0).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn test_split_is_deterministic() {
        let first = train_test_split(50, 0.2, 0).unwrap();
        let second = train_test_split(50, 0.2, 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seed_differs() {
        let first = train_test_split(50, 0.2, 0).unwrap();
        let second = train_test_split(50, 0.2, 1).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_too_few_rows() {
        assert!(matches!(
            train_test_split(1, 0.2, 0),
            Err(ModelError::TooFewRows { rows: 1 })
        ));
        assert!(matches!(
            train_test_split(0, 0.2, 0),
            Err(ModelError::TooFewRows { rows: 0 })
        ));
    }

    #[test]
    fn test_tiny_batch_keeps_both_partitions_non_empty() {
        let split = train_test_split(2, 0.2, 0).unwrap();
        assert_eq!(split.test.len(), 1);
        assert_eq!(split.train.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_partitions_cover_all_rows(rows in 2usize..200, seed in 0u64..100) {
            let split = train_test_split(rows, 0.2, seed).unwrap();
            let mut all: Vec<usize> = split
                .train
                .iter()
                .chain(split.test.iter())
                .copied()
                .collect();
            all.sort_unstable();
            prop_assert_eq!(all, (0..rows).collect::<Vec<_>>());
            prop_assert!(!split.train.is_empty());
            prop_assert!(!split.test.is_empty());
        }
    }
}
