//! Deterministic shuffled train/test split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::Dataset;
use crate::domain::error::DomainError;

/// Seed used by every randomized pipeline step
pub const DEFAULT_SEED: u64 = 42;

/// Split rows into `(train, test)`.
///
/// The test split takes `ceil(test_size * n)` rows of a seeded shuffle and
/// the train split takes the rest. Both splits must end up non-empty.
pub fn train_test_split(
    dataset: &Dataset,
    test_size: f64,
    seed: u64,
) -> Result<(Dataset, Dataset), DomainError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DomainError::validation(format!(
            "test_size must be between 0 and 1 (exclusive), got {}",
            test_size
        )));
    }

    let n = dataset.n_rows();
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(DomainError::dataset(format!(
            "Cannot split {} rows with test_size {}: one split would be empty",
            n, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_indices, train_indices) = indices.split_at(n_test);

    Ok((
        dataset.select_rows(train_indices),
        dataset.select_rows(test_indices),
    ))
}
