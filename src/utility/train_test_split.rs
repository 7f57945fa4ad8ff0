use crate::dataset::Dataset;
use crate::error::ModelError;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Splits a dataset into a training set and a held-out test set of fixed size
///
/// Rows are first ordered by ascending item identifier, so the split never depends on
/// the order the dataset was assembled in. Without a seed the last `n_test` rows of that
/// order are held out; with a seed the ordered rows are shuffled reproducibly first.
///
/// # Parameters
///
/// - `dataset` - Samples of one user
/// - `n_test` - Number of samples to hold out
/// - `random_state` - Seed for a reproducible shuffle, `None` for the sorted tail
///
/// # Returns
///
/// - `Result<(Dataset, Dataset), ModelError>` - Returns a tuple `(train, test)` if processing successfully
///
/// # Errors
///
/// - Returns `ModelError::InputValidationError` if the dataset is empty, if `n_test` is 0,
///   or if holding out `n_test` samples would leave no training samples.
///
/// # Example
/// ```rust
/// use shelftree::dataset::{Dataset, Item};
/// use shelftree::utility::train_test_split::train_test_split;
///
/// let data = Dataset::new(
///     (1..=5)
///         .rev()
///         .map(|id| (Item::from_pairs(id, [("genre", "fiction")]), 3))
///         .collect(),
/// )
/// .unwrap();
/// let (train, test) = train_test_split(&data, 2, None).unwrap();
/// let held_out: Vec<i64> = test.get_items().iter().map(|item| item.get_id()).collect();
/// assert_eq!(train.len(), 3);
/// assert_eq!(held_out, vec![4, 5]);
/// ```
pub fn train_test_split(
    dataset: &Dataset,
    n_test: usize,
    random_state: Option<u64>,
) -> Result<(Dataset, Dataset), ModelError> {
    let n_samples = dataset.len();

    if n_samples == 0 {
        return Err(ModelError::InputValidationError(
            "Cannot split empty dataset".to_string(),
        ));
    }

    if n_test == 0 {
        return Err(ModelError::InputValidationError(
            "n_test must be at least 1".to_string(),
        ));
    }

    if n_test >= n_samples {
        return Err(ModelError::InputValidationError(format!(
            "Cannot hold out {} of {} samples and still keep a training set",
            n_test, n_samples
        )));
    }

    let items = dataset.get_items();
    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.sort_by_key(|&i| items[i].get_id());

    if let Some(seed) = random_state {
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    }

    let (train_indices, test_indices) = indices.split_at(n_samples - n_test);

    Ok((dataset.select(train_indices), dataset.select(test_indices)))
}
