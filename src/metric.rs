use crate::dataset::Label;
use ndarray::{ArrayBase, Data, Ix1};

/// Calculate the accuracy of a classification model.
///
/// Accuracy is the proportion of predictions that exactly match the true label.
///
/// # Parameters
///
/// - `predicted` - Predicted labels
/// - `actual` - Ground-truth labels
///
/// # Examples
/// ```rust
/// use shelftree::metric::accuracy;
/// use ndarray::array;
///
/// let predicted = array![5, 3, 1];
/// let actual = array![5, 4, 1];
/// let acc = accuracy(&predicted, &actual);
/// assert!((acc - 0.6666666666666666).abs() < 1e-12);
/// ```
///
/// # Returns
///
/// - `f64` - Accuracy in the range \[0.0, 1.0\]
///
/// # Panics
///
/// - Panics if the two arrays have different lengths
/// - Panics if input arrays are empty
pub fn accuracy<S1, S2>(predicted: &ArrayBase<S1, Ix1>, actual: &ArrayBase<S2, Ix1>) -> f64
where
    S1: Data<Elem = Label>,
    S2: Data<Elem = Label>,
{
    if predicted.len() != actual.len() {
        panic!(
            "Input arrays must have the same length. Predicted: {}, Actual: {}",
            predicted.len(),
            actual.len()
        );
    }

    if predicted.is_empty() {
        panic!("Input arrays must not be empty");
    }

    let correct_predictions = predicted
        .iter()
        .zip(actual.iter())
        .filter(|&(p, a)| p == a)
        .count();

    correct_predictions as f64 / predicted.len() as f64
}

/// Calculates the mean absolute error between predicted and actual ratings.
///
/// Unlike [`accuracy`], a prediction that misses by one star costs less than one that
/// misses by four.
///
/// # Parameters
///
/// - `predicted` - Predicted labels
/// - `actual` - Ground-truth labels
///
/// # Returns
///
/// - `f64` - The mean absolute difference
///
/// # Examples
/// ```rust
/// use shelftree::metric::mean_absolute_error;
/// use ndarray::array;
///
/// let predicted = array![5, 3, 1];
/// let actual = array![5, 4, 4];
/// assert!((mean_absolute_error(&predicted, &actual) - 4.0 / 3.0).abs() < 1e-12);
/// ```
///
/// # Panics
///
/// - Panics if the two arrays have different lengths
/// - Panics if input arrays are empty
pub fn mean_absolute_error<S1, S2>(
    predicted: &ArrayBase<S1, Ix1>,
    actual: &ArrayBase<S2, Ix1>,
) -> f64
where
    S1: Data<Elem = Label>,
    S2: Data<Elem = Label>,
{
    if predicted.len() != actual.len() {
        panic!(
            "Input arrays must have the same length. Predicted: {}, Actual: {}",
            predicted.len(),
            actual.len()
        );
    }

    if predicted.is_empty() {
        panic!("Input arrays must not be empty");
    }

    let total: i64 = predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| (p - a).abs())
        .sum();

    total as f64 / predicted.len() as f64
}
