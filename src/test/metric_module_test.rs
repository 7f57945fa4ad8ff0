use crate::metric::*;
use approx::assert_abs_diff_eq;
use ndarray::{Array1, array, s};

#[test]
fn test_accuracy() {
    // All correct
    assert_eq!(accuracy(&array![1, 2, 3], &array![1, 2, 3]), 1.0);
    // All wrong
    assert_eq!(accuracy(&array![1, 2, 3], &array![2, 3, 4]), 0.0);
    // Partially correct
    assert_abs_diff_eq!(accuracy(&array![5, 4, 3, 2], &array![5, 4, 1, 1]), 0.5);
}

#[test]
fn test_accuracy_on_views() {
    let predicted = array![5, 5, 1, 1];
    let actual = array![5, 1, 1, 5];
    // [5, 5, 1] against [5, 1, 1]
    assert_abs_diff_eq!(
        accuracy(&predicted.slice(s![..3]), &actual.slice(s![..3])),
        2.0 / 3.0,
        epsilon = 1e-12
    );
    assert_eq!(accuracy(&predicted.view(), &actual), 0.5);
}

#[test]
#[should_panic(expected = "Input arrays must have the same length")]
fn test_accuracy_length_mismatch() {
    accuracy(&array![1, 2], &array![1, 2, 3]);
}

#[test]
#[should_panic(expected = "Input arrays must not be empty")]
fn test_accuracy_empty() {
    let empty: Array1<i64> = array![];
    accuracy(&empty, &empty);
}

#[test]
fn test_mean_absolute_error() {
    assert_eq!(mean_absolute_error(&array![3, 3], &array![3, 3]), 0.0);
    assert_abs_diff_eq!(mean_absolute_error(&array![1, 5], &array![5, 1]), 4.0);
    assert_abs_diff_eq!(mean_absolute_error(&array![2, 4, 4], &array![3, 4, 2]), 1.0);
}

#[test]
#[should_panic(expected = "Input arrays must have the same length")]
fn test_mean_absolute_error_length_mismatch() {
    mean_absolute_error(&array![1], &array![1, 2]);
}
