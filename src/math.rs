use crate::dataset::Label;
use ahash::AHashMap;
use ndarray::{ArrayBase, Data, Ix1};

/// Counts how often each label occurs.
fn class_counts<S>(y: &ArrayBase<S, Ix1>) -> AHashMap<Label, usize>
where
    S: Data<Elem = Label>,
{
    // A handful of distinct ratings is the common case
    let mut counts = AHashMap::with_capacity(10);
    y.fold((), |_, &label| {
        *counts.entry(label).or_insert(0) += 1;
    });
    counts
}

/// Sums non-negative terms in ascending order.
///
/// The result depends only on the multiset of terms, so two partitions that hold the
/// same groups listed in a different order produce bit-identical sums.
fn sum_in_order(terms: impl Iterator<Item = f64>) -> f64 {
    let mut terms: Vec<f64> = terms.collect();
    terms.sort_unstable_by(f64::total_cmp);
    terms.into_iter().sum()
}

/// Calculates the entropy of a label set.
///
/// Entropy quantifies the impurity of a label distribution: for every distinct label
/// with empirical probability `p` it accumulates `-p * log2(p)`. Labels that do not
/// occur are never visited, so `log2(0)` is never evaluated.
///
/// # Parameters
///
/// - `y` - Class labels stored in a 1D array
///
/// # Returns
///
/// - `f64` - Entropy in bits (0.0 for empty or homogeneous label sets)
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use shelftree::math::entropy;
///
/// let labels = array![1, 1, 2, 2];
/// assert!((entropy(&labels) - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn entropy<S>(y: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = Label>,
{
    let total_samples = y.len() as f64;
    if total_samples == 0.0 {
        return 0.0;
    }

    sum_in_order(class_counts(y).values().map(|&count| {
        let p = count as f64 / total_samples;
        -p * p.log2()
    }))
}

/// Calculates the split information of a partition.
///
/// Split information is the entropy of the partition sizes themselves and is used to
/// normalize information gain. Empty parts contribute nothing.
///
/// # Parameters
///
/// - `part_sizes` - Number of samples in each part
/// - `total` - Number of samples before the split
///
/// # Returns
///
/// - `f64` - Split information in bits (0.0 when `total` is 0 or one part holds everything)
///
/// # Examples
/// ```rust
/// use shelftree::math::split_information;
///
/// // Two equally sized halves
/// assert!((split_information(&[2, 2], 4) - 1.0).abs() < 1e-12);
/// // Everything ends up in one part
/// assert_eq!(split_information(&[4, 0, 0], 4), 0.0);
/// ```
#[inline]
pub fn split_information(part_sizes: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let n = total as f64;
    let terms = part_sizes
        .iter()
        .filter(|&&size| size > 0)
        .map(|&size| {
            let p = size as f64 / n;
            -p * p.log2()
        });

    sum_in_order(terms)
}

/// Calculates the information gain of a multiway split.
///
/// # Parameters
///
/// - `y` - Class labels before the split
/// - `parts` - Class labels of every part after the split, one entry per attribute value
///
/// # Returns
///
/// - `f64` - `entropy(y)` minus the size-weighted entropy of the parts
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use shelftree::math::information_gain;
///
/// let parent = array![5, 5, 1, 1];
/// let parts = [array![5, 5], array![1, 1]];
/// assert!((information_gain(&parent, &parts) - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn information_gain<S1, S2>(y: &ArrayBase<S1, Ix1>, parts: &[ArrayBase<S2, Ix1>]) -> f64
where
    S1: Data<Elem = Label>,
    S2: Data<Elem = Label>,
{
    let n = y.len() as f64;
    if n == 0.0 {
        return 0.0;
    }

    let info_after_split = sum_in_order(
        parts
            .iter()
            .map(|part| (part.len() as f64 / n) * entropy(part)),
    );

    entropy(y) - info_after_split
}

/// Calculates the gain ratio of a multiway split (C4.5 criterion).
///
/// The gain ratio is the information gain divided by the split information. It is
/// exactly 0 when the split information is 0, i.e. when the attribute does not
/// actually partition the samples, and when the gain is below `f64::EPSILON`, so
/// rounding noise never makes a useless attribute look informative.
///
/// # Parameters
///
/// - `y` - Class labels before the split
/// - `parts` - Class labels of every part after the split, one entry per attribute value
///
/// # Returns
///
/// - `f64` - Gain ratio, in \[0.0, 1.0\] for any real partition of `y`
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use shelftree::math::gain_ratio;
///
/// let parent = array![5, 5, 1, 1];
/// let perfect = [array![5, 5], array![1, 1]];
/// assert!((gain_ratio(&parent, &perfect) - 1.0).abs() < 1e-12);
///
/// let noise = [array![5, 1], array![5, 1]];
/// assert_eq!(gain_ratio(&parent, &noise), 0.0);
/// ```
#[inline]
pub fn gain_ratio<S1, S2>(y: &ArrayBase<S1, Ix1>, parts: &[ArrayBase<S2, Ix1>]) -> f64
where
    S1: Data<Elem = Label>,
    S2: Data<Elem = Label>,
{
    if y.is_empty() {
        return 0.0;
    }

    let gain = information_gain(y, parts);
    if gain < f64::EPSILON {
        return 0.0;
    }

    let part_sizes: Vec<usize> = parts.iter().map(|part| part.len()).collect();
    let split_info = split_information(&part_sizes, y.len());

    if split_info < f64::EPSILON {
        0.0
    } else {
        gain / split_info
    }
}

/// Finds the most frequent label.
///
/// Ties are broken in favour of the smallest label value, so the result never depends
/// on hash iteration order.
///
/// # Returns
///
/// - `Some(Label)` - The majority label
/// - `None` - If `y` is empty
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use shelftree::math::majority_class;
///
/// assert_eq!(majority_class(&array![3, 4, 4, 3, 5]), Some(3));
/// assert_eq!(majority_class(&ndarray::Array1::<i64>::zeros(0)), None);
/// ```
pub fn majority_class<S>(y: &ArrayBase<S, Ix1>) -> Option<Label>
where
    S: Data<Elem = Label>,
{
    class_counts(y)
        .into_iter()
        .max_by(|(label_a, count_a), (label_b, count_b)| {
            count_a.cmp(count_b).then_with(|| label_b.cmp(label_a))
        })
        .map(|(label, _)| label)
}
