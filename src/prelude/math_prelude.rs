pub use crate::math::{entropy, gain_ratio, information_gain, majority_class, split_information};
