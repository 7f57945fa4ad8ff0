pub use crate::utility::train_test_split::train_test_split;
