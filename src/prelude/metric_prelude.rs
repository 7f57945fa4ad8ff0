pub use crate::metric::{accuracy, mean_absolute_error};
