/// Prelude module for datasets and domains.
pub mod dataset_prelude;
/// Prelude module for the decision tree.
pub mod machine_learning_prelude;
/// Prelude module for mathematical operations.
pub mod math_prelude;
/// Prelude module for metrics.
pub mod metric_prelude;
/// Prelude module for the per-user evaluation run.
pub mod recommendation_prelude;
/// Prelude module for utility functions.
pub mod utility_prelude;

pub use crate::error::{IoError, ModelError};
pub use dataset_prelude::*;
pub use machine_learning_prelude::*;
pub use math_prelude::*;
pub use metric_prelude::*;
pub use recommendation_prelude::*;
pub use utility_prelude::*;
