/// Deterministic and seeded hold-out splitting of per-user datasets
pub mod train_test_split;

pub use train_test_split::*;
