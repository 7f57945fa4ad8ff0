use crate::dataset::{AttributeDomain, AttributeVector, Dataset, Item, Label};
use crate::error::ModelError;
use crate::math::{gain_ratio, majority_class};
use crate::metric::accuracy;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Categorical decision trees induced with the C4.5 gain-ratio criterion
pub mod decision_tree;

pub use decision_tree::*;
