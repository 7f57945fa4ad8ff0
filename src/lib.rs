//! Per-user decision trees that predict book ratings from categorical book attributes.
//!
//! Every user gets a tree grown from their own rating history with the C4.5 gain-ratio
//! criterion, which is then scored on a few held-out ratings. The accuracy of all users
//! with enough ratings is averaged into a single figure.
//!
//! # Example
//! ```rust
//! use shelftree::prelude::*;
//!
//! let domain = AttributeDomain::new(vec![
//!     ("genre", vec!["fiction", "romance"]),
//!     ("length", vec!["Short", "Long"]),
//! ])
//! .unwrap();
//!
//! let a = Item::from_pairs(1, [("genre", "fiction"), ("length", "Short")]);
//! let b = Item::from_pairs(2, [("genre", "romance"), ("length", "Long")]);
//! let train = Dataset::new(vec![(a.clone(), 5), (b.clone(), 1)]).unwrap();
//!
//! let mut tree = DecisionTree::default();
//! tree.fit(&train, &domain).unwrap();
//! assert_eq!(tree.predict_one(a.get_attributes()).unwrap(), 5);
//! assert_eq!(tree.predict_one(b.get_attributes()).unwrap(), 1);
//! ```

/// A macro that generates a getter method for any field.
///
/// This macro creates a public getter method that returns the value of the specified
/// field. The field type must be `Copy`.
///
/// # Parameters
///
/// - `$method_name` - The name of the getter method (e.g., get_n_train)
/// - `$field_name` - The name of the field to access (e.g., n_train)
/// - `$return_type` - The return type of the getter method
macro_rules! get_field {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name
        }
    };
}

/// A macro that generates a public getter method returning a reference to a field.
///
/// # Parameters
///
/// - `$method_name` - The identifier for the generated getter method name
/// - `$field_name` - The identifier of the struct field to access
/// - `$return_type` - The type expression for the return value (typically an `Option<&T>`)
macro_rules! get_field_as_ref {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field as a reference")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name.as_ref()
        }
    };
}

/// Module `error` holds the error types returned across the crate.
pub mod error;

/// Module `dataset` contains items, attribute domains, per-user datasets and the
/// book-specific loaders that produce them.
///
/// # Core Types
///
/// - `Item` - An identifier plus a categorical attribute vector
/// - `AttributeDomain` - The fixed catalog of attributes and their legal values
/// - `Dataset` - `(item, rating)` pairs of one user, with the attribute splitter
/// - `Snapshot` - JSON export of books, genres and ratings
pub mod dataset;

/// Module `math` contains the information measures used to grow trees.
///
/// - `entropy` - Shannon entropy of a label set
/// - `split_information` - Entropy of the partition sizes of a split
/// - `information_gain` - Entropy reduction achieved by a multiway split
/// - `gain_ratio` - Information gain normalized by split information (C4.5)
/// - `majority_class` - Most frequent label with a deterministic tie-break
pub mod math;

/// Module `machine_learning` provides the categorical decision tree.
pub mod machine_learning;

/// Module `metric` provides evaluation metrics for predicted ratings.
pub mod metric;

/// Module `recommendation` runs the per-user train/evaluate loop and aggregates accuracy.
pub mod recommendation;

/// Module `utility` provides dataset splitting.
pub mod utility;

pub mod prelude;
