use crate::error::ModelError;
use ahash::AHashMap;
use ndarray::{Array1, ArrayView1, Axis};
use std::collections::BTreeMap;

/// This module derives categorical book attributes from raw book records
pub mod book_catalog;
/// This module loads rating snapshots from JSON documents
pub mod snapshot;

pub use book_catalog::*;
pub use snapshot::*;

/// Identifier of an item (a book).
pub type ItemId = i64;
/// Identifier of a user.
pub type UserId = String;
/// Integer rating given by a user to an item.
pub type Label = i64;
/// Mapping from attribute name to categorical value.
pub type AttributeVector = AHashMap<String, String>;
/// Every known item, keyed by identifier.
pub type ItemCatalog = AHashMap<ItemId, Item>;
/// Rating history of every user, keyed by user identifier and then item identifier.
pub type UserHistories = BTreeMap<UserId, BTreeMap<ItemId, Label>>;

/// An item together with its categorical attribute vector.
///
/// Items are immutable once constructed. Attributes consumed by a split higher up in
/// a tree are tracked by the tree builder, the item itself never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    attributes: AttributeVector,
}

impl Item {
    /// Creates a new item.
    ///
    /// # Parameters
    ///
    /// - `id` - Unique identifier of the item
    /// - `attributes` - Categorical value of every attribute
    ///
    /// # Returns
    ///
    /// * `Item` - The new item
    pub fn new(id: ItemId, attributes: AttributeVector) -> Self {
        Self { id, attributes }
    }

    /// Creates an item from `(attribute, value)` pairs.
    pub fn from_pairs<I, K, V>(id: ItemId, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let attributes = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { id, attributes }
    }

    get_field!(get_id, id, ItemId);

    /// Gets the attribute vector of the item.
    pub fn get_attributes(&self) -> &AttributeVector {
        &self.attributes
    }

    /// Gets the value of one attribute, if the item carries it.
    pub fn get_value(&self, attribute: &str) -> Option<&str> {
        self.attributes.get(attribute).map(String::as_str)
    }

    /// Gets the value of one attribute.
    ///
    /// # Panics
    ///
    /// Panics if the item has no value for `attribute`. Every item must carry a value
    /// for every attribute of the domain it is trained against.
    pub fn value(&self, attribute: &str) -> &str {
        match self.attributes.get(attribute) {
            Some(value) => value,
            None => panic!(
                "item {} has no value for attribute `{}`",
                self.id, attribute
            ),
        }
    }
}

/// The fixed catalog of attributes and the ordered legal values of each.
///
/// Attributes are stored in lexicographic name order, which is also the order the tree
/// builder uses to break gain-ratio ties. Values keep the order they were given in and
/// determine the order of a node's children.
///
/// # Example
/// ```rust
/// use shelftree::dataset::AttributeDomain;
///
/// let domain = AttributeDomain::new(vec![
///     ("genre", vec!["fiction", "romance"]),
///     ("length", vec!["Short", "Medium", "Long"]),
/// ])
/// .unwrap();
/// assert_eq!(domain.len(), 2);
/// assert_eq!(domain.values("length").unwrap().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDomain {
    attributes: BTreeMap<String, Vec<String>>,
}

impl AttributeDomain {
    /// Creates a new attribute domain.
    ///
    /// # Parameters
    ///
    /// - `attributes` - `(attribute name, legal values)` pairs
    ///
    /// # Returns
    ///
    /// - `Ok(AttributeDomain)` - The validated domain
    /// - `Err(ModelError::InputValidationError)` - If no attribute is given, an attribute is
    ///   listed twice, or an attribute has no values or repeats a value
    pub fn new<I, K, V>(attributes: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();

        for (name, values) in attributes {
            let name = name.into();
            let values: Vec<String> = values.into_iter().map(Into::into).collect();

            if values.is_empty() {
                return Err(ModelError::InputValidationError(format!(
                    "attribute `{}` has no legal values",
                    name
                )));
            }

            for (i, value) in values.iter().enumerate() {
                if values[..i].contains(value) {
                    return Err(ModelError::InputValidationError(format!(
                        "attribute `{}` lists value `{}` more than once",
                        name, value
                    )));
                }
            }

            if map.insert(name.clone(), values).is_some() {
                return Err(ModelError::InputValidationError(format!(
                    "attribute `{}` is declared more than once",
                    name
                )));
            }
        }

        if map.is_empty() {
            return Err(ModelError::InputValidationError(
                "attribute domain must contain at least one attribute".to_string(),
            ));
        }

        Ok(Self { attributes: map })
    }

    /// Number of attributes in the domain.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attribute names in lexicographic order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Legal values of `attribute`, or `None` if the domain does not know it.
    pub fn values(&self, attribute: &str) -> Option<&[String]> {
        self.attributes.get(attribute).map(Vec::as_slice)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    /// Iterates over `(attribute, values)` pairs in attribute name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.attributes
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Checks that an item carries a value for every attribute of the domain.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - If every attribute is present
    /// - `Err(ModelError::InputValidationError)` - Naming the first missing attribute
    pub fn check_item(&self, item: &Item) -> Result<(), ModelError> {
        match self.attribute_names().find(|name| item.get_value(name).is_none()) {
            Some(missing) => Err(ModelError::InputValidationError(format!(
                "item {} has no value for attribute `{}`",
                item.get_id(),
                missing
            ))),
            None => Ok(()),
        }
    }
}

/// A set of `(item, label)` pairs belonging to one user and one partition.
///
/// Item identifiers are unique within a dataset. Labels are stored in an `Array1`
/// aligned with the items.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    items: Vec<Item>,
    labels: Array1<Label>,
}

impl Dataset {
    /// Creates a dataset from `(item, label)` pairs.
    ///
    /// # Returns
    ///
    /// - `Ok(Dataset)` - The dataset, keeping the given order
    /// - `Err(ModelError::InputValidationError)` - If two pairs share an item identifier
    pub fn new(examples: Vec<(Item, Label)>) -> Result<Self, ModelError> {
        let mut seen = ahash::AHashSet::with_capacity(examples.len());
        for (item, _) in &examples {
            if !seen.insert(item.get_id()) {
                return Err(ModelError::InputValidationError(format!(
                    "item {} appears more than once in the dataset",
                    item.get_id()
                )));
            }
        }

        let (items, labels): (Vec<Item>, Vec<Label>) = examples.into_iter().unzip();
        Ok(Self {
            items,
            labels: Array1::from_vec(labels),
        })
    }

    /// Builds the dataset of one user from the item catalog.
    ///
    /// Rated items that are missing from the catalog are left out and their identifiers
    /// returned alongside the dataset. Items appear in ascending identifier order.
    ///
    /// # Parameters
    ///
    /// - `catalog` - Every known item
    /// - `history` - Ratings of one user, keyed by item identifier
    ///
    /// # Returns
    ///
    /// * `(Dataset, Vec<ItemId>)` - The dataset and the identifiers of unknown items
    pub fn from_history(
        catalog: &ItemCatalog,
        history: &BTreeMap<ItemId, Label>,
    ) -> (Self, Vec<ItemId>) {
        let mut items = Vec::with_capacity(history.len());
        let mut labels = Vec::with_capacity(history.len());
        let mut missing = Vec::new();

        for (id, &rating) in history {
            match catalog.get(id) {
                Some(item) => {
                    items.push(item.clone());
                    labels.push(rating);
                }
                None => missing.push(*id),
            }
        }

        (
            Self {
                items,
                labels: Array1::from_vec(labels),
            },
            missing,
        )
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Gets the items of the dataset.
    pub fn get_items(&self) -> &[Item] {
        &self.items
    }

    /// Gets the labels of the dataset, aligned with `get_items`.
    pub fn get_labels(&self) -> ArrayView1<'_, Label> {
        self.labels.view()
    }

    /// Iterates over `(item, label)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Item, Label)> {
        self.items.iter().zip(self.labels.iter().copied())
    }

    /// Returns the subset of items whose `attribute` equals `value`, with their labels.
    ///
    /// # Panics
    ///
    /// Panics if an item has no value for `attribute`.
    ///
    /// # Example
    /// ```rust
    /// use shelftree::dataset::{Dataset, Item};
    ///
    /// let data = Dataset::new(vec![
    ///     (Item::from_pairs(1, [("genre", "fiction")]), 5),
    ///     (Item::from_pairs(2, [("genre", "romance")]), 1),
    ///     (Item::from_pairs(3, [("genre", "fiction")]), 4),
    /// ])
    /// .unwrap();
    /// let fiction = data.split("genre", "fiction");
    /// assert_eq!(fiction.len(), 2);
    /// assert_eq!(fiction.get_labels().to_vec(), vec![5, 4]);
    /// ```
    pub fn split(&self, attribute: &str, value: &str) -> Dataset {
        let indices: Vec<usize> = (0..self.len()).collect();
        self.select(&self.select_matching(&indices, attribute, value))
    }

    /// Keeps the positions in `indices` whose item has `attribute == value`.
    ///
    /// # Panics
    ///
    /// Panics if an item has no value for `attribute`.
    pub fn select_matching(&self, indices: &[usize], attribute: &str, value: &str) -> Vec<usize> {
        indices
            .iter()
            .copied()
            .filter(|&i| self.items[i].value(attribute) == value)
            .collect()
    }

    /// Labels at the given positions.
    pub fn labels_at(&self, indices: &[usize]) -> Array1<Label> {
        self.labels.select(Axis(0), indices)
    }

    /// Builds a new dataset from the rows at the given positions.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            items: indices.iter().map(|&i| self.items[i].clone()).collect(),
            labels: self.labels_at(indices),
        }
    }
}
