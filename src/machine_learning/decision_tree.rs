use super::*;

/// Hyperparameters of the decision tree.
///
/// The tree has no pruning or depth limit; the only knobs are the two fallback labels
/// used where the training data says nothing.
///
/// # Fields
///
/// - `empty_branch_label` - Classification of a leaf created for an attribute value that no training sample has.
/// - `unseen_value_label` - Prediction returned when an item carries a value that has no child at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionTreeParams {
    pub empty_branch_label: Label,
    pub unseen_value_label: Label,
}

/// Both fallback labels default to `0`, a rating no user can give.
impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self {
            empty_branch_label: 0,
            unseen_value_label: 0,
        }
    }
}

/// Type of a node in the decision tree.
///
/// # Variants
///
/// - `Internal` - A decision node that splits on one categorical attribute.
///   - `attribute`: Name of the attribute used for splitting.
/// - `Leaf` - A terminal node that produces a prediction.
///   - `classification`: The predicted label.
///   - `n_samples`: Number of training samples that reached this leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    Internal { attribute: String },
    Leaf { classification: Label, n_samples: usize },
}

/// A node in the decision tree structure.
///
/// # Fields
///
/// - `node_type` - The type of this node (Internal or Leaf), containing node-specific data.
/// - `children` - For internal nodes, one child per legal value of the split attribute,
///   tagged with that value and kept in domain order. Empty for leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub node_type: NodeType,
    pub children: Vec<(String, Node)>,
}

impl Node {
    /// Creates a new leaf node.
    ///
    /// # Parameters
    ///
    /// - `classification` - The predicted label.
    /// - `n_samples` - Number of training samples that reached the leaf.
    ///
    /// # Returns
    ///
    /// * `Node` - A new `Node` configured as a leaf.
    pub fn new_leaf(classification: Label, n_samples: usize) -> Self {
        Self {
            node_type: NodeType::Leaf {
                classification,
                n_samples,
            },
            children: Vec::new(),
        }
    }

    /// Creates a new internal node splitting on `attribute`, without children yet.
    pub fn new_categorical(attribute: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Internal {
                attribute: attribute.into(),
            },
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node_type, NodeType::Leaf { .. })
    }

    /// The child reached by `value`, if this node has one.
    pub fn child(&self, value: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|(branch, _)| branch == value)
            .map(|(_, child)| child)
    }

    /// Number of edges on the longest path from this node to a leaf.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|(_, child)| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of leaves below (and including) this node.
    pub fn n_leaves(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(|(_, child)| child.n_leaves()).sum()
        }
    }
}

/// Scores every eligible attribute by gain ratio on the rows at `indices`.
///
/// # Parameters
///
/// - `dataset` - The training data
/// - `indices` - Rows of `dataset` that reached the current node
/// - `domain` - Legal values of every attribute
/// - `eligible` - Attributes not yet used on the path to the current node
///
/// # Returns
///
/// * `BTreeMap<String, f64>` - Gain ratio of each eligible attribute, in name order
///
/// # Panics
///
/// Panics if an item has no value for an eligible attribute.
pub fn gain_ratios(
    dataset: &Dataset,
    indices: &[usize],
    domain: &AttributeDomain,
    eligible: &BTreeSet<&str>,
) -> BTreeMap<String, f64> {
    let labels = dataset.labels_at(indices);

    eligible
        .iter()
        .filter_map(|&attribute| {
            let values = domain.values(attribute)?;
            let parts: Vec<Array1<Label>> = values
                .iter()
                .map(|value| dataset.labels_at(&dataset.select_matching(indices, attribute, value)))
                .collect();
            Some((attribute.to_string(), gain_ratio(&labels, &parts)))
        })
        .collect()
}

/// Picks the attribute with the strictly greatest gain ratio.
///
/// Attributes are visited in name order and only a strictly greater ratio replaces the
/// current best, so ties go to the lexicographically smallest name.
fn best_attribute(ratios: &BTreeMap<String, f64>) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for (attribute, &ratio) in ratios {
        match best {
            Some((_, best_ratio)) if ratio <= best_ratio => {}
            _ => best = Some((attribute.as_str(), ratio)),
        }
    }
    best
}

/// Categorical decision tree for rating prediction.
///
/// The tree is grown top-down: at every node the attribute with the highest gain ratio
/// becomes the split and one child is grown for each of its legal values, with that
/// attribute removed from consideration below. A branch ends in a leaf once no
/// remaining attribute has a positive gain ratio. Leaves predict the majority label of
/// the training samples that reached them.
///
/// Each recursive call works on its own list of row indices and its own set of
/// eligible attributes, so sibling branches never see each other's state and the
/// training data is never modified.
///
/// # Fields
///
/// - `root` - The root node of the trained tree, or `None` if not yet fitted.
/// - `params` - Fallback labels.
/// - `n_attributes` - Number of attributes of the domain the tree was fitted against.
/// - `n_train` - Number of training samples.
///
/// # Example
/// ```rust
/// use shelftree::dataset::{AttributeDomain, Dataset, Item};
/// use shelftree::machine_learning::DecisionTree;
///
/// let domain = AttributeDomain::new(vec![
///     ("genre", vec!["fiction", "romance"]),
///     ("length", vec!["Short", "Long"]),
/// ])
/// .unwrap();
///
/// let data = Dataset::new(vec![
///     (Item::from_pairs(1, [("genre", "fiction"), ("length", "Short")]), 5),
///     (Item::from_pairs(2, [("genre", "romance"), ("length", "Short")]), 1),
///     (Item::from_pairs(3, [("genre", "fiction"), ("length", "Long")]), 5),
///     (Item::from_pairs(4, [("genre", "romance"), ("length", "Long")]), 1),
/// ])
/// .unwrap();
///
/// let mut tree = DecisionTree::default();
/// tree.fit(&data, &domain).unwrap();
///
/// assert_eq!(tree.depth().unwrap(), 1);
/// assert_eq!(tree.evaluate(&data).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecisionTree {
    root: Option<Box<Node>>,
    params: DecisionTreeParams,
    n_attributes: usize,
    n_train: usize,
}

impl DecisionTree {
    /// Creates a new untrained decision tree.
    ///
    /// # Parameters
    ///
    /// * `params` - Optional hyperparameters. If `None`, default parameters are used.
    ///
    /// # Returns
    ///
    /// * `DecisionTree` - A new untrained `DecisionTree` instance.
    pub fn new(params: Option<DecisionTreeParams>) -> Self {
        Self {
            root: None,
            params: params.unwrap_or_default(),
            n_attributes: 0,
            n_train: 0,
        }
    }

    // Getters
    get_field!(get_n_attributes, n_attributes, usize);
    get_field!(get_n_train, n_train, usize);
    get_field!(get_parameters, params, DecisionTreeParams);
    get_field_as_ref!(get_root, root, Option<&Box<Node>>);

    /// Trains the decision tree.
    ///
    /// # Parameters
    ///
    /// - `dataset` - Training samples. Every item must carry a value for every attribute of `domain`.
    /// - `domain` - Attributes the tree may split on and their legal values.
    ///
    /// # Returns
    ///
    /// * `Result<&mut Self, ModelError>` - A mutable reference to `self` for method chaining, or
    ///   `ModelError::InputValidationError` if `dataset` is empty.
    ///
    /// # Panics
    ///
    /// Panics if an item has no value for one of the domain's attributes.
    pub fn fit(
        &mut self,
        dataset: &Dataset,
        domain: &AttributeDomain,
    ) -> Result<&mut Self, ModelError> {
        if dataset.is_empty() {
            return Err(ModelError::InputValidationError(
                "Training dataset cannot be empty".to_string(),
            ));
        }

        let indices: Vec<usize> = (0..dataset.len()).collect();
        let eligible: BTreeSet<&str> = domain.attribute_names().collect();

        self.root = Some(Box::new(self.build_tree(
            dataset, domain, &indices, &eligible, 0,
        )));
        self.n_attributes = domain.len();
        self.n_train = dataset.len();

        Ok(self)
    }

    /// Recursively builds the node for the rows at `indices`.
    fn build_tree(
        &self,
        dataset: &Dataset,
        domain: &AttributeDomain,
        indices: &[usize],
        eligible: &BTreeSet<&str>,
        depth: usize,
    ) -> Node {
        let ratios = gain_ratios(dataset, indices, domain, eligible);

        let (attribute, ratio) = match best_attribute(&ratios) {
            Some((attribute, ratio)) if ratio > 0.0 => (attribute, ratio),
            _ => return self.create_leaf(dataset, indices),
        };

        trace!(
            attribute,
            gain_ratio = ratio,
            depth,
            n_samples = indices.len(),
            "splitting node"
        );

        let mut remaining = eligible.clone();
        remaining.remove(attribute);

        let mut node = Node::new_categorical(attribute);
        for value in domain.values(attribute).unwrap_or_default() {
            let subset = dataset.select_matching(indices, attribute, value);
            let child = self.build_tree(dataset, domain, &subset, &remaining, depth + 1);
            node.children.push((value.clone(), child));
        }

        node
    }

    /// Creates a leaf predicting the majority label of the rows at `indices`.
    fn create_leaf(&self, dataset: &Dataset, indices: &[usize]) -> Node {
        let classification =
            majority_class(&dataset.labels_at(indices)).unwrap_or(self.params.empty_branch_label);
        Node::new_leaf(classification, indices.len())
    }

    /// Predicts the label of a single item.
    ///
    /// Prediction never fails on a fitted tree: a value with no matching child, or an
    /// attribute missing from `attributes`, yields `unseen_value_label`.
    ///
    /// # Parameters
    ///
    /// * `attributes` - Attribute vector of the item.
    ///
    /// # Returns
    ///
    /// * `Result<Label, ModelError>` - The predicted label, or `ModelError::NotFitted`.
    pub fn predict_one(&self, attributes: &AttributeVector) -> Result<Label, ModelError> {
        match self.root.as_deref() {
            Some(root) => Ok(self.traverse_tree(root, attributes)),
            None => Err(ModelError::NotFitted),
        }
    }

    /// Walks from `node` down to a leaf.
    fn traverse_tree(&self, node: &Node, attributes: &AttributeVector) -> Label {
        match &node.node_type {
            NodeType::Leaf { classification, .. } => *classification,
            NodeType::Internal { attribute } => {
                match attributes
                    .get(attribute)
                    .and_then(|value| node.child(value))
                {
                    Some(child) => self.traverse_tree(child, attributes),
                    None => self.params.unseen_value_label,
                }
            }
        }
    }

    /// Predicts the labels of several items.
    ///
    /// # Parameters
    ///
    /// * `items` - Items to classify.
    ///
    /// # Returns
    ///
    /// * `Result<Array1<Label>, ModelError>` - One prediction per item, or `ModelError::NotFitted`.
    pub fn predict(&self, items: &[Item]) -> Result<Array1<Label>, ModelError> {
        let root = self.root.as_deref().ok_or(ModelError::NotFitted)?;

        Ok(items
            .iter()
            .map(|item| self.traverse_tree(root, item.get_attributes()))
            .collect())
    }

    /// Measures the fraction of held-out samples whose label is predicted exactly.
    ///
    /// # Parameters
    ///
    /// * `held_out` - Samples with their true labels.
    ///
    /// # Returns
    ///
    /// * `Result<f64, ModelError>` - Accuracy in \[0.0, 1.0\], or `ModelError::NotFitted`.
    ///
    /// # Panics
    ///
    /// Panics if `held_out` is empty.
    pub fn evaluate(&self, held_out: &Dataset) -> Result<f64, ModelError> {
        let predictions = self.predict(held_out.get_items())?;
        Ok(accuracy(&predictions, &held_out.get_labels()))
    }

    /// Trains on `train` and immediately measures accuracy on `test`.
    ///
    /// # Panics
    ///
    /// Panics if `test` is empty or a training item lacks a domain attribute.
    pub fn fit_evaluate(
        &mut self,
        train: &Dataset,
        test: &Dataset,
        domain: &AttributeDomain,
    ) -> Result<f64, ModelError> {
        self.fit(train, domain)?;
        self.evaluate(test)
    }

    /// Depth of the fitted tree; a single leaf has depth 0.
    pub fn depth(&self) -> Result<usize, ModelError> {
        self.root
            .as_deref()
            .map(Node::depth)
            .ok_or(ModelError::NotFitted)
    }

    /// Number of leaves of the fitted tree.
    pub fn n_leaves(&self) -> Result<usize, ModelError> {
        self.root
            .as_deref()
            .map(Node::n_leaves)
            .ok_or(ModelError::NotFitted)
    }

    /// Generates a human-readable string representation of the decision tree structure.
    ///
    /// Internal nodes show their split attribute, every child line shows the value that
    /// leads to it, and leaves show their classification and training support.
    ///
    /// # Returns
    ///
    /// * `Result<String, ModelError>` - A formatted string containing the tree structure, or a `ModelError::NotFitted` if the model hasn't been trained yet.
    pub fn generate_tree_structure(&self) -> Result<String, ModelError> {
        let root = self.root.as_deref().ok_or(ModelError::NotFitted)?;

        let mut output = String::new();
        output.push_str("Decision Tree Structure:\n");
        self.print_node(root, &mut output, "", true, None);
        Ok(output)
    }

    // Recursively print tree structure
    fn print_node(
        &self,
        node: &Node,
        output: &mut String,
        prefix: &str,
        is_last: bool,
        branch: Option<(&str, &str)>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{}{}", prefix, connector));

        if let Some((attribute, value)) = branch {
            output.push_str(&format!("[{} = {}] ", attribute, value));
        }

        match &node.node_type {
            NodeType::Leaf {
                classification,
                n_samples,
            } => {
                output.push_str(&format!(
                    "Leaf: class={} samples={}\n",
                    classification, n_samples
                ));
            }
            NodeType::Internal { attribute } => {
                output.push_str(&format!("Split: {}\n", attribute));

                let new_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                let n_children = node.children.len();
                for (i, (value, child)) in node.children.iter().enumerate() {
                    self.print_node(
                        child,
                        output,
                        &new_prefix,
                        i + 1 == n_children,
                        Some((attribute.as_str(), value.as_str())),
                    );
                }
            }
        }
    }
}
