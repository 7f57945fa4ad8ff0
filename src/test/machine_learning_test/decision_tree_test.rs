use super::*;
use proptest::prelude::*;

fn genre_length_domain() -> AttributeDomain {
    AttributeDomain::new(vec![
        ("genre", vec!["fiction", "romance"]),
        ("length", vec!["Short", "Long"]),
    ])
    .unwrap()
}

fn book(id: ItemId, genre: &str, length: &str) -> Item {
    Item::from_pairs(id, [("genre", genre), ("length", length)])
}

// Genre decides the rating, length is balanced noise
fn genre_determined_dataset() -> Dataset {
    Dataset::new(vec![
        (book(1, "fiction", "Short"), 5),
        (book(2, "fiction", "Long"), 5),
        (book(3, "romance", "Short"), 1),
        (book(4, "romance", "Long"), 1),
        (book(5, "fiction", "Short"), 5),
        (book(6, "fiction", "Long"), 5),
        (book(7, "romance", "Short"), 1),
        (book(8, "romance", "Long"), 1),
    ])
    .unwrap()
}

fn all_indices(dataset: &Dataset) -> Vec<usize> {
    (0..dataset.len()).collect()
}

fn root_attribute(tree: &DecisionTree) -> Option<String> {
    match &tree.get_root()?.node_type {
        NodeType::Internal { attribute } => Some(attribute.clone()),
        NodeType::Leaf { .. } => None,
    }
}

#[test]
fn test_decision_tree_default() {
    let tree = DecisionTree::default();
    assert!(tree.get_root().is_none());
    assert_eq!(tree.get_n_train(), 0);
    assert_eq!(tree.get_parameters(), DecisionTreeParams::default());
    assert_eq!(tree.get_parameters().empty_branch_label, 0);
    assert_eq!(tree.get_parameters().unseen_value_label, 0);
}

#[test]
fn test_not_fitted_errors() {
    let tree = DecisionTree::new(None);
    let item = book(1, "fiction", "Short");

    assert_eq!(
        tree.predict_one(item.get_attributes()),
        Err(ModelError::NotFitted)
    );
    assert!(matches!(tree.predict(&[item]), Err(ModelError::NotFitted)));
    assert!(matches!(tree.depth(), Err(ModelError::NotFitted)));
    assert!(matches!(
        tree.generate_tree_structure(),
        Err(ModelError::NotFitted)
    ));
}

#[test]
fn test_fit_rejects_empty_dataset() {
    let mut tree = DecisionTree::default();
    let empty = Dataset::new(Vec::new()).unwrap();
    assert!(matches!(
        tree.fit(&empty, &genre_length_domain()),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
#[should_panic(expected = "has no value for attribute")]
fn test_fit_panics_on_incomplete_item() {
    let mut tree = DecisionTree::default();
    let data = Dataset::new(vec![
        (book(1, "fiction", "Short"), 5),
        (Item::from_pairs(2, [("genre", "romance")]), 1),
    ])
    .unwrap();
    let _ = tree.fit(&data, &genre_length_domain());
}

#[test]
fn test_gain_ratios_perfect_and_noise_attribute() {
    let data = genre_determined_dataset();
    let domain = genre_length_domain();
    let eligible: BTreeSet<&str> = domain.attribute_names().collect();

    let ratios = gain_ratios(&data, &all_indices(&data), &domain, &eligible);

    assert_eq!(ratios.len(), 2);
    assert!((ratios["genre"] - 1.0).abs() < 1e-12);
    assert_eq!(ratios["length"], 0.0);
}

#[test]
fn test_gain_ratios_only_scores_eligible_attributes() {
    let data = genre_determined_dataset();
    let domain = genre_length_domain();
    let eligible: BTreeSet<&str> = ["length"].into_iter().collect();

    let ratios = gain_ratios(&data, &all_indices(&data), &domain, &eligible);

    assert_eq!(ratios.keys().collect::<Vec<_>>(), vec!["length"]);
}

// A single attribute that determines the label gives a one-level tree
#[test]
fn test_single_determining_attribute_gives_depth_one() {
    let data = genre_determined_dataset();
    let mut tree = DecisionTree::default();
    tree.fit(&data, &genre_length_domain()).unwrap();

    assert_eq!(tree.depth().unwrap(), 1);
    assert_eq!(tree.n_leaves().unwrap(), 2);
    assert_eq!(root_attribute(&tree).as_deref(), Some("genre"));
    assert_eq!(tree.evaluate(&data).unwrap(), 1.0);
    assert_eq!(tree.get_n_train(), 8);
    assert_eq!(tree.get_n_attributes(), 2);
}

#[test]
fn test_children_follow_domain_order() {
    let domain = AttributeDomain::new(vec![
        ("genre", vec!["romance", "poetry", "fiction"]),
        ("length", vec!["Short", "Long"]),
    ])
    .unwrap();
    let mut tree = DecisionTree::default();
    tree.fit(&genre_determined_dataset(), &domain).unwrap();

    let root = tree.get_root().unwrap();
    let values: Vec<&str> = root.children.iter().map(|(v, _)| v.as_str()).collect();
    assert_eq!(values, vec!["romance", "poetry", "fiction"]);
}

// A legal value that no training sample has still gets a child
#[test]
fn test_empty_branch_becomes_default_leaf() {
    let domain = AttributeDomain::new(vec![
        ("genre", vec!["fiction", "romance", "poetry"]),
        ("length", vec!["Short", "Long"]),
    ])
    .unwrap();
    let mut tree = DecisionTree::default();
    tree.fit(&genre_determined_dataset(), &domain).unwrap();

    let poetry = tree.get_root().unwrap().child("poetry").unwrap();
    assert_eq!(
        poetry.node_type,
        NodeType::Leaf {
            classification: 0,
            n_samples: 0
        }
    );

    let mut custom = DecisionTree::new(Some(DecisionTreeParams {
        empty_branch_label: 3,
        ..DecisionTreeParams::default()
    }));
    custom.fit(&genre_determined_dataset(), &domain).unwrap();
    let poetry_item = book(99, "poetry", "Short");
    assert_eq!(custom.predict_one(poetry_item.get_attributes()).unwrap(), 3);
}

#[test]
fn test_unseen_value_falls_back() {
    let mut tree = DecisionTree::default();
    tree.fit(&genre_determined_dataset(), &genre_length_domain())
        .unwrap();

    let horror = book(42, "horror", "Short");
    assert_eq!(tree.predict_one(horror.get_attributes()).unwrap(), 0);

    let no_genre = Item::from_pairs(43, [("length", "Long")]);
    assert_eq!(tree.predict_one(no_genre.get_attributes()).unwrap(), 0);

    let mut custom = DecisionTree::new(Some(DecisionTreeParams {
        unseen_value_label: 2,
        ..DecisionTreeParams::default()
    }));
    custom
        .fit(&genre_determined_dataset(), &genre_length_domain())
        .unwrap();
    assert_eq!(custom.predict_one(horror.get_attributes()).unwrap(), 2);
}

// Two attributes with identical gain ratio: the smaller name wins
#[test]
fn test_gain_ratio_tie_prefers_smallest_attribute_name() {
    let domain = AttributeDomain::new(vec![
        ("b_flag", vec!["0", "1"]),
        ("a_flag", vec!["0", "1"]),
    ])
    .unwrap();
    let data = Dataset::new(vec![
        (Item::from_pairs(1, [("a_flag", "0"), ("b_flag", "0")]), 2),
        (Item::from_pairs(2, [("a_flag", "1"), ("b_flag", "1")]), 4),
        (Item::from_pairs(3, [("a_flag", "0"), ("b_flag", "0")]), 2),
        (Item::from_pairs(4, [("a_flag", "1"), ("b_flag", "1")]), 4),
    ])
    .unwrap();

    let mut tree = DecisionTree::default();
    tree.fit(&data, &domain).unwrap();

    assert_eq!(root_attribute(&tree).as_deref(), Some("a_flag"));
    assert_eq!(tree.depth().unwrap(), 1);
}

// Two attributes inducing the same groups tie even when their values are listed in
// opposite orders
#[test]
fn test_gain_ratio_tie_ignores_value_order() {
    let domain = AttributeDomain::new(vec![
        ("a", vec!["v3", "v2", "v1", "v0"]),
        ("b", vec!["v0", "v1", "v2", "v3"]),
    ])
    .unwrap();

    let groups: [(&str, &[Label]); 4] = [
        ("v0", &[2, 2, 2, 1]),
        ("v1", &[2, 3, 2, 3]),
        ("v2", &[3, 3, 2]),
        ("v3", &[1, 1, 1, 2]),
    ];
    let mut examples = Vec::new();
    for (value, labels) in groups {
        for &label in labels {
            let id = examples.len() as ItemId + 1;
            examples.push((Item::from_pairs(id, [("a", value), ("b", value)]), label));
        }
    }
    let data = Dataset::new(examples).unwrap();

    let eligible: BTreeSet<&str> = domain.attribute_names().collect();
    let ratios = gain_ratios(&data, &all_indices(&data), &domain, &eligible);
    assert_eq!(ratios["a"], ratios["b"]);
    assert!(ratios["a"] > 0.0);

    let mut tree = DecisionTree::default();
    tree.fit(&data, &domain).unwrap();
    assert_eq!(root_attribute(&tree).as_deref(), Some("a"));
}

// No attribute separates the labels: a single leaf with the smallest tied label
#[test]
fn test_majority_tie_prefers_smallest_label() {
    let data = Dataset::new(vec![
        (book(1, "fiction", "Short"), 4),
        (book(2, "fiction", "Short"), 2),
        (book(3, "fiction", "Long"), 4),
        (book(4, "fiction", "Long"), 2),
    ])
    .unwrap();

    let mut tree = DecisionTree::default();
    tree.fit(&data, &genre_length_domain()).unwrap();

    assert_eq!(tree.depth().unwrap(), 0);
    assert_eq!(tree.n_leaves().unwrap(), 1);
    assert_eq!(
        tree.get_root().unwrap().node_type,
        NodeType::Leaf {
            classification: 2,
            n_samples: 4
        }
    );
}

// Greedy gain-ratio selection cannot see an XOR pattern
#[test]
fn test_xor_pattern_stays_a_leaf() {
    let data = Dataset::new(vec![
        (book(1, "fiction", "Short"), 1),
        (book(2, "fiction", "Long"), 5),
        (book(3, "romance", "Short"), 5),
        (book(4, "romance", "Long"), 1),
    ])
    .unwrap();

    let mut tree = DecisionTree::default();
    tree.fit(&data, &genre_length_domain()).unwrap();

    assert_eq!(tree.depth().unwrap(), 0);
}

#[test]
fn test_two_level_tree() {
    let data = Dataset::new(vec![
        (book(1, "fiction", "Short"), 5),
        (book(2, "fiction", "Long"), 5),
        (book(3, "fiction", "Short"), 5),
        (book(4, "fiction", "Long"), 5),
        (book(5, "romance", "Short"), 1),
        (book(6, "romance", "Long"), 3),
        (book(7, "romance", "Short"), 1),
        (book(8, "romance", "Long"), 3),
    ])
    .unwrap();

    let mut tree = DecisionTree::default();
    tree.fit(&data, &genre_length_domain()).unwrap();

    assert_eq!(root_attribute(&tree).as_deref(), Some("genre"));
    assert_eq!(tree.depth().unwrap(), 2);
    assert_eq!(tree.n_leaves().unwrap(), 3);

    let predictions = tree
        .predict(&[
            book(10, "fiction", "Long"),
            book(11, "romance", "Short"),
            book(12, "romance", "Long"),
        ])
        .unwrap();
    assert_eq!(predictions.to_vec(), vec![5, 1, 3]);
    assert_eq!(tree.evaluate(&data).unwrap(), 1.0);
}

#[test]
fn test_fit_leaves_dataset_untouched() {
    let data = genre_determined_dataset();
    let before = data.clone();

    let mut tree = DecisionTree::default();
    tree.fit(&data, &genre_length_domain()).unwrap();

    assert_eq!(data, before);
    for item in data.get_items() {
        assert_eq!(item.get_attributes().len(), 2);
    }
}

#[test]
fn test_evaluate_all_and_none_correct() {
    let mut tree = DecisionTree::default();
    tree.fit(&genre_determined_dataset(), &genre_length_domain())
        .unwrap();

    let right = Dataset::new(vec![
        (book(20, "fiction", "Long"), 5),
        (book(21, "romance", "Short"), 1),
        (book(22, "romance", "Long"), 1),
    ])
    .unwrap();
    let wrong = Dataset::new(vec![
        (book(20, "fiction", "Long"), 1),
        (book(21, "romance", "Short"), 5),
        (book(22, "romance", "Long"), 4),
    ])
    .unwrap();

    assert_eq!(tree.evaluate(&right).unwrap(), 1.0);
    assert_eq!(tree.evaluate(&wrong).unwrap(), 0.0);
}

#[test]
#[should_panic(expected = "must not be empty")]
fn test_evaluate_panics_on_empty_held_out() {
    let mut tree = DecisionTree::default();
    tree.fit(&genre_determined_dataset(), &genre_length_domain())
        .unwrap();
    let _ = tree.evaluate(&Dataset::new(Vec::new()).unwrap());
}

#[test]
fn test_generate_tree_structure() {
    let mut tree = DecisionTree::default();
    tree.fit(&genre_determined_dataset(), &genre_length_domain())
        .unwrap();

    let structure = tree.generate_tree_structure().unwrap();
    assert!(structure.starts_with("Decision Tree Structure:\n"));
    assert!(structure.contains("└── Split: genre"));
    assert!(structure.contains("├── [genre = fiction] Leaf: class=5 samples=4"));
    assert!(structure.contains("└── [genre = romance] Leaf: class=1 samples=4"));
}

fn three_attribute_domain() -> AttributeDomain {
    AttributeDomain::new(vec![
        ("a", vec!["0", "1", "2"]),
        ("b", vec!["0", "1"]),
        ("c", vec!["x", "y", "z"]),
    ])
    .unwrap()
}

fn random_rows() -> impl Strategy<Value = Vec<(u8, u8, u8, i64)>> {
    proptest::collection::vec((0..3u8, 0..2u8, 0..3u8, 1..=5i64), 1..40)
}

fn rows_to_dataset(rows: &[(u8, u8, u8, i64)]) -> Dataset {
    let c_values = ["x", "y", "z"];
    Dataset::new(
        rows.iter()
            .enumerate()
            .map(|(i, &(a, b, c, label))| {
                let item = Item::from_pairs(
                    i as ItemId,
                    [
                        ("a", a.to_string()),
                        ("b", b.to_string()),
                        ("c", c_values[c as usize].to_string()),
                    ],
                );
                (item, label)
            })
            .collect(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn depth_never_exceeds_attribute_count(rows in random_rows()) {
        let data = rows_to_dataset(&rows);
        let domain = three_attribute_domain();
        let mut tree = DecisionTree::default();
        tree.fit(&data, &domain).unwrap();

        prop_assert!(tree.depth().unwrap() <= domain.len());
        prop_assert!(tree.n_leaves().unwrap() >= 1);
    }

    #[test]
    fn prediction_is_total(
        rows in random_rows(),
        a in "[0-3]",
        b in "[0-2]",
        c in "[w-z]",
    ) {
        let data = rows_to_dataset(&rows);
        let mut tree = DecisionTree::default();
        tree.fit(&data, &three_attribute_domain()).unwrap();

        let probe = Item::from_pairs(-1, [("a", a), ("b", b), ("c", c)]);
        let first = tree.predict_one(probe.get_attributes()).unwrap();
        let second = tree.predict_one(probe.get_attributes()).unwrap();
        prop_assert_eq!(first, second);
        prop_assert!(first == 0 || (1..=5).contains(&first));
    }
}
