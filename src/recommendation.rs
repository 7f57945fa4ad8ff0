use crate::dataset::{AttributeDomain, Dataset, ItemCatalog, UserHistories, UserId};
use crate::error::{IoError, ModelError};
use crate::machine_learning::{DecisionTree, DecisionTreeParams};
use crate::metric::{accuracy, mean_absolute_error};
use crate::utility::train_test_split;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Users with fewer rated items than this are not evaluated.
pub const DEFAULT_MIN_RATINGS: usize = 10;
/// Number of rated items held out per user.
pub const DEFAULT_TEST_SIZE: usize = 3;

/// Settings of a per-user evaluation run.
///
/// Every field may be omitted when the configuration is read from JSON.
///
/// # Fields
///
/// - `min_ratings` - Minimum number of rated, known items a user needs to be evaluated.
/// - `test_size` - Number of items held out per user.
/// - `random_state` - Seed for a shuffled hold-out; `None` holds out the items with the largest identifiers.
/// - `parallel` - Evaluate users on the rayon thread pool.
/// - `tree_params` - Hyperparameters of every per-user tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserEvaluationConfig {
    pub min_ratings: usize,
    pub test_size: usize,
    pub random_state: Option<u64>,
    pub parallel: bool,
    pub tree_params: DecisionTreeParams,
}

impl Default for UserEvaluationConfig {
    fn default() -> Self {
        Self {
            min_ratings: DEFAULT_MIN_RATINGS,
            test_size: DEFAULT_TEST_SIZE,
            random_state: None,
            parallel: false,
            tree_params: DecisionTreeParams::default(),
        }
    }
}

impl UserEvaluationConfig {
    /// Reads a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        serde_json::from_reader(reader).map_err(IoError::JsonError)
    }

    /// Checks that every qualifying user ends up with a non-empty training and test set.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - If `test_size >= 1` and `min_ratings > test_size`
    /// - `Err(ModelError::InputValidationError)` - Otherwise
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.test_size == 0 {
            return Err(ModelError::InputValidationError(
                "test_size must be at least 1".to_string(),
            ));
        }

        if self.min_ratings <= self.test_size {
            return Err(ModelError::InputValidationError(format!(
                "min_ratings ({}) must be greater than test_size ({})",
                self.min_ratings, self.test_size
            )));
        }

        Ok(())
    }
}

/// Outcome of evaluating one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserReport {
    pub user_id: UserId,
    pub n_ratings: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub accuracy: f64,
    pub mean_absolute_error: f64,
    pub tree_depth: usize,
    pub n_leaves: usize,
}

/// Aggregate outcome of a run over all users.
///
/// # Fields
///
/// - `users` - Reports of the evaluated users, in user identifier order.
/// - `n_users` - Number of users that met the minimum-ratings threshold.
/// - `n_skipped` - Number of users below the threshold.
/// - `mean_accuracy` - Average accuracy over the evaluated users, `None` if there are none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub users: Vec<UserReport>,
    pub n_users: usize,
    pub n_skipped: usize,
    pub mean_accuracy: Option<f64>,
}

impl EvaluationSummary {
    fn from_reports(users: Vec<UserReport>, n_skipped: usize) -> Self {
        let n_users = users.len();
        let mean_accuracy = if n_users == 0 {
            None
        } else {
            Some(users.iter().map(|report| report.accuracy).sum::<f64>() / n_users as f64)
        };

        Self {
            users,
            n_users,
            n_skipped,
            mean_accuracy,
        }
    }
}

/// Trains and evaluates the tree of a single user.
///
/// The user's samples are split with [`train_test_split`], a tree is fitted on the
/// training part using the full `domain`, and scored on the held-out part.
///
/// # Parameters
///
/// - `user_id` - Identifier used in the report
/// - `dataset` - Every known rated item of the user
/// - `domain` - Attribute domain shared by all users
/// - `config` - Run settings
///
/// # Returns
///
/// - `Ok(UserReport)` - Accuracy and tree statistics
/// - `Err(ModelError)` - If the dataset cannot be split as configured
pub fn evaluate_user(
    user_id: &str,
    dataset: &Dataset,
    domain: &AttributeDomain,
    config: &UserEvaluationConfig,
) -> Result<UserReport, ModelError> {
    let (train, test) = train_test_split(dataset, config.test_size, config.random_state)?;

    let mut tree = DecisionTree::new(Some(config.tree_params));
    tree.fit(&train, domain)?;
    let predictions = tree.predict(test.get_items())?;
    let actual = test.get_labels();

    let report = UserReport {
        user_id: user_id.to_string(),
        n_ratings: dataset.len(),
        n_train: train.len(),
        n_test: test.len(),
        accuracy: accuracy(&predictions, &actual),
        mean_absolute_error: mean_absolute_error(&predictions, &actual),
        tree_depth: tree.depth()?,
        n_leaves: tree.n_leaves()?,
    };

    debug!(
        user = user_id,
        n_ratings = report.n_ratings,
        accuracy = report.accuracy,
        tree_depth = report.tree_depth,
        "evaluated user"
    );

    Ok(report)
}

/// Evaluates every user with enough ratings and averages their accuracy.
///
/// Ratings of items missing from `catalog` are ignored and do not count towards the
/// threshold: a user needs at least `config.min_ratings` ratings of items found in
/// `catalog`, otherwise the user is skipped entirely. The average is taken over the
/// per-user results in user identifier order, so a parallel run reports exactly the
/// same numbers as a sequential one.
///
/// # Parameters
///
/// - `catalog` - Every known item
/// - `histories` - Ratings of every user
/// - `domain` - Attribute domain shared by all users
/// - `config` - Run settings
///
/// # Returns
///
/// - `Ok(EvaluationSummary)` - Per-user reports and the aggregate
/// - `Err(ModelError::InputValidationError)` - If `config` is invalid
///
/// # Example
/// ```rust
/// use std::collections::BTreeMap;
/// use shelftree::dataset::{AttributeDomain, Item, ItemCatalog, UserHistories};
/// use shelftree::recommendation::{UserEvaluationConfig, evaluate_users};
///
/// let domain = AttributeDomain::new(vec![("genre", vec!["fiction", "romance"])]).unwrap();
/// let mut catalog = ItemCatalog::default();
/// let mut history = BTreeMap::new();
/// for id in 0..12 {
///     let genre = if id % 2 == 0 { "fiction" } else { "romance" };
///     catalog.insert(id, Item::from_pairs(id, [("genre", genre)]));
///     history.insert(id, if id % 2 == 0 { 5 } else { 1 });
/// }
/// let mut histories = UserHistories::new();
/// histories.insert("reader".to_string(), history);
///
/// let summary = evaluate_users(&catalog, &histories, &domain, &UserEvaluationConfig::default()).unwrap();
/// assert_eq!(summary.n_users, 1);
/// assert_eq!(summary.mean_accuracy, Some(1.0));
/// ```
pub fn evaluate_users(
    catalog: &ItemCatalog,
    histories: &UserHistories,
    domain: &AttributeDomain,
    config: &UserEvaluationConfig,
) -> Result<EvaluationSummary, ModelError> {
    config.validate()?;

    let mut candidates: Vec<(&str, Dataset)> = Vec::new();
    let mut n_skipped = 0;

    for (user_id, history) in histories {
        let (dataset, missing) = Dataset::from_history(catalog, history);

        if !missing.is_empty() {
            warn!(
                user = user_id.as_str(),
                n_missing = missing.len(),
                "ignoring ratings of unknown items"
            );
        }

        if dataset.len() < config.min_ratings {
            debug!(
                user = user_id.as_str(),
                n_ratings = dataset.len(),
                "skipping user below the minimum number of ratings"
            );
            n_skipped += 1;
            continue;
        }

        candidates.push((user_id.as_str(), dataset));
    }

    let reports: Vec<UserReport> = if config.parallel {
        candidates
            .par_iter()
            .map(|(user_id, dataset)| evaluate_user(user_id, dataset, domain, config))
            .collect::<Result<_, _>>()?
    } else {
        candidates
            .iter()
            .map(|(user_id, dataset)| evaluate_user(user_id, dataset, domain, config))
            .collect::<Result<_, _>>()?
    };

    let summary = EvaluationSummary::from_reports(reports, n_skipped);

    match summary.mean_accuracy {
        Some(mean) => info!(
            "average accuracy for {} users is {:.6}",
            summary.n_users, mean
        ),
        None => warn!(
            n_skipped = summary.n_skipped,
            "no user has at least {} rated items",
            config.min_ratings
        ),
    }

    Ok(summary)
}
