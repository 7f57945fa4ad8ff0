//! Evaluates per-user rating trees over a JSON snapshot of books and ratings.

use clap::Parser;
use shelftree::dataset::{Snapshot, book_attribute_domain};
use shelftree::recommendation::{UserEvaluationConfig, evaluate_users};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "shelftree")]
#[command(about = "Train a decision tree per user and report held-out rating accuracy")]
struct Args {
    /// Snapshot with books, book genres and user ratings
    #[arg(short, long)]
    snapshot: PathBuf,

    /// JSON run configuration; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum number of rated items a user needs to be evaluated
    #[arg(long)]
    min_ratings: Option<usize>,

    /// Number of rated items held out per user
    #[arg(long)]
    test_size: Option<usize>,

    /// Seed for a shuffled hold-out instead of the largest item identifiers
    #[arg(long)]
    seed: Option<u64>,

    /// Evaluate users in parallel
    #[arg(long)]
    parallel: bool,

    /// Print the full summary as JSON
    #[arg(long)]
    json: bool,

    /// Logging level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    let mut config = match &args.config {
        Some(path) => UserEvaluationConfig::from_path(path)?,
        None => UserEvaluationConfig::default(),
    };
    if let Some(min_ratings) = args.min_ratings {
        config.min_ratings = min_ratings;
    }
    if let Some(test_size) = args.test_size {
        config.test_size = test_size;
    }
    if args.seed.is_some() {
        config.random_state = args.seed;
    }
    config.parallel |= args.parallel;

    let snapshot = match Snapshot::from_path(&args.snapshot) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to load snapshot {:?}: {}", args.snapshot, e);
            return Err(e.into());
        }
    };

    let catalog = snapshot.catalog();
    let histories = snapshot.histories();
    info!(
        n_books = catalog.len(),
        n_users = histories.len(),
        "snapshot loaded"
    );

    let summary = evaluate_users(&catalog, &histories, &book_attribute_domain(), &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        match summary.mean_accuracy {
            Some(mean) => println!(
                "avg accuracy for {} users is {:.6} ({} skipped)",
                summary.n_users, mean, summary.n_skipped
            ),
            None => println!(
                "no user has at least {} rated items ({} skipped)",
                config.min_ratings, summary.n_skipped
            ),
        }
    }

    Ok(())
}
