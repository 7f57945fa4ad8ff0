pub use crate::recommendation::{
    EvaluationSummary, UserEvaluationConfig, UserReport, evaluate_user, evaluate_users,
};
