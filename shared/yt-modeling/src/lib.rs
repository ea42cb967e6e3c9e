//! YT Modeling - Fit, predict and score a set of binary classifiers on one split

pub mod baselines;
pub mod classifier;
pub mod clock;
pub mod compare;
pub mod metrics;

pub use baselines::{baseline_by_name, MajorityClassifier, NearestCentroidClassifier, ThresholdClassifier, BASELINE_NAMES};
pub use classifier::{named_model, Classifier, NamedModel, TrainTestSplit};
pub use clock::{Clock, MonotonicClock, StepClock};
pub use compare::{compare, compare_isolated, format_table, ModelEvaluation, ModelOutcome};
pub use metrics::{accuracy_score, f1_score, precision_score, recall_score, ConfusionMatrix, POSITIVE_LABEL};

/// Result type for modeling operations
pub type Result<T> = std::result::Result<T, ModelingError>;

/// Error types for modeling operations
#[derive(thiserror::Error, Debug)]
pub enum ModelingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate model name: {0}")]
    DuplicateModel(String),

    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Length mismatch: {what} has {left} rows but {right} were expected")]
    LengthMismatch {
        what: String,
        left: usize,
        right: usize,
    },

    #[error("Target is not binary: {0}")]
    NonBinaryTarget(String),

    #[error("Model '{model_name}' failed: {source}")]
    Model {
        model_name: String,
        #[source]
        source: Box<ModelingError>,
    },
}
