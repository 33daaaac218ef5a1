//! Incremental Classifier
//!
//! Gaussian Naive Bayes with an explicit incremental `update` operation,
//! a deterministic train/test splitter, and evaluation metrics. The model
//! is a plain owned value: callers decide whether an instance lives for one
//! batch or for the whole process.

mod gaussian_nb;
mod metrics;
mod split;

pub use gaussian_nb::GaussianNb;
pub use metrics::{accuracy, evaluate, ClassMetrics, EvalReport};
pub use split::{train_test_split, SplitIndices};

use thiserror::Error;

/// Errors from model operations
#[derive(Debug, Error)]
pub enum ModelError {
    /// Fewer than 2 distinct labels in the batch
    #[error("need at least 2 distinct classes, found {found}")]
    InsufficientClasses { found: usize },

    /// Feature width differs from what the model was fitted with
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Feature and label row counts differ
    #[error("got {features} feature rows but {labels} labels")]
    LengthMismatch { features: usize, labels: usize },

    /// Truth and prediction vectors differ in length
    #[error("got {truth} truth labels but {predicted} predictions")]
    EvalLengthMismatch { truth: usize, predicted: usize },

    /// A label was not listed in the declared class set
    #[error("label {label} is outside the declared class set")]
    LabelOutsideClasses { label: usize },

    /// No rows to fit or predict
    #[error("input contains no rows")]
    EmptyInput,

    /// Predict called before any update
    #[error("model has not been fitted yet")]
    NotFitted,

    /// Too few rows to carve out both partitions
    #[error("cannot split {rows} rows into non-empty train and test partitions")]
    TooFewRows { rows: usize },
}
