// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Closed sets of failure conditions that callers branch on.
// Everything else travels as anyhow::Error with context.
//
//   TrainError     — fatal to a training run, no artifact written
//   TransformError — one record could not be pushed through the
//                    frozen pipeline
//   PredictError   — per-request outcome of the inference service

use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort a training run before any artifact is written.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("dataset not found at '{}'", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("target column '{0}' is not present in the dataset")]
    MissingTarget(String),

    #[error("no rows with a non-missing '{0}' label")]
    NoLabelledRows(String),

    #[error("need at least 2 classes to fit a classifier, found {0}")]
    TooFewClasses(usize),

    #[error("class '{class}' has only {count} row(s); a stratified split needs at least 2")]
    ClassTooSmall { class: String, count: usize },
}

/// Failures while turning a frame into features or a prediction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("unexpected column '{0}'")]
    UnexpectedColumn(String),

    #[error("column '{column}' expects a number, got '{value}'")]
    TypeMismatch { column: String, value: String },

    #[error("column '{0}' contains a non-finite number")]
    NonFiniteValue(String),

    #[error("feature width mismatch: classifier expects {expected}, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("frame has no rows")]
    EmptyFrame,

    #[error("predicted index {index} has no class name ({known} classes known)")]
    UnknownClassIndex { index: usize, known: usize },
}

/// Outcome of a single prediction request.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The service started without a usable artifact.
    #[error("model is not loaded: {0}")]
    ServiceUnavailable(String),

    /// The record reached the pipeline and could not be processed.
    #[error("processing error: {0}")]
    Processing(#[from] TransformError),
}
