//! Error surface of the estimator

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("empty dataset")]
    EmptyDataset,

    #[error("feature matrix has {features} rows but target vector has {targets}")]
    SampleCountMismatch { features: usize, targets: usize },

    #[error("model was trained on {expected} features, input has {found}")]
    FeatureCountMismatch { expected: usize, found: usize },

    #[error("model not trained")]
    NotTrained,

    #[error("row {row} has {found} values, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
}
