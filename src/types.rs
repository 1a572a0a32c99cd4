//! Data types for the emission prediction API

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainInput {
    /// Feature matrix, one row per sample.
    pub features: Vec<Vec<f64>>,
    /// One emission value per sample.
    pub targets: Vec<f64>,
    /// Number of trees for the forest; replaces the current model when set.
    #[serde(default)]
    pub n_trees: Option<usize>,
    /// Fixed RNG seed for reproducible fits.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictInput {
    pub features: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainOutput {
    pub n_samples: usize,
    pub n_features: usize,
    pub n_trees: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictOutput {
    pub predictions: Vec<f64>,
}

/// Builds an `Array2` from a row list, rejecting ragged rows.
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<Array2<f64>, ModelError> {
    if rows.is_empty() {
        return Err(ModelError::EmptyDataset);
    }

    let n_cols = rows[0].len();
    let mut data = Vec::with_capacity(rows.len() * n_cols);
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n_cols {
            return Err(ModelError::RaggedMatrix {
                row: i,
                expected: n_cols,
                found: row.len(),
            });
        }
        data.extend_from_slice(row);
    }

    // Shape is consistent by construction above.
    Ok(Array2::from_shape_vec((rows.len(), n_cols), data)
        .expect("row-major data matches shape"))
}

impl TrainInput {
    pub fn to_arrays(&self) -> Result<(Array2<f64>, Array1<f64>), ModelError> {
        let features = matrix_from_rows(&self.features)?;
        let targets = Array1::from_vec(self.targets.clone());
        Ok((features, targets))
    }
}

impl PredictInput {
    pub fn to_matrix(&self) -> Result<Array2<f64>, ModelError> {
        matrix_from_rows(&self.features)
    }
}
