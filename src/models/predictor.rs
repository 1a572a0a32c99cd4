//! Emission prediction facade

#![allow(non_snake_case)]

use ndarray::{Array1, Array2};

use crate::error::ModelError;
use crate::models::forest::RandomForestRegressor;

pub const DEFAULT_N_TREES: usize = 100;

const MAX_DEPTH: usize = 10;
const MIN_SAMPLES_SPLIT: usize = 5;

/// Predicts emissions from input features using a random forest regressor.
///
/// The predictor is a thin wrapper around [`RandomForestRegressor`]: it is
/// either untrained or trained, `train` being the only transition. Training
/// again simply refits and overwrites the previous state. All failures come
/// from the underlying estimator and are surfaced untranslated.
pub struct EmissionPredictor {
    model: RandomForestRegressor,
}

impl EmissionPredictor {
    /// Creates an untrained predictor with `n_trees` trees in the forest.
    pub fn new(n_trees: usize) -> Self {
        Self {
            model: RandomForestRegressor::new(n_trees, MAX_DEPTH, MIN_SAMPLES_SPLIT),
        }
    }

    /// Same as [`new`](Self::new) but with a fixed RNG seed, making repeated
    /// fits on identical data reproducible.
    pub fn with_seed(n_trees: usize, seed: u64) -> Self {
        Self {
            model: RandomForestRegressor::new(n_trees, MAX_DEPTH, MIN_SAMPLES_SPLIT)
                .with_seed(seed),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.model.n_trees()
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_fitted()
    }

    /// Trains the forest on `X` (one row per sample) and target emissions `y`.
    pub fn train(&mut self, X: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        self.model.fit(X, y)?;
        tracing::info!(
            "emission predictor trained: {} trees, {} samples, {} features",
            self.model.n_trees(),
            X.nrows(),
            X.ncols()
        );
        Ok(())
    }

    /// Predicts one emission value per row of `X`.
    ///
    /// Fails if [`train`](Self::train) was never called or if the column
    /// count differs from the training data.
    pub fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        self.model.predict(X)
    }
}

impl Default for EmissionPredictor {
    fn default() -> Self {
        Self::new(DEFAULT_N_TREES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn training_data() -> (Array2<f64>, Array1<f64>) {
        let X = array![
            [0.5, 1.0],
            [1.5, 2.0],
            [2.5, 3.0],
            [3.5, 4.0],
            [4.5, 5.0],
        ];
        let y = array![12.0, 24.0, 36.0, 48.0, 60.0];
        (X, y)
    }

    #[test]
    fn default_uses_100_trees() {
        let predictor = EmissionPredictor::default();
        assert_eq!(predictor.n_trees(), DEFAULT_N_TREES);
        assert!(!predictor.is_trained());
    }

    #[test]
    fn train_then_predict_matches_row_count() {
        let (X, y) = training_data();
        let mut predictor = EmissionPredictor::new(10);
        predictor.train(&X, &y).unwrap();
        assert!(predictor.is_trained());

        let predictions = predictor.predict(&X).unwrap();
        assert_eq!(predictions.len(), X.nrows());
    }

    #[test]
    fn predict_before_train_fails() {
        let predictor = EmissionPredictor::new(10);
        let err = predictor.predict(&array![[1.0, 2.0]]).unwrap_err();
        assert_eq!(err, ModelError::NotTrained);
    }

    #[test]
    fn train_surfaces_estimator_errors() {
        let (X, _) = training_data();
        let mut predictor = EmissionPredictor::new(10);
        let err = predictor.train(&X, &array![1.0]).unwrap_err();
        assert_eq!(
            err,
            ModelError::SampleCountMismatch {
                features: 5,
                targets: 1
            }
        );
    }

    #[test]
    fn predict_rejects_different_column_count() {
        let (X, y) = training_data();
        let mut predictor = EmissionPredictor::new(10);
        predictor.train(&X, &y).unwrap();
        let err = predictor.predict(&array![[1.0]]).unwrap_err();
        assert_eq!(
            err,
            ModelError::FeatureCountMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn seeded_predictors_agree() {
        let (X, y) = training_data();

        let mut a = EmissionPredictor::with_seed(10, 123);
        a.train(&X, &y).unwrap();
        let mut b = EmissionPredictor::with_seed(10, 123);
        b.train(&X, &y).unwrap();

        assert_eq!(a.predict(&X).unwrap(), b.predict(&X).unwrap());
    }

    #[test]
    fn retrain_overwrites_prior_fit() {
        let (X, y) = training_data();
        let mut predictor = EmissionPredictor::new(10);
        predictor.train(&X, &y).unwrap();

        let constant = Array1::from_elem(X.nrows(), 7.0);
        predictor.train(&X, &constant).unwrap();
        for p in predictor.predict(&X).unwrap().iter() {
            assert_eq!(*p, 7.0);
        }
    }
}
