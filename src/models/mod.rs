/// ML models

pub mod forest;
pub mod predictor;

pub use forest::RandomForestRegressor;
pub use predictor::{EmissionPredictor, DEFAULT_N_TREES};
