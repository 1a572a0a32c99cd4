//! Emission ML - random forest emission prediction

pub mod error;
pub mod models;
pub mod types;

pub use error::ModelError;
pub use models::{EmissionPredictor, RandomForestRegressor, DEFAULT_N_TREES};
pub use types::*;
