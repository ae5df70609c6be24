use super::ConfigError;
use crate::models::{EvaluationError, PopulationError, SelectionError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Uninitialized: initialize or set_population must be called first")]
    Uninitialized,
    #[error("ConfigError: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("PopulationError: {0}")]
    PopulationError(#[from] PopulationError),
    #[error("EvaluationError: {0}")]
    EvaluationError(#[from] EvaluationError),
    #[error("SelectionError: {0}")]
    SelectionError(#[from] SelectionError),
}
