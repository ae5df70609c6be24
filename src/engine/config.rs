use crate::models::{
    Convergence, ConvergenceError, HistoryPolicy, Mutagen, MutationRateOutOfRange,
    SelectionError, Selector, ZeroStoreRate,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SelectionError: {0}")]
    SelectionError(#[from] SelectionError),
    #[error("MutationRateError: {0}")]
    MutationRateError(#[from] MutationRateOutOfRange),
    #[error("ConvergenceError: {0}")]
    ConvergenceError(#[from] ConvergenceError),
    #[error("HistoryError: {0}")]
    HistoryError(#[from] ZeroStoreRate),
    #[error("Could not deserialize configuration: {0}")]
    DeserializationError(#[from] serde_json::Error),
}

/// All tunable parameters of an engine.
///
/// Missing fields fall back to their defaults when deserialized, so a JSON
/// document only has to name what it overrides:
///
/// ```rust
/// use fx_ga::EngineConfig;
///
/// let config = EngineConfig::from_json(
///     r#"{ "mutagen": { "mutation_rate": 0.05 }, "convergence": { "max_iterations": 200 } }"#,
/// )?;
///
/// assert_eq!(config.mutagen.mutation_rate.get(), 0.05);
/// assert_eq!(config.convergence.max_iterations, 200);
/// assert!(config.elitism);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub selector: Selector,
    pub mutagen: Mutagen,
    pub elitism: bool,
    pub convergence: Convergence,
    pub history: HistoryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            selector: Selector::default(),
            mutagen: Mutagen::default(),
            elitism: true,
            convergence: Convergence::default(),
            history: HistoryPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration document.
    #[instrument(level = "debug", skip(json), fields(length = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.selector.validate()?;
        self.convergence.validate()?;
        self.history.validate()?;

        Ok(())
    }

    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Result<Self, ConfigError> {
        self.mutagen = Mutagen::constant(mutation_rate)?;
        Ok(self)
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    pub fn with_convergence(mut self, convergence: Convergence) -> Self {
        self.convergence = convergence;
        self
    }

    pub fn with_history(mut self, history: HistoryPolicy) -> Self {
        self.history = history;
        self
    }
}
