use super::Fittest;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Controls when the main loop stops breeding new generations.
///
/// # Configuration Parameters
///
/// - `max_iterations`: Maximum number of generations bred by one run
/// - `min_change`: Best-fitness deltas at or below this value count as no change
/// - `patience`: Consecutive no-change generations required to declare convergence
///
/// # Examples
///
/// ```rust
/// use fx_ga::models::Convergence;
///
/// // Stop after 500 generations, or once the best fitness has not moved
/// // by more than 1e-6 for 10 consecutive generations
/// let convergence = Convergence::new(500, 1.0e-6, 10)?;
///
/// // Run every generation of the budget
/// let exhaustive = Convergence::fixed(200);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Convergence {
    pub max_iterations: usize,
    pub min_change: f64,
    pub patience: usize,
}

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum ConvergenceError {
    #[error("patience must be at least 1")]
    ZeroPatience,
    #[error("min_change must be finite, got {0}")]
    NonFiniteMinChange(f64),
}

impl Default for Convergence {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            min_change: 1.0e-5,
            patience: 1,
        }
    }
}

impl Convergence {
    pub fn new(
        max_iterations: usize,
        min_change: f64,
        patience: usize,
    ) -> Result<Self, ConvergenceError> {
        let convergence = Self {
            max_iterations,
            min_change,
            patience,
        };
        convergence.validate()?;

        Ok(convergence)
    }

    /// Runs exactly `max_iterations` generations unless a hook stops it earlier.
    pub fn fixed(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            min_change: -1.0,
            patience: 1,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConvergenceError> {
        if self.patience == 0 {
            return Err(ConvergenceError::ZeroPatience);
        }

        // Any negative value disables the no-change rule
        if !self.min_change.is_finite() {
            return Err(ConvergenceError::NonFiniteMinChange(self.min_change));
        }

        Ok(())
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The generation budget was exhausted.
    MaxIterations,
    /// The best fitness stopped changing for `patience` generations.
    Converged,
    /// A convergence hook asked to stop.
    Custom,
}

/// Progress of one generation, as observed by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub iteration: usize,
    pub best_fitness: f64,
    pub best_index: usize,
    pub delta: f64,
    pub no_change_count: usize,
}

/// Decision about whether to breed another generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Stop(Termination),
}

/// Tracks successive best-fitness deltas across generations.
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    convergence: Convergence,
    last_best_fitness: f64,
    no_change_count: usize,
    iteration: usize,
}

impl ConvergenceMonitor {
    pub fn new(convergence: Convergence, initial_best_fitness: f64) -> Self {
        Self {
            convergence,
            last_best_fitness: initial_best_fitness,
            no_change_count: 0,
            iteration: 0,
        }
    }

    /// True when the budget leaves no room for a single generation.
    pub fn is_exhausted(&self) -> bool {
        self.iteration >= self.convergence.max_iterations
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn no_change_count(&self) -> usize {
        self.no_change_count
    }

    /// Records the fittest candidate of a freshly evaluated generation.
    #[instrument(level = "debug", skip(self), fields(iteration = self.iteration, last_best_fitness = self.last_best_fitness))]
    pub fn observe(&mut self, fittest: Fittest) -> (Progress, Decision) {
        let delta = (fittest.fitness - self.last_best_fitness).abs();
        self.last_best_fitness = fittest.fitness;
        self.iteration += 1;

        if delta <= self.convergence.min_change {
            self.no_change_count += 1;
        } else {
            self.no_change_count = 0;
        }

        let progress = Progress {
            iteration: self.iteration,
            best_fitness: fittest.fitness,
            best_index: fittest.index,
            delta,
            no_change_count: self.no_change_count,
        };

        let decision = if self.is_exhausted() {
            Decision::Stop(Termination::MaxIterations)
        } else if self.no_change_count >= self.convergence.patience {
            Decision::Stop(Termination::Converged)
        } else {
            Decision::Continue
        };

        (progress, decision)
    }
}

// ============================================================
// Hooks
// ============================================================

/// Extension point consulted once per generation after the built-in rules.
pub trait ConvergenceHook {
    fn is_converged(&mut self, progress: &Progress) -> bool;
}

impl<F> ConvergenceHook for F
where
    F: FnMut(&Progress) -> bool,
{
    fn is_converged(&mut self, progress: &Progress) -> bool {
        self(progress)
    }
}

/// The default hook, which never stops a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl ConvergenceHook for Never {
    fn is_converged(&mut self, _: &Progress) -> bool {
        false
    }
}

/// Stops a run once the best fitness reaches or exceeds the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessThreshold {
    pub threshold: f64,
}

impl FitnessThreshold {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl ConvergenceHook for FitnessThreshold {
    #[instrument(level = "debug", skip(self, progress), fields(threshold = self.threshold, best_fitness = progress.best_fitness))]
    fn is_converged(&mut self, progress: &Progress) -> bool {
        progress.best_fitness >= self.threshold
    }
}
