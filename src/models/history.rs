use super::{Candidate, Fittest, Population};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("store_rate must be at least 1")]
pub struct ZeroStoreRate;

/// Which generations are archived during a run.
///
/// Generation 0 is always archived when enabled, then every generation whose
/// iteration is a multiple of `store_rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryPolicy {
    pub enabled: bool,
    pub store_rate: usize,
}

impl Default for HistoryPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            store_rate: 1,
        }
    }
}

impl HistoryPolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn every(store_rate: usize) -> Result<Self, ZeroStoreRate> {
        let policy = Self {
            enabled: true,
            store_rate,
        };
        policy.validate()?;

        Ok(policy)
    }

    pub(crate) fn validate(&self) -> Result<(), ZeroStoreRate> {
        if self.store_rate == 0 {
            return Err(ZeroStoreRate);
        }

        Ok(())
    }

    pub fn should_record(&self, iteration: usize) -> bool {
        self.enabled && self.store_rate > 0 && iteration % self.store_rate == 0
    }
}

/// A deep copy of one archived generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry<C> {
    pub iteration: usize,
    pub best_index: usize,
    pub best_fitness: f64,
    pub population: Vec<C>,
    pub recorded_at: DateTime<Utc>,
}

impl<C: Candidate> HistoryEntry<C> {
    pub(crate) fn new(iteration: usize, fittest: Fittest, population: &Population<C>) -> Self {
        Self {
            iteration,
            best_index: fittest.index,
            best_fitness: fittest.fitness,
            population: population.individuals().to_vec(),
            recorded_at: Utc::now(),
        }
    }

    pub fn best(&self) -> &C {
        &self.population[self.best_index]
    }
}

/// Append-only archive of generations, cleared on reinitialization.
#[derive(Debug, Clone)]
pub struct History<C> {
    entries: Vec<HistoryEntry<C>>,
}

impl<C> Default for History<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C: Candidate> History<C> {
    /// Archives the generation if the policy selects `iteration`.
    pub(crate) fn record(
        &mut self,
        policy: &HistoryPolicy,
        iteration: usize,
        fittest: Fittest,
        population: &Population<C>,
    ) -> bool {
        if !policy.should_record(iteration) {
            return false;
        }

        self.entries
            .push(HistoryEntry::new(iteration, fittest, population));
        tracing::debug!(
            iteration = iteration,
            num_entries = self.entries.len(),
            "Generation archived"
        );

        true
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry<C>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry<C>> {
        self.entries.last()
    }
}
