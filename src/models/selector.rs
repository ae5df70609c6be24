//! Fitness-proportionate parent selection.
//!
//! Selection happens in two stages. A [`Selector`] turns the fitness of every
//! candidate into a [`WeightEntry`], optionally sharpening the distribution by
//! raising fitness to a bias exponent. A [`CumulativeTable`] is then built once
//! per generation and spun as many times as parents are needed.
//!
//! # Weight derivation
//!
//! | Bias | Weight |
//! |------|--------|
//! | `Proportional` | `fitness / max_fitness` |
//! | `Exponent(e)` | `(fitness / max_fitness)^e` |
//!
//! Negative fitness values are shifted so the lowest candidate sits at zero
//! before the bias is applied. Non-negative fitness is used as is. Weights are
//! relative to the fittest candidate, which keeps them in `[0, 1]` for any
//! finite fitness without changing the selection probabilities.
//!
//! # Degenerate weights
//!
//! When every weight is zero, or the partial sums of caller-built entries
//! overflow, the roulette has no usable mass to spin. Selection then falls
//! back to a uniform draw over all entries and a warning is logged.
//!
//! ```rust
//! use fx_ga::models::{CumulativeTable, Selector, WeightEntry};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let entries = vec![WeightEntry::new(0, 1.0), WeightEntry::new(1, 3.0)];
//! let table = CumulativeTable::new(&entries)?;
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let index = table.select(&mut rng);
//! assert!(index == 0 || index == 1);
//!
//! // Squared fitness sharpens the selection pressure
//! let selector = Selector::biased(2.0)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::Candidate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The selection weight of the candidate at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub index: usize,
    pub weight: f64,
}

impl WeightEntry {
    pub fn new(index: usize, weight: f64) -> Self {
        Self { index, weight }
    }
}

/// Errors that can occur during parent selection.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum SelectionError {
    /// A roulette cannot be built without entries.
    #[error("No entries available for selection")]
    Empty,

    /// Weights must be finite and non-negative for the partial sums to be ordered.
    #[error("Invalid weight for candidate {index}: {weight}")]
    InvalidWeight { index: usize, weight: f64 },

    /// The bias exponent must be finite and strictly positive.
    #[error("Bias exponent must be finite and positive, got {0}")]
    InvalidExponent(f64),
}

/// Partial sums of a set of weight entries.
///
/// `sums[i]` is the total weight of `entries[0..=i]`, so the table is
/// non-decreasing and its last element is the total weight mass. Entries keep
/// their original index, which makes the table independent of entry order.
#[derive(Debug, Clone)]
pub struct CumulativeTable {
    indices: Vec<usize>,
    sums: Vec<f64>,
}

impl CumulativeTable {
    #[instrument(level = "debug", skip(entries), fields(num_entries = entries.len()))]
    pub fn new(entries: &[WeightEntry]) -> Result<Self, SelectionError> {
        if entries.is_empty() {
            return Err(SelectionError::Empty);
        }

        let mut indices = Vec::with_capacity(entries.len());
        let mut sums = Vec::with_capacity(entries.len());
        let mut cumulative = 0.0;

        for entry in entries {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(SelectionError::InvalidWeight {
                    index: entry.index,
                    weight: entry.weight,
                });
            }

            cumulative += entry.weight;
            indices.push(entry.index);
            sums.push(cumulative);
        }

        let table = Self { indices, sums };

        if table.is_degenerate() {
            if table.total().is_finite() {
                tracing::warn!(
                    num_entries = table.len(),
                    total = table.total(),
                    "Total selection weight is zero, falling back to uniform selection"
                );
            } else {
                tracing::warn!(
                    num_entries = table.len(),
                    total = table.total(),
                    "Total selection weight overflowed, falling back to uniform selection"
                );
            }
        }

        Ok(table)
    }

    /// The total weight mass.
    pub fn total(&self) -> f64 {
        self.sums[self.sums.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    /// True when there is no weight mass to spin and selection is uniform.
    pub fn is_degenerate(&self) -> bool {
        !(self.total() > 0.0 && self.total().is_finite())
    }

    pub fn sums(&self) -> &[f64] {
        &self.sums
    }

    /// Spins the roulette, returning the original index of the selected entry.
    pub fn select<R: Rng>(&self, rng: &mut R) -> usize {
        if self.is_degenerate() {
            return self.indices[rng.random_range(0..self.indices.len())];
        }

        let spin = rng.random_range(0.0..self.total());

        // First partial sum that is >= spin
        let position = self.sums.partition_point(|&sum| sum < spin);

        self.indices[position.min(self.indices.len() - 1)]
    }
}

/// Builds a table from `entries` and spins it once.
pub fn select<R: Rng>(entries: &[WeightEntry], rng: &mut R) -> Result<usize, SelectionError> {
    Ok(CumulativeTable::new(entries)?.select(rng))
}

/// How fitness is turned into selection weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeightBias {
    /// Weight equals fitness.
    Proportional,
    /// Weight equals fitness raised to the exponent. Values above 1.0 increase
    /// the selection pressure toward the fittest candidates.
    Exponent(f64),
}

/// Configuration for roulette wheel parent selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selector {
    pub bias: WeightBias,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            bias: WeightBias::Exponent(Self::DEFAULT_EXPONENT),
        }
    }
}

impl Selector {
    pub const DEFAULT_EXPONENT: f64 = 2.0;

    /// Selection probability directly proportional to fitness.
    pub fn proportional() -> Self {
        Self {
            bias: WeightBias::Proportional,
        }
    }

    /// Selection probability proportional to `fitness^exponent`.
    pub fn biased(exponent: f64) -> Result<Self, SelectionError> {
        let selector = Self {
            bias: WeightBias::Exponent(exponent),
        };
        selector.validate()?;

        Ok(selector)
    }

    pub(crate) fn validate(&self) -> Result<(), SelectionError> {
        match self.bias {
            WeightBias::Exponent(exponent) if !(exponent.is_finite() && exponent > 0.0) => {
                Err(SelectionError::InvalidExponent(exponent))
            }
            _ => Ok(()),
        }
    }

    /// Derives one weight entry per candidate, indexed by population position.
    #[instrument(
        level = "debug",
        skip(self, candidates),
        fields(bias = ?self.bias, num_candidates = candidates.len())
    )]
    pub fn weights<C: Candidate>(&self, candidates: &[C]) -> Vec<WeightEntry> {
        // Scale into [-1, 1] first so neither the shift nor the bias can overflow
        let scale = candidates
            .iter()
            .map(|candidate| candidate.fitness().abs())
            .fold(0.0, f64::max);

        let scaled: Vec<f64> = candidates
            .iter()
            .map(|candidate| {
                if scale > 0.0 {
                    candidate.fitness() / scale
                } else {
                    0.0
                }
            })
            .collect();

        let min_fitness = scaled.iter().copied().fold(f64::INFINITY, f64::min);
        let shift = if min_fitness < 0.0 { -min_fitness } else { 0.0 };
        let max_fitness = scaled
            .iter()
            .map(|fitness| fitness + shift)
            .fold(0.0, f64::max);

        scaled
            .into_iter()
            .enumerate()
            .map(|(index, fitness)| {
                let relative = if max_fitness > 0.0 {
                    (fitness + shift) / max_fitness
                } else {
                    0.0
                };
                let weight = match self.bias {
                    WeightBias::Proportional => relative,
                    WeightBias::Exponent(exponent) => relative.powf(exponent),
                };
                WeightEntry::new(index, weight)
            })
            .collect()
    }
}


#[cfg(test)]
mod selector_tests {
    use super::*;
    use crate::models::Individual;

    fn candidates(fitness: &[f64]) -> Vec<Individual> {
        fitness
            .iter()
            .map(|&fitness| Individual::new(vec![0.0], fitness))
            .collect()
    }

    fn assert_weights(weights: &[WeightEntry], expected: &[f64]) {
        assert_eq!(weights.len(), expected.len());
        for (index, (entry, expected)) in weights.iter().zip(expected).enumerate() {
            assert_eq!(entry.index, index);
            assert!(
                (entry.weight - expected).abs() < 1e-12,
                "weight {index}: {} != {expected}",
                entry.weight
            );
        }
    }

    #[test]
    fn it_defaults_to_squared_bias() {
        assert_eq!(Selector::default().bias, WeightBias::Exponent(2.0));
    }

    #[test]
    fn it_derives_proportional_weights() {
        let weights = Selector::proportional().weights(&candidates(&[1.0, 2.0, 3.0]));

        assert_weights(&weights, &[1.0 / 3.0, 2.0 / 3.0, 1.0]);
    }

    #[test]
    fn it_derives_biased_weights() {
        let selector = Selector::biased(2.0).unwrap();
        let weights = selector.weights(&candidates(&[1.0, 2.0, 3.0]));

        assert_weights(&weights, &[1.0 / 9.0, 4.0 / 9.0, 1.0]);
    }

    #[test]
    fn it_shifts_negative_fitness() {
        let weights = Selector::proportional().weights(&candidates(&[-1.0, 2.0, 0.0]));

        assert_weights(&weights, &[0.0, 1.0, 1.0 / 3.0]);
    }

    #[test]
    fn it_keeps_weights_finite_for_huge_fitness() {
        let selector = Selector::default();

        let weights = selector.weights(&candidates(&[1.0e200, 2.0e200, 3.0e200]));
        assert_weights(&weights, &[1.0 / 9.0, 4.0 / 9.0, 1.0]);

        let weights = selector.weights(&candidates(&[-f64::MAX, f64::MAX, 0.0]));
        assert_weights(&weights, &[0.0, 1.0, 0.25]);

        let steep = Selector::biased(500.0).unwrap();
        let weights = steep.weights(&candidates(&[1.0e300, 2.0e300]));
        assert!(weights.iter().all(|entry| entry.weight.is_finite()));
        assert!(CumulativeTable::new(&weights).is_ok());
    }

    #[test]
    fn it_weighs_equal_fitness_equally() {
        let weights = Selector::default().weights(&candidates(&[4.0, 4.0, 4.0]));
        assert_weights(&weights, &[1.0, 1.0, 1.0]);

        let weights = Selector::default().weights(&candidates(&[0.0, 0.0]));
        assert!(CumulativeTable::new(&weights).unwrap().is_degenerate());
    }

    #[test]
    fn it_rejects_invalid_exponents() {
        assert_eq!(
            Selector::biased(0.0).unwrap_err(),
            SelectionError::InvalidExponent(0.0)
        );
        assert!(Selector::biased(-1.5).is_err());
        assert!(Selector::biased(f64::INFINITY).is_err());
        assert!(Selector::biased(0.5).is_ok());
    }
}
