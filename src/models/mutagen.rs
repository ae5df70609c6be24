use super::{Gene, GeneSource};
use rand::Rng;
use serde::{Deserialize, Serialize};

// ============================================================
// MutationRate
// ============================================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct MutationRate(f64);

#[derive(Debug, thiserror::Error)]
#[error("mutation_rate must be between 0.0 and 1.0, got: {0}")]
pub struct MutationRateOutOfRange(f64);

impl MutationRate {
    pub const DEFAULT: f64 = 0.01;

    pub fn new(value: f64) -> Result<Self, MutationRateOutOfRange> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MutationRateOutOfRange(value));
        }

        Ok(Self(value))
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Default for MutationRate {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f64> for MutationRate {
    type Error = MutationRateOutOfRange;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MutationRate> for f64 {
    fn from(rate: MutationRate) -> Self {
        rate.0
    }
}

// ============================================================
// Mutagen
// ============================================================

/// Replacement mutation: every gene is independently replaced by a fresh draw
/// from the gene source with probability `mutation_rate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mutagen {
    pub mutation_rate: MutationRate,
}

impl Mutagen {
    pub fn new(mutation_rate: MutationRate) -> Self {
        Self { mutation_rate }
    }

    pub fn constant(mutation_rate: f64) -> Result<Self, MutationRateOutOfRange> {
        Ok(Self {
            mutation_rate: MutationRate::new(mutation_rate)?,
        })
    }

    /// Mutates `gene` in place and returns the number of replaced values.
    pub(crate) fn mutate<R: Rng, S: GeneSource>(
        &self,
        rng: &mut R,
        source: &mut S,
        gene: &mut [Gene],
    ) -> usize {
        let mut mutated = 0;

        for value in gene.iter_mut() {
            if rng.random_bool(self.mutation_rate.get()) {
                *value = source.next_gene(rng);
                mutated += 1;
            }
        }

        mutated
    }
}
