use super::Gene;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Supplies gene values for initial populations and for replacement mutation.
///
/// Implementations draw from the engine's random stream so that a seeded engine
/// stays reproducible. Override it to bias the search space.
pub trait GeneSource {
    fn next_gene<R: Rng>(&mut self, rng: &mut R) -> Gene;
}

impl<F> GeneSource for F
where
    F: FnMut(&mut dyn RngCore) -> Gene,
{
    fn next_gene<R: Rng>(&mut self, rng: &mut R) -> Gene {
        self(rng)
    }
}

/// Uniform gene values over `[0.0, 1.0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UniformGene;

impl GeneSource for UniformGene {
    fn next_gene<R: Rng>(&mut self, rng: &mut R) -> Gene {
        rng.random::<f64>()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeneRangeError {
    #[error("InvalidRange: lower bound must be smaller than upper. lower={lower}, upper={upper}")]
    InvalidRange { lower: f64, upper: f64 },
    #[error("NonFinite: bounds must be finite. lower={lower}, upper={upper}")]
    NonFinite { lower: f64, upper: f64 },
}

/// Uniform gene values over `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneRange {
    lower: f64,
    upper: f64,
}

impl GeneRange {
    #[instrument(level = "debug", fields(lower = lower, upper = upper))]
    pub fn new(lower: f64, upper: f64) -> Result<Self, GeneRangeError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(GeneRangeError::NonFinite { lower, upper });
        }

        if lower >= upper {
            return Err(GeneRangeError::InvalidRange { lower, upper });
        }

        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }
}

impl GeneSource for GeneRange {
    fn next_gene<R: Rng>(&mut self, rng: &mut R) -> Gene {
        rng.random_range(self.lower..self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn it_draws_uniform_genes_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut source = UniformGene;

        for _ in 0..1000 {
            let gene = source.next_gene(&mut rng);
            assert!((0.0..1.0).contains(&gene));
        }
    }

    #[test]
    fn it_draws_within_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut source = GeneRange::new(-2.0, 3.0).expect("is valid");

        for _ in 0..1000 {
            let gene = source.next_gene(&mut rng);
            assert!((-2.0..3.0).contains(&gene));
        }
    }

    #[test]
    fn it_rejects_invalid_ranges() {
        assert!(GeneRange::new(1.0, 1.0).is_err());
        assert!(GeneRange::new(2.0, 1.0).is_err());
        assert!(GeneRange::new(f64::NEG_INFINITY, 1.0).is_err());
        assert!(GeneRange::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn it_accepts_closures_as_sources() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut calls = 0;
        let mut source = |_: &mut dyn RngCore| {
            calls += 1;
            0.5
        };

        assert_eq!(source.next_gene(&mut rng), 0.5);
        assert_eq!(source.next_gene(&mut rng), 0.5);
        drop(source);
        assert_eq!(calls, 2);
    }
}
