use super::{Candidate, EvaluationError, Evaluator, GeneSource};
use rand::Rng;
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum PopulationError {
    #[error("ZeroSize: population_size={population_size}, gene_size={gene_size}")]
    ZeroSize {
        population_size: usize,
        gene_size: usize,
    },
    #[error("EmptyPopulation")]
    Empty,
    #[error("GeneLengthMismatch: candidate={index}, expected={expected}, found={found}")]
    GeneLengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("NonFiniteFitness: candidate={index}, fitness={fitness}")]
    NonFiniteFitness { index: usize, fitness: f64 },
}

/// Index and fitness of the best candidate of an evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fittest {
    pub index: usize,
    pub fitness: f64,
}

/// The current generation and the breeding snapshot of the previous one.
///
/// `parents` is only ever overwritten as a whole, so breeding within one
/// generation always samples a single consistent snapshot.
#[derive(Debug, Clone)]
pub struct Population<C> {
    individuals: Vec<C>,
    parents: Vec<C>,
    gene_size: usize,
}

impl<C: Candidate> Population<C> {
    /// Creates `population_size` candidates with genes drawn from `source`.
    #[instrument(level = "debug", skip(source, rng), fields(population_size = population_size, gene_size = gene_size))]
    pub(crate) fn random<S: GeneSource, R: Rng>(
        population_size: usize,
        gene_size: usize,
        source: &mut S,
        rng: &mut R,
    ) -> Result<Self, PopulationError> {
        if population_size == 0 || gene_size == 0 {
            return Err(PopulationError::ZeroSize {
                population_size,
                gene_size,
            });
        }

        let mut individuals = Vec::with_capacity(population_size);
        for _ in 0..population_size {
            let gene = (0..gene_size).map(|_| source.next_gene(rng)).collect();
            individuals.push(C::from_gene(gene));
        }

        Ok(Self {
            parents: individuals.clone(),
            individuals,
            gene_size,
        })
    }

    /// Adopts caller-provided candidates, keeping their fitness values.
    #[instrument(level = "debug", skip(individuals), fields(population_size = individuals.len()))]
    pub(crate) fn from_individuals(individuals: Vec<C>) -> Result<Self, PopulationError> {
        let gene_size = match individuals.first() {
            Some(first) => first.gene().len(),
            None => return Err(PopulationError::Empty),
        };

        if gene_size == 0 {
            return Err(PopulationError::ZeroSize {
                population_size: individuals.len(),
                gene_size,
            });
        }

        if let Some((index, candidate)) = individuals
            .iter()
            .enumerate()
            .find(|(_, candidate)| candidate.gene().len() != gene_size)
        {
            return Err(PopulationError::GeneLengthMismatch {
                index,
                expected: gene_size,
                found: candidate.gene().len(),
            });
        }

        if let Some((index, candidate)) = individuals
            .iter()
            .enumerate()
            .find(|(_, candidate)| !candidate.fitness().is_finite())
        {
            return Err(PopulationError::NonFiniteFitness {
                index,
                fitness: candidate.fitness(),
            });
        }

        Ok(Self {
            parents: individuals.clone(),
            individuals,
            gene_size,
        })
    }

    /// Scores every candidate and returns the fittest.
    ///
    /// Ties go to the candidate that comes first. Fitness is committed only once
    /// every candidate was scored, so a failed pass leaves the population as it was.
    #[instrument(level = "debug", skip(self, evaluator, dataset), fields(population_size = self.individuals.len()))]
    pub(crate) fn evaluate<D, E>(
        &mut self,
        evaluator: &E,
        dataset: &D,
    ) -> Result<Fittest, EvaluationError>
    where
        D: ?Sized,
        E: Evaluator<D>,
    {
        let mut scores = Vec::with_capacity(self.individuals.len());

        for (index, candidate) in self.individuals.iter().enumerate() {
            let fitness = evaluator
                .fitness(candidate.gene(), dataset)
                .map_err(|source| EvaluationError::Failed { index, source })?;

            if !fitness.is_finite() {
                return Err(EvaluationError::NonFinite { index, fitness });
            }

            scores.push(fitness);
        }

        let mut fittest = Fittest {
            index: 0,
            fitness: scores[0],
        };

        for (index, (candidate, fitness)) in self.individuals.iter_mut().zip(scores).enumerate() {
            candidate.set_fitness(fitness);

            if fitness > fittest.fitness {
                fittest = Fittest { index, fitness };
            }
        }

        Ok(fittest)
    }

    /// Overwrites the breeding snapshot with the current generation.
    pub(crate) fn snapshot(&mut self) {
        self.parents.clone_from(&self.individuals);
    }

    pub fn individuals(&self) -> &[C] {
        &self.individuals
    }

    #[cfg(test)]
    pub(crate) fn individuals_mut(&mut self) -> &mut [C] {
        &mut self.individuals
    }

    pub fn parents(&self) -> &[C] {
        &self.parents
    }

    /// Split borrow of the breeding snapshot and the generation being written.
    pub(crate) fn split_mut(&mut self) -> (&[C], &mut [C]) {
        (&self.parents, &mut self.individuals)
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn gene_size(&self) -> usize {
        self.gene_size
    }
}
