use serde::{Deserialize, Serialize};

/// The real-valued free parameters of a candidate.
pub type Gene = f64;

/// Contract between the engine and the concrete candidate representation.
///
/// The engine only ever reads and writes genes and fitness through this trait,
/// so a single engine can drive many candidate shapes.
pub trait Candidate: Clone {
    /// Builds a candidate with the given gene and a fitness of zero.
    fn from_gene(gene: Vec<Gene>) -> Self;

    fn gene(&self) -> &[Gene];

    fn gene_mut(&mut self) -> &mut [Gene];

    fn fitness(&self) -> f64;

    fn set_fitness(&mut self, fitness: f64);
}

/// The default candidate: a gene vector and its last evaluated fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub gene: Vec<Gene>,
    pub fitness: f64,
}

impl Individual {
    pub fn new(gene: Vec<Gene>, fitness: f64) -> Self {
        Self { gene, fitness }
    }
}

impl Candidate for Individual {
    fn from_gene(gene: Vec<Gene>) -> Self {
        Self { gene, fitness: 0.0 }
    }

    fn gene(&self) -> &[Gene] {
        &self.gene
    }

    fn gene_mut(&mut self) -> &mut [Gene] {
        &mut self.gene
    }

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_starts_with_zero_fitness() {
        let individual = Individual::from_gene(vec![0.1, 0.2]);

        assert_eq!(individual.fitness(), 0.0);
        assert_eq!(individual.gene(), &[0.1, 0.2]);
    }

    #[test]
    fn it_mutates_genes_in_place() {
        let mut individual = Individual::new(vec![0.1, 0.2], 3.0);
        individual.gene_mut()[1] = 0.9;
        individual.set_fitness(4.0);

        assert_eq!(individual, Individual::new(vec![0.1, 0.9], 4.0));
    }
}
