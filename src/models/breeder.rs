use super::{
    Candidate, CumulativeTable, GeneSource, Mutagen, Population, SelectionError, Selector,
    crossover,
};
use rand::Rng;
use tracing::instrument;

/// Breeds one generation from the parents snapshot of a population.
pub(crate) struct Breeder<'a> {
    selector: &'a Selector,
    mutagen: &'a Mutagen,
    elitism: bool,
}

impl<'a> Breeder<'a> {
    pub(crate) fn new(selector: &'a Selector, mutagen: &'a Mutagen, elitism: bool) -> Self {
        Self {
            selector,
            mutagen,
            elitism,
        }
    }

    /// Replaces every slot of the population with offspring of its parents.
    ///
    /// With elitism, slot 0 receives an unmutated copy of the parent at
    /// `best_index`. Remaining slots are filled pairwise with complementary
    /// single-point crossover children; an odd remainder gets only the first
    /// child of the last pair. The generation is then snapshotted as the parents
    /// of the next one.
    #[instrument(level = "debug", skip(self, population, source, rng), fields(population_size = population.len(), best_index = best_index, elitism = self.elitism))]
    pub(crate) fn breed<C, S, R>(
        &self,
        population: &mut Population<C>,
        best_index: usize,
        source: &mut S,
        rng: &mut R,
    ) -> Result<(), SelectionError>
    where
        C: Candidate,
        S: GeneSource,
        R: Rng,
    {
        let table = CumulativeTable::new(&self.selector.weights(population.individuals()))?;
        let gene_size = population.gene_size();
        let (parents, individuals) = population.split_mut();
        let mut cursor = 0;
        let mut mutations = 0;

        if self.elitism {
            individuals[0]
                .gene_mut()
                .copy_from_slice(parents[best_index].gene());
            cursor = 1;
        }

        while cursor < individuals.len() {
            let mom = table.select(rng);
            let dad = table.select(rng);
            let point = crossover::cut_point(rng, gene_size);

            crossover::splice(
                parents[mom].gene(),
                parents[dad].gene(),
                point,
                individuals[cursor].gene_mut(),
            );
            mutations += self
                .mutagen
                .mutate(rng, source, individuals[cursor].gene_mut());
            cursor += 1;

            if cursor < individuals.len() {
                crossover::splice(
                    parents[dad].gene(),
                    parents[mom].gene(),
                    point,
                    individuals[cursor].gene_mut(),
                );
                mutations += self
                    .mutagen
                    .mutate(rng, source, individuals[cursor].gene_mut());
                cursor += 1;
            }
        }

        population.snapshot();

        tracing::debug!(mutations = mutations, "Generation bred");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Individual, UniformGene};
    use rand::{RngCore, SeedableRng, rngs::StdRng};

    fn population(genes: &[[f64; 3]], fitness: &[f64]) -> Population<Individual> {
        Population::from_individuals(
            genes
                .iter()
                .zip(fitness)
                .map(|(gene, &fitness)| Individual::new(gene.to_vec(), fitness))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn it_keeps_the_elite_unmutated() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut population = population(
            &[[0.1, 0.1, 0.1], [0.9, 0.8, 0.7], [0.5, 0.5, 0.5]],
            &[1.0, 3.0, 2.0],
        );
        let selector = Selector::default();
        let mutagen = Mutagen::constant(1.0).unwrap();

        Breeder::new(&selector, &mutagen, true)
            .breed(&mut population, 1, &mut UniformGene, &mut rng)
            .unwrap();

        assert_eq!(population.individuals()[0].gene, vec![0.9, 0.8, 0.7]);
        assert_eq!(population.parents(), population.individuals());
    }

    #[test]
    fn it_breeds_children_from_parent_values() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut population = population(
            &[
                [1.0, 2.0, 3.0],
                [4.0, 5.0, 6.0],
                [7.0, 8.0, 9.0],
                [1.5, 2.5, 3.5],
                [0.0, 0.0, 0.0],
            ],
            &[1.0, 1.0, 1.0, 1.0, 1.0],
        );
        let parents = population.parents().to_vec();
        let selector = Selector::proportional();
        let mutagen = Mutagen::constant(0.0).unwrap();

        Breeder::new(&selector, &mutagen, false)
            .breed(&mut population, 0, &mut UniformGene, &mut rng)
            .unwrap();

        assert_eq!(population.len(), 5);
        for child in population.individuals() {
            for (position, value) in child.gene.iter().enumerate() {
                assert!(parents.iter().any(|parent| parent.gene[position] == *value));
            }
        }
    }

    #[test]
    fn it_writes_complementary_pairs() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut population = population(
            &[
                [1.0, 2.0, 3.0],
                [4.0, 5.0, 6.0],
                [7.0, 8.0, 9.0],
                [10.0, 11.0, 12.0],
            ],
            &[1.0, 2.0, 3.0, 4.0],
        );
        let selector = Selector::proportional();
        let mutagen = Mutagen::constant(0.0).unwrap();

        Breeder::new(&selector, &mutagen, false)
            .breed(&mut population, 0, &mut UniformGene, &mut rng)
            .unwrap();

        // Parent genes are column-unique, so the sum per position of each pair
        // equals the sum of the two parents it was spliced from.
        for pair in population.individuals().chunks(2) {
            let (first, second) = (&pair[0].gene, &pair[1].gene);
            let totals: Vec<f64> = first.iter().zip(second).map(|(a, b)| a + b).collect();
            let parent_totals: Vec<Vec<f64>> = (0..4)
                .flat_map(|mom| (0..4).map(move |dad| (mom, dad)))
                .map(|(mom, dad)| {
                    (0..3)
                        .map(|position| {
                            (1.0 + 3.0 * mom as f64 + position as f64)
                                + (1.0 + 3.0 * dad as f64 + position as f64)
                        })
                        .collect()
                })
                .collect();

            assert!(parent_totals.contains(&totals));
        }
    }

    #[test]
    fn it_fills_odd_populations() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut population = population(
            &[[0.1, 0.2, 0.3], [0.4, 0.5, 0.6], [0.7, 0.8, 0.9]],
            &[1.0, 2.0, 3.0],
        );
        let selector = Selector::default();
        let mutagen = Mutagen::constant(1.0).unwrap();
        let mut source = |_: &mut dyn RngCore| 42.0;

        Breeder::new(&selector, &mutagen, true)
            .breed(&mut population, 2, &mut source, &mut rng)
            .unwrap();

        assert_eq!(population.individuals()[0].gene, vec![0.7, 0.8, 0.9]);
        assert_eq!(population.individuals()[1].gene, vec![42.0; 3]);
        assert_eq!(population.individuals()[2].gene, vec![42.0; 3]);
    }

    #[test]
    fn it_breeds_from_zero_fitness() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut population = population(&[[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]], &[0.0, 0.0]);
        let selector = Selector::default();
        let mutagen = Mutagen::default();

        let result = Breeder::new(&selector, &mutagen, false).breed(
            &mut population,
            0,
            &mut UniformGene,
            &mut rng,
        );

        assert!(result.is_ok());
        assert_eq!(population.len(), 2);
    }
}
