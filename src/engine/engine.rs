use super::{EngineConfig, Error};
use crate::models::{
    Breeder, Candidate, ConvergenceHook, ConvergenceMonitor, Decision, Evaluator, Fittest,
    GeneSource, History, HistoryEntry, Individual, Never, Population, Termination, UniformGene,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use std::marker::PhantomData;
use tracing::instrument;
use uuid::Uuid;

/// The result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome<C> {
    pub engine_id: Uuid,
    pub best: C,
    pub best_index: usize,
    pub best_fitness: f64,
    /// Number of generations bred after the initial evaluation.
    pub iterations: usize,
    pub termination: Termination,
}

/// A generational genetic algorithm over real-valued genes.
///
/// The engine exclusively owns its population, breeding snapshot, gene source
/// and random stream. Every mutating operation takes `&mut self`.
///
/// ```rust
/// use fx_ga::{Engine, EngineConfig, models::Convergence};
///
/// let config = EngineConfig::default().with_convergence(Convergence::fixed(50));
/// let mut engine = Engine::builder(config).with_seed(42).build()?;
/// engine.initialize(20, 2)?;
///
/// // Maximise closeness to (0.5, 0.5)
/// let fitness = |gene: &[f64], _: &()| {
///     let distance: f64 = gene.iter().map(|g| (g - 0.5).powi(2)).sum();
///     Ok::<_, anyhow::Error>(1.0 / (1.0 + distance))
/// };
///
/// let outcome = engine.run(&fitness, &())?;
/// assert_eq!(outcome.iterations, 50);
/// assert_eq!(outcome.best.gene.len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Engine<C = Individual, S = UniformGene, R = StdRng> {
    id: Uuid,
    config: EngineConfig,
    gene_source: S,
    rng: R,
    population: Option<Population<C>>,
    fittest: Option<Fittest>,
    history: History<C>,
}

/// Wires configuration, gene source, random stream and candidate type into an [`Engine`].
pub struct EngineBuilder<C = Individual, S = UniformGene, R = StdRng> {
    config: EngineConfig,
    gene_source: S,
    rng: R,
    candidate: PhantomData<C>,
}

impl EngineBuilder {
    /// Uniform genes in `[0, 1)`, an OS-seeded `StdRng` and [`Individual`] candidates.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            gene_source: UniformGene,
            rng: StdRng::from_os_rng(),
            candidate: PhantomData,
        }
    }
}

impl<C, S, R> EngineBuilder<C, S, R> {
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(self, seed: u64) -> EngineBuilder<C, S, StdRng> {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R2: Rng>(self, rng: R2) -> EngineBuilder<C, S, R2> {
        EngineBuilder {
            config: self.config,
            gene_source: self.gene_source,
            rng,
            candidate: PhantomData,
        }
    }

    pub fn with_gene_source<S2: GeneSource>(self, gene_source: S2) -> EngineBuilder<C, S2, R> {
        EngineBuilder {
            config: self.config,
            gene_source,
            rng: self.rng,
            candidate: PhantomData,
        }
    }

    pub fn with_candidate<C2: Candidate>(self) -> EngineBuilder<C2, S, R> {
        EngineBuilder {
            config: self.config,
            gene_source: self.gene_source,
            rng: self.rng,
            candidate: PhantomData,
        }
    }
}

impl<C: Candidate, S: GeneSource, R: Rng> EngineBuilder<C, S, R> {
    #[instrument(level = "debug", skip(self), fields(elitism = self.config.elitism, max_iterations = self.config.convergence.max_iterations))]
    pub fn build(self) -> Result<Engine<C, S, R>, Error> {
        self.config.validate()?;

        Ok(Engine {
            id: Uuid::now_v7(),
            config: self.config,
            gene_source: self.gene_source,
            rng: self.rng,
            population: None,
            fittest: None,
            history: History::default(),
        })
    }
}

impl Engine {
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }
}

impl<C: Candidate, S: GeneSource, R: Rng> Engine<C, S, R> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replaces the configuration. An invalid configuration leaves the engine untouched.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), Error> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    fn reset(&mut self) {
        self.population = None;
        self.fittest = None;
        self.history.clear();
    }

    /// Discards all state and creates a random population.
    #[instrument(level = "info", skip(self), fields(engine_id = %self.id))]
    pub fn initialize(&mut self, population_size: usize, gene_size: usize) -> Result<(), Error> {
        self.reset();

        let population = Population::random(
            population_size,
            gene_size,
            &mut self.gene_source,
            &mut self.rng,
        )?;
        self.population = Some(population);

        Ok(())
    }

    /// Discards all state and adopts the given candidates, keeping their fitness.
    #[instrument(level = "info", skip(self, individuals), fields(engine_id = %self.id, population_size = individuals.len()))]
    pub fn set_population(&mut self, individuals: Vec<C>) -> Result<(), Error> {
        self.reset();
        self.population = Some(Population::from_individuals(individuals)?);

        Ok(())
    }

    /// Scores the current generation and remembers its fittest candidate.
    #[instrument(level = "debug", skip(self, evaluator, dataset), fields(engine_id = %self.id))]
    pub fn evaluate<D, E>(&mut self, evaluator: &E, dataset: &D) -> Result<Fittest, Error>
    where
        D: ?Sized,
        E: Evaluator<D>,
    {
        let population = self.population.as_mut().ok_or(Error::Uninitialized)?;

        let fittest = population.evaluate(evaluator, dataset).map_err(|err| {
            tracing::error!(engine_id = %self.id, err = ?err, "Evaluation aborted");
            err
        })?;
        self.fittest = Some(fittest);

        Ok(fittest)
    }

    /// Breeds the next generation from the breeding snapshot.
    ///
    /// The elite is taken from the last evaluation's fittest index, or slot 0
    /// if the population was never evaluated.
    #[instrument(level = "debug", skip(self), fields(engine_id = %self.id))]
    pub fn evolve(&mut self) -> Result<(), Error> {
        let engine_id = self.id;
        let population = self.population.as_mut().ok_or(Error::Uninitialized)?;
        let best_index = self.fittest.map_or(0, |fittest| fittest.index);

        Breeder::new(
            &self.config.selector,
            &self.config.mutagen,
            self.config.elitism,
        )
        .breed(population, best_index, &mut self.gene_source, &mut self.rng)
        .map_err(|err| {
            tracing::error!(engine_id = %engine_id, err = ?err, "Breeding aborted");
            err
        })?;

        Ok(())
    }

    /// Evaluates, then breeds and evaluates until a stop condition holds.
    pub fn run<D, E>(&mut self, evaluator: &E, dataset: &D) -> Result<Outcome<C>, Error>
    where
        D: ?Sized,
        E: Evaluator<D>,
    {
        self.run_with_hook(evaluator, dataset, Never)
    }

    /// Like [`Engine::run`], additionally stopping when `hook` reports convergence.
    ///
    /// The budget and no-change rules take precedence over the hook when
    /// several conditions hold in the same generation.
    #[instrument(level = "info", skip(self, evaluator, dataset, hook), fields(engine_id = %self.id, max_iterations = self.config.convergence.max_iterations))]
    pub fn run_with_hook<D, E, H>(
        &mut self,
        evaluator: &E,
        dataset: &D,
        mut hook: H,
    ) -> Result<Outcome<C>, Error>
    where
        D: ?Sized,
        E: Evaluator<D>,
        H: ConvergenceHook,
    {
        if self.population.is_none() {
            return Err(Error::Uninitialized);
        }

        let mut fittest = self.evaluate(evaluator, dataset)?;
        let mut monitor = ConvergenceMonitor::new(self.config.convergence.clone(), fittest.fitness);
        self.archive(0, fittest);

        tracing::info!(
            best_fitness = fittest.fitness,
            best_index = fittest.index,
            "Initial population evaluated"
        );

        let termination = if monitor.is_exhausted() {
            Termination::MaxIterations
        } else {
            loop {
                self.evolve()?;
                fittest = self.evaluate(evaluator, dataset)?;

                let (progress, decision) = monitor.observe(fittest);
                let custom = hook.is_converged(&progress);

                tracing::info!(
                    iteration = progress.iteration,
                    best_fitness = progress.best_fitness,
                    best_index = progress.best_index,
                    delta = progress.delta,
                    no_change_count = progress.no_change_count,
                    "Generation evaluated"
                );

                self.archive(progress.iteration, fittest);

                match decision {
                    Decision::Stop(termination) => break termination,
                    Decision::Continue if custom => break Termination::Custom,
                    Decision::Continue => {}
                }
            }
        };

        let population = self.population.as_ref().ok_or(Error::Uninitialized)?;
        let best = population.individuals()[fittest.index].clone();

        tracing::info!(
            iterations = monitor.iteration(),
            best_fitness = fittest.fitness,
            termination = ?termination,
            "Run finished"
        );

        Ok(Outcome {
            engine_id: self.id,
            best,
            best_index: fittest.index,
            best_fitness: fittest.fitness,
            iterations: monitor.iteration(),
            termination,
        })
    }

    fn archive(&mut self, iteration: usize, fittest: Fittest) {
        if let Some(population) = &self.population {
            self.history
                .record(&self.config.history, iteration, fittest, population);
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.population.is_some()
    }

    pub fn population(&self) -> Option<&Population<C>> {
        self.population.as_ref()
    }

    pub fn individual(&self, index: usize) -> Option<&C> {
        self.population
            .as_ref()
            .and_then(|population| population.individuals().get(index))
    }

    pub fn population_size(&self) -> usize {
        self.population.as_ref().map_or(0, |population| population.len())
    }

    pub fn gene_size(&self) -> usize {
        self.population
            .as_ref()
            .map_or(0, |population| population.gene_size())
    }

    /// Index and fitness of the best candidate of the last evaluation.
    pub fn fittest(&self) -> Option<Fittest> {
        self.fittest
    }

    /// The best candidate of the last evaluation.
    ///
    /// After [`Engine::evolve`] this slot holds the elite copy when elitism is
    /// enabled, and an offspring otherwise.
    pub fn best(&self) -> Option<&C> {
        self.fittest
            .and_then(|fittest| self.individual(fittest.index))
    }

    pub fn history(&self) -> &[HistoryEntry<C>] {
        self.history.entries()
    }
}
