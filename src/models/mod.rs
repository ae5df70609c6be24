mod breeder;
mod candidate;
mod convergence;
pub mod crossover;
mod evaluator;
mod gene_source;
mod history;
mod mutagen;
mod population;
mod selector;

pub use candidate::{Candidate, Gene, Individual};
pub use convergence::{
    Convergence, ConvergenceError, ConvergenceHook, ConvergenceMonitor, Decision,
    FitnessThreshold, Never, Progress, Termination,
};
pub use evaluator::{DimensionMismatch, EvaluationError, Evaluator, NearestSample};
pub use gene_source::{GeneRange, GeneRangeError, GeneSource, UniformGene};
pub use history::{History, HistoryEntry, HistoryPolicy, ZeroStoreRate};
pub use mutagen::{Mutagen, MutationRate, MutationRateOutOfRange};
pub use population::{Fittest, Population, PopulationError};
pub use selector::{CumulativeTable, SelectionError, Selector, WeightBias, WeightEntry, select};

pub(crate) use breeder::Breeder;
