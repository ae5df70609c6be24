//! A generational genetic algorithm over fixed-length, real-valued genes.
//!
//! An [`Engine`] keeps a population of candidates, scores them with a
//! caller-supplied [`models::Evaluator`], and breeds new generations with
//! roulette-wheel selection, single-point crossover, replacement mutation and
//! optional elitism until the generation budget is spent, the best fitness
//! stops changing, or a [`models::ConvergenceHook`] asks it to stop.

pub mod engine;
pub mod models;

pub use engine::{ConfigError, Engine, EngineBuilder, EngineConfig, Error, Outcome};
