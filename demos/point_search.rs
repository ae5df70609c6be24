//! # Point Search Example
//!
//! Evolves 3D coordinates toward points at a specific distance from the origin.
//!
//! ## Key Concepts
//!
//! - **Gene**: The three coordinates of a point, drawn from `[0.5, 3.25)`
//! - **Fitness**: How good a solution is (higher = better)
//! - **Population**: A collection of candidate solutions
//! - **Generation**: One iteration of the evolutionary process
//!
//! Run with `RUST_LOG=fx_ga=info cargo run --example point_search` to follow
//! the per-generation progress.

use anyhow::Result;
use fx_ga::{
    Engine, EngineConfig,
    models::{Convergence, Evaluator, FitnessThreshold, Gene, GeneRange, HistoryPolicy, Selector},
};
use tracing_subscriber::EnvFilter;

/// Rewards points whose distance from the origin matches the target distance.
struct PointDistanceEvaluator;

impl Evaluator<f64> for PointDistanceEvaluator {
    fn fitness(&self, gene: &[Gene], target_distance: &f64) -> Result<f64, anyhow::Error> {
        if gene.len() != 3 {
            anyhow::bail!("expected 3 coordinates, got {}", gene.len());
        }

        let distance = gene.iter().map(|c| c * c).sum::<f64>().sqrt();

        // 1.0 on the target sphere, decreasing as we deviate
        Ok(1.0 / (1.0 + (distance - target_distance).abs()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Distance from the origin to (0.5, 0.75, 2.0)
    let target_distance = (0.5_f64.powi(2) + 0.75_f64.powi(2) + 2.0_f64.powi(2)).sqrt();

    let config = EngineConfig::default()
        .with_selector(Selector::biased(3.0)?)
        .with_convergence(Convergence::new(300, 1.0e-9, 25)?)
        .with_history(HistoryPolicy::every(10)?)
        .with_mutation_rate(0.05)?;

    let mut engine = Engine::builder(config)
        .with_seed(2024)
        .with_gene_source(GeneRange::new(0.5, 3.25)?)
        .build()?;
    engine.initialize(50, 3)?;

    let outcome = engine.run_with_hook(
        &PointDistanceEvaluator,
        &target_distance,
        FitnessThreshold::new(0.999),
    )?;

    tracing::info!(
        engine_id = %outcome.engine_id,
        termination = ?outcome.termination,
        iterations = outcome.iterations,
        best_fitness = outcome.best_fitness,
        x = outcome.best.gene[0],
        y = outcome.best.gene[1],
        z = outcome.best.gene[2],
        "Search finished"
    );

    for entry in engine.history() {
        tracing::info!(
            iteration = entry.iteration,
            best_fitness = entry.best_fitness,
            recorded_at = %entry.recorded_at,
            "Archived generation"
        );
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
