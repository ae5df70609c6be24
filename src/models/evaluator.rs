use super::Gene;
use tracing::instrument;

/// Objective function returning the fitness of a gene against a dataset.
///
/// Higher fitness is better. Fitness should be non-negative when biased
/// selection uses a non-integer exponent; negative values are shifted before
/// selection. Returning an error aborts the current run.
pub trait Evaluator<D: ?Sized> {
    fn fitness(&self, gene: &[Gene], dataset: &D) -> Result<f64, anyhow::Error>;
}

impl<D, F> Evaluator<D> for F
where
    D: ?Sized,
    F: Fn(&[Gene], &D) -> Result<f64, anyhow::Error>,
{
    fn fitness(&self, gene: &[Gene], dataset: &D) -> Result<f64, anyhow::Error> {
        self(gene, dataset)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("EvaluationFailed: candidate={index}: {source}")]
    Failed {
        index: usize,
        #[source]
        source: anyhow::Error,
    },
    #[error("NonFiniteFitness: candidate={index}, fitness={fitness}")]
    NonFinite { index: usize, fitness: f64 },
}

#[derive(Debug, thiserror::Error)]
#[error("dataset rows must have {expected} columns, row {row} has {found}")]
pub struct DimensionMismatch {
    expected: usize,
    found: usize,
    row: usize,
}

/// Scores a gene by its distance to the nearest row of a dataset.
///
/// Fitness is `1 / e²` where `e` is the smallest squared euclidean distance to
/// any row, offset by a small epsilon and normalised by the gene length. Genes
/// close to a sample therefore score very high.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestSample;

impl NearestSample {
    const EPSILON: f64 = 1.0e-5;
}

impl Evaluator<[Vec<f64>]> for NearestSample {
    #[instrument(level = "debug", skip(self, gene, dataset), fields(gene_length = gene.len(), rows = dataset.len()))]
    fn fitness(&self, gene: &[Gene], dataset: &[Vec<f64>]) -> Result<f64, anyhow::Error> {
        if dataset.is_empty() {
            anyhow::bail!("dataset is empty");
        }

        let mut min_error = f64::MAX;
        for (row_index, row) in dataset.iter().enumerate() {
            if row.len() != gene.len() {
                return Err(DimensionMismatch {
                    expected: gene.len(),
                    found: row.len(),
                    row: row_index,
                }
                .into());
            }

            let error: f64 = row
                .iter()
                .zip(gene.iter())
                .map(|(sample, value)| (sample - value) * (sample - value))
                .sum();

            if error < min_error {
                min_error = error;
            }
        }

        let error = (min_error + Self::EPSILON) / gene.len() as f64;

        Ok(1.0 / (error * error))
    }
}
