use super::Gene;
use rand::Rng;
use tracing::instrument;

/// Draws a single-point crossover cut, uniform over `0..=gene_size`.
///
/// A cut at `0` or `gene_size` makes each child a copy of one parent.
pub fn cut_point<R: Rng>(rng: &mut R, gene_size: usize) -> usize {
    rng.random_range(0..=gene_size)
}

/// Writes `lhs[..point] ++ rhs[point..]` into `child`.
///
/// All three slices must have the same length and `point <= child.len()`.
/// Splicing the parents in both orders at the same cut yields a complementary
/// pair holding every parent value exactly once per position.
///
/// ```rust
/// use fx_ga::models::crossover;
///
/// let mom = [1.0, 2.0, 3.0, 4.0];
/// let dad = [5.0, 6.0, 7.0, 8.0];
/// let mut first = [0.0; 4];
/// let mut second = [0.0; 4];
///
/// crossover::splice(&mom, &dad, 1, &mut first);
/// crossover::splice(&dad, &mom, 1, &mut second);
///
/// assert_eq!(first, [1.0, 6.0, 7.0, 8.0]);
/// assert_eq!(second, [5.0, 2.0, 3.0, 4.0]);
/// ```
#[instrument(
    level = "debug",
    skip(lhs, rhs, child),
    fields(gene_length = child.len(), cut_point = point)
)]
pub fn splice(lhs: &[Gene], rhs: &[Gene], point: usize, child: &mut [Gene]) {
    child[..point].copy_from_slice(&lhs[..point]); // Head from lhs
    child[point..].copy_from_slice(&rhs[point..]); // Tail from rhs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const MOM: [Gene; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
    const DAD: [Gene; 5] = [6.0, 7.0, 8.0, 9.0, 10.0];

    fn pair(mom: &[Gene], dad: &[Gene], point: usize) -> (Vec<Gene>, Vec<Gene>) {
        let mut first = vec![0.0; mom.len()];
        let mut second = vec![0.0; mom.len()];

        splice(mom, dad, point, &mut first);
        splice(dad, mom, point, &mut second);

        (first, second)
    }

    #[test]
    fn it_performs_single_point_crossover() {
        let mut child = [0.0; 5];

        splice(&MOM, &DAD, 2, &mut child);
        assert_eq!(child, [1.0, 2.0, 8.0, 9.0, 10.0]);

        splice(&MOM, &DAD, 4, &mut child);
        assert_eq!(child, [1.0, 2.0, 3.0, 4.0, 10.0]);
    }

    #[test]
    fn it_copies_a_parent_at_the_edges() {
        let (first, second) = pair(&MOM, &DAD, 0);
        assert_eq!(first, DAD.to_vec());
        assert_eq!(second, MOM.to_vec());

        let (first, second) = pair(&MOM, &DAD, 5);
        assert_eq!(first, MOM.to_vec());
        assert_eq!(second, DAD.to_vec());
    }

    #[test]
    fn it_produces_complementary_children() {
        for point in 0..=MOM.len() {
            let (first, second) = pair(&MOM, &DAD, point);

            for i in 0..MOM.len() {
                if i < point {
                    assert_eq!((first[i], second[i]), (MOM[i], DAD[i]));
                } else {
                    assert_eq!((first[i], second[i]), (DAD[i], MOM[i]));
                }
            }
        }
    }

    #[test]
    fn it_draws_every_cut_point_inclusive() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 5];

        for _ in 0..1000 {
            let point = cut_point(&mut rng, 4);
            assert!(point <= 4);
            seen[point] = true;
        }

        assert!(seen.iter().all(|&hit| hit));
    }
}
