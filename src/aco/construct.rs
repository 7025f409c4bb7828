//! Pheromone-guided path construction.
//!
//! Each item is placed independently by roulette-wheel selection over its
//! pheromone column. Bin loads chosen so far in the same path play no part.

use super::config::DegenerateColumnPolicy;
use super::pheromone::PheromoneMatrix;
use super::types::{BinPackingProblem, Path};
use crate::error::AcoError;
use rand::Rng;

/// Builds one ant path for `problem` by sampling `matrix`.
///
/// For item `i`, a point `r` is drawn from `[0, total)` where `total` is
/// the sum of column `i`; the first bin whose running sum reaches `r` wins.
/// A column with no usable mass is handled by `degenerate`.
pub fn build_path<R: Rng>(
    problem: &BinPackingProblem,
    matrix: &PheromoneMatrix,
    degenerate: DegenerateColumnPolicy,
    rng: &mut R,
) -> Result<Path, AcoError> {
    if matrix.bins() != problem.bins() || matrix.item_count() != problem.item_count() {
        return Err(AcoError::DimensionMismatch {
            matrix_bins: matrix.bins(),
            matrix_items: matrix.item_count(),
            bins: problem.bins(),
            items: problem.item_count(),
        });
    }

    let bins = problem.bins();
    let mut column = Vec::with_capacity(bins);
    let mut path = Vec::with_capacity(problem.item_count());

    for item in 0..problem.item_count() {
        column.clear();
        column.extend(matrix.column(item));

        let bin = match roulette(&column, rng) {
            Some(bin) => bin,
            None => match degenerate {
                DegenerateColumnPolicy::Uniform => {
                    log::warn!("pheromone column for item {item} is empty, choosing bin uniformly");
                    rng.random_range(0..bins)
                }
                DegenerateColumnPolicy::Fail => {
                    return Err(AcoError::DegenerateSelection { item })
                }
            },
        };
        path.push(bin);
    }

    Ok(path)
}

/// Fitness-proportionate selection over `weights`.
///
/// Returns `None` when the weights carry no probability mass.
pub(crate) fn roulette<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let mut scale = 1.0;
    let mut total: f64 = weights.iter().sum();
    if total.is_infinite() {
        // Entries saturated near f64::MAX: compare them relative to the largest.
        scale = weights.iter().cloned().fold(0.0, f64::max);
        total = weights.iter().map(|w| w / scale).sum();
    }
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }

    let r = rng.random_range(0.0..total);
    let mut acc = 0.0;
    let mut last = 0;
    for (idx, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        acc += w / scale;
        last = idx;
        if acc >= r {
            return Some(idx);
        }
    }
    // Rounding can leave the running sum a hair below `r`.
    Some(last)
}
