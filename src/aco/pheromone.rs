//! Pheromone matrix and reward deposition.

use super::config::ZeroFitnessPolicy;
use super::types::Path;
use crate::error::AcoError;
use rand::Rng;

/// Desirability of placing each item in each bin.
///
/// Stored flat, one row per bin: entry `(bin, item)` lives at
/// `bin * item_count + item`. All entries stay finite and non-negative
/// for the lifetime of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PheromoneMatrix {
    bins: usize,
    items: usize,
    values: Vec<f64>,
    cap: Option<f64>,
}

impl PheromoneMatrix {
    /// Creates a `bins × items` matrix of independent draws from `[0, 1)`.
    pub fn random<R: Rng>(bins: usize, items: usize, rng: &mut R) -> Result<Self, AcoError> {
        check_dimensions(bins, items)?;
        let values = (0..bins * items)
            .map(|_| rng.random_range(0.0..1.0))
            .collect();
        Ok(Self {
            bins,
            items,
            values,
            cap: None,
        })
    }

    /// Creates a matrix with every entry set to `value`.
    pub fn filled(bins: usize, items: usize, value: f64) -> Result<Self, AcoError> {
        check_dimensions(bins, items)?;
        Ok(Self {
            bins,
            items,
            values: vec![value.max(0.0); bins * items],
            cap: None,
        })
    }

    /// Bounds every future [`reinforce`](Self::reinforce) result by `cap`.
    pub fn with_cap(mut self, cap: Option<f64>) -> Self {
        self.cap = cap;
        if let Some(c) = cap {
            for v in &mut self.values {
                *v = v.min(c);
            }
        }
        self
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn item_count(&self) -> usize {
        self.items
    }

    pub fn cap(&self) -> Option<f64> {
        self.cap
    }

    #[inline]
    pub fn get(&self, bin: usize, item: usize) -> f64 {
        self.values[bin * self.items + item]
    }

    #[inline]
    pub(crate) fn set(&mut self, bin: usize, item: usize, value: f64) {
        self.values[bin * self.items + item] = value;
    }

    /// Pheromone for `item` across all bins, in bin order.
    pub fn column(&self, item: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.bins).map(move |b| self.get(b, item))
    }

    /// All entries, row-major by bin.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Adds `amount` to entry `(bin, item)`, clamped to the cap if one is set
    /// and saturating at `f64::MAX` otherwise.
    pub fn reinforce(&mut self, bin: usize, item: usize, amount: f64) {
        debug_assert!(
            amount.is_finite() && amount >= 0.0,
            "pheromone deposit must be finite and non-negative, got {amount}"
        );
        let idx = bin * self.items + item;
        let next = self.values[idx] + amount;
        self.values[idx] = next.min(self.cap.unwrap_or(f64::MAX));
    }

    /// Multiplies every entry by `rate`.
    pub fn evaporate(&mut self, rate: f64) {
        for v in &mut self.values {
            *v *= rate;
        }
    }
}

fn check_dimensions(bins: usize, items: usize) -> Result<(), AcoError> {
    if bins == 0 {
        return Err(AcoError::InvalidBins);
    }
    if items == 0 {
        return Err(AcoError::EmptyItems);
    }
    Ok(())
}

/// Deposits pheromone for one generation of paths.
///
/// Path `p` with fitness `f` adds `reward / f` to every `(p[i], i)`.
/// Paths are processed in order. Zero-fitness paths follow `zero_fitness`:
/// under [`ZeroFitnessPolicy::Stop`] they are skipped, under
/// [`ZeroFitnessPolicy::Clamp`] they deposit `max_reward`.
///
/// Returns the number of zero-fitness paths seen. A negative or
/// non-finite fitness yields [`AcoError::InvalidFitness`] and leaves the
/// matrix untouched.
pub fn reinforce_generation(
    matrix: &mut PheromoneMatrix,
    paths: &[Path],
    fitnesses: &[f64],
    reward: f64,
    zero_fitness: ZeroFitnessPolicy,
) -> Result<usize, AcoError> {
    debug_assert_eq!(paths.len(), fitnesses.len());

    if let Some((path, &fitness)) = fitnesses
        .iter()
        .enumerate()
        .find(|(_, f)| !(f.is_finite() && **f >= 0.0))
    {
        return Err(AcoError::InvalidFitness { path, fitness });
    }

    let mut perfect = 0;
    for (path, &fitness) in paths.iter().zip(fitnesses) {
        let update = if fitness > 0.0 {
            reward / fitness
        } else {
            perfect += 1;
            match zero_fitness {
                ZeroFitnessPolicy::Stop => continue,
                ZeroFitnessPolicy::Clamp { max_reward } => max_reward,
            }
        };
        // A tiny positive fitness can still overflow the quotient.
        let update = if update.is_finite() { update } else { f64::MAX };

        for (item, &bin) in path.iter().enumerate() {
            matrix.reinforce(bin, item, update);
        }
    }
    Ok(perfect)
}
