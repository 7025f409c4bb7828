//! Problem definition and fitness evaluation.

use crate::error::AcoError;

/// One candidate assignment: `path[i]` is the bin chosen for item `i`.
pub type Path = Vec<usize>;

/// A load-balancing bin packing instance.
///
/// Items have fixed non-negative weights and must each go into exactly
/// one of `bins` bins. There is no capacity: the goal is to minimize the
/// spread between the heaviest and the lightest bin.
///
/// # Examples
///
/// ```
/// use u_antpack::aco::BinPackingProblem;
///
/// let problem = BinPackingProblem::new(2, vec![5.0, 5.0]).unwrap();
/// assert_eq!(problem.evaluate(&vec![0, 1]), 0.0);
/// assert_eq!(problem.evaluate(&vec![1, 1]), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinPackingProblem {
    bins: usize,
    weights: Vec<f64>,
}

impl BinPackingProblem {
    /// Creates a problem, rejecting empty or non-finite inputs.
    pub fn new(bins: usize, weights: Vec<f64>) -> Result<Self, AcoError> {
        if bins == 0 {
            return Err(AcoError::InvalidBins);
        }
        if weights.is_empty() {
            return Err(AcoError::EmptyItems);
        }
        if let Some((index, &weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(AcoError::InvalidItemWeight { index, weight });
        }
        let total: f64 = weights.iter().sum();
        if !total.is_finite() {
            return Err(AcoError::InvalidTotalWeight(total));
        }
        Ok(Self { bins, weights })
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn item_count(&self) -> usize {
        self.weights.len()
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Sums item weights per bin.
    ///
    /// # Panics
    /// Panics if `path` refers to a bin outside `0..bins`.
    pub fn bin_loads(&self, path: &[usize]) -> Vec<f64> {
        let mut loads = vec![0.0; self.bins];
        for (&bin, &weight) in path.iter().zip(&self.weights) {
            loads[bin] += weight;
        }
        loads
    }

    /// Fitness of a path: heaviest bin load minus lightest. Lower is better.
    pub fn evaluate(&self, path: &[usize]) -> f64 {
        spread(&self.bin_loads(path))
    }

    /// Fitness of the naive packing that dumps every item into one bin.
    pub fn single_bin_fitness(&self) -> f64 {
        if self.bins == 1 {
            0.0
        } else {
            self.total_weight()
        }
    }
}

/// `max - min` over a load vector.
pub(crate) fn spread(loads: &[f64]) -> f64 {
    let (min, max) = loads
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &l| {
            (lo.min(l), hi.max(l))
        });
    max - min
}
