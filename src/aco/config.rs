//! ACO configuration and degenerate-case policies.

use crate::error::AcoError;

/// What to do when a path packs every bin to exactly the same load.
///
/// The reward `K / fitness` is undefined at zero fitness. Neither policy
/// lets an infinite or NaN pheromone value into the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZeroFitnessPolicy {
    /// Treat a perfect packing as a terminal success.
    ///
    /// The zero-fitness path is not reinforced, the rest of the generation
    /// is, evaporation runs, and the search stops after that generation.
    #[default]
    Stop,

    /// Reward the zero-fitness path with `max_reward` and keep searching.
    Clamp {
        /// Finite positive reward used in place of `K / 0`.
        max_reward: f64,
    },
}

/// What to do when every bin's pheromone for an item has decayed to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DegenerateColumnPolicy {
    /// Pick the item's bin uniformly at random and continue.
    #[default]
    Uniform,

    /// Abort the search with [`AcoError::DegenerateSelection`].
    Fail,
}

/// Configuration for the ACO bin packing search.
///
/// # Examples
///
/// ```
/// use u_antpack::aco::{AcoConfig, ZeroFitnessPolicy};
///
/// let config = AcoConfig::default()
///     .with_paths_per_generation(50)
///     .with_evaporation_rate(0.9)
///     .with_total_fitness_evaluations(5_000)
///     .with_zero_fitness(ZeroFitnessPolicy::Clamp { max_reward: 1e3 })
///     .with_seed(42);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.generation_count(), 100);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Number of ant paths built per generation.
    pub paths_per_generation: usize,

    /// Multiplicative decay applied to every pheromone once per generation.
    ///
    /// Must be in (0, 1]. 1.0 disables evaporation.
    pub evaporation_rate: f64,

    /// Total fitness evaluation budget.
    ///
    /// The run has `total_fitness_evaluations / paths_per_generation`
    /// generations; any remainder is unused.
    pub total_fitness_evaluations: usize,

    /// Reward constant `K`. A path with fitness `f` deposits `K / f`
    /// on every (bin, item) pair it uses.
    pub reward: f64,

    /// Upper bound on any single pheromone entry. `None` = unbounded.
    pub pheromone_cap: Option<f64>,

    pub zero_fitness: ZeroFitnessPolicy,

    pub degenerate_column: DegenerateColumnPolicy,

    /// Build and evaluate each generation's paths in parallel.
    ///
    /// Only takes effect with the `parallel` feature. Results are the same
    /// either way for a given seed.
    pub parallel: bool,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            paths_per_generation: 100,
            evaporation_rate: 0.90,
            total_fitness_evaluations: 10_000,
            reward: 100.0,
            pheromone_cap: None,
            zero_fitness: ZeroFitnessPolicy::default(),
            degenerate_column: DegenerateColumnPolicy::default(),
            parallel: false,
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_paths_per_generation(mut self, n: usize) -> Self {
        self.paths_per_generation = n;
        self
    }

    pub fn with_evaporation_rate(mut self, rate: f64) -> Self {
        self.evaporation_rate = rate;
        self
    }

    pub fn with_total_fitness_evaluations(mut self, n: usize) -> Self {
        self.total_fitness_evaluations = n;
        self
    }

    pub fn with_reward(mut self, k: f64) -> Self {
        self.reward = k;
        self
    }

    pub fn with_pheromone_cap(mut self, cap: f64) -> Self {
        self.pheromone_cap = Some(cap);
        self
    }

    pub fn with_zero_fitness(mut self, policy: ZeroFitnessPolicy) -> Self {
        self.zero_fitness = policy;
        self
    }

    pub fn with_degenerate_column(mut self, policy: DegenerateColumnPolicy) -> Self {
        self.degenerate_column = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of generations the budget allows.
    pub fn generation_count(&self) -> usize {
        if self.paths_per_generation == 0 {
            0
        } else {
            self.total_fitness_evaluations / self.paths_per_generation
        }
    }

    /// Validates the configuration.
    ///
    /// Parameter errors are reported first. A budget too small for a single
    /// generation yields [`AcoError::EmptyRun`].
    pub fn validate(&self) -> Result<(), AcoError> {
        if self.paths_per_generation == 0 {
            return Err(AcoError::InvalidPathsPerGeneration);
        }
        if !(self.evaporation_rate > 0.0 && self.evaporation_rate <= 1.0) {
            return Err(AcoError::InvalidEvaporationRate(self.evaporation_rate));
        }
        if self.total_fitness_evaluations == 0 {
            return Err(AcoError::InvalidEvaluationBudget);
        }
        if !(self.reward.is_finite() && self.reward > 0.0) {
            return Err(AcoError::InvalidReward(self.reward));
        }
        if let Some(cap) = self.pheromone_cap {
            if !(cap.is_finite() && cap > 0.0) {
                return Err(AcoError::InvalidPheromoneCap(cap));
            }
        }
        if let ZeroFitnessPolicy::Clamp { max_reward } = self.zero_fitness {
            if !(max_reward.is_finite() && max_reward > 0.0) {
                return Err(AcoError::InvalidReward(max_reward));
            }
        }
        if self.generation_count() == 0 {
            return Err(AcoError::EmptyRun {
                paths_per_generation: self.paths_per_generation,
                total_fitness_evaluations: self.total_fitness_evaluations,
            });
        }
        Ok(())
    }
}
