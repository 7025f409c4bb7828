//! Error types for the ACO bin packing solver.

use thiserror::Error;

/// Errors produced while configuring or running an ACO search.
///
/// Configuration errors (see [`AcoError::is_configuration`]) are raised
/// before any random number is drawn. The remaining variants describe
/// conditions met during a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    #[error("bin count must be positive")]
    InvalidBins,

    #[error("item list must not be empty")]
    EmptyItems,

    #[error("item {index} has invalid weight {weight}: weights must be finite and non-negative")]
    InvalidItemWeight { index: usize, weight: f64 },

    #[error("paths per generation must be positive")]
    InvalidPathsPerGeneration,

    #[error("evaporation rate must be in (0, 1], got {0}")]
    InvalidEvaporationRate(f64),

    #[error("total fitness evaluations must be positive")]
    InvalidEvaluationBudget,

    #[error("reward constant must be finite and positive, got {0}")]
    InvalidReward(f64),

    #[error("pheromone cap must be finite and positive, got {0}")]
    InvalidPheromoneCap(f64),

    /// Item weights are individually finite but their sum overflows.
    #[error("total item weight must be finite, got {0}")]
    InvalidTotalWeight(f64),

    /// A pheromone matrix was paired with a problem of another shape.
    #[error(
        "pheromone matrix is {matrix_bins}x{matrix_items} but the problem has \
         {bins} bins and {items} items"
    )]
    DimensionMismatch {
        matrix_bins: usize,
        matrix_items: usize,
        bins: usize,
        items: usize,
    },

    /// The evaluation budget is smaller than one generation of paths.
    #[error(
        "budget of {total_fitness_evaluations} evaluations cannot fit one generation \
         of {paths_per_generation} paths"
    )]
    EmptyRun {
        paths_per_generation: usize,
        total_fitness_evaluations: usize,
    },

    /// Every bin's pheromone for this item is zero, so roulette selection
    /// has nothing to draw from.
    #[error("pheromone column for item {item} sums to zero")]
    DegenerateSelection { item: usize },

    /// A path scored a negative or non-finite fitness, so no reward can be
    /// derived from it.
    #[error("path {path} has invalid fitness {fitness}")]
    InvalidFitness { path: usize, fitness: f64 },

    /// Cancelled before any generation completed.
    #[error("search cancelled before the first generation completed")]
    Cancelled,
}

impl AcoError {
    /// Returns `true` for errors caused by invalid inputs or parameters.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AcoError::InvalidBins
                | AcoError::EmptyItems
                | AcoError::InvalidItemWeight { .. }
                | AcoError::InvalidPathsPerGeneration
                | AcoError::InvalidEvaporationRate(_)
                | AcoError::InvalidEvaluationBudget
                | AcoError::InvalidReward(_)
                | AcoError::InvalidPheromoneCap(_)
                | AcoError::InvalidTotalWeight(_)
                | AcoError::DimensionMismatch { .. }
        )
    }
}
