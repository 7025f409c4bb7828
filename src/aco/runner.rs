//! ACO generation loop.
//!
//! [`AcoRunner`] drives construct → evaluate → reinforce → evaporate for
//! as many generations as the evaluation budget allows.

use super::config::{AcoConfig, ZeroFitnessPolicy};
use super::construct::build_path;
use super::pheromone::{reinforce_generation, PheromoneMatrix};
use super::types::{BinPackingProblem, Path};
use crate::error::AcoError;
use crate::random::{create_rng, split_seeds};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Summary of one completed generation, passed to an [`AcoObserver`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// 1-based generation number.
    pub generation: usize,

    /// Lowest fitness among this generation's paths.
    pub best_fitness: f64,

    /// Mean fitness of this generation's paths.
    pub mean_fitness: f64,

    /// Lowest fitness seen in any generation so far.
    pub best_so_far: f64,
}

/// Receives progress once per generation.
///
/// Implemented for any `FnMut(&GenerationStats)`.
pub trait AcoObserver {
    fn on_generation(&mut self, stats: &GenerationStats);
}

impl<F: FnMut(&GenerationStats)> AcoObserver for F {
    fn on_generation(&mut self, stats: &GenerationStats) {
        self(stats)
    }
}

/// Observer that ignores every generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AcoObserver for NoopObserver {
    fn on_generation(&mut self, _stats: &GenerationStats) {}
}

/// Result of an ACO run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// Best fitness of the last generation executed.
    pub final_fitness: f64,

    /// The path that achieved `final_fitness`.
    pub final_path: Path,

    /// Bin loads of `final_path`.
    pub final_loads: Vec<f64>,

    /// Best fitness seen in any generation.
    pub best_fitness: f64,

    /// The path that achieved `best_fitness`.
    pub best_path: Path,

    /// Number of generations executed.
    pub generations: usize,

    /// Number of fitness evaluations performed.
    pub evaluations: usize,

    /// Stopped before the budget ran out because a perfect packing was found.
    pub terminated_early: bool,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best fitness of each generation, in order.
    pub fitness_history: Vec<f64>,

    /// Pheromone matrix after the last evaporation.
    pub pheromone: PheromoneMatrix,
}

/// Executes the ACO search.
///
/// # Usage
///
/// ```
/// use u_antpack::aco::{AcoConfig, AcoRunner, BinPackingProblem};
///
/// let problem = BinPackingProblem::new(3, (1..=30).map(f64::from).collect()).unwrap();
/// let config = AcoConfig::default()
///     .with_paths_per_generation(20)
///     .with_total_fitness_evaluations(400)
///     .with_seed(42);
///
/// let result = AcoRunner::run(&problem, &config).unwrap();
/// assert!(result.final_fitness >= 0.0);
/// assert!(result.best_fitness <= result.final_fitness);
/// ```
pub struct AcoRunner;

impl AcoRunner {
    /// Runs the search.
    pub fn run(problem: &BinPackingProblem, config: &AcoConfig) -> Result<AcoResult, AcoError> {
        Self::run_with_cancel(problem, config, None, &mut NoopObserver)
    }

    /// Runs the search, reporting each generation to `observer`.
    pub fn run_with_observer<O: AcoObserver>(
        problem: &BinPackingProblem,
        config: &AcoConfig,
        observer: &mut O,
    ) -> Result<AcoResult, AcoError> {
        Self::run_with_cancel(problem, config, None, observer)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The flag is checked before each generation. If it is set before the
    /// first generation completes, [`AcoError::Cancelled`] is returned.
    pub fn run_with_cancel<O: AcoObserver>(
        problem: &BinPackingProblem,
        config: &AcoConfig,
        cancel: Option<Arc<AtomicBool>>,
        observer: &mut O,
    ) -> Result<AcoResult, AcoError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let mut pheromone = PheromoneMatrix::random(problem.bins(), problem.item_count(), &mut rng)?
            .with_cap(config.pheromone_cap);

        let max_generations = config.generation_count();
        let mut fitness_history = Vec::with_capacity(max_generations);
        let mut best: Option<(f64, Path)> = None;
        let mut last: Option<(f64, Path)> = None;
        let mut evaluations = 0usize;
        let mut terminated_early = false;
        let mut cancelled = false;

        for gen in 0..max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // Construct + evaluate against a read-only matrix.
            let seeds = split_seeds(&mut rng, config.paths_per_generation);
            let (paths, fitnesses): (Vec<Path>, Vec<f64>) =
                construct_generation(problem, &pheromone, config, &seeds)?
                    .into_iter()
                    .unzip();
            evaluations += paths.len();

            // Reinforce in submission order, then evaporate.
            let perfect = reinforce_generation(
                &mut pheromone,
                &paths,
                &fitnesses,
                config.reward,
                config.zero_fitness,
            )?;
            pheromone.evaporate(config.evaporation_rate);

            let gen_best = index_of_min(&fitnesses);
            let gen_best_fitness = fitnesses[gen_best];
            let mean_fitness = fitnesses.iter().sum::<f64>() / fitnesses.len() as f64;

            if best.as_ref().is_none_or(|(f, _)| gen_best_fitness < *f) {
                log::info!("ACO gen {}: new best fitness {}", gen + 1, gen_best_fitness);
                best = Some((gen_best_fitness, paths[gen_best].clone()));
            }
            let best_so_far = best.as_ref().map_or(gen_best_fitness, |(f, _)| *f);

            log::debug!(
                "ACO gen {}: best={:.4} mean={:.4} best_so_far={:.4}",
                gen + 1,
                gen_best_fitness,
                mean_fitness,
                best_so_far
            );

            let stats = GenerationStats {
                generation: gen + 1,
                best_fitness: gen_best_fitness,
                mean_fitness,
                best_so_far,
            };
            observer.on_generation(&stats);

            fitness_history.push(gen_best_fitness);
            last = Some((gen_best_fitness, paths[gen_best].clone()));

            if perfect > 0 {
                match config.zero_fitness {
                    ZeroFitnessPolicy::Stop => {
                        log::info!("ACO gen {}: perfect packing found, stopping", gen + 1);
                        terminated_early = true;
                        break;
                    }
                    ZeroFitnessPolicy::Clamp { max_reward } => {
                        log::warn!(
                            "ACO gen {}: {} perfect path(s) rewarded with clamped {}",
                            gen + 1,
                            perfect,
                            max_reward
                        );
                    }
                }
            }
        }

        let (final_fitness, final_path) = last.ok_or(AcoError::Cancelled)?;
        let (best_fitness, best_path) = best.ok_or(AcoError::Cancelled)?;

        Ok(AcoResult {
            final_loads: problem.bin_loads(&final_path),
            final_fitness,
            final_path,
            best_fitness,
            best_path,
            generations: fitness_history.len(),
            evaluations,
            terminated_early,
            cancelled,
            fitness_history,
            pheromone,
        })
    }
}

/// Builds and evaluates one path per seed.
///
/// Every path draws from its own generator, so the output is the same
/// whether or not the work is spread across threads.
fn construct_generation(
    problem: &BinPackingProblem,
    matrix: &PheromoneMatrix,
    config: &AcoConfig,
    seeds: &[u64],
) -> Result<Vec<(Path, f64)>, AcoError> {
    let build = |&seed: &u64| -> Result<(Path, f64), AcoError> {
        let mut rng = create_rng(seed);
        let path = build_path(problem, matrix, config.degenerate_column, &mut rng)?;
        let fitness = problem.evaluate(&path);
        Ok((path, fitness))
    };

    #[cfg(feature = "parallel")]
    {
        if config.parallel {
            return seeds.par_iter().map(build).collect();
        }
    }

    seeds.iter().map(build).collect()
}

/// Index of the lowest fitness; the first one wins ties.
fn index_of_min(fitnesses: &[f64]) -> usize {
    fitnesses
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map_or(0, |(i, _)| i)
}

/// Solves a load-balancing bin packing instance with default settings.
///
/// Returns the best fitness of the **final** generation, not the best
/// fitness seen over the whole run; use [`AcoRunner`] to get both.
///
/// # Examples
///
/// ```
/// let fitness = u_antpack::search(2, &[5.0, 5.0], 10, 0.9, 200).unwrap();
/// assert!(fitness == 0.0 || fitness == 10.0);
/// ```
pub fn search(
    bins: usize,
    items: &[f64],
    paths_per_generation: usize,
    evaporation_rate: f64,
    total_fitness_evaluations: usize,
) -> Result<f64, AcoError> {
    let problem = BinPackingProblem::new(bins, items.to_vec())?;
    let config = AcoConfig::default()
        .with_paths_per_generation(paths_per_generation)
        .with_evaporation_rate(evaporation_rate)
        .with_total_fitness_evaluations(total_fitness_evaluations);
    AcoRunner::run(&problem, &config).map(|result| result.final_fitness)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::DegenerateColumnPolicy;

    fn bpp1() -> BinPackingProblem {
        BinPackingProblem::new(10, (1..=500).map(f64::from).collect()).unwrap()
    }

    #[test]
    fn test_deterministic_with_seed() {
        let problem = BinPackingProblem::new(4, (1..=40).map(f64::from).collect()).unwrap();
        let config = AcoConfig::default()
            .with_paths_per_generation(20)
            .with_total_fitness_evaluations(400)
            .with_seed(42);

        let a = AcoRunner::run(&problem, &config).unwrap();
        let b = AcoRunner::run(&problem, &config).unwrap();

        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.final_path, b.final_path);
        assert_eq!(a.best_path, b.best_path);
        assert_eq!(a.pheromone, b.pheromone);
    }

    #[test]
    fn test_balanced_toy_case_finds_perfect_packing() {
        let problem = BinPackingProblem::new(2, vec![5.0, 5.0]).unwrap();
        let config = AcoConfig::default()
            .with_paths_per_generation(50)
            .with_total_fitness_evaluations(5_000)
            .with_seed(7);

        let result = AcoRunner::run(&problem, &config).unwrap();

        assert_eq!(result.best_fitness, 0.0);
        assert_eq!(result.final_fitness, 0.0);
        assert!(result.terminated_early);
        assert_eq!(result.final_loads, vec![5.0, 5.0]);
        assert!(result.pheromone.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_single_bin_is_always_balanced() {
        let problem = BinPackingProblem::new(1, vec![1.0, 2.0, 3.0]).unwrap();
        let config = AcoConfig::default()
            .with_paths_per_generation(5)
            .with_total_fitness_evaluations(50)
            .with_seed(1);

        let result = AcoRunner::run(&problem, &config).unwrap();
        assert_eq!(result.final_fitness, 0.0);
        assert_eq!(result.generations, 1);
        assert!(result.terminated_early);
        assert_eq!(result.final_loads, vec![6.0]);
    }

    #[test]
    fn test_clamp_policy_keeps_searching() {
        let problem = BinPackingProblem::new(1, vec![1.0, 2.0, 3.0]).unwrap();
        let config = AcoConfig::default()
            .with_paths_per_generation(5)
            .with_total_fitness_evaluations(50)
            .with_zero_fitness(ZeroFitnessPolicy::Clamp { max_reward: 1e6 })
            .with_seed(1);

        let result = AcoRunner::run(&problem, &config).unwrap();
        assert_eq!(result.generations, 10);
        assert_eq!(result.evaluations, 50);
        assert!(!result.terminated_early);
        assert!(result.fitness_history.iter().all(|&f| f == 0.0));
        assert!(result.pheromone.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_budget_degeneracy_is_an_error() {
        let err = search(2, &[1.0, 2.0], 100, 0.9, 50).unwrap_err();
        assert_eq!(
            err,
            AcoError::EmptyRun {
                paths_per_generation: 100,
                total_fitness_evaluations: 50,
            }
        );
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_configuration_errors_fail_fast() {
        assert_eq!(search(0, &[1.0], 10, 0.9, 100), Err(AcoError::InvalidBins));
        assert_eq!(search(2, &[], 10, 0.9, 100), Err(AcoError::EmptyItems));
        assert_eq!(
            search(2, &[1.0], 0, 0.9, 100),
            Err(AcoError::InvalidPathsPerGeneration)
        );
        assert_eq!(
            search(2, &[1.0], 10, 1.5, 100),
            Err(AcoError::InvalidEvaporationRate(1.5))
        );
        assert_eq!(
            search(2, &[1.0], 10, 0.9, 0),
            Err(AcoError::InvalidEvaluationBudget)
        );
    }

    #[test]
    fn test_overflowing_weights_are_rejected() {
        assert_eq!(
            search(1, &[1e308; 3], 5, 0.9, 50),
            Err(AcoError::InvalidTotalWeight(f64::INFINITY))
        );
        let err = search(2, &[1e308; 6], 5, 0.9, 50).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_known_instance_beats_naive_packing() {
        let problem = bpp1();
        let config = AcoConfig::default()
            .with_paths_per_generation(50)
            .with_total_fitness_evaluations(1_000)
            .with_seed(42);

        let result = AcoRunner::run(&problem, &config).unwrap();

        assert!(result.final_fitness >= 0.0);
        assert!(
            result.final_fitness < problem.single_bin_fitness(),
            "expected better than dumping everything in one bin, got {}",
            result.final_fitness
        );
        assert_eq!(result.final_loads.iter().sum::<f64>(), problem.total_weight());
        assert_eq!(problem.total_weight(), 125_250.0);
    }

    #[test]
    fn test_search_returns_last_generation_best() {
        let problem = BinPackingProblem::new(3, (1..=20).map(f64::from).collect()).unwrap();
        let config = AcoConfig::default()
            .with_paths_per_generation(10)
            .with_total_fitness_evaluations(205)
            .with_seed(3);

        let result = AcoRunner::run(&problem, &config).unwrap();

        assert_eq!(result.evaluations, result.generations * 10);
        assert_eq!(
            Some(&result.final_fitness),
            result.fitness_history.last()
        );
        assert_eq!(result.final_fitness, problem.evaluate(&result.final_path));
        assert_eq!(result.best_fitness, problem.evaluate(&result.best_path));
        for &f in &result.fitness_history {
            assert!(result.best_fitness <= f);
        }
    }

    #[test]
    fn test_history_length_matches_budget() {
        let problem = bpp1();
        let config = AcoConfig::default()
            .with_paths_per_generation(30)
            .with_total_fitness_evaluations(100)
            .with_seed(42);

        let result = AcoRunner::run(&problem, &config).unwrap();
        assert_eq!(result.generations, 3);
        assert_eq!(result.fitness_history.len(), 3);
        assert_eq!(result.evaluations, 90);
    }

    #[test]
    fn test_observer_sees_every_generation() {
        let problem = BinPackingProblem::new(4, (1..=40).map(f64::from).collect()).unwrap();
        let config = AcoConfig::default()
            .with_paths_per_generation(10)
            .with_total_fitness_evaluations(150)
            .with_seed(11);

        let mut seen = Vec::new();
        let result = AcoRunner::run_with_observer(&problem, &config, &mut |s: &GenerationStats| {
            seen.push(*s)
        })
        .unwrap();

        assert_eq!(seen.len(), result.generations);
        for (i, s) in seen.iter().enumerate() {
            assert_eq!(s.generation, i + 1);
            assert!(s.best_so_far <= s.best_fitness);
            assert!(s.best_fitness <= s.mean_fitness);
        }
        for w in seen.windows(2) {
            assert!(w[1].best_so_far <= w[0].best_so_far);
        }
        assert_eq!(seen.last().map(|s| s.best_so_far), Some(result.best_fitness));
    }

    #[test]
    fn test_cancellation_before_first_generation() {
        let problem = bpp1();
        let config = AcoConfig::default().with_seed(42);
        let cancel = Arc::new(AtomicBool::new(true));

        let err =
            AcoRunner::run_with_cancel(&problem, &config, Some(cancel), &mut NoopObserver)
                .unwrap_err();
        assert_eq!(err, AcoError::Cancelled);
    }

    #[test]
    fn test_cancellation_mid_run() {
        let problem = BinPackingProblem::new(4, (1..=40).map(f64::from).collect()).unwrap();
        let config = AcoConfig::default()
            .with_paths_per_generation(10)
            .with_total_fitness_evaluations(1_000)
            .with_zero_fitness(ZeroFitnessPolicy::Clamp { max_reward: 1e3 })
            .with_seed(42);
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = cancel.clone();

        let mut stop_after_three = |s: &GenerationStats| {
            if s.generation == 3 {
                flag.store(true, Ordering::Relaxed);
            }
        };
        let result =
            AcoRunner::run_with_cancel(&problem, &config, Some(cancel), &mut stop_after_three)
                .unwrap();

        assert!(result.cancelled);
        assert!(!result.terminated_early);
        assert_eq!(result.generations, 3);
        assert_eq!(result.evaluations, 30);
    }

    #[test]
    fn test_pheromone_cap_bounds_matrix() {
        let problem = BinPackingProblem::new(3, (1..=15).map(f64::from).collect()).unwrap();
        let config = AcoConfig::default()
            .with_paths_per_generation(10)
            .with_total_fitness_evaluations(300)
            .with_evaporation_rate(1.0)
            .with_pheromone_cap(5.0)
            .with_degenerate_column(DegenerateColumnPolicy::Fail)
            .with_seed(42);

        let result = AcoRunner::run(&problem, &config).unwrap();
        assert!(result.pheromone.values().iter().all(|&v| (0.0..=5.0).contains(&v)));
    }

    #[test]
    fn test_pheromones_stay_non_negative() {
        let problem = bpp1();
        let config = AcoConfig::default()
            .with_paths_per_generation(20)
            .with_total_fitness_evaluations(400)
            .with_evaporation_rate(0.5)
            .with_seed(9);

        let result = AcoRunner::run(&problem, &config).unwrap();
        assert!(result
            .pheromone
            .values()
            .iter()
            .all(|&v| v >= 0.0 && v.is_finite()));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let problem = BinPackingProblem::new(5, (1..=100).map(f64::from).collect()).unwrap();
        let config = AcoConfig::default()
            .with_paths_per_generation(25)
            .with_total_fitness_evaluations(500)
            .with_seed(42);

        let seq = AcoRunner::run(&problem, &config.clone().with_parallel(false)).unwrap();
        let par = AcoRunner::run(&problem, &config.with_parallel(true)).unwrap();

        assert_eq!(seq.fitness_history, par.fitness_history);
        assert_eq!(seq.final_path, par.final_path);
        assert_eq!(seq.pheromone, par.pheromone);
    }
}
