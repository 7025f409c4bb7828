//! Ant Colony Optimization for load-balanced bin packing.
//!
//! Given a fixed number of bins and a list of item weights, the solver
//! assigns every item to a bin so as to minimize the gap between the most
//! and least loaded bins. It is an experimental solver for comparing
//! heuristic search strategies, not an exact method.
//!
//! - [`aco`]: pheromone matrix, path construction, the generation loop
//! - [`search`]: one-call entry point returning the final generation's best
//!   fitness
//!
//! # Example
//!
//! ```
//! use u_antpack::aco::{AcoConfig, AcoRunner, BinPackingProblem};
//!
//! let items: Vec<f64> = (1..=100).map(f64::from).collect();
//! let problem = BinPackingProblem::new(5, items).unwrap();
//! let config = AcoConfig::default()
//!     .with_paths_per_generation(20)
//!     .with_total_fitness_evaluations(1_000)
//!     .with_seed(42);
//!
//! let result = AcoRunner::run(&problem, &config).unwrap();
//! assert!(result.final_fitness < problem.single_bin_fitness());
//! ```
//!
//! # Features
//!
//! - `parallel`: build each generation's paths on rayon's thread pool
//! - `serde`: `Serialize`/`Deserialize` for configs and results

pub mod aco;
pub mod error;
pub mod random;

pub use aco::search;
pub use error::AcoError;
