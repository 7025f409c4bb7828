//! Ant Colony Optimization (ACO) for load-balanced bin packing.
//!
//! Ants build complete assignments of items to bins by roulette-wheel
//! sampling over a pheromone matrix. Each generation, every path deposits
//! pheromone in inverse proportion to its fitness (max bin load minus min
//! bin load), then the whole matrix evaporates.
//!
//! # Key Types
//!
//! - [`BinPackingProblem`]: bins and item weights; evaluates paths
//! - [`PheromoneMatrix`]: per (bin, item) desirability
//! - [`AcoConfig`]: budget, evaporation, reward and degenerate-case policies
//! - [`AcoRunner`]: executes the generation loop
//! - [`AcoResult`]: final-generation and best-ever results
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Levine & Ducatelle (2004), "Ant Colony Optimization and Local Search
//!   for Bin Packing and Cutting Stock Problems"

mod config;
mod construct;
mod pheromone;
mod runner;
mod types;

pub use config::{AcoConfig, DegenerateColumnPolicy, ZeroFitnessPolicy};
pub use construct::build_path;
pub use pheromone::{reinforce_generation, PheromoneMatrix};
pub use runner::{search, AcoObserver, AcoResult, AcoRunner, GenerationStats, NoopObserver};
pub use types::{BinPackingProblem, Path};
