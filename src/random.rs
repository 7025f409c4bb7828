//! Seeded random number generation.
//!
//! Every run owns one master generator. Parallel work never shares it:
//! each unit of work gets its own stream, seeded from the master in a
//! fixed order, so results do not depend on thread scheduling.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The generator used throughout the crate.
pub type SolverRng = ChaCha8Rng;

/// Creates a generator from a fixed seed.
pub fn create_rng(seed: u64) -> SolverRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Draws `count` child seeds from `rng`, in order.
pub fn split_seeds<R: Rng>(rng: &mut R, count: usize) -> Vec<u64> {
    (0..count).map(|_| rng.random()).collect()
}
