//! Seeded random number generation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The random stream used by every search component.
///
/// A single stream is consumed in call order, so a fixed seed reproduces
/// a run move for move.
pub type SearchRng = ChaCha8Rng;

/// Creates a deterministic generator from `seed`.
pub fn create_rng(seed: u64) -> SearchRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from OS entropy when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> SearchRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}
