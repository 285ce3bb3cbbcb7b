//! Seedable random source for combat rolls.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Wraps ChaCha8 so a game can be replayed from its seed.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Returns 0..n-1, or 0 when n is 0.
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// True with probability percent/100. 0 never hits, 100 or more always does.
    pub fn percent(&mut self, percent: u8) -> bool {
        self.rn2(100) < u32::from(percent)
    }
}
