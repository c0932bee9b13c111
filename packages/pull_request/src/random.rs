use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Source of randomness for reviewer selection.
pub trait RandomSource: Send + Sync {
    /// Apply a uniform random permutation to `items`.
    fn shuffle(&self, items: &mut [String]);

    /// Uniform index in `0..len`. Callers never pass `len == 0`.
    fn pick_index(&self, len: usize) -> usize;
}

/// `StdRng` behind a mutex, seeded once at construction.
///
/// Not cryptographically meaningful; it only spreads review load.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seed from the current wall clock.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos() as u64);
        log::debug!("Seeding reviewer selection with {seed}");
        Self::with_seed(seed)
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_time()
    }
}

impl RandomSource for SeededRandom {
    fn shuffle(&self, items: &mut [String]) {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        items.shuffle(&mut *rng);
    }

    fn pick_index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..len)
    }
}
