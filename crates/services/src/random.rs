use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::{Arc, Mutex, PoisonError};

/// Injectable randomness source for the engine.
///
/// `Entropy` draws from the thread-local generator; `Seeded` shares one
/// seeded `StdRng` so tests can replay every randomized decision (candidate
/// pick, distractor sample, shuffle, direction coin-flip).
#[derive(Debug, Clone, Default)]
pub enum RngSource {
    #[default]
    Entropy,
    Seeded(Arc<Mutex<StdRng>>),
}

impl RngSource {
    /// Returns a source backed by the thread-local entropy generator.
    #[must_use]
    pub fn entropy() -> Self {
        Self::Entropy
    }

    /// Returns a deterministic source seeded with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(Arc::new(Mutex::new(StdRng::seed_from_u64(seed))))
    }

    /// Runs `f` with exclusive access to the underlying generator.
    pub fn with<T>(&self, f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
        match self {
            Self::Entropy => {
                let mut rng = rand::rng();
                f(&mut rng)
            }
            Self::Seeded(cell) => {
                let mut guard = cell.lock().unwrap_or_else(PoisonError::into_inner);
                f(&mut *guard)
            }
        }
    }
}
