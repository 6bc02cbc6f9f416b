use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

use super::traits::RandomSource;

/// A random source shared between the chart simulator and the revaluation loop.
/// Locked only for the duration of a synchronous draw, never across an await.
pub type SharedRandom = Arc<Mutex<Box<dyn RandomSource>>>;

/// Wrap a source for sharing.
pub fn shared(source: impl RandomSource + 'static) -> SharedRandom {
    Arc::new(Mutex::new(Box::new(source)))
}

/// `rand`-backed source. Entropy-seeded by default, or seeded explicitly
/// for reproducible runs.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// An empty script always yields 0.5, i.e. a zero symmetric delta.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    samples: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// A source whose symmetric draws are always zero.
    pub fn neutral() -> Self {
        Self::new(vec![0.5])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.5;
        }
        let value = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        value
    }
}
