//! Seeded random streams
//!
//! Every random decision in the simulation draws from a `SimRng`. Separate
//! streams from the same seed keep unrelated decisions (island placement,
//! price rolls, encounters) from shifting each other when one of them
//! consumes a different number of values.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Island placement
pub const STREAM_PLACEMENT: u64 = 0;
/// Commodity and fuel price rolls
pub const STREAM_PRICES: u64 = 1;
/// Deals, encounter scheduling and selection
pub const STREAM_SESSION: u64 = 2;

/// A restartable deterministic stream of floats in [0, 1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRng {
    seed: u64,
    stream: u64,
    inner: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self {
            seed,
            stream,
            inner: Pcg32::new(seed, stream),
        }
    }

    /// Rewind to the first value of the stream
    pub fn reset(&mut self) {
        self.inner = Pcg32::new(self.seed, self.stream);
    }

    /// Next float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Float in [lo, hi)
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Index in [0, n); `n` must be non-zero
    pub fn below(&mut self, n: usize) -> usize {
        self.inner.random_range(0..n)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}
