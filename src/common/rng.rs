//! Process-wide random source.
//!
//! Seeded exactly once; every draw afterwards advances the same generator.

use std::ops::Range;

use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};

pub struct SharedRng {
    inner: Mutex<StdRng>,
}

impl SharedRng {
    pub fn from_entropy() -> Self {
        Self {
            inner: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Uniform integer in `range`. `range` must be non-empty.
    pub fn below(&self, range: Range<u64>) -> u64 {
        self.inner.lock().gen_range(range)
    }

    /// True with probability `1 / n`. `n == 0` never fires.
    pub fn one_in(&self, n: u32) -> bool {
        n != 0 && self.inner.lock().gen_range(0..n) == 0
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_in_edges() {
        let rng = SharedRng::seeded(7);
        assert!((0..100).all(|_| rng.one_in(1)));
        assert!((0..100).all(|_| !rng.one_in(0)));
    }

    #[test]
    fn one_in_nine_rate() {
        let rng = SharedRng::seeded(99);
        let hits = (0..90_000).filter(|_| rng.one_in(9)).count();
        // expected 10_000, sigma ~94
        assert!((9_500..10_500).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn below_stays_in_range() {
        let rng = SharedRng::seeded(1);
        for _ in 0..1_000 {
            let v = rng.below(1_000..5_000);
            assert!((1_000..5_000).contains(&v));
        }
    }
}
