//! WASM-compatible random number generator.
//!
//! Uses the `rand` crate with `SmallRng` which is fast and works with WASM.
//! Entropy is sourced from `getrandom` (browser crypto API). The selector
//! only draws from it for tie-breaking and last-resort fallback choices,
//! so seeded construction makes whole decisions replayable.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A seedable RNG wrapper for the engine.
pub struct EngineRng {
    inner: SmallRng,
}

impl EngineRng {
    /// Create from system entropy (browser crypto.getRandomValues or OS).
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic behavior.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate a random usize in [0, max).
    #[inline(always)]
    pub fn pick(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }

    /// Pick a random element from a slice, or `None` if it is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.pick(items.len())])
        }
    }
}

impl Default for EngineRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_deterministic() {
        let mut rng1 = EngineRng::from_seed(42);
        let mut rng2 = EngineRng::from_seed(42);
        for _ in 0..100 {
            assert_eq!(rng1.pick(1000), rng2.pick(1000));
        }
    }

    #[test]
    fn test_pick_bounds() {
        let mut rng = EngineRng::from_seed(123);
        for _ in 0..1000 {
            let v = rng.pick(10);
            assert!(v < 10);
        }
    }

    #[test]
    fn test_choose_empty() {
        let mut rng = EngineRng::from_seed(7);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert!(rng.choose(&[5]).is_some());
    }
}
