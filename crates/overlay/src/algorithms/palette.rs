use image::Rgb;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{config::DEFAULT_SEED, traits::ColorPalette};

/// Pseudo-random colors from a generator seeded afresh on every call, so the
/// same seed and count always reproduce the same sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededPalette {
    pub seed: u64,
}

impl Default for SeededPalette {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}

impl SeededPalette {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl ColorPalette for SeededPalette {
    fn colors(&self, count: usize) -> Vec<Rgb<u8>> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        (0..count)
            .map(|_| Rgb([rng.gen_range(0..255), rng.gen_range(0..255), rng.gen_range(0..255)]))
            .collect()
    }
}

/// Caller-supplied colors, repeated when there are more masks than colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPalette {
    pub colors: Vec<Rgb<u8>>,
}

impl FixedPalette {
    pub fn new(colors: Vec<Rgb<u8>>) -> Self {
        Self { colors }
    }
}

impl ColorPalette for FixedPalette {
    fn colors(&self, count: usize) -> Vec<Rgb<u8>> {
        self.colors.iter().copied().cycle().take(count).collect()
    }
}
