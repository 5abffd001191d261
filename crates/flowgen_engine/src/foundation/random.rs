//! Seedable random source shared by the sampler and the perturbation engine
//!
//! Every draw of a scene goes through one `SceneRng`, so a fixed seed
//! reproduces the whole scene.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Single pseudo-random source for one generator
#[derive(Debug, Clone)]
pub struct SceneRng {
    rng: StdRng,
    seed: Option<u64>,
}

impl SceneRng {
    /// Deterministic source
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Non-reproducible source seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Seeded when `seed` is given, entropy otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    /// Seed this source was created with, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform sample in `[min, max]`; returns `min` for an empty range
    pub fn uniform(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Uniform sample in `[-amplitude, amplitude]`
    pub fn symmetric(&mut self, amplitude: f32) -> f32 {
        self.uniform(-1.0, 1.0) * amplitude
    }

    /// Uniform index in `0..len`; `len` must be non-zero
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Uniform integer in `[low, high]`
    pub fn int_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}
