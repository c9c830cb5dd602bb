//! Injectable randomness for the scheduler's mode and bucket draws.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniformly distributed integers.
pub trait RandomSource {
    /// Draw from `0..bound`. `bound` is never zero.
    fn next_below(&mut self, bound: u32) -> u32;
}

/// Pseudo-random source backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Reproducible sequence for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.rng.gen_range(0..bound)
    }
}

/// Replays a fixed sequence of draws, for tests that need to force a mode
/// or bucket. Each value is reduced modulo the requested bound; an
/// exhausted script keeps returning 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    script: VecDeque<u32>,
}

impl ScriptedRandom {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn push(&mut self, value: u32) {
        self.script.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.script.pop_front().map_or(0, |v| v % bound)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_below(&mut self, bound: u32) -> u32 {
        (**self).next_below(bound)
    }
}
