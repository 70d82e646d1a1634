//! Seeded dice.
//!
//! [`Dice`] wraps a seeded [`StdRng`] so the same seed always produces the
//! same sequence of rolls and picks. Every stochastic decision in a session
//! (ruleset checks, director flavor, actor tie-breaks) draws from its own
//! `Dice` stream.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// A single roll compared against a success threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
    /// The value rolled.
    pub roll: u32,
    /// Minimum roll that succeeds.
    pub threshold: u32,
}

impl Check {
    /// Whether the roll met the threshold.
    pub fn succeeded(&self) -> bool {
        self.roll >= self.threshold
    }
}

/// A seeded source of dice rolls and random picks.
#[derive(Debug, Clone)]
pub struct Dice {
    rng: StdRng,
}

impl Dice {
    /// Create a dice stream from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Roll a d20.
    pub fn d20(&mut self) -> u32 {
        self.rng.random_range(1..=20)
    }

    /// Roll a d20 against `threshold`.
    pub fn check(&mut self, threshold: u32) -> Check {
        Check {
            roll: self.d20(),
            threshold,
        }
    }

    /// A uniform index in `0..len`, or `None` when `len` is 0.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    /// Pick one item uniformly, or `None` from an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).map(|i| &items[i])
    }

    /// Shuffle `items` in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
