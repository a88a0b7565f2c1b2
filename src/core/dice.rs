//! Injectable randomness
//!
//! Every random decision in the engine goes through a [`Dice`] handed down
//! from the turn orchestrator. Production code uses [`SeededDice`], which wraps
//! a ChaCha8 generator so a fixed seed reproduces a whole playthrough.
//! [`ConstantDice`] always lands on the same point of every range and is used
//! for speculative previews and deterministic tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of randomness threaded through every subsystem call
pub trait Dice {
    /// Uniform integer in `low..=high`. Returns `low` when the range is empty.
    fn roll(&mut self, low: i32, high: i32) -> i32;

    /// Uniform float in `[0.0, 1.0)`
    fn unit(&mut self) -> f64;

    /// True with the given probability (clamped to 0.0-1.0)
    fn chance(&mut self, probability: f64) -> bool {
        let p = probability.clamp(0.0, 1.0);
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.unit() < p
    }
}

/// Deterministic, seedable dice backed by ChaCha8
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Dice for SeededDice {
    fn roll(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Dice that always land at a fixed fraction of every range
///
/// `ConstantDice::new(0.0)` always rolls the minimum and makes every
/// `chance(p > 0)` succeed; `ConstantDice::new(0.99)` rolls near the maximum
/// and fails every chance below 0.99.
#[derive(Debug, Clone, Copy)]
pub struct ConstantDice {
    fraction: f64,
}

impl ConstantDice {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 0.999_999),
        }
    }

    /// Rolls land in the middle of every range
    pub fn median() -> Self {
        Self::new(0.5)
    }
}

impl Dice for ConstantDice {
    fn roll(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        let span = (high - low + 1) as f64;
        low + (span * self.fraction).floor() as i32
    }

    fn unit(&mut self) -> f64 {
        self.fraction
    }
}
