//! Dice rolling.
//!
//! The engine never calls a global RNG directly: rolls go through the
//! [`DiceRoller`] trait so games can be replayed from a seed and tests can
//! force exact sequences (three doubles, a failed escape roll, a landing on
//! one specific space).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// A source of two-die rolls.
pub trait DiceRoller {
    /// Roll both dice, each 1-6.
    fn roll(&mut self) -> (u8, u8);
}

/// Fair dice over a seedable RNG.
#[derive(Debug)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// Dice seeded from OS entropy.
    pub fn new() -> Self {
        RandomDice {
            rng: StdRng::from_entropy(),
        }
    }

    /// Dice with a fixed seed, for reproducible games.
    pub fn with_seed(seed: u64) -> Self {
        RandomDice {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceRoller for RandomDice {
    fn roll(&mut self) -> (u8, u8) {
        (self.rng.gen_range(1..=6), self.rng.gen_range(1..=6))
    }
}

/// Dice that play back a fixed sequence.
///
/// Panics when the script runs dry, which in a test points straight at the
/// roll that was not accounted for.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<(u8, u8)>,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = (u8, u8)>) -> Self {
        ScriptedDice {
            rolls: rolls.into_iter().collect(),
        }
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&mut self) -> (u8, u8) {
        match self.rolls.pop_front() {
            Some(roll) => roll,
            None => panic!("scripted dice exhausted"),
        }
    }
}
