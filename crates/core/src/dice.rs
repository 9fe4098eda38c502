//! Seeded pseudo-random source threaded through every system that rolls.
//! Grid decoration, roster shuffles, archetype variants, celebration text and
//! wandering all draw from one of these so a seed replays exactly.

use std::ops::RangeInclusive;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use crate::types::Direction;

#[derive(Clone, Debug)]
pub struct Dice {
    rng: ChaCha8Rng,
}

impl Dice {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Split off an independent stream, advancing this one by one draw.
    pub fn fork(&mut self) -> Self {
        Self::new(self.rng.next_u64())
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        (self.rng.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    pub fn flip_coin(&mut self) -> bool {
        self.rng.next_u64() & 1 == 1
    }

    pub fn range(&mut self, range: RangeInclusive<i32>) -> i32 {
        let (low, high) = (*range.start(), *range.end());
        debug_assert!(low <= high);
        let span = (i64::from(high) - i64::from(low) + 1) as u64;
        (i64::from(low) + (self.rng.next_u64() % span) as i64) as i32
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.rng.next_u64() % items.len() as u64) as usize;
        items.get(index)
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = (self.rng.next_u64() % (i as u64 + 1)) as usize;
            items.swap(i, j);
        }
    }

    pub fn direction(&mut self) -> Direction {
        Direction::ALL[(self.rng.next_u64() % Direction::ALL.len() as u64) as usize]
    }
}
