//! Contract with the run/progression service that outlives a single room.

use crate::types::Direction;

/// Persistent player resources and floor progression owned outside the room.
pub trait RunProgress {
    fn health(&self) -> i32;
    fn lose_heart(&mut self);
    /// Moves the player gets per combat turn.
    fn movements(&self) -> u32;
    /// Attacks the player gets per combat turn.
    fn attacks(&self) -> u32;
    fn next_floor(&mut self);
    fn travel(&mut self, direction: Direction);
}

/// In-memory run used by the harnesses and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunState {
    pub health: i32,
    pub max_health: i32,
    pub movements: u32,
    pub attacks: u32,
    pub difficulty: u32,
    pub travels: Vec<Direction>,
}

impl Default for RunState {
    fn default() -> Self {
        Self { health: 3, max_health: 3, movements: 2, attacks: 1, difficulty: 0, travels: Vec::new() }
    }
}

impl RunProgress for RunState {
    fn health(&self) -> i32 {
        self.health
    }

    fn lose_heart(&mut self) {
        self.health -= 1;
    }

    fn movements(&self) -> u32 {
        self.movements
    }

    fn attacks(&self) -> u32 {
        self.attacks
    }

    fn next_floor(&mut self) {
        self.difficulty += 1;
    }

    fn travel(&mut self, direction: Direction) {
        self.travels.push(direction);
    }
}
