use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
}

/// Integer grid coordinate. `y` grows toward the north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        direction.offset(self, 1)
    }

    pub fn manhattan(self, other: Tile) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn is_adjacent(self, other: Tile) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::South, Direction::East, Direction::West];

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Step `distance` cells along this direction's axis.
    pub fn offset(self, tile: Tile, distance: i32) -> Tile {
        match self {
            Self::North => Tile { x: tile.x, y: tile.y + distance },
            Self::South => Tile { x: tile.x, y: tile.y - distance },
            Self::East => Tile { x: tile.x + distance, y: tile.y },
            Self::West => Tile { x: tile.x - distance, y: tile.y },
        }
    }

    /// Direction of travel from `from` to a neighbouring `to`. The x axis wins
    /// when both differ; identical tiles report north.
    pub fn between(from: Tile, to: Tile) -> Self {
        if from.x < to.x {
            Self::East
        } else if from.x > to.x {
            Self::West
        } else if from.y < to.y {
            Self::North
        } else if from.y > to.y {
            Self::South
        } else {
            Self::North
        }
    }
}

/// Squad tag shared by enemies that match and die together.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(String);

impl Group {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Group tag for a numbered template slot.
    pub fn from_slot(slot: u8) -> Self {
        Self(slot.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Skeleton,
    GoldSkeleton,
    BlackSkeleton,
    Slime,
    Vampire,
    DarkKnight,
    Wisp,
    BlueWisp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Behavior {
    /// Walks toward the player along a weighted path and attacks on contact.
    Chase,
    /// Drifts in random directions and never attacks.
    Wander,
}

/// Fire-and-forget audio cues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Boom,
    Hurt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoomEvent {
    Cue(Cue),
    RoundStarted { round: u32, queue_len: usize },
    TurnStarted { entity: EntityId },
    EntityDied { entity: EntityId, archetype: Option<Archetype> },
    MatchFound { root: EntityId, length: usize },
    PlayerDamaged { health: i32 },
    DoorsOpened,
    DoorsClosed,
    GameOver,
}

/// One tick's worth of edge-triggered input signals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub movement: Option<Direction>,
    pub attack: Option<Direction>,
    pub end_turn: bool,
    pub descend: bool,
    pub cycle_enemy_view: bool,
    pub restart: bool,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(direction: Direction) -> Self {
        Self { movement: Some(direction), ..Self::default() }
    }

    pub fn attacking(direction: Direction) -> Self {
        Self { attack: Some(direction), ..Self::default() }
    }

    pub fn ending_turn() -> Self {
        Self { end_turn: true, ..Self::default() }
    }
}

/// What the caller should do with the room after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomSignal {
    Continue,
    Descended,
    Travelled(Direction),
    ReturnToMenu,
}
