//! Room content: archetype stats, per-difficulty rosters, room geometry and
//! the built-in room templates consumed by `room::bootstrap`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, read_toml};
use crate::dice::Dice;
use crate::grid::{CLOSED_DOOR_HORIZONTAL_CODE, CLOSED_DOOR_VERTICAL_CODE};
use crate::types::{Archetype, Behavior, Direction, Tile};

pub mod names {
    pub const SKELETON: &str = "skeleton";
    pub const GOLD_SKELETON: &str = "gold_skeleton";
    pub const BLACK_SKELETON: &str = "black_skeleton";
    pub const SLIME: &str = "slime";
    pub const VAMPIRE: &str = "vampire";
    pub const DARK_KNIGHT: &str = "dark_knight";
    /// Rolls between the two wisp variants.
    pub const WISP: &str = "wisp";
}

pub struct ArchetypeStats {
    pub speed: i32,
    pub moves: u32,
    pub action_delay: u32,
    pub behavior: Behavior,
}

pub fn archetype_stats(archetype: Archetype) -> ArchetypeStats {
    use Behavior::{Chase, Wander};
    match archetype {
        Archetype::Skeleton => ArchetypeStats { speed: 8, moves: 2, action_delay: 8, behavior: Chase },
        Archetype::GoldSkeleton => {
            ArchetypeStats { speed: 12, moves: 3, action_delay: 6, behavior: Chase }
        }
        Archetype::BlackSkeleton => {
            ArchetypeStats { speed: 9, moves: 2, action_delay: 8, behavior: Chase }
        }
        Archetype::Slime => ArchetypeStats { speed: 5, moves: 1, action_delay: 10, behavior: Wander },
        Archetype::Vampire => ArchetypeStats { speed: 11, moves: 3, action_delay: 6, behavior: Chase },
        Archetype::DarkKnight => {
            ArchetypeStats { speed: 7, moves: 1, action_delay: 12, behavior: Chase }
        }
        Archetype::Wisp => ArchetypeStats { speed: 14, moves: 2, action_delay: 5, behavior: Chase },
        Archetype::BlueWisp => {
            ArchetypeStats { speed: 13, moves: 2, action_delay: 5, behavior: Wander }
        }
    }
}

/// Ten archetype names per difficulty, shuffled. Template slot `n` spawns `roster[n]`.
pub fn enemy_roster(difficulty: u32, dice: &mut Dice) -> Vec<&'static str> {
    use names::*;
    let mut roster = match difficulty {
        0 => vec![
            SKELETON,
            SKELETON,
            SKELETON,
            SKELETON,
            GOLD_SKELETON,
            SLIME,
            SLIME,
            VAMPIRE,
            VAMPIRE,
            DARK_KNIGHT,
        ],
        1 => vec![
            BLACK_SKELETON,
            SKELETON,
            SKELETON,
            GOLD_SKELETON,
            WISP,
            WISP,
            VAMPIRE,
            VAMPIRE,
            DARK_KNIGHT,
            DARK_KNIGHT,
        ],
        2 => vec![
            BLACK_SKELETON,
            BLACK_SKELETON,
            GOLD_SKELETON,
            GOLD_SKELETON,
            WISP,
            WISP,
            VAMPIRE,
            VAMPIRE,
            DARK_KNIGHT,
            DARK_KNIGHT,
        ],
        _ => vec![SKELETON; 10],
    };
    dice.shuffle(&mut roster);
    roster
}

/// Resolve an archetype name. Unknown names fall back to a skeleton.
pub fn make_enemy(name: &str, dice: &mut Dice) -> Archetype {
    match name {
        names::SKELETON => Archetype::Skeleton,
        names::GOLD_SKELETON => Archetype::GoldSkeleton,
        names::BLACK_SKELETON => Archetype::BlackSkeleton,
        names::SLIME => Archetype::Slime,
        names::VAMPIRE => Archetype::Vampire,
        names::DARK_KNIGHT => Archetype::DarkKnight,
        names::WISP => {
            if dice.flip_coin() {
                Archetype::Wisp
            } else {
                Archetype::BlueWisp
            }
        }
        other => {
            log::warn!("unknown enemy archetype {other:?}, falling back to skeleton");
            Archetype::Skeleton
        }
    }
}

/// Phrases floated over the first match of a resolution.
pub const ENCOURAGEMENTS: [&str; 8] =
    ["Nice!", "Great!", "Combo!", "Smashing!", "Splendid!", "Superb!", "Crushing!", "Wow!"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Doors {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl Doors {
    pub fn all() -> Self {
        Self { north: true, east: true, south: true, west: true }
    }

    pub fn has(&self, side: Direction) -> bool {
        match side {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoorCells {
    pub cells: [Tile; 2],
    pub closed_code: u8,
}

/// Leaving the room happens once the player crosses any of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

/// Fixed geometry shared by every room of the standard 32x20 grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomLayout {
    /// Solid rows along the top and bottom edges.
    pub border_rows: i32,
    /// Solid columns along the left and right edges.
    pub border_columns: i32,
    /// Template coordinates are relative to this tile.
    pub template_origin: Tile,
    pub north_door: DoorCells,
    pub south_door: DoorCells,
    pub east_door: DoorCells,
    pub west_door: DoorCells,
    pub exit: ExitBounds,
}

impl Default for RoomLayout {
    fn default() -> Self {
        Self {
            border_rows: 2,
            border_columns: 8,
            template_origin: Tile::new(8, 2),
            north_door: DoorCells {
                cells: [Tile::new(15, 16), Tile::new(16, 16)],
                closed_code: CLOSED_DOOR_HORIZONTAL_CODE,
            },
            south_door: DoorCells {
                cells: [Tile::new(15, 3), Tile::new(16, 3)],
                closed_code: CLOSED_DOOR_HORIZONTAL_CODE,
            },
            east_door: DoorCells {
                cells: [Tile::new(22, 9), Tile::new(22, 10)],
                closed_code: CLOSED_DOOR_VERTICAL_CODE,
            },
            west_door: DoorCells {
                cells: [Tile::new(9, 9), Tile::new(9, 10)],
                closed_code: CLOSED_DOOR_VERTICAL_CODE,
            },
            exit: ExitBounds { min_x: 10, max_x: 21, min_y: 4, max_y: 15 },
        }
    }
}

impl RoomLayout {
    pub fn door(&self, side: Direction) -> &DoorCells {
        match side {
            Direction::North => &self.north_door,
            Direction::South => &self.south_door,
            Direction::East => &self.east_door,
            Direction::West => &self.west_door,
        }
    }

    /// Where the player appears when arriving through `side`.
    pub fn entry_tile(&self, side: Direction) -> Tile {
        match side {
            Direction::North => Tile::new(15, 17),
            Direction::South => Tile::new(15, 2),
            Direction::East => Tile::new(23, 10),
            Direction::West => Tile::new(8, 10),
        }
    }

    pub fn exit_direction(&self, tile: Tile) -> Option<Direction> {
        if tile.x < self.exit.min_x {
            Some(Direction::West)
        } else if tile.x > self.exit.max_x {
            Some(Direction::East)
        } else if tile.y < self.exit.min_y {
            Some(Direction::South)
        } else if tile.y > self.exit.max_y {
            Some(Direction::North)
        } else {
            None
        }
    }

    pub fn template_to_grid(&self, tile: Tile) -> Tile {
        Tile::new(tile.x + self.template_origin.x, tile.y + self.template_origin.y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoomObject {
    Wall { tile: Tile },
    /// `slot` picks the roster entry and doubles as the squad tag.
    Enemy { slot: u8, tile: Tile },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomBlueprint {
    pub difficulty: u32,
    pub doors: Doors,
    pub cleared: bool,
    /// Floor-transition tile in grid coordinates.
    pub ladder: Option<Tile>,
    pub objects: Vec<RoomObject>,
}

impl RoomBlueprint {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_toml(path)
    }

    pub fn combat(difficulty: u32, doors: Doors, dice: &mut Dice) -> Self {
        let index = dice.range(0..=(COMBAT_TEMPLATE_COUNT as i32 - 1)) as usize;
        Self::from_template(difficulty, doors, index)
    }

    pub fn from_template(difficulty: u32, doors: Doors, index: usize) -> Self {
        Self {
            difficulty,
            doors,
            cleared: false,
            ladder: None,
            objects: combat_template(index),
        }
    }
}

pub const COMBAT_TEMPLATE_COUNT: usize = 8;

/// Built-in combat layouts in template coordinates. Out-of-range indices are empty.
pub fn combat_template(index: usize) -> Vec<RoomObject> {
    let wall = |x, y| RoomObject::Wall { tile: Tile::new(x, y) };
    let enemy = |slot, x, y| RoomObject::Enemy { slot, tile: Tile::new(x, y) };
    match index {
        0 => vec![
            wall(3, 3),
            wall(3, 9),
            wall(9, 3),
            wall(9, 9),
            enemy(0, 4, 4),
            enemy(0, 4, 8),
            enemy(0, 8, 4),
            enemy(0, 8, 8),
        ],
        1 => vec![enemy(0, 4, 4), enemy(0, 4, 8), enemy(0, 8, 4), enemy(0, 8, 8)],
        2 => vec![
            wall(3, 7),
            wall(4, 7),
            wall(5, 7),
            wall(6, 7),
            wall(7, 7),
            wall(8, 7),
            enemy(0, 4, 4),
            enemy(0, 4, 6),
            enemy(0, 4, 8),
        ],
        3 => vec![
            wall(0, 0),
            wall(0, 11),
            wall(11, 0),
            wall(11, 11),
            enemy(0, 3, 3),
            enemy(0, 3, 8),
            enemy(0, 8, 8),
        ],
        4 => vec![
            enemy(0, 1, 1),
            enemy(0, 1, 10),
            enemy(0, 10, 10),
            enemy(0, 4, 4),
            enemy(0, 7, 4),
            enemy(0, 7, 7),
        ],
        5 => vec![
            wall(5, 5),
            wall(5, 6),
            wall(6, 5),
            wall(6, 6),
            enemy(0, 4, 5),
            enemy(0, 7, 5),
            enemy(0, 5, 7),
            enemy(1, 1, 1),
            enemy(1, 1, 10),
            enemy(1, 10, 1),
            enemy(1, 10, 10),
        ],
        6 => vec![
            enemy(0, 4, 5),
            enemy(0, 7, 5),
            enemy(0, 7, 7),
            enemy(1, 1, 1),
            enemy(1, 1, 10),
            enemy(1, 10, 10),
        ],
        7 => vec![
            enemy(0, 4, 5),
            enemy(0, 7, 5),
            enemy(0, 7, 7),
            enemy(0, 1, 1),
            enemy(0, 1, 10),
            enemy(0, 10, 10),
        ],
        _ => Vec::new(),
    }
}
