//! Tile-code map and world/grid coordinate conversion.
//! The grid stores and classifies codes only; room semantics such as borders
//! and doors are stamped by whoever builds the room.

use std::ops::RangeInclusive;

use glam::Vec2;

use crate::config::GridConfig;
use crate::dice::Dice;
use crate::types::Tile;

/// Never drawn.
pub const NULL_CODE: u8 = 0;
pub const FLOOR_CODE: u8 = 1;
pub const WALL_CODE: u8 = 5;
pub const CLOSED_DOOR_HORIZONTAL_CODE: u8 = 6;
pub const CLOSED_DOOR_VERTICAL_CODE: u8 = 7;

const SOLID_ROW: u8 = 1;
const PLAIN_FLOOR_CHANCE: f64 = 0.75;
const DECORATED_FLOOR_CODES: RangeInclusive<i32> = 2..=4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tile_size: i32,
    tiles_per_row: u8,
    codes: Vec<u8>,
}

impl Grid {
    /// Grid with every cell set to a random floor variant.
    pub fn new(config: &GridConfig, dice: &mut Dice) -> Self {
        let mut grid = Self::filled(config, FLOOR_CODE);
        grid.fill_random(dice);
        grid
    }

    /// Overwrites every cell with plain floor or, a quarter of the time, a decorated variant.
    pub fn fill_random(&mut self, dice: &mut Dice) {
        for code in &mut self.codes {
            *code = if dice.chance(PLAIN_FLOOR_CHANCE) {
                FLOOR_CODE
            } else {
                dice.range(DECORATED_FLOOR_CODES.clone()) as u8
            };
        }
    }

    pub fn filled(config: &GridConfig, code: u8) -> Self {
        Self {
            width: config.width,
            height: config.height,
            tile_size: config.tile_size.max(1),
            tiles_per_row: config.tiles_per_row.max(1),
            codes: vec![code; config.width * config.height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn in_bounds(&self, tile: Tile) -> bool {
        tile.x >= 0
            && tile.y >= 0
            && (tile.x as usize) < self.width
            && (tile.y as usize) < self.height
    }

    pub fn code_at(&self, tile: Tile) -> Option<u8> {
        if !self.in_bounds(tile) {
            return None;
        }
        Some(self.codes[self.index(tile)])
    }

    /// Out-of-bounds writes are ignored.
    pub fn set_code(&mut self, tile: Tile, code: u8) {
        if !self.in_bounds(tile) {
            return;
        }
        let idx = self.index(tile);
        self.codes[idx] = code;
    }

    pub fn row_of(&self, code: u8) -> u8 {
        code / self.tiles_per_row
    }

    pub fn col_of(&self, code: u8) -> u8 {
        code % self.tiles_per_row
    }

    /// Out-of-bounds tiles count as solid.
    pub fn is_solid(&self, tile: Tile) -> bool {
        match self.code_at(tile) {
            Some(code) => self.row_of(code) == SOLID_ROW,
            None => true,
        }
    }

    pub fn world_to_tile(&self, position: Vec2) -> Tile {
        let size = self.tile_size as f32;
        Tile { x: (position.x / size) as i32, y: (position.y / size) as i32 }
    }

    pub fn tile_to_world_center(&self, tile: Tile) -> Vec2 {
        let half = self.tile_size / 2;
        Vec2::new(
            (tile.x * self.tile_size + half) as f32,
            (tile.y * self.tile_size + half) as f32,
        )
    }

    fn index(&self, tile: Tile) -> usize {
        (tile.y as usize) * self.width + (tile.x as usize)
    }
}
