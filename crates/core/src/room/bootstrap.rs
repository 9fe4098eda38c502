//! Room assembly from a blueprint: border stamping, wall and enemy placement,
//! player entry and initial door state.

use super::*;
use crate::content::{RoomBlueprint, RoomObject, enemy_roster, make_enemy, names};
use crate::grid::WALL_CODE;

/// Builds a playable room. `travelled` is the direction the player was moving
/// when they left the previous room, so they arrive on the opposite side.
pub fn build_room(
    blueprint: &RoomBlueprint,
    travelled: Direction,
    config: RoomConfig,
    dice: &mut Dice,
) -> RoomState {
    let layout = RoomLayout::default();
    let mut grid = Grid::new(&config.grid, dice);
    stamp_border(&mut grid, &layout);
    for object in &blueprint.objects {
        if let RoomObject::Wall { tile } = object {
            grid.set_code(layout.template_to_grid(*tile), WALL_CODE);
        }
    }

    let roster = enemy_roster(blueprint.difficulty, dice);
    let player_pos = layout.entry_tile(travelled.opposite());
    let mut room = RoomState::new(config, grid, player_pos, dice.fork())
        .with_layout(layout.clone())
        .with_doors(blueprint.doors);
    room.set_ladder(blueprint.ladder);
    room.set_already_cleared(blueprint.cleared);

    let mut placed = 0;
    for object in &blueprint.objects {
        let RoomObject::Enemy { slot, tile } = object else {
            continue;
        };
        let name = match roster.get(usize::from(*slot)) {
            Some(name) => *name,
            None => {
                log::warn!("enemy slot {slot} has no roster entry, using a skeleton");
                names::SKELETON
            }
        };
        let archetype = make_enemy(name, dice);
        room.spawn_enemy(archetype, Group::from_slot(*slot), layout.template_to_grid(*tile));
        placed += 1;
    }

    if placed > 0 {
        room.close_doors();
    } else {
        room.open_doors();
    }
    log::debug!("built room with {placed} enemies, entering at {player_pos}");
    room
}

fn stamp_border(grid: &mut Grid, layout: &RoomLayout) {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    for x in 0..width {
        for j in 0..layout.border_rows {
            grid.set_code(Tile::new(x, j), WALL_CODE);
            grid.set_code(Tile::new(x, height - 1 - j), WALL_CODE);
        }
    }
    for y in 0..height {
        for j in 0..layout.border_columns {
            grid.set_code(Tile::new(j, y), WALL_CODE);
            grid.set_code(Tile::new(width - 1 - j, y), WALL_CODE);
        }
    }
}
