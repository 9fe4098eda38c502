//! Shared fixtures for the room test suites.

use super::*;
use crate::grid::WALL_CODE;
use crate::run::RunState;

pub(super) const SEED: u64 = 0x5eed;

/// Wall-free room of the default size with only the player in it.
pub(super) fn open_room(player: Tile) -> RoomState {
    let config = RoomConfig::default();
    let grid = Grid::filled(&config.grid, FLOOR_CODE);
    RoomState::new(config, grid, player, Dice::new(SEED))
}

pub(super) fn add_enemy(room: &mut RoomState, archetype: Archetype, group: &str, x: i32, y: i32) -> EntityId {
    room.spawn_enemy(archetype, Group::new(group), Tile::new(x, y))
}

/// Three-strong squad parked far from the action so squad checks leave it alone.
pub(super) fn add_bystanders(room: &mut RoomState, group: &str) -> [EntityId; 3] {
    [(24, 17), (26, 17), (28, 17)].map(|(x, y)| add_enemy(room, Archetype::DarkKnight, group, x, y))
}

pub(super) fn add_wall(room: &mut RoomState, x: i32, y: i32) {
    room.grid.set_code(Tile::new(x, y), WALL_CODE);
}

pub(super) fn drain_delay(room: &mut RoomState, run: &mut RunState) {
    let mut guard = 0;
    while room.delay() > 0 {
        room.update(&FrameInput::idle(), run);
        guard += 1;
        assert!(guard < 1_000, "delay never drained");
    }
}

pub(super) fn count_events(room: &mut RoomState, wanted: impl Fn(&RoomEvent) -> bool) -> usize {
    room.drain_events().iter().filter(|event| wanted(event)).count()
}
