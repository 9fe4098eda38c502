//! Room state: live entities, the per-round turn queue, deferred kills and the
//! spatial queries everything else leans on.
//!
//! The tick itself lives in `schedule`, kill and match resolution in `kills`,
//! per-entity turn behaviour in `behavior` and room assembly in `bootstrap`.

use std::collections::{BTreeSet, VecDeque};
use std::mem;

use glam::Vec2;
use slotmap::SlotMap;

use crate::config::RoomConfig;
use crate::content::{Doors, RoomLayout};
use crate::dice::Dice;
use crate::entity::Entity;
use crate::grid::{FLOOR_CODE, Grid};
use crate::particle::Particle;
use crate::pathfinding::{Pathfinder, SpatialQuery};
use crate::types::*;

mod behavior;
mod bootstrap;
mod hash;
mod kills;
mod schedule;

pub use bootstrap::build_room;

#[cfg(test)]
mod test_support;

pub struct RoomState {
    config: RoomConfig,
    layout: RoomLayout,
    grid: Grid,
    dice: Dice,
    /// Every entity ever placed, dead ones included, until the room is dropped.
    roster: SlotMap<EntityId, Entity>,
    /// Live entities in placement order.
    entities: Vec<EntityId>,
    turn_queue: VecDeque<EntityId>,
    kill_set: BTreeSet<EntityId>,
    particles: Vec<Particle>,
    player_id: EntityId,
    round: u32,
    delay: u32,
    last_entity: Option<EntityId>,
    game_over: bool,
    game_over_ticks: u32,
    doors: Doors,
    doors_locked: bool,
    ladder: Option<Tile>,
    already_cleared: bool,
    /// Enemy id whose planned path is singled out for display.
    enemy_path_to_show: Option<u32>,
    // Arrival tiles sit past the exit thresholds; leaving is only possible
    // once the player has been inside them.
    exit_armed: bool,
    events: Vec<RoomEvent>,
    next_enemy_id: u32,
}

impl RoomState {
    pub fn new(config: RoomConfig, grid: Grid, player_pos: Tile, dice: Dice) -> Self {
        let mut roster = SlotMap::with_key();
        let player_id = roster.insert(Entity::player(player_pos));
        Self {
            config,
            layout: RoomLayout::default(),
            grid,
            dice,
            roster,
            entities: vec![player_id],
            turn_queue: VecDeque::new(),
            kill_set: BTreeSet::new(),
            particles: Vec::new(),
            player_id,
            round: 0,
            delay: 0,
            last_entity: None,
            game_over: false,
            game_over_ticks: 0,
            doors: Doors::default(),
            doors_locked: false,
            ladder: None,
            already_cleared: false,
            enemy_path_to_show: None,
            exit_armed: false,
            events: Vec::new(),
            next_enemy_id: 0,
        }
    }

    pub fn with_layout(mut self, layout: RoomLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_doors(mut self, doors: Doors) -> Self {
        self.doors = doors;
        self
    }

    /// Places a live enemy. Ids count up from zero in placement order.
    pub fn spawn_enemy(&mut self, archetype: Archetype, group: Group, tile: Tile) -> EntityId {
        let id = self.roster.insert(Entity::enemy(archetype, group, self.next_enemy_id, tile));
        self.next_enemy_id += 1;
        self.entities.push(id);
        id
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn layout(&self) -> &RoomLayout {
        &self.layout
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player_id(&self) -> EntityId {
        self.player_id
    }

    pub fn player(&self) -> &Entity {
        &self.roster[self.player_id]
    }

    /// Looks up any entity placed in this room, dead or alive.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.roster.get(id)
    }

    pub fn live_entities(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains(&id)
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities
            .iter()
            .map(|&id| (id, &self.roster[id]))
            .filter(|(_, entity)| !entity.is_player())
    }

    pub fn turn_queue(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.turn_queue.iter().copied()
    }

    pub fn pending_kills(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.kill_set.iter().copied()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn game_over_ticks(&self) -> u32 {
        self.game_over_ticks
    }

    pub fn doors(&self) -> Doors {
        self.doors
    }

    pub fn doors_locked(&self) -> bool {
        self.doors_locked
    }

    pub fn ladder(&self) -> Option<Tile> {
        self.ladder
    }

    pub fn set_ladder(&mut self, ladder: Option<Tile>) {
        self.ladder = ladder;
    }

    pub fn already_cleared(&self) -> bool {
        self.already_cleared
    }

    pub fn set_already_cleared(&mut self, cleared: bool) {
        self.already_cleared = cleared;
    }

    pub fn enemy_path_to_show(&self) -> Option<u32> {
        self.enemy_path_to_show
    }

    /// Grants or clears the one-tick grace that shields an entity from kills.
    pub fn set_invincible(&mut self, id: EntityId, invincible: bool) {
        if let Some(entity) = self.roster.get_mut(id) {
            entity.invincible = invincible;
        }
    }

    pub fn in_combat(&self) -> bool {
        self.entities.len() > 1
    }

    pub fn is_player_turn(&self) -> bool {
        self.turn_queue.front() == Some(&self.player_id)
    }

    pub fn drain_events(&mut self) -> Vec<RoomEvent> {
        mem::take(&mut self.events)
    }

    /// False for solid tiles and tiles held by a live entity outside `ignore`.
    /// With `future_positions`, enemies are matched on where they intend to
    /// stand rather than where they are.
    pub fn is_empty(&self, tile: Tile, future_positions: bool, ignore: &[EntityId]) -> bool {
        !self.grid.is_solid(tile) && self.entity_at(tile, future_positions, ignore).is_none()
    }

    pub fn entity_at(&self, tile: Tile, future_positions: bool, ignore: &[EntityId]) -> Option<EntityId> {
        self.entities.iter().copied().find(|id| {
            let entity = &self.roster[*id];
            !ignore.contains(id) && occupied_tile(entity, future_positions) == tile
        })
    }

    /// World position an entity is drawn at.
    pub fn draw_pos(&self, id: EntityId) -> Vec2 {
        match self.roster.get(id) {
            Some(entity) => self.grid.tile_to_world_center(entity.pos),
            None => Vec2::ZERO,
        }
    }

    /// Tiles an enemy will walk through if its current plan plays out unobstructed.
    pub fn planned_tiles(&self, id: EntityId) -> Vec<Tile> {
        let Some(entity) = self.roster.get(id) else {
            return Vec::new();
        };
        let mut tile = entity.pos;
        entity
            .planned_directions()
            .map(|direction| {
                tile = tile.step(direction);
                tile
            })
            .collect()
    }

    pub fn pathfinder(&self) -> Pathfinder<'_, Self> {
        Pathfinder::new(self).with_search_cap(self.config.combat.search_cap)
    }

    /// Opens every door this room has and marks the room as cleared for passage.
    pub fn open_doors(&mut self) {
        self.doors_locked = false;
        for side in Direction::ALL {
            if self.doors.has(side) {
                for cell in self.layout.door(side).cells {
                    self.grid.set_code(cell, FLOOR_CODE);
                }
            }
        }
        self.events.push(RoomEvent::DoorsOpened);
        log::debug!("doors opened in round {}", self.round);
    }

    pub fn close_doors(&mut self) {
        self.doors_locked = true;
        for side in Direction::ALL {
            if self.doors.has(side) {
                let door = *self.layout.door(side);
                for cell in door.cells {
                    self.grid.set_code(cell, door.closed_code);
                }
            }
        }
        self.events.push(RoomEvent::DoorsClosed);
        log::debug!("doors closed");
    }

    fn tick_particles(&mut self) {
        for particle in &mut self.particles {
            particle.tick();
        }
        self.particles.retain(|particle| !particle.should_remove());
    }
}

fn occupied_tile(entity: &Entity, future_positions: bool) -> Tile {
    if future_positions && !entity.is_player() { entity.future_pos } else { entity.pos }
}

impl SpatialQuery for RoomState {
    fn width(&self) -> i32 {
        self.grid.width() as i32
    }

    fn height(&self) -> i32 {
        self.grid.height() as i32
    }

    fn is_open(&self, tile: Tile) -> bool {
        self.is_empty(tile, false, &[])
    }

    fn group_at(&self, tile: Tile) -> Option<&Group> {
        self.entity_at(tile, false, &[]).and_then(|id| self.roster[id].group())
    }
}
