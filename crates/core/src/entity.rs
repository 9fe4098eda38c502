//! Actors taking part in a room: the player and every enemy variant.
//! Variant-specific behaviour is dispatched by the room through [`EntityKind`];
//! this module only owns per-entity state and the turn lifecycle bookkeeping.

use std::collections::VecDeque;

use crate::content::archetype_stats;
use crate::types::{Archetype, Behavior, Direction, Group, Tile};

pub const PLAYER_SPEED: i32 = 10;
pub const PLAYER_ACTION_DELAY: u32 = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyTraits {
    pub archetype: Archetype,
    pub group: Group,
    /// Placement order within the room; UI target selection cycles through it.
    pub id: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Enemy(EnemyTraits),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnState {
    pub active: bool,
    pub finished: bool,
    pub moves_left: u32,
    pub attacks_left: u32,
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: Tile,
    /// Where the entity means to stand once its planned moves this round resolve.
    pub future_pos: Tile,
    pub dead: bool,
    /// One-tick grace flag: kills are ignored while set.
    pub invincible: bool,
    pub turn: TurnState,
    pub(crate) plan: VecDeque<Direction>,
    idle_ticks: u32,
}

impl Entity {
    pub fn player(pos: Tile) -> Self {
        Self::with_kind(EntityKind::Player, pos)
    }

    pub fn enemy(archetype: Archetype, group: Group, id: u32, pos: Tile) -> Self {
        Self::with_kind(EntityKind::Enemy(EnemyTraits { archetype, group, id }), pos)
    }

    fn with_kind(kind: EntityKind, pos: Tile) -> Self {
        Self {
            kind,
            pos,
            future_pos: pos,
            dead: false,
            invincible: false,
            turn: TurnState::default(),
            plan: VecDeque::new(),
            idle_ticks: 0,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player)
    }

    pub fn enemy_traits(&self) -> Option<&EnemyTraits> {
        match &self.kind {
            EntityKind::Enemy(traits) => Some(traits),
            EntityKind::Player => None,
        }
    }

    pub fn group(&self) -> Option<&Group> {
        self.enemy_traits().map(|traits| &traits.group)
    }

    pub fn archetype(&self) -> Option<Archetype> {
        self.enemy_traits().map(|traits| traits.archetype)
    }

    pub fn behavior(&self) -> Option<Behavior> {
        self.archetype().map(|archetype| archetype_stats(archetype).behavior)
    }

    /// Higher speeds act earlier in a round.
    pub fn current_speed(&self) -> i32 {
        match &self.kind {
            EntityKind::Player => PLAYER_SPEED,
            EntityKind::Enemy(traits) => archetype_stats(traits.archetype).speed,
        }
    }

    /// Ticks the scheduler waits after this entity acts or ends its turn.
    pub fn action_delay(&self) -> u32 {
        match &self.kind {
            EntityKind::Player => PLAYER_ACTION_DELAY,
            EntityKind::Enemy(traits) => archetype_stats(traits.archetype).action_delay,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.turn.finished
    }

    pub fn planned_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.plan.iter().copied()
    }

    pub fn start_turn(&mut self, moves: u32, attacks: u32) {
        self.turn = TurnState { active: true, finished: false, moves_left: moves, attacks_left: attacks };
        self.idle_ticks = 0;
    }

    pub fn end_turn(&mut self) {
        self.turn.active = false;
        self.turn.finished = true;
        self.plan.clear();
        self.future_pos = self.pos;
    }

    pub(crate) fn finish(&mut self) {
        self.turn.finished = true;
    }

    pub(crate) fn finish_if_spent(&mut self) {
        if self.turn.moves_left == 0 && self.turn.attacks_left == 0 {
            self.turn.finished = true;
        }
    }

    /// Moves as part of the entity's own action.
    pub(crate) fn step_to(&mut self, tile: Tile) {
        self.pos = tile;
        if self.is_player() {
            self.future_pos = tile;
        }
    }

    /// Moves because something else pushed it; any plan is void.
    pub(crate) fn displace(&mut self, tile: Tile) {
        self.pos = tile;
        self.future_pos = tile;
        self.plan.clear();
    }

    /// Animation-only tick while waiting on a delay.
    pub fn idle(&mut self) {
        self.idle_ticks = self.idle_ticks.saturating_add(1);
    }

    pub fn end_idle(&mut self) {
        self.idle_ticks = 0;
    }

    pub fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_lifecycle_resets_budgets_and_intent() {
        let mut enemy = Entity::enemy(Archetype::Skeleton, Group::from_slot(0), 0, Tile::new(3, 3));
        enemy.future_pos = Tile::new(5, 3);
        enemy.plan.extend([Direction::East, Direction::East]);

        enemy.start_turn(2, 1);
        assert!(enemy.turn.active);
        assert!(!enemy.is_finished());
        assert_eq!(enemy.turn.moves_left, 2);

        enemy.turn.moves_left = 0;
        enemy.turn.attacks_left = 0;
        enemy.finish_if_spent();
        assert!(enemy.is_finished());

        enemy.end_turn();
        assert!(!enemy.turn.active);
        assert_eq!(enemy.future_pos, enemy.pos);
        assert_eq!(enemy.planned_directions().count(), 0);
    }

    #[test]
    fn player_future_position_tracks_its_own_steps() {
        let mut player = Entity::player(Tile::new(1, 1));
        player.step_to(Tile::new(2, 1));
        assert_eq!(player.future_pos, Tile::new(2, 1));

        let mut enemy = Entity::enemy(Archetype::Slime, Group::from_slot(1), 4, Tile::new(1, 1));
        enemy.future_pos = Tile::new(1, 3);
        enemy.step_to(Tile::new(1, 2));
        assert_eq!(enemy.future_pos, Tile::new(1, 3), "enemy intent survives its own steps");
        enemy.displace(Tile::new(0, 2));
        assert_eq!(enemy.future_pos, Tile::new(0, 2), "a shove voids the intent");
    }

    #[test]
    fn idle_counter_resets_on_end_idle() {
        let mut player = Entity::player(Tile::new(0, 0));
        player.idle();
        player.idle();
        assert_eq!(player.idle_ticks(), 2);
        player.end_idle();
        assert_eq!(player.idle_ticks(), 0);
    }
}
