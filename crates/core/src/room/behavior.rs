//! Turn behaviour for the player and the enemy archetypes.

use super::*;
use crate::content::archetype_stats;
use crate::run::RunProgress;

/// Chasers get one swing per turn.
const ENEMY_ATTACKS: u32 = 1;

impl RoomState {
    pub(crate) fn start_turn(&mut self, id: EntityId, run: &dyn RunProgress) {
        let Some(entity) = self.roster.get_mut(id) else {
            return;
        };
        match entity.archetype() {
            None => entity.start_turn(run.movements(), run.attacks()),
            Some(archetype) => {
                entity.start_turn(archetype_stats(archetype).moves, ENEMY_ATTACKS);
                self.plan_enemy(id);
            }
        }
        self.events.push(RoomEvent::TurnStarted { entity: id });
    }

    pub(crate) fn end_turn(&mut self, id: EntityId) {
        if let Some(entity) = self.roster.get_mut(id) {
            entity.end_turn();
        }
    }

    /// Runs one action step. True when something happened that the scheduler
    /// should leave time to animate.
    pub(crate) fn act(&mut self, id: EntityId, input: &FrameInput, run: &mut dyn RunProgress) -> bool {
        if id == self.player_id { self.player_act(input) } else { self.enemy_act(id, run) }
    }

    /// Pre-computes what an enemy means to do this round, before anyone moves.
    pub(crate) fn choose_intentions(&mut self, id: EntityId) {
        self.plan_enemy(id);
    }

    fn plan_enemy(&mut self, id: EntityId) {
        let Some(entity) = self.roster.get(id) else {
            return;
        };
        let (Some(archetype), Some(group)) = (entity.archetype(), entity.group().cloned()) else {
            return;
        };
        let stats = archetype_stats(archetype);
        let start = entity.pos;
        let target = self.roster[self.player_id].pos;

        let plan: Vec<Direction> = match stats.behavior {
            Behavior::Chase => self.pathfinder().direction_sequence(start, target, Some(&group)),
            Behavior::Wander => (0..stats.moves).map(|_| self.dice.direction()).collect(),
        };

        let mut future = start;
        for direction in plan.iter().take(stats.moves as usize) {
            let next = future.step(*direction);
            // Tiles already claimed by another enemy's plan end the projection.
            if next == target || !self.is_empty(next, true, &[id]) {
                break;
            }
            future = next;
        }

        let entity = &mut self.roster[id];
        entity.plan = plan.into();
        entity.future_pos = future;
    }

    fn enemy_act(&mut self, id: EntityId, run: &mut dyn RunProgress) -> bool {
        let player_pos = self.roster[self.player_id].pos;
        let Some(entity) = self.roster.get(id) else {
            return false;
        };
        if !entity.turn.active || entity.turn.finished {
            return false;
        }
        let Some(direction) = entity.plan.front().copied() else {
            self.roster[id].finish();
            return false;
        };

        let next = entity.pos.step(direction);
        if next == player_pos {
            let attacks = entity.behavior() == Some(Behavior::Chase) && entity.turn.attacks_left > 0;
            let entity = &mut self.roster[id];
            entity.finish();
            if attacks {
                entity.turn.attacks_left -= 1;
                self.damage_player(run);
            }
            return attacks;
        }

        if entity.turn.moves_left == 0 || !self.is_empty(next, false, &[id]) {
            self.roster[id].finish();
            return false;
        }

        let entity = &mut self.roster[id];
        entity.step_to(next);
        entity.plan.pop_front();
        entity.turn.moves_left -= 1;
        true
    }

    fn player_act(&mut self, input: &FrameInput) -> bool {
        let combat = self.in_combat();
        let player_id = self.player_id;
        let player = &self.roster[player_id];
        if combat && (!player.turn.active || player.turn.finished) {
            return false;
        }

        if combat && input.end_turn {
            self.roster[player_id].finish();
            return false;
        }

        if let Some(direction) = input.movement {
            if combat && player.turn.moves_left == 0 {
                return false;
            }
            let target = player.pos.step(direction);
            if !self.is_empty(target, false, &[player_id]) {
                return false;
            }
            let player = &mut self.roster[player_id];
            player.step_to(target);
            if combat {
                player.turn.moves_left -= 1;
                player.finish_if_spent();
            }
            return true;
        }

        if combat
            && let Some(direction) = input.attack
            && player.turn.attacks_left > 0
        {
            return self.shove(direction);
        }

        false
    }

    /// Pushes the adjacent enemy one tile along `direction` when there is room,
    /// then looks for matches the push may have formed.
    fn shove(&mut self, direction: Direction) -> bool {
        let player_id = self.player_id;
        let target = self.roster[player_id].pos.step(direction);
        let Some(victim) = self.entity_at(target, false, &[]).filter(|id| !self.roster[*id].is_player()) else {
            return false;
        };

        let beyond = target.step(direction);
        if self.is_empty(beyond, false, &[]) {
            self.roster[victim].displace(beyond);
        }

        self.roster[player_id].turn.attacks_left -= 1;
        self.check_for_match();
        self.roster[player_id].finish_if_spent();
        true
    }

    /// Selects the next enemy by id for path display, wrapping to none.
    pub(crate) fn cycle_enemy_view(&mut self) {
        let current = self.enemy_path_to_show;
        self.enemy_path_to_show = self
            .live_enemies()
            .filter_map(|(_, entity)| entity.enemy_traits().map(|traits| traits.id))
            .filter(|id| current.is_none_or(|shown| *id > shown))
            .min();
    }
}
