//! Per-tick scheduling: delay gating, round setup and the combat/explore split.

use std::cmp::Reverse;

use super::*;
use crate::run::RunProgress;

impl RoomState {
    /// Advances the room by one logical tick.
    pub fn update(&mut self, input: &FrameInput, run: &mut dyn RunProgress) -> RoomSignal {
        self.tick_particles();

        if self.game_over {
            self.game_over_ticks += 1;
            if self.game_over_ticks > self.config.timing.game_over_grace && input.restart {
                return RoomSignal::ReturnToMenu;
            }
            return RoomSignal::Continue;
        }

        if self.delay > 0 {
            self.delay -= 1;
            self.idle_tick();
            return RoomSignal::Continue;
        }

        self.drain_kills();

        if self.in_combat() {
            self.combat_step(input, run);
            RoomSignal::Continue
        } else {
            self.explore_step(input, run)
        }
    }

    /// Snapshots live entities into a fresh queue, fastest first.
    pub fn new_round(&mut self) {
        self.round += 1;
        self.delay = self.config.timing.round_delay;
        self.enemy_path_to_show = None;

        let mut queue = self.entities.clone();
        queue.sort_by_key(|id| Reverse(self.roster[*id].current_speed()));
        self.turn_queue = queue.into();
        self.last_entity = None;

        self.events.push(RoomEvent::RoundStarted { round: self.round, queue_len: self.turn_queue.len() });
        log::debug!("round {} starts with {} in queue", self.round, self.turn_queue.len());

        let enemies: Vec<EntityId> =
            self.turn_queue.iter().copied().filter(|id| !self.roster[*id].is_player()).collect();
        for id in enemies {
            self.choose_intentions(id);
        }
    }

    fn idle_tick(&mut self) {
        let holder = if self.in_combat() { self.turn_queue.front().copied() } else { Some(self.player_id) };
        if let Some(entity) = holder.and_then(|id| self.roster.get_mut(id)) {
            entity.idle();
        }
    }

    fn combat_step(&mut self, input: &FrameInput, run: &mut dyn RunProgress) {
        if self.turn_queue.is_empty() {
            if let Some(entity) = self.last_entity.and_then(|id| self.roster.get_mut(id)) {
                entity.end_idle();
            }
            self.new_round();
        }

        if self.is_player_turn() && input.cycle_enemy_view {
            self.cycle_enemy_view();
        }

        let Some(current) = self.turn_queue.front().copied() else {
            return;
        };
        self.roster[current].invincible = false;

        if self.last_entity != Some(current) {
            if let Some(entity) = self.last_entity.and_then(|id| self.roster.get_mut(id)) {
                entity.end_idle();
            }
            self.start_turn(current, run);
            self.last_entity = Some(current);
        } else if self.roster[current].is_finished() || self.roster[current].dead {
            self.turn_queue.pop_front();
            self.end_turn(current);
            self.delay = self.delay.max(self.roster[current].action_delay());
        }

        for id in &self.entities {
            if let Some(entity) = self.roster.get_mut(*id) {
                entity.end_idle();
            }
        }

        if self.act(current, input, run) {
            self.delay = self.delay.max(self.roster[current].action_delay());
        }
    }

    fn explore_step(&mut self, input: &FrameInput, run: &mut dyn RunProgress) -> RoomSignal {
        if self.doors_locked {
            self.open_doors();
        }

        let player_pos = self.roster[self.player_id].pos;
        if self.ladder == Some(player_pos) && input.descend {
            log::info!("descending from {player_pos}");
            run.next_floor();
            return RoomSignal::Descended;
        }

        let mut signal = RoomSignal::Continue;
        match self.layout.exit_direction(player_pos) {
            Some(direction) if self.exit_armed => {
                log::info!("leaving room {direction:?} from {player_pos}");
                run.travel(direction);
                signal = RoomSignal::Travelled(direction);
            }
            Some(_) => {}
            None => self.exit_armed = true,
        }

        let player = self.player_id;
        self.roster[player].end_idle();
        if self.act(player, input, run) {
            self.delay = self.delay.max(self.roster[player].action_delay());
        }
        signal
    }
}
