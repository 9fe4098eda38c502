//! Deferred kills, squad consistency, straight-line matches and player damage.

use std::mem;

use super::*;
use crate::content::ENCOURAGEMENTS;
use crate::run::RunProgress;

impl RoomState {
    /// Queues a live enemy for removal on the next drain. Anything else is ignored.
    pub fn mark_for_death(&mut self, id: EntityId) {
        let eligible = self.is_alive(id) && self.roster.get(id).is_some_and(|e| !e.is_player() && !e.dead);
        if eligible {
            self.kill_set.insert(id);
        }
    }

    /// Kills everything marked, re-checking squads until nothing new is marked.
    pub(crate) fn drain_kills(&mut self) {
        let mut killed = 0;
        while !self.kill_set.is_empty() {
            for id in mem::take(&mut self.kill_set) {
                if self.kill_entity(id) {
                    killed += 1;
                }
            }
            self.check_groups();
        }
        if killed > 0 {
            self.events.push(RoomEvent::Cue(Cue::Boom));
        }
    }

    /// No-op for dead or invincible entities. Returns whether a kill happened.
    pub(crate) fn kill_entity(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.roster.get(id) else {
            return false;
        };
        if entity.dead || entity.invincible {
            return false;
        }

        self.entities.retain(|live| *live != id);
        self.turn_queue.retain(|queued| *queued != id);
        let position = self.draw_pos(id);
        self.particles.insert(0, Particle::explosion(position));

        let entity = &mut self.roster[id];
        entity.end_idle();
        entity.dead = true;
        self.on_died(id);
        true
    }

    fn on_died(&mut self, id: EntityId) {
        let archetype = self.roster[id].archetype();
        self.events.push(RoomEvent::EntityDied { entity: id, archetype });
        log::debug!("entity {id:?} ({archetype:?}) died");
    }

    /// Squads left with fewer than two other live members are wiped out.
    fn check_groups(&mut self) {
        let mut doomed = Vec::new();
        for (id, enemy) in self.live_enemies() {
            let Some(group) = enemy.group() else {
                continue;
            };
            let others = self
                .live_enemies()
                .filter(|(other, entity)| *other != id && entity.group() == Some(group))
                .count();
            if others < 2 {
                doomed.extend(
                    self.live_enemies()
                        .filter(|(_, entity)| entity.group() == Some(group) && !entity.invincible)
                        .map(|(member, _)| member),
                );
            }
        }
        self.kill_set.extend(doomed);
    }

    /// Marks every straight run of one squad at least `match_length` long,
    /// scanning out from each live enemy. Returns how many runs were found.
    pub fn check_for_match(&mut self) -> usize {
        let reach = self.config.combat.match_reach;
        let match_length = self.config.combat.match_length;
        let mut chains = Vec::new();

        for (root, enemy) in self.live_enemies() {
            let Some(group) = enemy.group() else {
                continue;
            };
            for direction in Direction::ALL {
                let mut chain = vec![root];
                for distance in 1..=reach {
                    let tile = direction.offset(enemy.pos, distance);
                    let member = self.entity_at(tile, false, &[]).filter(|id| {
                        let other = &self.roster[*id];
                        other.group() == Some(group) && !other.invincible
                    });
                    match member {
                        Some(id) => chain.push(id),
                        None => break,
                    }
                }
                if chain.len() >= match_length {
                    chains.push(chain);
                }
            }
        }

        for chain in &chains {
            log::debug!("match of {} rooted at {:?}", chain.len(), chain[0]);
            self.events.push(RoomEvent::MatchFound { root: chain[0], length: chain.len() });
            self.kill_set.extend(chain.iter().copied());
        }

        if let Some(first) = chains.first()
            && let Some(phrase) = self.dice.pick(&ENCOURAGEMENTS)
        {
            let position = self.draw_pos(first[0]);
            self.particles.push(Particle::text(position, *phrase));
        }

        chains.len()
    }

    /// One heart off the run; at zero health the room is lost.
    pub fn damage_player(&mut self, run: &mut dyn RunProgress) {
        self.events.push(RoomEvent::Cue(Cue::Hurt));
        run.lose_heart();
        let position = self.draw_pos(self.player_id);
        self.particles.push(Particle::hurt(position));

        let health = run.health();
        self.events.push(RoomEvent::PlayerDamaged { health });
        log::debug!("player hit, {health} health left");

        if health <= 0 {
            self.game_over = true;
            let player = self.player_id;
            self.entities.retain(|id| *id != player);
            self.turn_queue.retain(|id| *id != player);
            self.events.push(RoomEvent::GameOver);
            log::info!("game over in round {}", self.round);
        }
    }
}
