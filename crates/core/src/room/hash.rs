//! Stable snapshot hashing so two runs of the same seed and inputs can be compared.

use std::hash::Hasher;

use slotmap::Key;
use xxhash_rust::xxh3::Xxh3;

use super::*;
use crate::grid::NULL_CODE;

impl RoomState {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u32(self.round);
        hasher.write_u32(self.delay);
        hasher.write_u8(u8::from(self.game_over));
        hasher.write_u8(u8::from(self.doors_locked));
        hasher.write_u32(self.enemy_path_to_show.unwrap_or(u32::MAX));

        for id in &self.entities {
            let entity = &self.roster[*id];
            hasher.write_u64(id.data().as_ffi());
            hasher.write_i32(entity.pos.x);
            hasher.write_i32(entity.pos.y);
            hasher.write_i32(entity.future_pos.x);
            hasher.write_i32(entity.future_pos.y);
            hasher.write_u8(u8::from(entity.invincible));
            hasher.write_u8(u8::from(entity.turn.active));
            hasher.write_u8(u8::from(entity.turn.finished));
            hasher.write_u32(entity.turn.moves_left);
            hasher.write_u32(entity.turn.attacks_left);
        }

        hasher.write_usize(self.turn_queue.len());
        for id in &self.turn_queue {
            hasher.write_u64(id.data().as_ffi());
        }

        for side in Direction::ALL {
            for cell in self.layout.door(side).cells {
                hasher.write_u8(self.grid.code_at(cell).unwrap_or(NULL_CODE));
            }
        }
        hasher.finish()
    }
}
