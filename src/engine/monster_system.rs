use log::debug;

use super::*;
use crate::monster_ai::choose_direction;
use crate::types::{MonsterType, Tile};

impl GameEngine {
    /// One move-cadence step for every monster, in level order.
    pub(super) fn step_monsters(&mut self) {
        let mut idx = 0;
        while idx < self.state.monsters.len() {
            let monster = self.state.monsters[idx];
            if let Some(dir) = choose_direction(&self.state, &monster) {
                let moved = &mut self.state.monsters[idx];
                moved.position = monster.position.step(dir);
                moved.facing = dir;
            }
            let position = self.state.monsters[idx].position;

            if monster.monster_type == MonsterType::Fireball
                && self.state.tile_at(position) == Some(Tile::Water)
            {
                debug!("fireball drowned at ({},{})", position.x, position.y);
                self.state.monsters.remove(idx);
                self.events.push(RuntimeEvent::MonsterDrowned {
                    x: position.x,
                    y: position.y,
                });
                continue;
            }

            if position == self.state.player.position {
                self.defeat(DefeatCause::MonsterContact);
                return;
            }
            idx += 1;
        }
    }
}
