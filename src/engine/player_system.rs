use log::debug;

use super::*;
use crate::collision::{can_enter, Mover};
use crate::types::{Facing, ItemType, MonsterType, Position, Tile};

impl GameEngine {
    pub(super) fn step_player(&mut self, input: &InputIntent) {
        let Some(dir) = input.primary_direction() else {
            return;
        };
        self.state.player.facing = dir;
        self.move_player(dir);
    }

    /// Moves the player one cell if the resolver allows it, then resolves
    /// pickups, block pushes and the destination tile.
    pub(super) fn move_player(&mut self, dir: Facing) -> bool {
        let target = self.state.player.position.step(dir);
        if !can_enter(&self.state, target, Mover::Player(dir)) {
            return false;
        }
        self.state.player.position = target;
        self.state.player.facing = dir;

        self.collect_items(target);
        self.push_block(target, dir);
        self.apply_tile_effect(target);
        self.check_monster_contact();
        true
    }

    fn collect_items(&mut self, pos: Position) {
        let Some(cell) = self
            .state
            .tiles
            .index_of(pos)
            .and_then(|idx| self.state.static_items.get_mut(idx))
        else {
            return;
        };
        if cell.is_empty() {
            return;
        }

        let items = std::mem::take(cell);
        let mut kept = Vec::new();
        for item_type in items {
            if item_type == ItemType::Chip {
                self.state.chips_remaining = self.state.chips_remaining.saturating_sub(1);
                self.diff.items_changed = true;
                self.events.push(RuntimeEvent::ChipCollected {
                    x: pos.x,
                    y: pos.y,
                    remaining: self.state.chips_remaining,
                });
            } else if item_type.is_key() || item_type.is_equipment() {
                let count = self.state.inventory.entry(item_type).or_insert(0);
                *count += 1;
                let count = *count;
                self.diff.items_changed = true;
                self.diff.inventory_changed = true;
                debug!("picked up {item_type:?} (now {count})");
                self.events.push(RuntimeEvent::ItemCollected { item_type, count });
            } else {
                kept.push(item_type);
            }
        }
        if let Some(cell) = self
            .state
            .tiles
            .index_of(pos)
            .and_then(|idx| self.state.static_items.get_mut(idx))
        {
            *cell = kept;
        }
    }

    fn push_block(&mut self, pos: Position, dir: Facing) {
        let Some(block_idx) = self.state.block_index_at(pos) else {
            return;
        };
        let dest = pos.step(dir);
        if !can_enter(&self.state, dest, Mover::PushedBlock) {
            debug!("block at ({},{}) cannot move {:?}", pos.x, pos.y, dir);
            return;
        }

        self.diff.items_changed = true;
        if self.state.tile_at(dest) == Some(Tile::Water) {
            self.state.dynamic_items.remove(block_idx);
            self.state.tiles.set(dest, Tile::Dirt);
            self.diff.tiles_changed = true;
            self.events.push(RuntimeEvent::BlockSunk {
                x: dest.x,
                y: dest.y,
            });
            return;
        }
        let block = &mut self.state.dynamic_items[block_idx];
        block.position = dest;
        block.facing = dir;
    }

    fn apply_tile_effect(&mut self, pos: Position) {
        let Some(tile) = self.state.tile_at(pos) else {
            return;
        };
        self.state.show_hint = tile == Tile::Hint;
        self.state.ice_sliding = tile.is_ice() && !self.state.has_item(ItemType::IceSkates);

        if let Some(key) = tile.door_key() {
            self.open_door(pos, tile, key);
            return;
        }

        match tile {
            Tile::ChipGate => {
                if self.state.chips_remaining == 0 {
                    self.state.tiles.set(pos, Tile::Floor);
                    self.diff.tiles_changed = true;
                    self.events.push(RuntimeEvent::ChipGateOpened { x: pos.x, y: pos.y });
                }
            }
            Tile::Dirt => {
                self.state.tiles.set(pos, Tile::Floor);
                self.diff.tiles_changed = true;
            }
            Tile::Water => {
                if !self.state.has_item(ItemType::Flippers) {
                    self.defeat(DefeatCause::Drowned);
                }
            }
            Tile::Fire => {
                if !self.state.has_item(ItemType::FireBoots) {
                    self.defeat(DefeatCause::Burned);
                }
            }
            Tile::SwitchBlockButton => self.toggle_switch_blocks(),
            Tile::TankButton => self.reverse_tanks(),
            Tile::Exit => self.victory(),
            _ => {}
        }
    }

    fn open_door(&mut self, pos: Position, tile: Tile, key: ItemType) {
        if !self.state.has_item(key) {
            return;
        }
        if key != ItemType::GreenKey {
            if let Some(count) = self.state.inventory.get_mut(&key) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.state.inventory.remove(&key);
                }
            }
            self.diff.inventory_changed = true;
        }
        self.state.tiles.set(pos, Tile::Floor);
        self.diff.tiles_changed = true;
        debug!("opened {tile:?} at ({},{})", pos.x, pos.y);
        self.events.push(RuntimeEvent::DoorOpened {
            x: pos.x,
            y: pos.y,
            tile,
        });
    }

    /// Flips every switch block on the grid, not just nearby ones.
    fn toggle_switch_blocks(&mut self) {
        let mut count = 0;
        for tile in self.state.tiles.iter_mut() {
            *tile = match *tile {
                Tile::SwitchBlockOpen => Tile::SwitchBlockClosed,
                Tile::SwitchBlockClosed => Tile::SwitchBlockOpen,
                _ => continue,
            };
            count += 1;
        }
        self.diff.tiles_changed = true;
        self.events.push(RuntimeEvent::SwitchBlocksToggled { count });
    }

    /// Turns every tank on the grid around.
    fn reverse_tanks(&mut self) {
        let mut count = 0;
        for monster in self
            .state
            .monsters
            .iter_mut()
            .filter(|monster| monster.monster_type == MonsterType::Tank)
        {
            monster.facing = monster.facing.turn_around();
            count += 1;
        }
        self.events.push(RuntimeEvent::TanksReversed { count });
    }

    pub(super) fn check_monster_contact(&mut self) {
        if self.state.has_monster_at(self.state.player.position) {
            self.defeat(DefeatCause::MonsterContact);
        }
    }
}
