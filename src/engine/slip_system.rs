use log::debug;

use super::utils::slide_direction;
use super::*;
use crate::types::ItemType;

impl GameEngine {
    /// One slip-cadence step: force floor first, then ice continuation.
    pub(super) fn step_slip(&mut self) {
        self.resolve_force_floor();
        if self.is_running() && self.state.ice_sliding {
            self.resolve_ice();
        }
    }

    fn resolve_force_floor(&mut self) {
        let Some(tile) = self.state.tile_at(self.state.player.position) else {
            return;
        };
        let Some(dir) = tile.force_direction() else {
            return;
        };
        if self.state.has_item(ItemType::SuctionBoots) {
            return;
        }
        if !self.move_player(dir) {
            debug!("force floor push {dir:?} blocked");
        }
    }

    fn resolve_ice(&mut self) {
        let position = self.state.player.position;
        let Some(tile) = self.state.tile_at(position) else {
            return;
        };
        if !tile.is_ice() {
            self.state.ice_sliding = false;
            return;
        }

        let incoming = self.state.player.facing;
        let slide = slide_direction(tile, incoming);
        if self.move_player(slide) {
            return;
        }
        let back = incoming.turn_around();
        self.state.player.facing = back;
        if !self.move_player(back) {
            debug!("ice bounce from ({},{}) blocked both ways", position.x, position.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::SLIP_TICK_MS;
    use crate::engine::tests::{engine_for, idle, item, level_with, walk};
    use crate::types::{Facing, ItemType, Position, RunningState, Tile};

    #[test]
    fn force_floor_pushes_every_slip_step() {
        let mut engine = engine_for(level_with(
            4,
            4,
            &[(1, 0, Tile::ForceSouth), (1, 1, Tile::ForceSouth)],
        ));
        walk(&mut engine, Facing::East);
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(1, 1));
        assert_eq!(engine.state().player.facing, Facing::South);
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(1, 2));
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(1, 2));
    }

    #[test]
    fn force_floor_into_a_wall_clamps() {
        let mut engine = engine_for(level_with(
            3,
            3,
            &[(1, 0, Tile::ForceSouth), (1, 1, Tile::Wall)],
        ));
        walk(&mut engine, Facing::East);
        idle(&mut engine, SLIP_TICK_MS * 3);
        assert_eq!(engine.state().player.position, Position::new(1, 0));
    }

    #[test]
    fn force_floor_off_the_grid_clamps() {
        let mut engine = engine_for(level_with(3, 1, &[(1, 0, Tile::ForceNorth)]));
        walk(&mut engine, Facing::East);
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(1, 0));
    }

    #[test]
    fn suction_boots_ignore_force_floors() {
        let mut level = level_with(3, 3, &[(2, 0, Tile::ForceSouth)]);
        level.items = vec![item(1, 0, ItemType::SuctionBoots)];
        let mut engine = engine_for(level);
        walk(&mut engine, Facing::East);
        walk(&mut engine, Facing::East);
        idle(&mut engine, SLIP_TICK_MS * 2);
        assert_eq!(engine.state().player.position, Position::new(2, 0));
    }

    #[test]
    fn forced_arrival_collects_items() {
        let mut level = level_with(3, 3, &[(1, 0, Tile::ForceSouth)]);
        level.chips = 1;
        level.items = vec![item(1, 1, ItemType::Chip)];
        let mut engine = engine_for(level);
        walk(&mut engine, Facing::East);
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(1, 1));
        assert_eq!(engine.state().chips_remaining, 0);
        assert!(engine.state().items_at(Position::new(1, 1)).is_empty());
    }

    #[test]
    fn forced_arrival_runs_tile_effects() {
        let mut engine = engine_for(level_with(
            3,
            3,
            &[(1, 0, Tile::ForceSouth), (1, 1, Tile::Water)],
        ));
        walk(&mut engine, Facing::East);
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.running_state(), RunningState::Defeat);
    }

    #[test]
    fn ice_slides_until_off_the_ice_and_ignores_input() {
        let mut engine = engine_for(level_with(
            6,
            2,
            &[(1, 0, Tile::Ice), (2, 0, Tile::Ice), (3, 0, Tile::Ice)],
        ));
        walk(&mut engine, Facing::East);
        assert!(engine.state().ice_sliding);

        // held South is ignored while sliding
        walk(&mut engine, Facing::South);
        assert_eq!(engine.state().player.position, Position::new(3, 0));
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(4, 0));
        assert!(!engine.state().ice_sliding);
    }

    #[test]
    fn ice_against_a_wall_bounces_back() {
        let mut engine = engine_for(level_with(
            4,
            1,
            &[(1, 0, Tile::Ice), (2, 0, Tile::Ice), (3, 0, Tile::Wall)],
        ));
        walk(&mut engine, Facing::East);
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(2, 0));
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(1, 0));
        assert_eq!(engine.state().player.facing, Facing::West);
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(0, 0));
        assert!(!engine.state().ice_sliding);
    }

    #[test]
    fn blocked_ice_corner_bounces_back_the_way_it_came() {
        let mut engine = engine_for(level_with(
            3,
            3,
            &[(1, 1, Tile::IceSouthEast), (1, 0, Tile::Wall)],
        ));
        engine.state.player.position = Position::new(0, 1);
        walk(&mut engine, Facing::East);
        assert!(engine.state().ice_sliding);
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(0, 1));
        assert_eq!(engine.state().player.facing, Facing::West);
        assert!(!engine.state().ice_sliding);
    }

    #[test]
    fn ice_corner_deflects_the_slide() {
        let mut engine = engine_for(level_with(
            3,
            3,
            &[(1, 1, Tile::Ice), (2, 1, Tile::IceSouthEast)],
        ));
        engine.state.player.position = Position::new(0, 1);
        walk(&mut engine, Facing::East);
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(2, 1));
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(2, 0));
        assert_eq!(engine.state().player.facing, Facing::North);
    }

    #[test]
    fn ice_skates_walk_on_ice() {
        let mut level = level_with(4, 1, &[(2, 0, Tile::Ice)]);
        level.items = vec![item(1, 0, ItemType::IceSkates)];
        let mut engine = engine_for(level);
        walk(&mut engine, Facing::East);
        walk(&mut engine, Facing::East);
        assert!(!engine.state().ice_sliding);
        idle(&mut engine, SLIP_TICK_MS * 2);
        assert_eq!(engine.state().player.position, Position::new(2, 0));
    }
}
