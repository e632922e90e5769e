use crate::types::{Facing, ItemType, MonsterType, Position, Tile};
use crate::world::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mover {
    Player(Facing),
    Monster(MonsterType),
    PushedBlock,
}

/// Who may stand on a tile class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileRule {
    Open,
    Solid,
    PlayerOnly,
    PlayerWhenChipsCollected,
    PlayerOrBlock,
    PlayerWithKey(ItemType),
    PlayerOrMonster(MonsterType),
}

pub fn tile_rule(tile: Tile) -> TileRule {
    match tile {
        Tile::Floor | Tile::Hint | Tile::Dirt => TileRule::Open,
        Tile::Wall | Tile::SwitchBlockClosed => TileRule::Solid,
        Tile::Exit => TileRule::PlayerOnly,
        Tile::ChipGate => TileRule::PlayerWhenChipsCollected,
        Tile::Water => TileRule::PlayerOrBlock,
        Tile::BlueDoor => TileRule::PlayerWithKey(ItemType::BlueKey),
        Tile::RedDoor => TileRule::PlayerWithKey(ItemType::RedKey),
        Tile::GreenDoor => TileRule::PlayerWithKey(ItemType::GreenKey),
        Tile::YellowDoor => TileRule::PlayerWithKey(ItemType::YellowKey),
        Tile::Fire => TileRule::PlayerOrMonster(MonsterType::Fireball),
        Tile::ForceNorth
        | Tile::ForceSouth
        | Tile::ForceEast
        | Tile::ForceWest
        | Tile::Ice
        | Tile::IceNorthEast
        | Tile::IceNorthWest
        | Tile::IceSouthEast
        | Tile::IceSouthWest
        | Tile::SwitchBlockOpen
        | Tile::SwitchBlockButton
        | Tile::TankButton => TileRule::Open,
    }
}

fn tile_permits(state: &GameState, tile: Tile, mover: Mover) -> bool {
    let is_player = matches!(mover, Mover::Player(_));
    match tile_rule(tile) {
        TileRule::Open => true,
        TileRule::Solid => false,
        TileRule::PlayerOnly => is_player,
        TileRule::PlayerWhenChipsCollected => is_player && state.chips_remaining == 0,
        TileRule::PlayerOrBlock => is_player || mover == Mover::PushedBlock,
        TileRule::PlayerWithKey(key) => is_player && state.has_item(key),
        TileRule::PlayerOrMonster(kind) => is_player || mover == Mover::Monster(kind),
    }
}

/// Whether `mover` may occupy `target` in the current state. For the player
/// a block on the target cell is only passable if it could be pushed one
/// step further; the push itself is left to the engine.
pub fn can_enter(state: &GameState, target: Position, mover: Mover) -> bool {
    let Some(tile) = state.tile_at(target) else {
        return false;
    };
    if !tile_permits(state, tile, mover) {
        return false;
    }
    if state.block_index_at(target).is_some() {
        return match mover {
            Mover::Player(facing) => can_enter(state, target.step(facing), Mover::PushedBlock),
            Mover::Monster(_) | Mover::PushedBlock => false,
        };
    }
    true
}
