use crate::constants::START_MARKER;
use crate::types::{Facing, ItemType, MonsterType, Tile};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldCode {
    Start,
    Item(ItemType),
    Monster(MonsterType, Facing),
    Tile(Tile),
}

/// Resolves a field code in priority order: start marker, item, monster, tile.
pub fn classify(code: u8) -> Option<FieldCode> {
    if code == START_MARKER {
        return Some(FieldCode::Start);
    }
    if let Some(item) = item_for_code(code) {
        return Some(FieldCode::Item(item));
    }
    if let Some((monster, facing)) = monster_for_code(code) {
        return Some(FieldCode::Monster(monster, facing));
    }
    tile_for_code(code).map(FieldCode::Tile)
}

pub fn tile_for_code(code: u8) -> Option<Tile> {
    let tile = match code {
        0x00 => Tile::Floor,
        0x01 => Tile::Wall,
        0x03 => Tile::Water,
        0x04 => Tile::Fire,
        0x0b => Tile::Dirt,
        0x0c => Tile::Ice,
        0x0d => Tile::ForceSouth,
        0x12 => Tile::ForceNorth,
        0x13 => Tile::ForceEast,
        0x14 => Tile::ForceWest,
        0x15 => Tile::Exit,
        0x16 => Tile::BlueDoor,
        0x17 => Tile::RedDoor,
        0x18 => Tile::GreenDoor,
        0x19 => Tile::YellowDoor,
        0x1a => Tile::IceSouthEast,
        0x1b => Tile::IceSouthWest,
        0x1c => Tile::IceNorthWest,
        0x1d => Tile::IceNorthEast,
        0x22 => Tile::ChipGate,
        0x23 => Tile::SwitchBlockButton,
        0x25 => Tile::SwitchBlockClosed,
        0x26 => Tile::SwitchBlockOpen,
        0x28 => Tile::TankButton,
        0x2f => Tile::Hint,
        _ => return None,
    };
    Some(tile)
}

pub fn item_for_code(code: u8) -> Option<ItemType> {
    let item = match code {
        0x02 => ItemType::Chip,
        0x0a => ItemType::DirtBlock,
        0x2a => ItemType::Bomb,
        0x31 => ItemType::CloningMachine,
        0x64 => ItemType::BlueKey,
        0x65 => ItemType::RedKey,
        0x66 => ItemType::GreenKey,
        0x67 => ItemType::YellowKey,
        0x68 => ItemType::Flippers,
        0x69 => ItemType::FireBoots,
        0x6a => ItemType::IceSkates,
        0x6b => ItemType::SuctionBoots,
        _ => return None,
    };
    Some(item)
}

const MONSTER_BASE: u8 = 0x40;
const MONSTER_ORDER: [MonsterType; 5] = [
    MonsterType::Bug,
    MonsterType::Fireball,
    MonsterType::Ball,
    MonsterType::Tank,
    MonsterType::Glider,
];
const MONSTER_FACINGS: [Facing; 4] = [Facing::North, Facing::West, Facing::South, Facing::East];

pub fn monster_for_code(code: u8) -> Option<(MonsterType, Facing)> {
    let offset = code.checked_sub(MONSTER_BASE)? as usize;
    let monster = MONSTER_ORDER.get(offset / MONSTER_FACINGS.len())?;
    Some((*monster, MONSTER_FACINGS[offset % MONSTER_FACINGS.len()]))
}
