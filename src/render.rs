//! Text renderer used by the headless tools. The glyph sheet plays the part
//! of a sprite atlas: a missing entry degrades the picture, never the game.

use std::collections::{HashMap, HashSet};

use log::warn;

use crate::types::{ItemType, MonsterType, Position, Tile};
use crate::world::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlyphKey {
    Tile(Tile),
    Item(ItemType),
    Monster(MonsterType),
    Player,
}

#[derive(Clone, Debug)]
pub struct GlyphSheet {
    glyphs: HashMap<GlyphKey, char>,
}

impl Default for GlyphSheet {
    fn default() -> Self {
        let tiles = [
            (Tile::Floor, '.'),
            (Tile::Wall, '#'),
            (Tile::Exit, 'E'),
            (Tile::Water, '~'),
            (Tile::Fire, '^'),
            (Tile::Dirt, ':'),
            (Tile::BlueDoor, 'B'),
            (Tile::RedDoor, 'R'),
            (Tile::GreenDoor, 'G'),
            (Tile::YellowDoor, 'Y'),
            (Tile::Hint, '?'),
            (Tile::ChipGate, 'H'),
            (Tile::ForceNorth, '8'),
            (Tile::ForceSouth, '2'),
            (Tile::ForceEast, '6'),
            (Tile::ForceWest, '4'),
            (Tile::Ice, '_'),
            (Tile::IceNorthEast, '7'),
            (Tile::IceNorthWest, '9'),
            (Tile::IceSouthEast, '1'),
            (Tile::IceSouthWest, '3'),
            (Tile::SwitchBlockOpen, ','),
            (Tile::SwitchBlockClosed, '%'),
            (Tile::SwitchBlockButton, '='),
            (Tile::TankButton, '+'),
        ];
        let items = [
            (ItemType::Chip, '*'),
            (ItemType::DirtBlock, 'O'),
            (ItemType::Bomb, 'x'),
            (ItemType::CloningMachine, 'C'),
            (ItemType::BlueKey, 'b'),
            (ItemType::RedKey, 'r'),
            (ItemType::GreenKey, 'g'),
            (ItemType::YellowKey, 'y'),
            (ItemType::Flippers, 'f'),
            (ItemType::FireBoots, 'h'),
            (ItemType::IceSkates, 'k'),
            (ItemType::SuctionBoots, 's'),
        ];
        let monsters = [
            (MonsterType::Bug, 'u'),
            (MonsterType::Fireball, 'a'),
            (MonsterType::Ball, 'o'),
            (MonsterType::Tank, 't'),
            (MonsterType::Glider, 'v'),
        ];

        let mut glyphs: HashMap<GlyphKey, char> = HashMap::new();
        glyphs.extend(tiles.map(|(tile, ch)| (GlyphKey::Tile(tile), ch)));
        glyphs.extend(items.map(|(item, ch)| (GlyphKey::Item(item), ch)));
        glyphs.extend(monsters.map(|(monster, ch)| (GlyphKey::Monster(monster), ch)));
        glyphs.insert(GlyphKey::Player, '@');
        Self { glyphs }
    }
}

impl GlyphSheet {
    pub fn empty() -> Self {
        Self {
            glyphs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: GlyphKey, glyph: char) {
        self.glyphs.insert(key, glyph);
    }

    pub fn remove(&mut self, key: GlyphKey) {
        self.glyphs.remove(&key);
    }

    pub fn get(&self, key: GlyphKey) -> Option<char> {
        self.glyphs.get(&key).copied()
    }
}

/// Topmost thing drawn on a cell: player, monster, block, static item, tile.
fn glyph_key_at(state: &GameState, pos: Position) -> Option<GlyphKey> {
    if state.player.position == pos {
        return Some(GlyphKey::Player);
    }
    if let Some(monster) = state.monsters.iter().find(|monster| monster.position == pos) {
        return Some(GlyphKey::Monster(monster.monster_type));
    }
    if let Some(idx) = state.block_index_at(pos) {
        return Some(GlyphKey::Item(state.dynamic_items[idx].item_type));
    }
    if let Some(item) = state.items_at(pos).last() {
        return Some(GlyphKey::Item(*item));
    }
    state.tile_at(pos).map(GlyphKey::Tile)
}

/// Draws the grid one text row per tile row.
pub fn render_ascii(state: &GameState, sheet: &GlyphSheet) -> String {
    let grid = &state.tiles;
    let mut out = String::with_capacity(((grid.width + 1) * grid.height.max(0)) as usize);
    let mut missing = HashSet::new();

    for y in 0..grid.height {
        for x in 0..grid.width {
            let glyph = glyph_key_at(state, Position::new(x, y)).and_then(|key| {
                let glyph = sheet.get(key);
                if glyph.is_none() && missing.insert(key) {
                    warn!("no glyph for {key:?}, drawing blank");
                }
                glyph
            });
            out.push(glyph.unwrap_or(' '));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_pack::tests::open_level;
    use crate::types::{Facing, Item, Monster};

    fn sample_state() -> GameState {
        let mut level = open_level(4, 2);
        level.tiles.set(Position::new(3, 0), Tile::Wall);
        level.tiles.set(Position::new(0, 1), Tile::Water);
        level.items = vec![
            Item {
                position: Position::new(1, 0),
                item_type: ItemType::Chip,
            },
            Item {
                position: Position::new(2, 1),
                item_type: ItemType::DirtBlock,
            },
        ];
        level.monsters = vec![Monster {
            position: Position::new(3, 1),
            facing: Facing::West,
            monster_type: MonsterType::Bug,
        }];
        GameState::from_level(&level, None)
    }

    #[test]
    fn draws_layers_top_down() {
        let state = sample_state();
        assert_eq!(render_ascii(&state, &GlyphSheet::default()), "@*.#\n~.Ou\n");
    }

    #[test]
    fn missing_glyphs_are_drawn_blank() {
        let state = sample_state();
        let mut sheet = GlyphSheet::default();
        sheet.remove(GlyphKey::Tile(Tile::Floor));
        sheet.remove(GlyphKey::Monster(MonsterType::Bug));
        assert_eq!(render_ascii(&state, &sheet), "@* #\n~ O \n");
    }

    #[test]
    fn empty_sheet_still_renders_the_grid_shape() {
        let state = sample_state();
        let frame = render_ascii(&state, &GlyphSheet::empty());
        assert_eq!(frame, "    \n    \n");
    }

    #[test]
    fn default_sheet_has_player_item_and_tile_glyphs() {
        let sheet = GlyphSheet::default();
        assert_eq!(sheet.get(GlyphKey::Tile(Tile::TankButton)), Some('+'));
        assert_eq!(sheet.get(GlyphKey::Item(ItemType::SuctionBoots)), Some('s'));
        assert_eq!(sheet.get(GlyphKey::Player), Some('@'));
    }
}
