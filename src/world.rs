use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::TIME_UNIT_MS;
use crate::level_pack::LevelData;
use crate::types::{DynamicItem, Facing, ItemType, Monster, Player, Position, RunningState, Tile};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TileGrid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Tile>,
}

impl TileGrid {
    pub fn filled(width: i32, height: i32, tile: Tile) -> Self {
        Self {
            width,
            height,
            cells: vec![tile; (width.max(0) * height.max(0)) as usize],
        }
    }

    pub fn from_cells(width: i32, height: i32, cells: Vec<Tile>) -> Option<Self> {
        if cells.len() != (width.max(0) * height.max(0)) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn get(&self, pos: Position) -> Option<Tile> {
        self.index_of(pos).and_then(|idx| self.cells.get(idx).copied())
    }

    pub fn set(&mut self, pos: Position, tile: Tile) -> bool {
        match self.index_of(pos) {
            Some(idx) => {
                self.cells[idx] = tile;
                true
            }
            None => false,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.cells.iter_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, tile)| (Position::new(idx as i32 % width, idx as i32 / width), *tile))
    }
}

/// Everything the engine mutates while a level is being played.
#[derive(Clone, Debug)]
pub struct GameState {
    pub tiles: TileGrid,
    pub static_items: Vec<Vec<ItemType>>,
    pub dynamic_items: Vec<DynamicItem>,
    pub monsters: Vec<Monster>,
    pub player: Player,
    pub inventory: BTreeMap<ItemType, u32>,
    pub chips_remaining: u32,
    pub time_remaining_ms: u64,
    pub time_limited: bool,
    pub running_state: RunningState,
    pub ice_sliding: bool,
    pub level_hint: Option<String>,
    pub show_hint: bool,
}

impl GameState {
    pub fn from_level(level: &LevelData, time_limit_ms_override: Option<u64>) -> Self {
        let tiles = level.tiles.clone();
        let cell_count = (tiles.width.max(0) * tiles.height.max(0)) as usize;
        let mut static_items = vec![Vec::new(); cell_count];
        let mut dynamic_items = Vec::new();

        for item in &level.items {
            if item.item_type.is_dynamic() {
                dynamic_items.push(DynamicItem {
                    position: item.position,
                    facing: Facing::South,
                    item_type: item.item_type,
                });
                continue;
            }
            if let Some(idx) = tiles.index_of(item.position) {
                static_items[idx].push(item.item_type);
            }
        }

        let (time_remaining_ms, time_limited) = match time_limit_ms_override {
            Some(limit) => (limit, true),
            None => (
                u64::from(level.time) * TIME_UNIT_MS,
                level.time > 0,
            ),
        };

        Self {
            tiles,
            static_items,
            dynamic_items,
            monsters: level.monsters.clone(),
            player: Player {
                position: level.start,
                facing: Facing::South,
            },
            inventory: BTreeMap::new(),
            chips_remaining: u32::from(level.chips),
            time_remaining_ms,
            time_limited,
            running_state: RunningState::Starting,
            ice_sliding: false,
            level_hint: level.hint.clone(),
            show_hint: false,
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.tiles.in_bounds(pos)
    }

    pub fn tile_at(&self, pos: Position) -> Option<Tile> {
        self.tiles.get(pos)
    }

    pub fn items_at(&self, pos: Position) -> &[ItemType] {
        self.tiles
            .index_of(pos)
            .and_then(|idx| self.static_items.get(idx))
            .map(|items| items.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_item(&self, item_type: ItemType) -> bool {
        self.inventory.get(&item_type).copied().unwrap_or(0) > 0
    }

    pub fn block_index_at(&self, pos: Position) -> Option<usize> {
        self.dynamic_items
            .iter()
            .position(|item| item.position == pos)
    }

    pub fn has_monster_at(&self, pos: Position) -> bool {
        self.monsters.iter().any(|monster| monster.position == pos)
    }
}
