//! Decoder for the record-oriented level pack format.
//!
//! A pack is a magic number, a level count, then one record per level:
//! header words, two run-length encoded tile layers scanned row by row
//! across a fixed 32-cell width, and a block of typed optional records.

use std::path::Path;

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::constants::{
    CLONER_ENTRY_LEN, LEVEL_HEIGHT, LEVEL_PACK_MAGIC, LEVEL_WIDTH, MOVEMENT_ENTRY_LEN,
    PASSWORD_XOR, RLE_MARKER, TRAP_ENTRY_LEN,
};
use crate::types::{ClonerLink, Item, Monster, Position, Tile, TrapLink};
use crate::world::TileGrid;

pub mod codes;
mod reader;

use self::codes::{classify, FieldCode};
use self::reader::{decode_string, ByteReader};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read level pack: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected end of data at offset {offset} (wanted {wanted} bytes)")]
    UnexpectedEof { offset: usize, wanted: usize },
    #[error("level {level}: unrecognized object code 0x{code:02x} at ({x},{y})")]
    UnrecognizedCode { level: u16, code: u8, x: i32, y: i32 },
    #[error("level {level}: layer writes past the grid at ({x},{y})")]
    CellOutOfRange { level: u16, x: i32, y: i32 },
    #[error("level {level}: optional record {record} has malformed length {length}")]
    MalformedRecord { level: u16, record: u8, length: usize },
    #[error("level {level}: missing {field}")]
    MissingField { level: u16, field: &'static str },
}

#[derive(Clone, Debug, Serialize)]
pub struct LevelData {
    #[serde(rename = "levelNumber")]
    pub level_number: u16,
    pub time: u16,
    pub chips: u16,
    pub width: i32,
    pub height: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub password: String,
    pub tiles: TileGrid,
    pub items: Vec<Item>,
    pub monsters: Vec<Monster>,
    pub start: Position,
    pub traps: Vec<TrapLink>,
    pub cloners: Vec<ClonerLink>,
    #[serde(rename = "initialMovement")]
    pub initial_movement: Vec<Position>,
}

pub fn read_level_pack(path: &Path) -> Result<Vec<LevelData>, DecodeError> {
    let bytes = std::fs::read(path)?;
    decode_level_pack(&bytes)
}

/// Decodes every level in the pack. Any level error aborts the whole load.
pub fn decode_level_pack(bytes: &[u8]) -> Result<Vec<LevelData>, DecodeError> {
    let mut reader = ByteReader::new(bytes);

    let magic = reader.read_long()?;
    if magic != LEVEL_PACK_MAGIC {
        warn!(
            "magic number validation failed - got {magic:#x} instead of expected {LEVEL_PACK_MAGIC:#x}"
        );
    }

    let count = reader.read_word()?;
    debug!("{count} levels found");

    let mut levels = Vec::with_capacity(count as usize);
    for _ in 0..count {
        levels.push(decode_level(&mut reader)?);
    }
    Ok(levels)
}

fn decode_level(reader: &mut ByteReader<'_>) -> Result<LevelData, DecodeError> {
    let size = reader.read_word()? as usize;
    let body_start = reader.offset();
    let level_number = reader.read_word()?;
    let time = reader.read_word()?;
    let chips = reader.read_word()?;
    // reserved
    reader.read_word()?;
    debug!("reading level {level_number} ({size} bytes, time {time}, chips {chips})");

    let mut draft = LevelDraft::new(level_number, time, chips);
    draft.read_layer(reader)?;
    draft.read_layer(reader)?;

    let optional_len = reader.read_word()? as usize;
    let optional_end = reader.offset() + optional_len;
    while reader.offset() < optional_end {
        draft.read_optional(reader)?;
    }

    let consumed = reader.offset() - body_start;
    if consumed != size {
        warn!("level {level_number}: declared size {size} but consumed {consumed} bytes");
    }

    draft.finish()
}

struct LevelDraft {
    level_number: u16,
    time: u16,
    chips: u16,
    title: Option<String>,
    hint: Option<String>,
    password: Option<String>,
    cells: Vec<Option<Tile>>,
    items: Vec<Item>,
    monsters: Vec<Monster>,
    start: Option<Position>,
    traps: Vec<TrapLink>,
    cloners: Vec<ClonerLink>,
    initial_movement: Vec<Position>,
}

impl LevelDraft {
    fn new(level_number: u16, time: u16, chips: u16) -> Self {
        Self {
            level_number,
            time,
            chips,
            title: None,
            hint: None,
            password: None,
            cells: vec![None; (LEVEL_WIDTH * LEVEL_HEIGHT) as usize],
            items: Vec::new(),
            monsters: Vec::new(),
            start: None,
            traps: Vec::new(),
            cloners: Vec::new(),
            initial_movement: Vec::new(),
        }
    }

    fn read_layer(&mut self, reader: &mut ByteReader<'_>) -> Result<(), DecodeError> {
        let size = reader.read_word()? as usize;
        let end = reader.offset() + size;
        let mut cursor = 0usize;

        while reader.offset() < end {
            let mut code = reader.read_byte()?;
            let mut run = 1usize;
            if code == RLE_MARKER {
                run = reader.read_byte()? as usize;
                code = reader.read_byte()?;
            }
            for _ in 0..run {
                self.place(cursor, code)?;
                cursor += 1;
            }
        }
        Ok(())
    }

    fn place(&mut self, cursor: usize, code: u8) -> Result<(), DecodeError> {
        let pos = Position::new(
            cursor as i32 % LEVEL_WIDTH,
            cursor as i32 / LEVEL_WIDTH,
        );
        if pos.y >= LEVEL_HEIGHT {
            return Err(DecodeError::CellOutOfRange {
                level: self.level_number,
                x: pos.x,
                y: pos.y,
            });
        }

        let tile = match classify(code) {
            Some(FieldCode::Start) => {
                self.start = Some(pos);
                Tile::Floor
            }
            Some(FieldCode::Item(item_type)) => {
                self.items.push(Item {
                    position: pos,
                    item_type,
                });
                Tile::Floor
            }
            Some(FieldCode::Monster(monster_type, facing)) => {
                self.monsters.push(Monster {
                    position: pos,
                    facing,
                    monster_type,
                });
                Tile::Floor
            }
            Some(FieldCode::Tile(tile)) => tile,
            None => {
                return Err(DecodeError::UnrecognizedCode {
                    level: self.level_number,
                    code,
                    x: pos.x,
                    y: pos.y,
                })
            }
        };

        let slot = &mut self.cells[cursor];
        match *slot {
            None => *slot = Some(tile),
            Some(_) if tile == Tile::Floor => {}
            Some(existing) => {
                if existing != Tile::Floor && existing != tile {
                    warn!(
                        "level {}: position ({},{}) has 2 different tiles specified - {:?} and {:?}. {:?} will be used",
                        self.level_number, pos.x, pos.y, existing, tile, tile
                    );
                }
                *slot = Some(tile);
            }
        }
        Ok(())
    }

    fn read_optional(&mut self, reader: &mut ByteReader<'_>) -> Result<(), DecodeError> {
        let record = reader.read_byte()?;
        let length = reader.read_byte()? as usize;
        let payload = reader.take(length)?;

        match record {
            // duplicate time / chip fields and an unused slot
            1 | 2 | 9 => {}
            3 => {
                let title = decode_string(payload, None);
                debug!("level {} title {:?}", self.level_number, title);
                self.title = Some(title);
            }
            4 => {
                let entries = self.entries(record, payload, TRAP_ENTRY_LEN)?;
                self.traps = entries
                    .map(|entry| TrapLink {
                        button: Position::new(entry[0].into(), entry[1].into()),
                        trap: Position::new(entry[2].into(), entry[3].into()),
                    })
                    .collect();
                debug!("level {} has {} trap links", self.level_number, self.traps.len());
            }
            5 => {
                let entries = self.entries(record, payload, CLONER_ENTRY_LEN)?;
                self.cloners = entries
                    .map(|entry| ClonerLink {
                        button: Position::new(entry[0].into(), entry[1].into()),
                        machine: Position::new(entry[2].into(), entry[3].into()),
                    })
                    .collect();
                debug!(
                    "level {} has {} cloning links",
                    self.level_number,
                    self.cloners.len()
                );
            }
            6 => {
                self.password = Some(decode_string(payload, Some(PASSWORD_XOR)));
            }
            7 => {
                self.hint = Some(decode_string(payload, None));
            }
            8 => {
                self.password = Some(decode_string(payload, None));
            }
            10 => {
                let entries = self.entries(record, payload, MOVEMENT_ENTRY_LEN)?;
                self.initial_movement = entries
                    .map(|entry| Position::new(entry[0].into(), entry[1].into()))
                    .collect();
            }
            other => {
                debug!(
                    "level {}: skipping unknown optional record {other} ({length} bytes)",
                    self.level_number
                );
            }
        }
        Ok(())
    }

    fn entries<'p>(
        &self,
        record: u8,
        payload: &'p [u8],
        entry_len: usize,
    ) -> Result<std::slice::ChunksExact<'p, u8>, DecodeError> {
        if payload.len() % entry_len != 0 {
            return Err(DecodeError::MalformedRecord {
                level: self.level_number,
                record,
                length: payload.len(),
            });
        }
        Ok(payload.chunks_exact(entry_len))
    }

    fn finish(self) -> Result<LevelData, DecodeError> {
        let level = self.level_number;
        let missing = |field: &'static str| DecodeError::MissingField { level, field };

        let cells: Option<Vec<Tile>> = self.cells.into_iter().collect();
        let tiles = cells
            .and_then(|cells| TileGrid::from_cells(LEVEL_WIDTH, LEVEL_HEIGHT, cells))
            .ok_or_else(|| missing("tiles"))?;
        let title = self.title.ok_or_else(|| missing("title"))?;
        let password = self.password.ok_or_else(|| missing("password"))?;
        let start = self.start.ok_or_else(|| missing("start"))?;

        Ok(LevelData {
            level_number: self.level_number,
            time: self.time,
            chips: self.chips,
            width: LEVEL_WIDTH,
            height: LEVEL_HEIGHT,
            title,
            hint: self.hint,
            password,
            tiles,
            items: self.items,
            monsters: self.monsters,
            start,
            traps: self.traps,
            cloners: self.cloners,
            initial_movement: self.initial_movement,
        })
    }
}
