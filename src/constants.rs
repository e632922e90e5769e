pub const MOVE_TICK_MS: u64 = 200;
pub const SLIP_TICK_MS: u64 = 100;
pub const TIME_UNIT_MS: u64 = 1_000;

pub const LEVEL_WIDTH: i32 = 32;
pub const LEVEL_HEIGHT: i32 = 32;

pub const LEVEL_PACK_MAGIC: u32 = 0x0002_aaac;
pub const RLE_MARKER: u8 = 0xff;
pub const START_MARKER: u8 = 0x6e;
pub const PASSWORD_XOR: u8 = 0x99;

pub const TRAP_ENTRY_LEN: usize = 5;
pub const CLONER_ENTRY_LEN: usize = 4;
pub const MOVEMENT_ENTRY_LEN: usize = 2;
