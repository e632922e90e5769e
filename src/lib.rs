pub mod campaign;
pub mod collision;
pub mod constants;
pub mod engine;
pub mod input;
pub mod level_pack;
pub mod monster_ai;
pub mod render;
pub mod types;
pub mod world;
