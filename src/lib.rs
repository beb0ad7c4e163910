//! Slide 2048 - board logic for a sliding tile merge puzzle
//!
//! Core modules:
//! - `sim`: Deterministic board simulation (moves, merges, spawns, tile animation)
//! - `settings`: Driver configuration loaded from JSON
//! - `tuning`: Data-driven animation and spawn parameters

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{AnimationPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default grid dimension (rows and columns)
    pub const BOARD_SIZE: usize = 4;
    /// Tiles placed on a fresh board
    pub const STARTING_TILES: usize = 2;
    /// Tile value that counts as a win (play continues past it)
    pub const WINNING_VALUE: u32 = 2048;
    /// Largest tile a `u32` can hold; tiles this big no longer merge
    pub const MAX_TILE_VALUE: u32 = 1 << 31;

    /// Tile edge length in pixels
    pub const TILE_SIZE: f32 = 150.0;
    /// Gap between tiles (and around the border) in pixels
    pub const GAP_SIZE: f32 = 15.0;
    /// Slide speed in pixels per tick, per axis
    pub const MOVE_SPEED: f32 = 50.0;

    /// Ticks spent growing a freshly spawned tile
    pub const GROW_FRAMES: u32 = 3;
    /// Ticks spent settling the pop of a merged tile
    pub const POP_FRAMES: u32 = 5;

    /// Chance that a spawned tile is a 4 instead of a 2
    pub const FOUR_CHANCE: f64 = 0.1;
}

/// Top-left pixel corner of a grid cell
#[inline]
pub fn cell_origin(row: usize, col: usize, tile_size: f32, gap: f32) -> Vec2 {
    let stride = tile_size + gap;
    Vec2::new(col as f32 * stride + gap, row as f32 * stride + gap)
}

/// True for 2, 4, 8, ... (the only values a tile may carry)
#[inline]
pub fn is_tile_value(value: u32) -> bool {
    value >= 2 && value.is_power_of_two()
}

/// True if two tiles of `value` may merge without leaving the value range
#[inline]
pub fn can_double(value: u32) -> bool {
    value < consts::MAX_TILE_VALUE
}
