//! Data-driven animation and spawn parameters
//!
//! Pixel geometry only feeds the animation interpolation. Logical positions are
//! always grid coordinates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::cell_origin;
use crate::consts::*;

/// Animation and spawn tuning shared by the board and every tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Tile edge length in pixels
    pub tile_size: f32,
    /// Gap between tiles in pixels
    pub gap_size: f32,
    /// Slide speed in pixels per tick, per axis
    pub move_speed: f32,
    /// Ticks for the spawn grow phase
    pub grow_frames: u32,
    /// Ticks for the merge pop phase
    pub pop_frames: u32,
    /// Chance of spawning a 4 (0.0 - 1.0)
    pub four_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            gap_size: GAP_SIZE,
            move_speed: MOVE_SPEED,
            grow_frames: GROW_FRAMES,
            pop_frames: POP_FRAMES,
            four_chance: FOUR_CHANCE,
        }
    }
}

impl Tuning {
    /// Pixel target for a logical cell
    #[inline]
    pub fn cell_position(&self, row: usize, col: usize) -> Vec2 {
        cell_origin(row, col, self.tile_size, self.gap_size)
    }

    /// Spawn probability clamped to a valid range
    pub fn four_probability(&self) -> f64 {
        if self.four_chance.is_nan() {
            return FOUR_CHANCE;
        }
        self.four_chance.clamp(0.0, 1.0)
    }

    /// Per-tick step, never zero so slides always terminate
    pub fn step(&self) -> f32 {
        if self.move_speed.is_finite() && self.move_speed > 0.0 {
            self.move_speed
        } else if self.move_speed == f32::INFINITY {
            f32::MAX
        } else {
            MOVE_SPEED
        }
    }

    /// Total ticks a merge result spends in its pop-in
    pub fn merge_animation_ticks(&self) -> u32 {
        self.grow_frames + self.pop_frames + 1
    }
}
