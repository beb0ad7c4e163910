//! Tile entity and its animation state machine
//!
//! A tile's grid coordinates are authoritative. Its pixel position only trails
//! behind them for rendering, one fixed step per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Stable tile identity, used to name merge parents without owning them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// Animation phase of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TilePhase {
    /// Growing in after a spawn or merge (and popping, for merges)
    Spawning,
    /// Full size
    Settled,
}

/// A numbered tile
#[derive(Debug, Clone)]
pub struct Tile {
    id: TileId,
    row: usize,
    col: usize,
    value: u32,
    /// Interpolated top-left corner in pixels
    pixel: Vec2,
    /// Pixel corner of (row, col), recomputed every tick
    target: Vec2,
    moving: bool,
    is_new: bool,
    scale: f32,
    /// Ticks spent in the spawn animation
    frame: u32,
    /// The two tiles consumed to create this one during the current move
    merged_from: Option<[TileId; 2]>,
}

impl Tile {
    /// A freshly spawned tile, invisible until its grow phase starts
    pub(crate) fn spawned(id: TileId, row: usize, col: usize, value: u32, tuning: &Tuning) -> Self {
        let pos = tuning.cell_position(row, col);
        Self {
            id,
            row,
            col,
            value,
            pixel: pos,
            target: pos,
            moving: false,
            is_new: true,
            scale: 0.0,
            frame: 0,
            merged_from: None,
        }
    }

    /// A tile that skips the spawn animation (restored boards)
    pub(crate) fn settled(id: TileId, row: usize, col: usize, value: u32, tuning: &Tuning) -> Self {
        let mut tile = Self::spawned(id, row, col, value, tuning);
        tile.is_new = false;
        tile.scale = 1.0;
        tile
    }

    /// Result of merging two equal parents into the cell at (row, col)
    pub(crate) fn merged(
        id: TileId,
        row: usize,
        col: usize,
        value: u32,
        parents: [TileId; 2],
        tuning: &Tuning,
    ) -> Self {
        let mut tile = Self::spawned(id, row, col, value, tuning);
        tile.merged_from = Some(parents);
        tile
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Logical (row, col)
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn pixel_position(&self) -> Vec2 {
        self.pixel
    }

    pub fn target_pixel_position(&self) -> Vec2 {
        self.target
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn merged_from(&self) -> Option<[TileId; 2]> {
        self.merged_from
    }

    pub fn phase(&self) -> TilePhase {
        if self.is_new {
            TilePhase::Spawning
        } else {
            TilePhase::Settled
        }
    }

    /// Move the logical position; the pixel position catches up over later ticks
    pub(crate) fn relocate(&mut self, row: usize, col: usize, tuning: &Tuning) {
        self.row = row;
        self.col = col;
        self.target = tuning.cell_position(row, col);
        self.moving = self.pixel != self.target;
    }

    pub(crate) fn clear_provenance(&mut self) {
        self.merged_from = None;
    }

    /// Advance one animation tick
    pub(crate) fn update(&mut self, tuning: &Tuning) {
        self.target = tuning.cell_position(self.row, self.col);
        if self.pixel != self.target {
            self.move_animation(tuning.step());
        }
        self.moving = self.pixel != self.target;

        if self.is_new {
            self.scale_animation(tuning);
        }
    }

    fn move_animation(&mut self, step: f32) {
        self.pixel.x = approach(self.pixel.x, self.target.x, step);
        self.pixel.y = approach(self.pixel.y, self.target.y, step);
    }

    fn scale_animation(&mut self, tuning: &Tuning) {
        let grow = tuning.grow_frames.max(1);
        let pop = tuning.pop_frames;

        if self.frame < grow {
            self.scale = 0.8 * (self.frame + 1) as f32 / grow as f32;
        } else if self.frame < grow + pop && self.merged_from.is_some() {
            // Overshoot then shrink back to full size
            let k = (self.frame - grow + 1) as f32;
            self.scale = (1.2 - 0.3 * k / pop as f32).max(1.0);
        } else {
            self.scale = 1.0;
            self.is_new = false;
        }

        self.frame += 1;
    }

    /// Render-facing copy of this tile
    pub fn view(&self, fading: bool) -> TileView {
        TileView {
            id: self.id,
            value: self.value,
            row: self.row,
            col: self.col,
            x: self.pixel.x,
            y: self.pixel.y,
            scale: self.scale,
            fading,
        }
    }
}

/// Step `current` toward `target` by at most `step`, landing exactly on it
#[inline]
fn approach(current: f32, target: f32, step: f32) -> f32 {
    let distance = target - current;
    if distance.abs() <= step {
        target
    } else {
        current + step.copysign(distance)
    }
}

/// Everything a renderer needs to draw one tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    pub id: TileId,
    pub value: u32,
    pub row: usize,
    pub col: usize,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// A merge parent sliding under its replacement
    pub fading: bool,
}
