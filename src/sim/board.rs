//! The N x N grid: sliding, merging, spawning and the settle gate
//!
//! Occupancy is final as soon as `move_tiles` returns. Everything `update`
//! does afterwards is presentation, but the driver still waits for it
//! (`is_settled`) before spawning or accepting the next move.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::error::BoardError;
use super::tile::{Tile, TileId, TileView};
use crate::consts::{BOARD_SIZE, STARTING_TILES};
use crate::{can_double, is_tile_value};
use crate::tuning::Tuning;

/// Upper bound on `settle` so a broken tuning can never hang a driver
const MAX_SETTLE_TICKS: u32 = 10_000;

/// Result of one directional move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Any tile changed cell or merged
    pub moved: bool,
    /// Sum of the values of every tile created by a merge
    pub score_delta: u64,
}

/// Grid of tile values, row-major, `None` for empty cells.
///
/// The only board state worth persisting; animation is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot {
    pub cells: Vec<Vec<Option<u32>>>,
}

impl BoardSnapshot {
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// What a single walk step finds in the next cell
enum Step {
    Slide,
    Merge,
    Blocked,
}

/// The game grid
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    /// `cells[row][col]`
    cells: Vec<Vec<Option<Tile>>>,
    /// Merge parents still animating into their replacement's cell
    fading: Vec<Tile>,
    tuning: Tuning,
    next_id: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_SIZE, Tuning::default())
    }
}

impl Board {
    /// An empty board
    pub fn new(size: usize, tuning: Tuning) -> Self {
        Self {
            size,
            cells: vec![vec![None; size]; size],
            fading: Vec::new(),
            tuning,
            next_id: 1,
        }
    }

    /// A fresh game board holding the starting tiles
    pub fn with_starting_tiles<R: Rng + ?Sized>(
        size: usize,
        tuning: Tuning,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let mut board = Self::new(size, tuning);
        // Starting tiles pop in together, so they bypass the settle gate
        for _ in 0..STARTING_TILES.min(size * size) {
            board.place_random_tile(rng)?;
        }
        Ok(board)
    }

    /// Rebuild a settled board from a grid of values
    pub fn from_snapshot(snapshot: &BoardSnapshot, tuning: Tuning) -> Result<Self, BoardError> {
        let size = snapshot.size();
        if size == 0 {
            return Err(BoardError::InvalidSnapshot("empty grid".to_string()));
        }

        let mut board = Self::new(size, tuning);
        for (row, values) in snapshot.cells.iter().enumerate() {
            if values.len() != size {
                return Err(BoardError::InvalidSnapshot(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    values.len(),
                    size
                )));
            }
            for (col, value) in values.iter().enumerate() {
                let Some(value) = *value else {
                    continue;
                };
                if !is_tile_value(value) {
                    return Err(BoardError::InvalidSnapshot(format!(
                        "value {} at ({}, {}) is not a tile value",
                        value, row, col
                    )));
                }
                let id = board.next_tile_id();
                board.cells[row][col] = Some(Tile::settled(id, row, col, value, &board.tuning));
            }
        }
        Ok(board)
    }

    /// Shorthand for `from_snapshot` over a plain grid
    pub fn from_values(values: Vec<Vec<Option<u32>>>, tuning: Tuning) -> Result<Self, BoardError> {
        Self::from_snapshot(&BoardSnapshot { cells: values }, tuning)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Read-only view of the grid
    pub fn cells(&self) -> &[Vec<Option<Tile>>] {
        &self.cells
    }

    /// Tile at (row, col), if any
    pub fn get(&self, row: usize, col: usize) -> Result<Option<&Tile>, BoardError> {
        if !self.within_bounds(row, col) {
            return Err(BoardError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        Ok(self.cells[row][col].as_ref())
    }

    /// All live tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten().flatten()
    }

    /// Merge parents still sliding into (or sitting under) their merged tile
    pub fn fading(&self) -> &[Tile] {
        &self.fading
    }

    /// Draw list: fading parents first so merged tiles render on top
    pub fn tile_views(&self) -> Vec<TileView> {
        self.fading
            .iter()
            .map(|t| t.view(true))
            .chain(self.tiles().map(|t| t.view(false)))
            .collect()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            cells: self
                .cells
                .iter()
                .map(|row| row.iter().map(|cell| cell.as_ref().map(Tile::value)).collect())
                .collect(),
        }
    }

    pub fn max_value(&self) -> Option<u32> {
        self.tiles().map(Tile::value).max()
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        (0..self.size)
            .flat_map(|row| (0..self.size).map(move |col| (row, col)))
            .filter(|&(row, col)| self.cells[row][col].is_none())
            .collect()
    }

    fn next_tile_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        id
    }

    #[inline]
    fn within_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    // ------------------------------------------------------------------
    // Moves
    // ------------------------------------------------------------------

    /// Forget last move's merges so merged tiles may merge again
    pub fn prepare(&mut self) {
        for tile in self.cells.iter_mut().flatten().flatten() {
            tile.clear_provenance();
        }
        self.fading.clear();
    }

    /// `prepare` followed by `move_tiles`
    pub fn play(&mut self, direction: Direction) -> MoveOutcome {
        self.prepare();
        self.move_tiles(direction)
    }

    /// Slide every tile toward `direction`, merging equal neighbours once.
    ///
    /// Expects `prepare` to have run since the previous move; a tile that
    /// still carries provenance will not accept another merge.
    pub fn move_tiles(&mut self, direction: Direction) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();

        for (row, col) in direction.traversal(self.size) {
            if self.cells[row][col].is_none() {
                continue;
            }
            let (moved, score) = self.slide_tile(row, col, direction);
            outcome.moved |= moved;
            outcome.score_delta += score;
        }

        if outcome.moved {
            log::debug!("Moved {}: +{} points", direction, outcome.score_delta);
        }
        outcome
    }

    /// Walk one tile toward the edge. Returns (changed, merge score).
    fn slide_tile(&mut self, row: usize, col: usize, direction: Direction) -> (bool, u64) {
        let (mut r, mut c) = (row, col);
        let mut moved = false;

        while let Some((nr, nc)) = direction.step_from(r, c, self.size) {
            let Some(value) = self.cells[r][c].as_ref().map(Tile::value) else {
                break;
            };

            let step = match self.cells[nr][nc].as_ref() {
                None => Step::Slide,
                Some(next)
                    if next.value() == value && next.merged_from().is_none() && can_double(value) =>
                {
                    Step::Merge
                }
                Some(_) => Step::Blocked,
            };

            match step {
                Step::Slide => {
                    let Some(mut tile) = self.cells[r][c].take() else {
                        break;
                    };
                    tile.relocate(nr, nc, &self.tuning);
                    self.cells[nr][nc] = Some(tile);
                    (r, c) = (nr, nc);
                    moved = true;
                }
                Step::Merge => {
                    // The merged tile stays put for the rest of this move
                    return match self.merge_into((r, c), (nr, nc)) {
                        Some(score) => (true, u64::from(score)),
                        None => (moved, 0),
                    };
                }
                Step::Blocked => break,
            }
        }

        (moved, 0)
    }

    /// Replace the tiles at `from` and `to` with one doubled tile at `to`
    fn merge_into(&mut self, from: (usize, usize), to: (usize, usize)) -> Option<u32> {
        let value = self.cells[from.0][from.1]
            .as_ref()?
            .value()
            .checked_mul(2)?;
        let mut moving = self.cells[from.0][from.1].take()?;
        let Some(stationary) = self.cells[to.0][to.1].take() else {
            self.cells[from.0][from.1] = Some(moving);
            return None;
        };

        let id = self.next_tile_id();
        let merged = Tile::merged(
            id,
            to.0,
            to.1,
            value,
            [moving.id(), stationary.id()],
            &self.tuning,
        );
        log::trace!(
            "Merged {:?} + {:?} -> {:?} ({}) at {:?}",
            moving.id(),
            stationary.id(),
            id,
            value,
            to
        );

        // Parent slides into the merge cell underneath the new tile
        moving.relocate(to.0, to.1, &self.tuning);
        self.fading.push(moving);
        self.fading.push(stationary);
        self.cells[to.0][to.1] = Some(merged);

        Some(value)
    }

    // ------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------

    /// Advance every tile's animation by one tick
    pub fn update(&mut self) {
        let tuning = self.tuning;

        for tile in &mut self.fading {
            tile.update(&tuning);
        }
        let sliding: Vec<TileId> = self
            .fading
            .iter()
            .filter(|t| t.is_moving())
            .map(Tile::id)
            .collect();

        for tile in self.cells.iter_mut().flatten().flatten() {
            // A merged tile pops in only once both parents have arrived
            let held = tile
                .merged_from()
                .is_some_and(|parents| parents.iter().any(|p| sliding.contains(p)));
            if !held {
                tile.update(&tuning);
            }
        }

        if !self.fading.is_empty() {
            let popping: Vec<TileId> = self
                .tiles()
                .filter(|t| t.is_new())
                .filter_map(Tile::merged_from)
                .flatten()
                .collect();
            self.fading
                .retain(|t| t.is_moving() || popping.contains(&t.id()));
        }
    }

    /// Any tile (live or fading) still sliding
    pub fn is_moving(&self) -> bool {
        self.tiles().any(Tile::is_moving) || self.fading.iter().any(Tile::is_moving)
    }

    /// Any tile still in its spawn or merge pop-in
    pub fn is_new(&self) -> bool {
        self.tiles().any(Tile::is_new)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_moving() && !self.is_new()
    }

    /// Run `update` until the board settles. Returns the ticks taken.
    pub fn settle(&mut self) -> u32 {
        let mut ticks = 0;
        while !self.is_settled() && ticks < MAX_SETTLE_TICKS {
            self.update();
            ticks += 1;
        }
        ticks
    }

    // ------------------------------------------------------------------
    // Spawning and terminal detection
    // ------------------------------------------------------------------

    /// Spawn one tile (2 or 4) on a random empty cell.
    ///
    /// Only valid once the board has settled after a move.
    pub fn generate_tile<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(usize, usize), BoardError> {
        if !self.is_settled() {
            return Err(BoardError::Unsettled);
        }
        self.place_random_tile(rng)
    }

    fn place_random_tile<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(usize, usize), BoardError> {
        if !self.cells_available() {
            return Err(BoardError::NoEmptyCell);
        }

        loop {
            let row = rng.random_range(0..self.size);
            let col = rng.random_range(0..self.size);
            if self.cells[row][col].is_some() {
                continue;
            }

            let value = if rng.random_bool(self.tuning.four_probability()) {
                4
            } else {
                2
            };
            let id = self.next_tile_id();
            self.cells[row][col] = Some(Tile::spawned(id, row, col, value, &self.tuning));
            log::debug!("Spawned {} at ({}, {})", value, row, col);
            return Ok((row, col));
        }
    }

    /// Any empty cell
    pub fn cells_available(&self) -> bool {
        self.cells.iter().flatten().any(Option::is_none)
    }

    /// Any two orthogonally adjacent tiles with equal values
    pub fn can_merge(&self) -> bool {
        self.tiles().any(|tile| {
            // Checking right and down covers every adjacent pair once
            [Direction::Right, Direction::Down].into_iter().any(|dir| {
                dir.step_from(tile.row(), tile.col(), self.size)
                    .and_then(|(r, c)| self.cells[r][c].as_ref())
                    .is_some_and(|other| other.value() == tile.value() && can_double(tile.value()))
            })
        })
    }

    /// False only when the board is full and nothing can merge
    pub fn available_moves(&self) -> bool {
        self.cells_available() || self.can_merge()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for (col, cell) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                match cell {
                    Some(tile) => write!(f, "{:>5}", tile.value())?,
                    None => write!(f, "{:>5}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
