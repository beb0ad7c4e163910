//! Game session state
//!
//! Wraps the board with everything a driver loop needs between ticks: the
//! seeded RNG, score, phase and the post-move spawn bookkeeping.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, BoardSnapshot};
use super::direction::Direction;
use super::error::BoardError;
use crate::consts::{BOARD_SIZE, WINNING_VALUE};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Board settled, next move accepted
    Ready,
    /// Tiles sliding or popping in, or a spawn is still pending
    Animating,
    /// Board full with no merges left
    GameOver,
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Moved { direction: Direction, score_delta: u64 },
    Spawned { row: usize, col: usize, value: u32 },
    /// First tile reaching the winning value (play continues)
    Won { value: u32 },
    GameOver { score: u64 },
    Restarted { seed: u64 },
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    rng: Pcg32,
    board: Board,
    pub score: u64,
    /// Accepted moves this run
    pub moves: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// A move landed and its tile has not spawned yet
    pub pending_spawn: bool,
    /// Values before the last accepted move (display only)
    pub previous_board: Option<BoardSnapshot>,
    /// Winning value reached at some point this run
    pub won: bool,
}

impl GameState {
    /// Standard 4x4 game
    pub fn new(seed: u64) -> Result<Self, BoardError> {
        Self::with_tuning(seed, BOARD_SIZE, Tuning::default())
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, BoardError> {
        Self::with_tuning(settings.seed(), settings.board_size, settings.tuning())
    }

    pub fn with_tuning(seed: u64, size: usize, tuning: Tuning) -> Result<Self, BoardError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let board = Board::with_starting_tiles(size, tuning, &mut rng)?;
        log::info!("New {}x{} game with seed {}", size, size, seed);

        Ok(Self {
            seed,
            rng,
            board,
            score: 0,
            moves: 0,
            time_ticks: 0,
            phase: GamePhase::Animating,
            pending_spawn: false,
            previous_board: None,
            won: false,
        })
    }

    /// Resume from saved values with a fresh RNG
    pub fn from_snapshot(
        seed: u64,
        snapshot: &BoardSnapshot,
        tuning: Tuning,
        score: u64,
    ) -> Result<Self, BoardError> {
        let board = Board::from_snapshot(snapshot, tuning)?;
        let won = board.max_value().is_some_and(|v| v >= WINNING_VALUE);
        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            board,
            score,
            moves: 0,
            time_ticks: 0,
            phase: GamePhase::Animating,
            pending_spawn: false,
            previous_board: None,
            won,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Start a new run on a same-sized board, seeded from the current RNG
    pub fn restart(&mut self) -> Result<(), BoardError> {
        let seed = self.rng.random::<u64>();
        let size = self.board.size();
        let tuning = *self.board.tuning();
        *self = Self::with_tuning(seed, size, tuning)?;
        log::info!("Game restarted with seed {}", seed);
        Ok(())
    }

    pub fn best_tile(&self) -> Option<u32> {
        self.board.max_value()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn accepts_input(&self) -> bool {
        self.phase == GamePhase::Ready
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn spawn_tile(&mut self) -> Result<(usize, usize), BoardError> {
        self.board.generate_tile(&mut self.rng)
    }
}
