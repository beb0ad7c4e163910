//! Deterministic board simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected, seeded RNG only
//! - Stable iteration order (edge-first traversal per direction)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod board;
pub mod direction;
pub mod error;
pub mod state;
pub mod tick;
pub mod tile;

pub use board::{Board, BoardSnapshot, MoveOutcome};
pub use direction::Direction;
pub use error::BoardError;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use tile::{Tile, TileId, TilePhase, TileView};
