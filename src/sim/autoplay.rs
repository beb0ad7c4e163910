//! Idle/demo mode bot
//!
//! Greedy one-ply search: preview every direction on a copy of the board and
//! keep the one with the best immediate payoff.

use super::board::Board;
use super::direction::Direction;

/// Tie-break order, favouring the bottom-left corner
const PREFERENCE: [Direction; 4] = [
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::Up,
];

/// Worth of one empty cell relative to one point of merge score
const EMPTY_CELL_WEIGHT: u64 = 16;
/// Bonus for keeping the largest tile in the bottom-left corner
const CORNER_BONUS: u64 = 64;

/// Pick the best legal move, or None if nothing can move
pub fn choose_move(board: &Board) -> Option<Direction> {
    let mut best: Option<(Direction, u64)> = None;

    for direction in PREFERENCE {
        let Some(value) = evaluate(board, direction) else {
            continue;
        };
        if best.is_none_or(|(_, best_value)| value > best_value) {
            best = Some((direction, value));
        }
    }

    best.map(|(direction, _)| direction)
}

/// Heuristic value of the board after `direction`, None if the move is illegal
pub fn evaluate(board: &Board, direction: Direction) -> Option<u64> {
    let mut preview = board.clone();
    let outcome = preview.play(direction);
    if !outcome.moved {
        return None;
    }

    let empty = preview.empty_cells().len() as u64;
    let corner = match (preview.max_value(), preview.size().checked_sub(1)) {
        (Some(max), Some(last)) => preview
            .get(last, 0)
            .ok()
            .flatten()
            .is_some_and(|tile| tile.value() == max),
        _ => false,
    };

    Some(
        outcome.score_delta
            + empty * EMPTY_CELL_WEIGHT
            + if corner { CORNER_BONUS } else { 0 },
    )
}
