//! Move directions and edge-first traversal order

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::BoardError;

/// Direction of a player move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row delta, col delta) of one step of travel
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Every cell of a `size` x `size` grid, nearest the destination edge first.
    ///
    /// A tile is always visited before any tile that sits behind it along the
    /// axis of travel, so tiles never leapfrog and a fresh merge is never
    /// overtaken by a tile that started further back.
    pub fn traversal(self, size: usize) -> impl Iterator<Item = (usize, usize)> {
        let rows_reversed = self == Direction::Down;
        let cols_reversed = self == Direction::Right;
        (0..size).flat_map(move |r| {
            let row = if rows_reversed { size - 1 - r } else { r };
            (0..size).map(move |c| {
                let col = if cols_reversed { size - 1 - c } else { c };
                (row, col)
            })
        })
    }

    /// Neighbouring cell one step along this direction, if still on the grid
    pub fn step_from(self, row: usize, col: usize, size: usize) -> Option<(usize, usize)> {
        let (dr, dc) = self.delta();
        let next_row = row.checked_add_signed(dr)?;
        let next_col = col.checked_add_signed(dc)?;
        (next_row < size && next_col < size).then_some((next_row, next_col))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            _ => Err(BoardError::InvalidDirection(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = BoardError;

    /// 0=Up, 1=Down, 2=Left, 3=Right
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| BoardError::InvalidDirection(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_traversal_scans_columns_ascending() {
        let order: Vec<_> = Direction::Left.traversal(2).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_right_and_down_traversals_start_at_far_edge() {
        let right: Vec<_> = Direction::Right.traversal(3).take(3).collect();
        assert_eq!(right, vec![(0, 2), (0, 1), (0, 0)]);

        let down: Vec<_> = Direction::Down.traversal(3).take(3).collect();
        assert_eq!(down, vec![(2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_traversal_visits_every_cell_once() {
        for direction in Direction::ALL {
            let mut cells: Vec<_> = direction.traversal(4).collect();
            cells.sort();
            cells.dedup();
            assert_eq!(cells.len(), 16, "{direction}");
        }
    }

    #[test]
    fn test_step_from_stops_at_edges() {
        assert_eq!(Direction::Left.step_from(0, 0, 4), None);
        assert_eq!(Direction::Up.step_from(0, 3, 4), None);
        assert_eq!(Direction::Right.step_from(2, 3, 4), None);
        assert_eq!(Direction::Down.step_from(3, 1, 4), None);
        assert_eq!(Direction::Down.step_from(1, 1, 4), Some((2, 1)));
        assert_eq!(Direction::Left.step_from(1, 1, 4), Some((1, 0)));
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!("LEFT".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("d".parse::<Direction>().unwrap(), Direction::Down);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(BoardError::InvalidDirection(_))
        ));
        assert_eq!(Direction::try_from(3).unwrap(), Direction::Right);
        assert!(Direction::try_from(4).is_err());
    }
}
