//! Squares are the basic unit of position in Hoshi.
//!
//! A square denotes a single intersection on the 15×15 renju board. Squares
//! are stored as a flat row-major index so they can double as array indices
//! throughout the engine.

use crate::direction::Direction;
use anyhow::anyhow;
use std::fmt::Display;
use std::str::FromStr;

/// The width of the board, in squares.
pub const BOARD_SIZE: usize = 15;

/// A board square
///
/// Often cast to a usize to index into arrays of different sorts.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub const COUNT: usize = BOARD_SIZE * BOARD_SIZE;

    /// The centre square (H8 in renju notation), the mandated first move on
    /// an empty board.
    pub const CENTER: Self = Self::new(7, 7);

    /// Create a square from a row and column, both in `0..15`.
    pub const fn new(row: usize, col: usize) -> Self {
        Self((row * BOARD_SIZE + col) as u8)
    }

    /// Create a square from signed coordinates, returning `None` when the
    /// coordinates fall outside the board.
    pub fn try_new(row: i32, col: i32) -> Option<Self> {
        let size = BOARD_SIZE as i32;

        if 0 <= row && row < size && 0 <= col && col < size {
            Some(Self::new(row as usize, col as usize))
        } else {
            None
        }
    }

    /// Get the row for the square as an index between 0 and 14.
    pub const fn row(self) -> usize {
        self.0 as usize / BOARD_SIZE
    }

    /// Get the column for the square as an index between 0 and 14.
    pub const fn col(self) -> usize {
        self.0 as usize % BOARD_SIZE
    }

    /// The flat row-major index of the square.
    pub const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all 225 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u8).map(Square)
    }

    /// Step `steps` squares along a direction, returning `None` when the
    /// result falls off the board.
    pub fn offset(self, dir: Direction, steps: i32) -> Option<Self> {
        let (dr, dc) = dir.delta();

        Self::try_new(
            self.row() as i32 + dr * steps,
            self.col() as i32 + dc * steps,
        )
    }

    /// Step by an explicit (row, column) delta.
    pub fn shift(self, dr: i32, dc: i32) -> Option<Self> {
        Self::try_new(self.row() as i32 + dr, self.col() as i32 + dc)
    }

    /// Get the Manhattan distance between two squares.
    pub fn distance(self, other: Self) -> usize {
        let dy = self.row().abs_diff(other.row());
        let dx = self.col().abs_diff(other.col());

        dx + dy
    }

    /// Return the L_inf (Chebyshev) distance (i.e., max(|dx|, |dy|))
    pub fn max_dist(self, other: Self) -> usize {
        usize::max(
            self.row().abs_diff(other.row()),
            self.col().abs_diff(other.col()),
        )
    }
}

impl From<Square> for usize {
    fn from(sq: Square) -> Self {
        sq.idx()
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Renju notation
//
// Columns are letters A..O left to right, rows are numbers 1..15 _bottom to
// top_, so the printed row number is 15 minus the internal row index. The
// centre square (7, 7) reads "H8".
//
////////////////////////////////////////////////////////////////////////////////

const COL_NAMES: [char; BOARD_SIZE] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O',
];

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", COL_NAMES[self.col()], BOARD_SIZE - self.row())
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        let mut chars = s.chars();

        let col_char = chars
            .next()
            .ok_or(anyhow!("Empty square string"))?
            .to_ascii_uppercase();

        let col = COL_NAMES
            .iter()
            .position(|&c| c == col_char)
            .ok_or(anyhow!("Invalid column in square {s:?}"))?;

        let number: usize = chars
            .as_str()
            .parse()
            .map_err(|_| anyhow!("Invalid row in square {s:?}"))?;

        if !(1..=BOARD_SIZE).contains(&number) {
            Err(anyhow!("Row out of range in square {s:?}"))?;
        }

        Ok(Square::new(BOARD_SIZE - number, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_col_round_trip() {
        for sq in Square::all() {
            assert_eq!(Square::new(sq.row(), sq.col()), sq);
        }
    }

    #[test]
    fn notation() {
        assert_eq!(Square::CENTER.to_string(), "H8");
        assert_eq!(Square::new(14, 0).to_string(), "A1");
        assert_eq!(Square::new(0, 14).to_string(), "O15");

        assert_eq!("H8".parse::<Square>().unwrap(), Square::CENTER);
        assert_eq!("a1".parse::<Square>().unwrap(), Square::new(14, 0));
        assert!("P3".parse::<Square>().is_err());
        assert!("A16".parse::<Square>().is_err());
    }

    #[test]
    fn chebyshev_distance() {
        let center = Square::CENTER;
        assert_eq!(center.max_dist(Square::new(5, 9)), 2);
        assert_eq!(center.max_dist(Square::new(7, 8)), 1);
        assert_eq!(center.max_dist(center), 0);
    }
}
