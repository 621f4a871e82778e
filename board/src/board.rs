//! The board model: a 15×15 grid of intersections, each empty or holding a
//! black or white stone.
//!
//! The board deliberately knows nothing about patterns, threats or scores.
//! It validates placements, keeps per-colour stone counts, and renders and
//! parses positions. Everything else lives in the rules and evaluation
//! layers.

use crate::square::{Square, BOARD_SIZE};
use crate::stone::Stone;
use anyhow::anyhow;
use colored::Colorize;
use itertools::Itertools;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// All 225 intersections, row-major. `None` is an empty intersection.
    cells: [Option<Stone>; Square::COUNT],

    /// Per-colour stone counts, kept in sync by `place`/`remove`.
    counts: [u16; Stone::COUNT],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            cells: [None; Square::COUNT],
            counts: [0; Stone::COUNT],
        }
    }

    /// Get the stone at a square, if any.
    #[inline(always)]
    pub fn get(&self, sq: Square) -> Option<Stone> {
        self.cells[sq.idx()]
    }

    /// Check whether a square is empty.
    #[inline(always)]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.cells[sq.idx()].is_none()
    }

    /// Place a stone on an empty square.
    ///
    /// The square must be empty; stacking stones would silently corrupt the
    /// colour counts.
    #[inline(always)]
    pub fn place(&mut self, sq: Square, stone: Stone) {
        debug_assert!(self.is_empty(sq), "tried to stack a stone on {sq}");

        self.cells[sq.idx()] = Some(stone);
        self.counts[stone.idx()] += 1;
    }

    /// Remove the stone from a square, returning it.
    #[inline(always)]
    pub fn remove(&mut self, sq: Square) -> Option<Stone> {
        let stone = self.cells[sq.idx()].take();

        if let Some(stone) = stone {
            self.counts[stone.idx()] -= 1;
        }

        stone
    }

    /// The number of stones of one colour on the board.
    pub fn count(&self, stone: Stone) -> usize {
        self.counts[stone.idx()] as usize
    }

    /// The total number of stones on the board.
    pub fn total_stones(&self) -> usize {
        (self.counts[0] + self.counts[1]) as usize
    }

    /// Whether the board holds no stones at all.
    pub fn is_blank(&self) -> bool {
        self.total_stones() == 0
    }

    /// Iterate over all occupied squares with their stones.
    pub fn stones(&self) -> impl Iterator<Item = (Square, Stone)> + '_ {
        Square::all().filter_map(|sq| self.get(sq).map(|stone| (sq, stone)))
    }

    /// Check whether any stone sits within Chebyshev distance `dist` of the
    /// square (the square itself not included).
    pub fn has_neighbor(&self, sq: Square, dist: i32) -> bool {
        (-dist..=dist)
            .cartesian_product(-dist..=dist)
            .filter(|&(dr, dc)| dr != 0 || dc != 0)
            .filter_map(|(dr, dc)| sq.shift(dr, dc))
            .any(|other| !self.is_empty(other))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Rendering and parsing
//
// Positions travel as 15-line diagrams: `.` for an empty intersection, `x`
// for black, `o` for white, columns optionally separated by spaces. The
// rendered form adds renju coordinates around the grid.
//
////////////////////////////////////////////////////////////////////////////////

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", "   A B C D E F G H I J K L M N O\n".bright_blue())?;

        for row in 0..BOARD_SIZE {
            let label = format!("{:>2}", BOARD_SIZE - row);
            write!(f, "{} ", label.bright_blue())?;

            for col in 0..BOARD_SIZE {
                match self.get(Square::new(row, col)) {
                    Some(Stone::Black) => write!(f, "{} ", "x".bold())?,
                    Some(Stone::White) => write!(f, "{} ", "o".bright_white())?,
                    None => write!(f, "{} ", ".".bright_black())?,
                }
            }

            write!(f, "{}\n", label.bright_blue())?;
        }

        write!(f, "{}", "   A B C D E F G H I J K L M N O\n".bright_blue())?;

        Ok(())
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let mut board = Board::new();
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if rows.len() != BOARD_SIZE {
            Err(anyhow!(
                "Expected {BOARD_SIZE} rows in board diagram, got {}",
                rows.len()
            ))?;
        }

        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<char> =
                line.chars().filter(|c| !c.is_whitespace()).collect();

            if cells.len() != BOARD_SIZE {
                Err(anyhow!(
                    "Expected {BOARD_SIZE} cells in row {}, got {}",
                    row + 1,
                    cells.len()
                ))?;
            }

            for (col, c) in cells.iter().enumerate() {
                let sq = Square::new(row, col);

                match c {
                    '.' | '_' => {}
                    'x' | 'X' => board.place(sq, Stone::Black),
                    'o' | 'O' => board.place(sq, Stone::White),
                    _ => Err(anyhow!("Invalid cell {c:?} in board diagram"))?,
                }
            }
        }

        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_and_remove_round_trip() {
        let mut board = Board::new();
        let sq = Square::CENTER;

        board.place(sq, Stone::Black);
        assert_eq!(board.get(sq), Some(Stone::Black));
        assert_eq!(board.count(Stone::Black), 1);

        assert_eq!(board.remove(sq), Some(Stone::Black));
        assert!(board.is_blank());
        assert_eq!(board, Board::new());
    }

    #[test]
    fn parse_diagram() {
        let board: Board = "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . x o . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        "
        .parse()
        .unwrap();

        assert_eq!(board.get(Square::new(7, 4)), Some(Stone::Black));
        assert_eq!(board.get(Square::new(7, 5)), Some(Stone::White));
        assert_eq!(board.total_stones(), 2);
    }

    #[test]
    fn parse_rejects_malformed_diagrams() {
        assert!("x o x".parse::<Board>().is_err());

        let bad_cell = ". ".repeat(14) + "q\n" + &(". ".repeat(15) + "\n").repeat(14);
        assert!(bad_cell.parse::<Board>().is_err());
    }

    #[test]
    fn neighbor_detection() {
        let mut board = Board::new();
        board.place(Square::CENTER, Stone::Black);

        assert!(board.has_neighbor(Square::new(5, 5), 2));
        assert!(!board.has_neighbor(Square::new(4, 4), 2));
        assert!(!board.has_neighbor(Square::CENTER, 2));
    }
}
