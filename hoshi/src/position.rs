//! Most of the core logic concerning `Position`s lives in this module.
//!
//! A `Position` wraps a `Board` together with everything the search layer
//! needs to keep in lockstep with it: the line table mirror and the Zobrist
//! hash. The one way to advance a position is [`Position::play`], which
//! updates all three together — the search never mutates the board alone,
//! so the mirrors can't drift.
//!
//! Speculative helpers in the evaluation layer do place-and-undo on a bare
//! `&mut Board`; that is fine exactly because they never consult the line
//! table or hash of the scratch board.

use crate::zobrist::ZHash;
use board::board::Board;
use board::lines::LineTable;
use board::square::Square;
use board::stone::Stone;

/// A board, its line-table mirror, and its Zobrist hash, advanced as one.
#[derive(Debug, Clone)]
pub struct Position {
    /// The board associated with the position.
    pub board: Board,

    /// The 72-line bitboard mirror of the board.
    pub lines: LineTable,

    /// The Zobrist hash of board and side to move.
    pub hash: ZHash,

    /// The side to move.
    pub side: Stone,
}

impl Position {
    /// Create a new `Position` from a `Board`.
    pub fn new(board: Board, side: Stone) -> Self {
        let lines = LineTable::from_board(&board);
        let hash = ZHash::from_board(&board, side);

        Self {
            board,
            lines,
            hash,
            side,
        }
    }

    /// Play a stone for the side to move and return the resulting position.
    pub fn play(&self, sq: Square) -> Self {
        let mut next = self.clone();

        next.board.place(sq, self.side);
        next.lines.place(sq, self.side);
        next.hash.toggle_stone(self.side, sq);
        next.hash.toggle_side();
        next.side = !self.side;

        next
    }

    /// Pass the turn without placing a stone (null-move pruning).
    pub fn play_null(&self) -> Self {
        let mut next = self.clone();

        next.hash.toggle_side();
        next.side = !self.side;

        next
    }

    /// The number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.board.total_stones()
    }
}
