//! Candidate move generation.
//!
//! Renju has no piece movement, so "move generation" means picking the empty
//! squares worth considering: anything further than two squares from every
//! stone can neither make nor break a shape and is skipped. On an empty
//! board the only move worth anything is the centre.
//!
//! For Black the generator filters out forbidden squares, with one
//! exception: a forbidden square that completes a five stays in, because the
//! five takes precedence over the forbidden shapes.

use crate::board::Board;
use crate::rules::{check_five, ForbiddenCache};
use crate::square::Square;
use crate::stone::Stone;
use arrayvec::ArrayVec;

/// Candidate moves for a position. Bounded by the number of intersections.
pub type MoveList = ArrayVec<Square, { Square::COUNT }>;

/// How far from the nearest stone a candidate square may sit.
const CANDIDATE_RANGE: i32 = 2;

/// Generate the candidate squares for the side to move.
///
/// `skip_forbidden_check` turns off the forbidden filter; callers that
/// filter later (or search White's moves) use it to save the verdict work.
pub fn generate_moves(
    board: &Board,
    stone: Stone,
    skip_forbidden_check: bool,
    cache: &mut ForbiddenCache,
) -> MoveList {
    let mut moves = MoveList::new();

    if board.is_blank() {
        moves.push(Square::CENTER);
        return moves;
    }

    for sq in Square::all() {
        if !board.is_empty(sq) || !board.has_neighbor(sq, CANDIDATE_RANGE) {
            continue;
        }

        if stone.is_black() && !skip_forbidden_check {
            // Forbidden squares are dead moves, unless they win outright.
            if cache.is_forbidden(board, sq) && !check_five(board, sq, stone) {
                continue;
            }
        }

        moves.push(sq);
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stone::Stone::*;

    #[test]
    fn empty_board_opens_in_the_center() {
        let board = Board::new();
        let mut cache = ForbiddenCache::new();

        let moves = generate_moves(&board, Black, false, &mut cache);
        assert_eq!(moves.as_slice(), &[Square::CENTER]);
    }

    #[test]
    fn single_stone_yields_its_neighborhood() {
        let mut board = Board::new();
        board.place(Square::CENTER, Black);
        let mut cache = ForbiddenCache::new();

        let moves = generate_moves(&board, White, false, &mut cache);

        // The full 5×5 neighbourhood minus the stone itself.
        assert_eq!(moves.len(), 24);
        assert!(moves.iter().all(|&sq| sq.max_dist(Square::CENTER) <= 2));
        assert!(!moves.contains(&Square::CENTER));
    }

    #[test]
    fn forbidden_squares_are_filtered_for_black() {
        // (7, 7) would be a double-three for black.
        let mut board = Board::new();
        for sq in [
            Square::new(7, 5),
            Square::new(7, 6),
            Square::new(5, 7),
            Square::new(6, 7),
        ] {
            board.place(sq, Black);
        }

        let mut cache = ForbiddenCache::new();
        let trap = Square::new(7, 7);

        let black_moves = generate_moves(&board, Black, false, &mut cache);
        assert!(!black_moves.contains(&trap));

        // White sees the square, and so does black when the filter is off.
        let white_moves = generate_moves(&board, White, false, &mut cache);
        assert!(white_moves.contains(&trap));

        let unfiltered = generate_moves(&board, Black, true, &mut cache);
        assert!(unfiltered.contains(&trap));
    }

    #[test]
    fn winning_five_survives_the_filter() {
        // A five-completing square that is also an overline elsewhere would
        // be exotic; the simpler property worth pinning down is that a
        // five-maker is always generated for black.
        let mut board = Board::new();
        for col in 3..7 {
            board.place(Square::new(7, col), Black);
        }
        for col in 3..6 {
            board.place(Square::new(8, col), White);
        }

        let mut cache = ForbiddenCache::new();
        let moves = generate_moves(&board, Black, false, &mut cache);

        assert!(moves.contains(&Square::new(7, 2)));
        assert!(moves.contains(&Square::new(7, 7)));
    }
}
