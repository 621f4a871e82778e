//! Cross-cutting invariants, checked over a whole played-out game rather
//! than hand-picked single positions.

use board::board::Board;
use board::lines::{LineTable, LINE_COUNT};
use board::movegen::generate_moves;
use board::rules::ForbiddenCache;
use board::square::Square;
use board::stone::Stone::*;
use hoshi::evaluate::{EvalOptions, Evaluator};
use hoshi::position::Position;
use hoshi::zobrist::ZHash;

/// A plausible opening line, alternating black and white.
const GAME: &[(usize, usize)] = &[
    (7, 7),
    (6, 8),
    (8, 8),
    (6, 6),
    (6, 7),
    (8, 7),
    (5, 7),
    (9, 9),
    (7, 5),
    (7, 9),
    (9, 7),
    (4, 7),
    (8, 6),
    (10, 8),
];

fn replay() -> Vec<Position> {
    let mut positions = vec![Position::new(Board::new(), Black)];

    for &(row, col) in GAME {
        let next = positions.last().unwrap().play(Square::new(row, col));
        positions.push(next);
    }

    positions
}

#[test]
fn line_masks_stay_disjoint_and_complete() {
    for position in replay() {
        let rebuilt = LineTable::from_board(&position.board);
        assert_eq!(position.lines, rebuilt);

        for line in 0..LINE_COUNT {
            assert_eq!(
                position.lines.mask(Black, line) & position.lines.mask(White, line),
                0
            );
        }
    }
}

#[test]
fn hashes_stay_incremental() {
    for position in replay() {
        assert_eq!(
            position.hash,
            ZHash::from_board(&position.board, position.side)
        );
    }
}

#[test]
fn evaluation_leaves_every_position_untouched() {
    let mut evaluator = Evaluator::default();
    let options = EvalOptions::default();

    for position in replay().into_iter().skip(8).take(3) {
        let mut scratch = position.board.clone();

        for sq in Square::all() {
            if scratch.is_empty(sq) {
                evaluator.evaluate_position(&mut scratch, sq, position.side, &options);
            }
        }

        assert_eq!(scratch, position.board);

        // The leaf evaluator reads an immutable position; both viewpoints
        // must see mirrored totals up to the tempo terms, and neither may
        // disturb the shared state for the other.
        let a = evaluator.evaluate_board(&position, position.side, &options);
        let b = evaluator.evaluate_board(&position, position.side, &options);
        assert_eq!(a, b);
    }
}

#[test]
fn candidate_moves_stay_near_the_stones() {
    let mut cache = ForbiddenCache::new();

    for position in replay().into_iter().skip(1) {
        let moves = generate_moves(&position.board, position.side, false, &mut cache);

        assert!(!moves.is_empty());

        for mv in &moves {
            assert!(position.board.is_empty(*mv));
            assert!(position.board.has_neighbor(*mv, 2));
        }
    }
}

#[test]
fn single_stone_neighborhood_has_24_candidates() {
    let mut board = Board::new();
    board.place(Square::CENTER, Black);

    let mut cache = ForbiddenCache::new();
    let moves = generate_moves(&board, White, false, &mut cache);

    assert_eq!(moves.len(), 24);
}
