//! The renju rule engine: wins, overlines, gapped shapes, and the forbidden
//! move classification for Black.
//!
//! Everything here speaks about a stone (or a hypothetical stone) at a given
//! square: "does this stone sit in a five", "is this three upgradable to a
//! straight four", and so on. The analysis walks the board directly, so the
//! functions also answer speculative queries on scratch boards that don't
//! carry a line table.
//!
//! Colour asymmetry runs through the whole module: Black wins with exactly
//! five, overlines are forbidden for Black and winning for White, and only
//! Black's threes need their straight-four points vetted against the
//! forbidden rules.

mod forbidden;

pub use forbidden::{check_forbidden, is_forbidden, ForbiddenCache, ForbiddenKind};

use crate::board::Board;
use crate::direction::{analyze_direction, count_consecutive, Direction};
use crate::square::Square;
use crate::stone::Stone;
use arrayvec::ArrayVec;

/// Check whether the stone at (or imagined at) `sq` sits in a run of exactly
/// five.
pub fn check_five(board: &Board, sq: Square, stone: Stone) -> bool {
    Direction::ALL
        .iter()
        .any(|&dir| count_consecutive(board, sq, dir, stone) == 5)
}

/// Check whether a black stone at (or imagined at) `sq` sits in a run of six
/// or more.
pub fn check_overline(board: &Board, sq: Square) -> bool {
    Direction::ALL
        .iter()
        .any(|&dir| count_consecutive(board, sq, dir, Stone::Black) >= 6)
}

/// Check whether the stone wins the game: exactly five for Black, five or
/// more for White (White is free to overline).
pub fn check_win(board: &Board, sq: Square, stone: Stone) -> bool {
    match stone {
        Stone::Black => check_five(board, sq, stone),
        Stone::White => Direction::ALL
            .iter()
            .any(|&dir| count_consecutive(board, sq, dir, stone) >= 5),
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Jump patterns
//
// Gapped shapes the consecutive analysis can't see. A jump four is
// `XXX.X`, `XX.XX` or `X.XXX`: filling the gap makes a five. A jump three
// is `.XX.X.` or `.X.XX.`: filling the gap makes a straight four.
//
////////////////////////////////////////////////////////////////////////////////

/// The contiguous run of `stone` through `sq` along `dir`, as (steps down,
/// steps up) from the square. The square itself counts as occupied.
fn run_extent(board: &Board, sq: Square, dir: Direction, stone: Stone) -> (i32, i32) {
    let mut lo = 0;
    while let Some(next) = sq.offset(dir, -(lo + 1)) {
        if board.get(next) != Some(stone) {
            break;
        }
        lo += 1;
    }

    let mut hi = 0;
    while let Some(next) = sq.offset(dir, hi + 1) {
        if board.get(next) != Some(stone) {
            break;
        }
        hi += 1;
    }

    (lo, hi)
}

/// The gap squares of jump fours through `sq` along `dir`: a gap such that
/// the runs on its either side total four stones, one of them containing
/// `sq`. At most one per side of the square's run.
pub fn jump_four_gaps(
    board: &Board,
    sq: Square,
    dir: Direction,
    stone: Stone,
) -> ArrayVec<Square, 2> {
    let mut gaps = ArrayVec::new();
    let (lo, hi) = run_extent(board, sq, dir, stone);
    let run = lo + hi + 1;

    for sense in [1, -1] {
        let edge = if sense == 1 { hi } else { lo };

        let Some(gap) = sq.offset(dir, sense * (edge + 1)) else {
            continue;
        };

        if !board.is_empty(gap) {
            continue;
        }

        let mut beyond = 0;
        while let Some(next) = sq.offset(dir, sense * (edge + 2 + beyond)) {
            if board.get(next) != Some(stone) {
                break;
            }
            beyond += 1;
        }

        // A genuine gap shape needs stones on both sides of it. Filling it
        // must make exactly five; run maximality on both outer sides
        // guarantees no overline.
        if beyond >= 1 && run + beyond == 4 {
            gaps.push(gap);
        }
    }

    gaps
}

/// Check whether the stone at `sq` is part of a jump four along `dir`.
pub fn check_jump_four(board: &Board, sq: Square, dir: Direction, stone: Stone) -> bool {
    !jump_four_gaps(board, sq, dir, stone).is_empty()
}

/// The number of distinct jump fours through `sq` along `dir` (0, 1 or 2 —
/// a stone between two gaps can carry one on each side).
pub fn jump_four_count(board: &Board, sq: Square, dir: Direction, stone: Stone) -> u8 {
    jump_four_gaps(board, sq, dir, stone).len() as u8
}

/// The gap squares of jump threes through `sq` along `dir`: runs totalling
/// three around one gap, with both outer bounding squares empty so that
/// filling the gap yields a straight four.
pub fn jump_three_gaps(
    board: &Board,
    sq: Square,
    dir: Direction,
    stone: Stone,
) -> ArrayVec<Square, 2> {
    let mut gaps = ArrayVec::new();
    let (lo, hi) = run_extent(board, sq, dir, stone);
    let run = lo + hi + 1;

    for sense in [1, -1] {
        let (edge, far_edge) = if sense == 1 { (hi, lo) } else { (lo, hi) };

        let Some(gap) = sq.offset(dir, sense * (edge + 1)) else {
            continue;
        };

        if !board.is_empty(gap) {
            continue;
        }

        let mut beyond = 0;
        while let Some(next) = sq.offset(dir, sense * (edge + 2 + beyond)) {
            if board.get(next) != Some(stone) {
                break;
            }
            beyond += 1;
        }

        if beyond == 0 || run + beyond != 3 {
            continue;
        }

        // Both bounding squares of the would-be four must be empty.
        let outer_hi = sq.offset(dir, sense * (edge + 2 + beyond));
        let outer_lo = sq.offset(dir, -sense * (far_edge + 1));

        let open = |cell: Option<Square>| {
            cell.map_or(false, |sq| board.is_empty(sq))
        };

        if open(outer_hi) && open(outer_lo) {
            gaps.push(gap);
        }
    }

    gaps
}

/// Check whether the stone at `sq` is part of a jump three along `dir`.
pub fn check_jump_three(board: &Board, sq: Square, dir: Direction, stone: Stone) -> bool {
    !jump_three_gaps(board, sq, dir, stone).is_empty()
}

////////////////////////////////////////////////////////////////////////////////
//
// Straight-four points
//
// The empty squares that upgrade a three into a straight (open) four. These
// double as the validity witnesses for Black's threes: a three with no
// playable straight-four point is a fake that never becomes an open four.
//
////////////////////////////////////////////////////////////////////////////////

/// The straight-four points of a consecutive open three through `sq` along
/// `dir`: each open end whose square beyond is also empty.
pub fn consecutive_three_straight_four_points(
    board: &Board,
    sq: Square,
    dir: Direction,
    stone: Stone,
) -> ArrayVec<Square, 2> {
    let mut points = ArrayVec::new();
    let pattern = analyze_direction(board, sq, dir, stone);

    if pattern.count != 3 || !pattern.is_open() {
        return points;
    }

    let (lo, hi) = run_extent(board, sq, dir, stone);

    for (sense, edge) in [(1, hi), (-1, lo)] {
        // The extension square is empty (the three is open); the square
        // beyond it must be empty too, or the four ends up blocked.
        let Some(point) = sq.offset(dir, sense * (edge + 1)) else {
            continue;
        };
        let Some(beyond) = sq.offset(dir, sense * (edge + 2)) else {
            continue;
        };

        if board.is_empty(beyond) {
            points.push(point);
        }
    }

    points
}

/// The straight-four points of jump threes through `sq` along `dir`: the gap
/// squares themselves.
pub fn jump_three_straight_four_points(
    board: &Board,
    sq: Square,
    dir: Direction,
    stone: Stone,
) -> ArrayVec<Square, 2> {
    jump_three_gaps(board, sq, dir, stone)
}

/// Check whether the stone at `sq` makes a playable open three along `dir`:
/// a consecutive open three or a jump three with at least one straight-four
/// point that the colour is actually allowed to play.
///
/// For White every straight-four point is playable; for Black the point must
/// not be forbidden.
pub fn is_valid_open_three(
    board: &Board,
    sq: Square,
    dir: Direction,
    stone: Stone,
) -> bool {
    forbidden::valid_open_three_at_depth(board, sq, dir, stone, 0)
}

////////////////////////////////////////////////////////////////////////////////
//
// Five points
//
////////////////////////////////////////////////////////////////////////////////

/// The empty squares that would complete the colour's shape through `sq`
/// along `dir` into a winning five. Covers consecutive fours (open ends) and
/// jump fours (gaps).
pub fn five_points(
    board: &Board,
    sq: Square,
    dir: Direction,
    stone: Stone,
) -> ArrayVec<Square, 2> {
    let mut points = ArrayVec::new();
    let (lo, hi) = run_extent(board, sq, dir, stone);

    for offset in -(lo + 4)..=(hi + 4) {
        if offset >= -lo && offset <= hi {
            continue;
        }

        let Some(cell) = sq.offset(dir, offset) else {
            continue;
        };

        if !board.is_empty(cell) {
            continue;
        }

        // Would a stone here join up with ours into a winning run?
        let (cell_lo, cell_hi) = run_extent(board, cell, dir, stone);
        let count = cell_lo + cell_hi + 1;

        let reaches_sq = offset > 0 && offset - cell_lo <= hi
            || offset < 0 && offset + cell_hi >= -lo;

        let wins = match stone {
            Stone::Black => count == 5,
            Stone::White => count >= 5,
        };

        if wins && reaches_sq && !points.contains(&cell) {
            points.push(cell);

            if points.is_full() {
                break;
            }
        }
    }

    points
}

////////////////////////////////////////////////////////////////////////////////
//
// Four-three potential
//
// The board-walking twin of the line-feature candidate flags: an empty
// square has four-three potential when some direction could complete a four
// and some direction could complete an open three, judged by the five-window
// pre-filter. The leaf evaluator's threat scan only pays for an exact check
// on squares that pass this.
//
////////////////////////////////////////////////////////////////////////////////

/// The candidate direction bit-sets for an empty square: (four candidates,
/// three candidates). A direction qualifies when some five-window through
/// the square holds enough own stones and no opposing stone.
pub fn candidate_dirs(board: &Board, sq: Square, stone: Stone) -> (u8, u8) {
    let mut four_dirs = 0u8;
    let mut three_dirs = 0u8;

    for dir in Direction::ALL {
        let mut four = false;
        let mut three = false;

        for start in -4..=0 {
            let mut own = 0;
            let mut blocked = false;
            let mut on_board = true;

            for i in 0..5 {
                let Some(cell) = sq.offset(dir, start + i) else {
                    on_board = false;
                    break;
                };

                match board.get(cell) {
                    Some(s) if s == stone => own += 1,
                    Some(_) => {
                        blocked = true;
                        break;
                    }
                    None => {}
                }
            }

            if on_board && !blocked {
                four |= own >= 3;
                three |= own >= 2;
            }

            if four {
                break;
            }
        }

        four_dirs |= (four as u8) << dir.idx();
        three_dirs |= (three as u8) << dir.idx();
    }

    (four_dirs, three_dirs)
}

/// Whether an empty square passes the four-three pre-filter in at least one
/// four direction and one three direction.
pub fn has_four_three_potential(board: &Board, sq: Square, stone: Stone) -> bool {
    let (four_dirs, three_dirs) = candidate_dirs(board, sq, stone);

    four_dirs != 0 && three_dirs != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stone::Stone::*;

    fn board(diagram: &str) -> Board {
        diagram.parse().unwrap()
    }

    fn row_board(cols: &[usize], stone: Stone) -> Board {
        let mut board = Board::new();
        for &col in cols {
            board.place(Square::new(7, col), stone);
        }
        board
    }

    #[test]
    fn five_detection_is_exact_for_black() {
        let board = row_board(&[3, 4, 5, 6, 7], Black);
        assert!(check_five(&board, Square::new(7, 5), Black));
        assert!(check_win(&board, Square::new(7, 5), Black));

        let overline = row_board(&[3, 4, 5, 6, 7, 8], Black);
        assert!(!check_five(&overline, Square::new(7, 5), Black));
        assert!(check_overline(&overline, Square::new(7, 5)));
        assert!(!check_win(&overline, Square::new(7, 5), Black));
    }

    #[test]
    fn white_wins_with_overline() {
        let board = row_board(&[3, 4, 5, 6, 7, 8], White);
        assert!(check_win(&board, Square::new(7, 5), White));
    }

    #[test]
    fn jump_four_shapes() {
        // x x x . x
        let board = row_board(&[3, 4, 5, 7], Black);

        assert!(check_jump_four(&board, Square::new(7, 4), Direction::Across, Black));
        assert!(check_jump_four(&board, Square::new(7, 7), Direction::Across, Black));

        let gaps = jump_four_gaps(&board, Square::new(7, 4), Direction::Across, Black);
        assert_eq!(gaps.as_slice(), &[Square::new(7, 6)]);

        // x x . x x
        let split = row_board(&[3, 4, 6, 7], Black);
        let gaps = jump_four_gaps(&split, Square::new(7, 4), Direction::Across, Black);
        assert_eq!(gaps.as_slice(), &[Square::new(7, 5)]);
    }

    #[test]
    fn double_gap_carries_two_jump_fours() {
        // x . x x x . x  — the middle run carries a four on each side
        let board = row_board(&[2, 4, 5, 6, 8], Black);
        let count = jump_four_count(&board, Square::new(7, 5), Direction::Across, Black);
        assert_eq!(count, 2);
    }

    #[test]
    fn jump_three_needs_open_bounds() {
        // . x x . x .
        let board = row_board(&[4, 5, 7], Black);
        assert!(check_jump_three(&board, Square::new(7, 4), Direction::Across, Black));

        let gaps = jump_three_gaps(&board, Square::new(7, 5), Direction::Across, Black);
        assert_eq!(gaps.as_slice(), &[Square::new(7, 6)]);

        // o x x . x . — blocked on the left bound
        let mut blocked = row_board(&[4, 5, 7], Black);
        blocked.place(Square::new(7, 3), White);
        assert!(!check_jump_three(&blocked, Square::new(7, 4), Direction::Across, Black));
    }

    #[test]
    fn straight_four_points_of_an_open_three() {
        // . . x x x . .
        let board = row_board(&[4, 5, 6], Black);
        let points = consecutive_three_straight_four_points(
            &board,
            Square::new(7, 5),
            Direction::Across,
            Black,
        );

        assert_eq!(points.len(), 2);
        assert!(points.contains(&Square::new(7, 3)));
        assert!(points.contains(&Square::new(7, 7)));

        // o . x x x . . — the left four would be blocked, only the right
        // point remains.
        let mut edged = row_board(&[4, 5, 6], Black);
        edged.place(Square::new(7, 2), White);
        let points = consecutive_three_straight_four_points(
            &edged,
            Square::new(7, 5),
            Direction::Across,
            Black,
        );
        assert_eq!(points.as_slice(), &[Square::new(7, 7)]);
    }

    #[test]
    fn five_points_of_fours() {
        // closed four: o x x x x .
        let mut board = row_board(&[3, 4, 5, 6], Black);
        board.place(Square::new(7, 2), White);

        let points = five_points(&board, Square::new(7, 4), Direction::Across, Black);
        assert_eq!(points.as_slice(), &[Square::new(7, 7)]);

        // jump four: the gap is the only five point
        let jump = row_board(&[3, 4, 5, 7], Black);
        let points = five_points(&jump, Square::new(7, 4), Direction::Across, Black);
        assert_eq!(points.as_slice(), &[Square::new(7, 6)]);
    }

    #[test]
    fn black_five_point_must_be_exact() {
        // x x x x . x — the gap would make six, not five
        let board = row_board(&[2, 3, 4, 5, 7], Black);
        let points = five_points(&board, Square::new(7, 4), Direction::Across, Black);
        assert!(points.is_empty());

        // the same shape wins for white
        let board = row_board(&[2, 3, 4, 5, 7], White);
        let points = five_points(&board, Square::new(7, 4), Direction::Across, White);
        assert_eq!(points.as_slice(), &[Square::new(7, 6)]);
    }

    #[test]
    fn four_three_potential_pre_filter() {
        let board = board(
            "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . x . . . . . . .
            . . . . . . . x . . . . . . .
            . . . . x x x . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
        );

        // (7, 7) completes a four across and a three down.
        assert!(has_four_three_potential(&board, Square::new(7, 7), Black));
        assert!(!has_four_three_potential(&board, Square::new(0, 0), Black));
    }

    #[test]
    fn candidate_dirs_agree_with_line_features() {
        let board = board(
            "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . o . . . . . . . . .
            . . . . . . x . . . . . . . .
            . . . . . . . x . . . . . . .
            . . . . . . . . . . . . . . .
            . . . x x x o . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . o . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
        );

        let table = crate::lines::LineTable::from_board(&board);
        let mut features = crate::lines::LineFeatures::new();
        features.precompute(&table);

        for sq in Square::all() {
            if !board.is_empty(sq) {
                continue;
            }

            for stone in [Black, White] {
                let (four_dirs, three_dirs) = candidate_dirs(&board, sq, stone);
                assert_eq!(
                    four_dirs,
                    features.four_dirs(sq, stone),
                    "four dirs disagree at {sq} for {stone:?}"
                );
                assert_eq!(
                    three_dirs,
                    features.three_dirs(sq, stone),
                    "three dirs disagree at {sq} for {stone:?}"
                );
            }
        }
    }
}
