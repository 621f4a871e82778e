//! The tactics layer: speculative shape questions asked by placing a stone,
//! analysing, and undoing the placement.
//!
//! Everything here works on a bare `&mut Board` and guarantees the board
//! comes back unchanged on every path out. None of these helpers touch a
//! line table or hash, so they are safe to run on the search's scratch
//! board between nodes.
//!
//! The colour asymmetry is load-bearing throughout: a square can be a
//! four-three for White and a forbidden square for Black, White's "double
//! three" is a winning pattern while Black's is an illegal move, and every
//! Black three has to be vetted against its forbidden extensions.

use super::{pattern_kind, PatternKind, PatternScores, Score};
use board::board::Board;
use board::direction::{analyze_direction, Direction};
use board::rules::{
    check_jump_three, consecutive_three_straight_four_points, five_points,
    is_valid_open_three, jump_four_count, jump_three_straight_four_points,
    ForbiddenCache,
};
use board::square::Square;
use board::stone::Stone;
use itertools::Itertools;

////////////////////////////////////////////////////////////////////////////////
//
// Per-stone analysis
//
////////////////////////////////////////////////////////////////////////////////

/// Everything the evaluators want to know about one placed stone: its
/// pattern score over the four directions (consecutive and gapped shapes),
/// and which threat shapes it carries.
#[derive(Debug, Default, Clone, Copy)]
pub struct StoneEval {
    /// Summed pattern score, diagonal bonus applied.
    pub score: Score,

    /// Number of directions carrying a four or a playable open three.
    pub threat_dirs: u8,

    /// Number of distinct fours (consecutive and jump; one line can carry
    /// two jump fours).
    pub four_count: u8,

    /// Number of directions carrying a playable open three.
    pub open_three_dirs: u8,

    /// Any open-three shape, playable or not.
    pub has_open_three: bool,

    /// The strongest pattern over all directions.
    pub best_kind: Option<PatternKind>,
}

impl StoneEval {
    pub fn has_four(&self) -> bool {
        self.four_count > 0
    }

    pub fn has_valid_open_three(&self) -> bool {
        self.open_three_dirs > 0
    }

    /// Two or more independent forcing shapes. For White this wins on the
    /// spot — no forbidden rule stops either follow-up.
    pub fn is_double_threat(&self) -> bool {
        self.four_count >= 2 || self.open_three_dirs >= 2
    }
}

/// Analyse the stone sitting at `sq`.
///
/// Per direction: the consecutive pattern is scored first; a gapped four or
/// three is only considered when no consecutive four/three occupies the
/// same direction, so nothing is counted twice.
pub fn analyze_stone(
    board: &Board,
    sq: Square,
    stone: Stone,
    scores: &PatternScores,
) -> StoneEval {
    let mut eval = StoneEval::default();

    for dir in Direction::ALL {
        let pattern = analyze_direction(board, sq, dir, stone);
        let kind = pattern_kind(pattern);

        let mut dir_score = scores.pattern_score(pattern);
        let mut dir_four = false;
        let mut dir_three = false;

        match kind {
            Some(PatternKind::Five) => {
                // Terminal shape; nothing gapped to add.
            }

            Some(PatternKind::OpenFour) | Some(PatternKind::Four) => {
                // A consecutive four that lost its five point (Black edge
                // cases) is a dead shape.
                if five_points(board, sq, dir, stone).is_empty() {
                    dir_score = 0;
                } else {
                    eval.four_count += 1;
                    dir_four = true;
                }
            }

            _ if pattern.count == 4 => {
                // Fully blocked four: worthless, and it masks any gaps.
            }

            _ => {
                // No consecutive four: gapped fours may apply.
                let jumps = jump_four_count(board, sq, dir, stone);

                if jumps > 0 {
                    eval.four_count += jumps;
                    dir_score += jumps as Score * scores.four;
                    dir_four = true;
                }

                if pattern.count == 3 {
                    // Consecutive three: suppresses the jump three.
                    if kind == Some(PatternKind::OpenThree) {
                        eval.has_open_three = true;

                        if is_valid_open_three(board, sq, dir, stone) {
                            eval.open_three_dirs += 1;
                            dir_three = true;
                        }
                    }
                } else if check_jump_three(board, sq, dir, stone) {
                    eval.has_open_three = true;

                    // A jump three only scores when it is playable.
                    if is_valid_open_three(board, sq, dir, stone) {
                        eval.open_three_dirs += 1;
                        dir_score += scores.open_three;
                        dir_three = true;
                    }
                }
            }
        }

        if dir.is_diagonal() {
            dir_score =
                (dir_score as f64 * scores.diagonal_bonus_multiplier).round() as Score;
        }

        eval.score += dir_score;

        if dir_four || dir_three {
            eval.threat_dirs += 1;
        }

        let dir_kind = kind
            .into_iter()
            .chain(dir_four.then_some(PatternKind::Four))
            .chain(dir_three.then_some(PatternKind::OpenThree))
            .max();
        eval.best_kind = eval.best_kind.max(dir_kind);
    }

    eval
}

////////////////////////////////////////////////////////////////////////////////
//
// Speculative predicates
//
////////////////////////////////////////////////////////////////////////////////

/// Would placing here make a four and a playable open three at once?
pub fn creates_four_three(
    board: &mut Board,
    sq: Square,
    stone: Stone,
    scores: &PatternScores,
) -> bool {
    if !board.is_empty(sq) {
        return false;
    }

    board.place(sq, stone);
    let eval = analyze_stone(board, sq, stone, scores);
    board.remove(sq);

    eval.has_four() && eval.has_valid_open_three()
}

/// Would placing here make two or more playable open threes at once?
pub fn creates_double_three(board: &mut Board, sq: Square, stone: Stone) -> bool {
    if !board.is_empty(sq) {
        return false;
    }

    board.place(sq, stone);
    let threes = Direction::ALL
        .iter()
        .filter(|&&dir| is_valid_open_three(board, sq, dir, stone))
        .count();
    board.remove(sq);

    threes >= 2
}

/// Would placing here make a four (consecutive with a live five point, or
/// gapped)?
pub fn creates_four(board: &mut Board, sq: Square, stone: Stone) -> bool {
    if !board.is_empty(sq) {
        return false;
    }

    board.place(sq, stone);
    let found = Direction::ALL.iter().any(|&dir| {
        let pattern = analyze_direction(board, sq, dir, stone);

        if pattern.count == 4 {
            !five_points(board, sq, dir, stone).is_empty()
        } else if pattern.count < 4 {
            jump_four_count(board, sq, dir, stone) > 0
        } else {
            false
        }
    });
    board.remove(sq);

    found
}

/// Would placing here make a playable open three?
pub fn creates_open_three(board: &mut Board, sq: Square, stone: Stone) -> bool {
    if !board.is_empty(sq) {
        return false;
    }

    board.place(sq, stone);
    let found = Direction::ALL
        .iter()
        .any(|&dir| is_valid_open_three(board, sq, dir, stone));
    board.remove(sq);

    found
}

////////////////////////////////////////////////////////////////////////////////
//
// Mise detection
//
// A mise move threatens to make a four-three on the following turn. The
// targets of a mise are the squares where that four-three would land; a
// move with two targets no single reply can cover is a double mise, almost
// as good as the four-three itself.
//
////////////////////////////////////////////////////////////////////////////////

/// The four-three squares enabled by the stone just placed at `sq`: line
/// extensions plus the surrounding 5×5 area, minus anything Black would not
/// be allowed to play.
pub fn find_mise_targets(
    board: &mut Board,
    sq: Square,
    stone: Stone,
    scores: &PatternScores,
    cache: &mut ForbiddenCache,
) -> Vec<Square> {
    let mut candidates: Vec<Square> = Vec::new();

    // Cells extending the lines through the stone, up to a five's width,
    // not reaching past an opposing stone.
    for dir in Direction::ALL {
        for sense in [1, -1] {
            for step in 1..=4 {
                let Some(cell) = sq.offset(dir, sense * step) else {
                    break;
                };

                match board.get(cell) {
                    Some(s) if s == stone => continue,
                    Some(_) => break,
                    None => candidates.push(cell),
                }
            }
        }
    }

    // The 5×5 neighbourhood minus the centre.
    for dr in -2..=2 {
        for dc in -2..=2 {
            if dr == 0 && dc == 0 {
                continue;
            }

            if let Some(cell) = sq.shift(dr, dc) {
                if board.is_empty(cell) {
                    candidates.push(cell);
                }
            }
        }
    }

    let mut targets = Vec::new();

    for cell in candidates.into_iter().unique() {
        if stone.is_black() && cache.is_forbidden(board, cell) {
            continue;
        }

        if creates_four_three(board, cell, stone, scores) {
            targets.push(cell);
        }
    }

    targets
}

/// Check whether the mise is a double mise: for every target the opponent
/// occupies, some other target still makes the four-three.
pub fn is_double_mise(
    board: &mut Board,
    stone: Stone,
    targets: &[Square],
    scores: &PatternScores,
    cache: &mut ForbiddenCache,
) -> bool {
    if targets.len() < 2 {
        return false;
    }

    for &taken in targets {
        board.place(taken, !stone);

        let survives = targets.iter().any(|&other| {
            other != taken
                && board.is_empty(other)
                && !(stone.is_black() && cache.is_forbidden(board, other))
                && creates_four_three(board, other, stone, scores)
        });

        board.remove(taken);

        if !survives {
            return false;
        }
    }

    true
}

////////////////////////////////////////////////////////////////////////////////
//
// Forbidden-square tactics
//
// White attacks Black's forbidden squares; Black's own shapes can be
// devalued by them.
//
////////////////////////////////////////////////////////////////////////////////

/// The first empty square past the run through `sq`, on each side.
fn run_end_cells(
    board: &Board,
    sq: Square,
    dir: Direction,
    stone: Stone,
) -> [Option<Square>; 2] {
    let mut ends = [None, None];

    for (slot, sense) in [(0, 1), (1, -1)] {
        let mut step = 1;

        loop {
            match sq.offset(dir, sense * step) {
                Some(cell) if board.get(cell) == Some(stone) => step += 1,
                Some(cell) if board.is_empty(cell) => {
                    ends[slot] = Some(cell);
                    break;
                }
                _ => break,
            }
        }
    }

    ends
}

/// Score the forbidden traps opened by the white stone just placed at `sq`.
///
/// - A white four whose every five point is forbidden for Black cannot be
///   answered at all.
/// - A white open three gains for each extension square Black may not
///   touch, and gains heavily when exactly one of its straight-four points
///   is forbidden: Black must block the other, and White fours through the
///   forbidden side.
/// - A white jump three whose gap is forbidden for Black works the same way
///   through the gap.
pub fn evaluate_forbidden_trap(
    board: &mut Board,
    sq: Square,
    scores: &PatternScores,
    cache: &mut ForbiddenCache,
) -> Score {
    let stone = Stone::White;
    let mut bonus = 0;

    for dir in Direction::ALL {
        let pattern = analyze_direction(board, sq, dir, stone);

        match pattern_kind(pattern) {
            Some(PatternKind::Four) => {
                let defences = five_points(board, sq, dir, stone);

                if !defences.is_empty()
                    && defences.iter().all(|&cell| cache.is_forbidden(board, cell))
                {
                    bonus += scores.forbidden_trap_strong;
                }
            }

            Some(PatternKind::OpenThree) => {
                for end in run_end_cells(board, sq, dir, stone).into_iter().flatten() {
                    if cache.is_forbidden(board, end) {
                        bonus += scores.forbidden_trap_setup;
                    }
                }

                let points =
                    consecutive_three_straight_four_points(board, sq, dir, stone);

                if points.len() == 2 {
                    let forbidden = points
                        .iter()
                        .filter(|&&cell| cache.is_forbidden(board, cell))
                        .count();

                    if forbidden == 1 {
                        bonus += scores.forbidden_trap_strong;
                    }
                }
            }

            _ if pattern.count != 3 && check_jump_three(board, sq, dir, stone) => {
                let gaps = jump_three_straight_four_points(board, sq, dir, stone);

                if gaps.iter().any(|&cell| cache.is_forbidden(board, cell)) {
                    bonus += scores.forbidden_trap_three;
                }
            }

            _ => {}
        }
    }

    bonus
}

/// Penalise the black stone just placed at `sq` for threes growing towards
/// forbidden squares.
///
/// An extension square Black may not play weakens the three; it weakens it
/// badly when White already has a stone lurking within two squares beyond
/// it, ready to punish the one-sided shape.
pub fn evaluate_forbidden_vulnerability(
    board: &mut Board,
    sq: Square,
    scores: &PatternScores,
    cache: &mut ForbiddenCache,
) -> Score {
    let stone = Stone::Black;
    let mut penalty = 0;

    for dir in Direction::ALL {
        let pattern = analyze_direction(board, sq, dir, stone);

        let endpoints: Vec<Square> = if pattern.count == 3 && pattern.is_open() {
            run_end_cells(board, sq, dir, stone)
                .into_iter()
                .flatten()
                .collect()
        } else if pattern.count != 3
            && check_jump_three(board, sq, dir, stone)
            && is_valid_open_three(board, sq, dir, stone)
        {
            jump_three_straight_four_points(board, sq, dir, stone)
                .into_iter()
                .collect()
        } else {
            continue;
        };

        for endpoint in endpoints {
            if !cache.is_forbidden(board, endpoint) {
                continue;
            }

            // Which way does this endpoint extend? Look two further squares
            // that way for a white stone.
            let sense = if endpoint.row() > sq.row()
                || (endpoint.row() == sq.row() && endpoint.col() > sq.col())
            {
                1
            } else {
                -1
            };

            let under_attack = (1..=2).any(|step| {
                endpoint
                    .offset(dir, sense * step)
                    .is_some_and(|cell| board.get(cell) == Some(Stone::White))
            });

            penalty += if under_attack {
                scores.forbidden_vulnerability_strong
            } else {
                scores.forbidden_vulnerability_mild
            };
        }
    }

    Score::min(penalty, scores.forbidden_vulnerability_cap)
}

////////////////////////////////////////////////////////////////////////////////
//
// Follow-up threats
//
////////////////////////////////////////////////////////////////////////////////

/// Check whether the four just made at `sq` keeps threatening after the
/// forced block: for every defence square the opponent can take, some
/// square next to it must give us a new four.
///
/// A four with no follow-up spends a stone to gain nothing; the single-four
/// penalty uses this to tell the two apart.
pub fn has_follow_up_threat(
    board: &mut Board,
    sq: Square,
    stone: Stone,
    cache: &mut ForbiddenCache,
) -> bool {
    let mut defences: Vec<Square> = Vec::new();

    for dir in Direction::ALL {
        for cell in five_points(board, sq, dir, stone) {
            if !defences.contains(&cell) {
                defences.push(cell);
            }
        }
    }

    if defences.is_empty() {
        return false;
    }

    for defence in defences {
        board.place(defence, !stone);

        let mut follow_up = false;

        'scan: for dr in -1..=1 {
            for dc in -1..=1 {
                let Some(cell) = defence.shift(dr, dc) else {
                    continue;
                };

                if !board.is_empty(cell) {
                    continue;
                }

                if stone.is_black() && cache.is_forbidden(board, cell) {
                    continue;
                }

                if creates_four(board, cell, stone) {
                    follow_up = true;
                    break 'scan;
                }
            }
        }

        board.remove(defence);

        if !follow_up {
            return false;
        }
    }

    true
}
