//! The speculative position evaluator: what is placing a stone here worth?
//!
//! This is the score the search uses at every interior choice point. It
//! combines the attacking value of the new stone, the defensive value of
//! denying the square to the opponent, and the tactical bonuses (four-three,
//! mise, forbidden traps) — and it enforces mandatory defence: when the
//! opponent holds a threat that must be answered now, every move that
//! doesn't answer it comes back as `MINUS_INF`.
//!
//! The stone is placed on entry and removed at the single exit; internal
//! helpers that need the pre-move board undo the stone around their call.
//! The caller's board is identical before and after.

use super::tactics::{
    analyze_stone, evaluate_forbidden_trap, evaluate_forbidden_vulnerability,
    find_mise_targets, has_follow_up_threat, is_double_mise,
};
use super::{EvalOptions, Evaluator, PatternKind, PatternScores, Score, ScoreExt};
use crate::threats::{detect_opponent_threats, ThreatInfo};
use board::board::Board;
use board::rules::check_win;
use board::square::Square;
use board::stone::Stone;

impl Evaluator {
    /// Evaluate placing `stone` on the empty square `sq`, from that
    /// colour's point of view.
    ///
    /// Returns `scores.five` for an outright win, `MINUS_INF` for a move
    /// that ignores a mandatory defence, and a finite heuristic score
    /// otherwise.
    pub fn evaluate_position(
        &mut self,
        board: &mut Board,
        sq: Square,
        stone: Stone,
        options: &EvalOptions,
    ) -> Score {
        debug_assert!(board.is_empty(sq), "evaluating an occupied square {sq}");

        // Completing a five ends the game; nothing else matters.
        if check_win(board, sq, stone) {
            return self.scores.five;
        }

        board.place(sq, stone);
        let score = self.evaluate_placed(board, sq, stone, options);
        board.remove(sq);

        score
    }

    /// The evaluation proper, with the stone already sitting at `sq`.
    fn evaluate_placed(
        &mut self,
        board: &mut Board,
        sq: Square,
        stone: Stone,
        options: &EvalOptions,
    ) -> Score {
        let scores = self.scores.clone();

        ////////////////////////////////////////////////////////////////////
        //
        // Attack: the new stone's own patterns
        //
        ////////////////////////////////////////////////////////////////////

        let attack = analyze_stone(board, sq, stone, &scores);

        let four_three_bonus = if attack.has_four() && attack.has_valid_open_three() {
            scores.four_three_bonus
        } else {
            0
        };

        ////////////////////////////////////////////////////////////////////
        //
        // Mandatory defence
        //
        // With the stone lifted off again, look at what the opponent was
        // already threatening. Unless this move beats the threat to the
        // punch or answers it, it is strictly dominated.
        //
        ////////////////////////////////////////////////////////////////////

        if options.enable_mandatory_defense {
            let threats;
            let threats_ref: &ThreatInfo = match &options.precomputed_threats {
                Some(precomputed) => precomputed,
                None => {
                    board.remove(sq);
                    threats = detect_opponent_threats(board, !stone);
                    board.place(sq, stone);
                    &threats
                }
            };

            let has_my_open_four = attack.score >= scores.open_four;
            let can_win_first = has_my_open_four || four_three_bonus > 0;

            if let Some(veto) = mandatory_defense_veto(
                sq,
                threats_ref,
                has_my_open_four,
                can_win_first,
                options,
            ) {
                return veto;
            }
        }

        ////////////////////////////////////////////////////////////////////
        //
        // White double threats win outright: no forbidden rule protects
        // Black from two fours or two open threes at once.
        //
        ////////////////////////////////////////////////////////////////////

        if stone.is_white() && attack.is_double_threat() {
            return scores.five;
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Tactical bonuses
        //
        ////////////////////////////////////////////////////////////////////

        let forbidden_trap_bonus = if stone.is_white() && options.enable_forbidden_trap {
            evaluate_forbidden_trap(board, sq, &scores, &mut self.forbidden)
        } else {
            0
        };

        let forbidden_vulnerability = if stone.is_black()
            && options.enable_forbidden_vulnerability
        {
            evaluate_forbidden_vulnerability(board, sq, &scores, &mut self.forbidden)
        } else {
            0
        };

        let mise_bonus = if options.enable_mise {
            let targets =
                find_mise_targets(board, sq, stone, &scores, &mut self.forbidden);

            if is_double_mise(board, stone, &targets, &scores, &mut self.forbidden) {
                scores.double_mise_bonus
            } else if !targets.is_empty() {
                scores.mise_bonus
            } else {
                0
            }
        } else {
            0
        };

        let multi_threat_bonus = if options.enable_multi_threat && attack.threat_dirs >= 2
        {
            scores.multi_threat_bonus * (attack.threat_dirs as Score - 1)
        } else {
            0
        };

        let single_four_penalty = if options.enable_single_four_penalty
            && attack.has_four()
            && !attack.has_valid_open_three()
            && !has_follow_up_threat(board, sq, stone, &mut self.forbidden)
        {
            let wasted = scores.four as f64
                * attack.four_count as f64
                * (1.0 - options.single_four_penalty_multiplier);
            wasted.round() as Score
        } else {
            0
        };

        ////////////////////////////////////////////////////////////////////
        //
        // Defence: what the square was worth to the opponent
        //
        // Swap the stone for an opposing one and weigh the patterns it
        // would have made, scaled down per shape: denying a square is worth
        // less than owning it.
        //
        ////////////////////////////////////////////////////////////////////

        board.remove(sq);
        board.place(sq, !stone);
        let denied = analyze_stone(board, sq, !stone, &scores);
        let mut defense_score = denied_value(board, sq, !stone, &scores);
        board.remove(sq);
        board.place(sq, stone);

        if options.enable_counter_four
            && attack.has_four()
            && denied.best_kind >= Some(PatternKind::OpenThree)
        {
            defense_score =
                (defense_score as f64 * scores.counter_four_multiplier).round() as Score;
        }

        let defense_multi_threat_bonus =
            if options.enable_multi_threat && denied.threat_dirs >= 2 {
                scores.defense_multi_threat_bonus * (denied.threat_dirs as Score - 1)
            } else {
                0
            };

        ////////////////////////////////////////////////////////////////////
        //
        // Total
        //
        ////////////////////////////////////////////////////////////////////

        attack.score
            + defense_score
            + scores.center_bonus(sq)
            + four_three_bonus
            + forbidden_trap_bonus
            + mise_bonus
            + multi_threat_bonus
            + defense_multi_threat_bonus
            - single_four_penalty
            - forbidden_vulnerability
    }
}

/// The block value of the square: the opposing stone is already swapped in
/// at `sq`, and each of its would-be shapes counts at a per-shape fraction
/// of its attack value — denying a square is worth less than owning it.
fn denied_value(
    board: &Board,
    sq: Square,
    opponent: Stone,
    scores: &PatternScores,
) -> Score {
    use board::direction::{analyze_direction, Direction};
    use board::rules::{check_jump_three, is_valid_open_three, jump_four_count};

    let mut total = 0.0;

    for dir in Direction::ALL {
        let pattern = analyze_direction(board, sq, dir, opponent);
        let kind = super::pattern_kind(pattern);

        let mut dir_value = kind.map_or(0.0, |kind| {
            scores.score_of(kind) as f64 * PatternScores::defense_multiplier(kind)
        });

        // Gapped shapes, suppressed by consecutive ones on the same
        // direction exactly like on the attack side.
        let consecutive_four = pattern.count >= 4;

        if !consecutive_four {
            let jumps = jump_four_count(board, sq, dir, opponent);

            if jumps > 0 {
                dir_value += jumps as f64
                    * scores.four as f64
                    * PatternScores::defense_multiplier(PatternKind::Four);
            }

            if pattern.count != 3
                && check_jump_three(board, sq, dir, opponent)
                && is_valid_open_three(board, sq, dir, opponent)
            {
                dir_value += scores.open_three as f64
                    * PatternScores::defense_multiplier(PatternKind::OpenThree);
            }
        }

        if dir.is_diagonal() {
            dir_value *= scores.diagonal_bonus_multiplier;
        }

        total += dir_value;
    }

    total.round() as Score
}

/// The mandatory-defence cascade. Returns the veto score for a move that
/// leaves the strongest live threat unanswered.
fn mandatory_defense_veto(
    sq: Square,
    threats: &ThreatInfo,
    has_my_open_four: bool,
    can_win_first: bool,
    options: &EvalOptions,
) -> Option<Score> {
    // Opponent open four: only an open four of our own outruns it.
    if !threats.open_fours.is_empty() {
        if !has_my_open_four && !threats.open_fours.contains(&sq) {
            return Some(Score::MINUS_INF);
        }

        return None;
    }

    // Opponent closed four: must be blocked unless we have the open four.
    if !threats.fours.is_empty() {
        if !has_my_open_four && !threats.fours.contains(&sq) {
            return Some(Score::MINUS_INF);
        }

        return None;
    }

    // Opponent open three: answer it, or hold a faster win ourselves.
    if !threats.open_threes.is_empty() {
        if !can_win_first && !threats.open_threes.contains(&sq) {
            return Some(Score::MINUS_INF);
        }

        // When one square would answer both an open three and a mise, any
        // defence short of such a square loses a tempo it cannot afford.
        if options.enable_mise_threat && !threats.mises.is_empty() && !can_win_first {
            let common: Vec<Square> = threats
                .open_threes
                .iter()
                .copied()
                .filter(|cell| threats.mises.contains(cell))
                .collect();

            if !common.is_empty() && !common.contains(&sq) {
                return Some(Score::MINUS_INF);
            }
        }

        return None;
    }

    // A single opponent double-three square: block it. Two or more cannot
    // be covered by one move anyway, so the rule stands down and the
    // search sorts it out.
    if options.enable_double_three_threat && threats.double_threes.len() == 1 {
        if !can_win_first && sq != threats.double_threes[0] {
            return Some(Score::MINUS_INF);
        }

        return None;
    }

    // Mise squares: the opponent is one quiet move from a four-three.
    if options.enable_mise_threat && !threats.mises.is_empty() {
        if !can_win_first && !threats.mises.contains(&sq) {
            return Some(Score::MINUS_INF);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use Stone::*;

    fn board(diagram: &str) -> Board {
        diagram.parse().unwrap()
    }

    #[test]
    fn board_is_restored_on_every_path() {
        let mut b = board(
            "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . o o o . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
        );

        let mut evaluator = Evaluator::default();
        let options = EvalOptions::default();
        let before = b.clone();

        // A vetoed move, a defending move, and a quiet move all leave the
        // board untouched.
        evaluator.evaluate_position(&mut b, Square::new(0, 0), Black, &options);
        evaluator.evaluate_position(&mut b, Square::new(7, 7), Black, &options);
        evaluator.evaluate_position(&mut b, Square::new(7, 3), Black, &options);

        assert_eq!(b, before);
    }

    #[test]
    fn mandatory_defense_of_an_open_three() {
        let mut b = Board::new();
        for col in 4..7 {
            b.place(Square::new(7, col), White);
        }

        let mut evaluator = Evaluator::default();
        let options = EvalOptions::default();

        let ignored =
            evaluator.evaluate_position(&mut b, Square::new(0, 0), Black, &options);
        let blocking =
            evaluator.evaluate_position(&mut b, Square::new(7, 7), Black, &options);
        let other_end =
            evaluator.evaluate_position(&mut b, Square::new(7, 3), Black, &options);

        assert_eq!(ignored, Score::MINUS_INF);
        assert!(blocking > Score::MINUS_INF);
        assert!(other_end > Score::MINUS_INF);
    }

    #[test]
    fn four_three_scores_above_open_four_with_bonus() {
        let mut b = board(
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

        let mut evaluator = Evaluator::default();
        let options = EvalOptions::default();
        let scores = PatternScores::default();

        let score =
            evaluator.evaluate_position(&mut b, Square::new(7, 7), Black, &options);

        assert!(score >= scores.open_four + scores.four_three_bonus);
        assert!(score < PatternScores::FIVE);
    }

    #[test]
    fn white_double_three_wins_outright() {
        let mut b = board(
            "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . o . . . . . .
            . . . . . . . . o . . . . . .
            . . . . . . o o . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
        );

        let mut evaluator = Evaluator::default();
        let options = EvalOptions::default();

        let score =
            evaluator.evaluate_position(&mut b, Square::new(7, 8), White, &options);

        assert_eq!(score, PatternScores::FIVE);
    }

    #[test]
    fn completing_a_five_returns_five_immediately() {
        let mut b = Board::new();
        for col in 3..7 {
            b.place(Square::new(7, col), Black);
        }

        let mut evaluator = Evaluator::default();
        let options = EvalOptions::default();

        let score =
            evaluator.evaluate_position(&mut b, Square::new(7, 7), Black, &options);

        assert_eq!(score, PatternScores::FIVE);
    }

    #[test]
    fn closed_four_leaves_one_finite_defence() {
        let mut b = Board::new();
        for col in 0..4 {
            b.place(Square::new(7, col), Black);
        }

        let mut evaluator = Evaluator::default();
        let options = EvalOptions::default();

        let defending =
            evaluator.evaluate_position(&mut b, Square::new(7, 4), White, &options);
        assert!(defending > Score::MINUS_INF);

        for sq in [Square::new(0, 0), Square::new(7, 7), Square::new(8, 2)] {
            let score = evaluator.evaluate_position(&mut b, sq, White, &options);
            assert_eq!(score, Score::MINUS_INF, "{sq} should be vetoed");
        }
    }
}
