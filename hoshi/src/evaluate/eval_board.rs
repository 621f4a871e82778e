//! The leaf evaluator: a whole-board score at the search horizon.
//!
//! Where the position evaluator judges one hypothetical move in detail,
//! this one sums up everything already standing on the board, per stone and
//! per direction, from the precomputed line features. The features are
//! refilled exactly once at the top of each evaluation and consumed before
//! anything else can touch them; no callee of this function ever reaches
//! back into a leaf evaluation.

use super::tactics::creates_four_three;
use super::{pattern_kind, EvalOptions, Evaluator, PatternKind, Score};
use crate::position::Position;
use board::square::Square;
use board::stone::Stone;
use std::fmt::Display;

impl Evaluator {
    /// Evaluate the whole board from `perspective`'s point of view.
    pub fn evaluate_board(
        &mut self,
        pos: &Position,
        perspective: Stone,
        options: &EvalOptions,
    ) -> Score {
        self.evaluate_board_breakdown(pos, perspective, options).total()
    }

    /// The same evaluation, with the per-side terms kept apart for
    /// inspection and display.
    pub fn evaluate_board_breakdown(
        &mut self,
        pos: &Position,
        perspective: Stone,
        options: &EvalOptions,
    ) -> BoardBreakdown {
        use board::direction::Direction;

        let scores = self.scores.clone();

        // The one fill per evaluation; everything below only reads.
        self.features.precompute(&pos.lines);

        let mut totals = [0 as Score; 2];
        let mut four_buckets = [0 as Score; 2];
        let mut open_three_buckets = [0 as Score; 2];

        ////////////////////////////////////////////////////////////////////
        //
        // Per-stone pattern scores with connectivity
        //
        ////////////////////////////////////////////////////////////////////

        for (sq, stone) in pos.board.stones() {
            let mut stone_score = 0;
            let mut active_dirs = 0;

            for dir in Direction::ALL {
                let pattern = self.features.pattern(sq, dir, stone).unpack();
                let kind = pattern_kind(pattern);

                let mut dir_score = kind.map_or(0, |kind| scores.score_of(kind));

                if dir.is_diagonal() {
                    dir_score = (dir_score as f64 * scores.diagonal_bonus_multiplier)
                        .round() as Score;
                }

                match kind {
                    Some(PatternKind::Four) | Some(PatternKind::OpenFour) => {
                        four_buckets[stone.idx()] += dir_score;
                    }
                    Some(PatternKind::OpenThree) => {
                        open_three_buckets[stone.idx()] += dir_score;
                    }
                    _ => {}
                }

                if dir_score > 0 {
                    active_dirs += 1;
                }

                stone_score += dir_score;
            }

            let connectivity = if active_dirs >= 2 {
                scores.connectivity_bonus * (active_dirs - 1)
            } else {
                0
            };

            totals[stone.idx()] += stone_score + connectivity;
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Single-four penalty: a four with no three behind it is a spent
        // threat.
        //
        ////////////////////////////////////////////////////////////////////

        if options.enable_single_four_penalty {
            for side in [Stone::Black, Stone::White] {
                if four_buckets[side.idx()] > 0 && open_three_buckets[side.idx()] == 0 {
                    let wasted = four_buckets[side.idx()] as f64
                        * (1.0 - options.single_four_penalty_multiplier);
                    totals[side.idx()] -= wasted.round() as Score;
                }
            }
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Tempo discount: the perspective side's open threes are stale
        // when it was the one who moved last — the opponent answers first.
        //
        ////////////////////////////////////////////////////////////////////

        let last_mover = !pos.side;

        if last_mover == perspective {
            let discount = open_three_buckets[perspective.idx()] as f64
                * scores.tempo_open_three_discount;
            totals[perspective.idx()] -= discount.round() as Score;
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Four-three threat scan: a side with a square that makes a
        // four-three carries a standing threat worth more than its visible
        // patterns. The candidate flags keep the exact check rare.
        //
        ////////////////////////////////////////////////////////////////////

        let mut threat_flags = [false; 2];

        if scores.leaf_four_three_threat > 0 {
            let mut scratch = pos.board.clone();

            for side in [Stone::Black, Stone::White] {
                if pos.board.count(side) < 5 {
                    continue;
                }

                for sq in Square::all() {
                    if !pos.board.is_empty(sq)
                        || !self.features.four_three_candidate(sq, side)
                    {
                        continue;
                    }

                    if creates_four_three(&mut scratch, sq, side, &scores) {
                        totals[side.idx()] += scores.leaf_four_three_threat;
                        threat_flags[side.idx()] = true;
                        break;
                    }
                }
            }
        }

        BoardBreakdown {
            perspective,
            my_score: totals[perspective.idx()],
            opponent_score: totals[(!perspective).idx()],
            my_four_three_threat: threat_flags[perspective.idx()],
            opponent_four_three_threat: threat_flags[(!perspective).idx()],
            fukumi: if options.enable_fukumi {
                scores.fukumi_bonus
            } else {
                0
            },
        }
    }
}

/// The leaf evaluation split into its per-side terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardBreakdown {
    pub perspective: Stone,
    pub my_score: Score,
    pub opponent_score: Score,
    pub my_four_three_threat: bool,
    pub opponent_four_three_threat: bool,

    /// Legacy fukumi term, carried for display parity with old evaluation
    /// logs. Not part of the total.
    pub fukumi: Score,
}

impl BoardBreakdown {
    pub fn total(&self) -> Score {
        self.my_score - self.opponent_score
    }
}

impl Display for BoardBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?}: {} (own {}, opponent {}{}{}, fukumi {})",
            self.perspective,
            self.total(),
            self.my_score,
            self.opponent_score,
            if self.my_four_three_threat {
                ", own four-three threat"
            } else {
                ""
            },
            if self.opponent_four_three_threat {
                ", opponent four-three threat"
            } else {
                ""
            },
            self.fukumi,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::PatternScores;
    use board::board::Board;
    use Stone::*;

    fn position(diagram: &str, side: Stone) -> Position {
        let board: Board = diagram.parse().unwrap();
        Position::new(board, side)
    }

    #[test]
    fn empty_board_scores_zero() {
        let pos = Position::new(Board::new(), Black);
        let mut evaluator = Evaluator::default();

        assert_eq!(
            evaluator.evaluate_board(&pos, Black, &EvalOptions::default()),
            0
        );
    }

    #[test]
    fn perspective_flips_the_sign() {
        // Pairs only: nothing for the tempo discount to touch, so the two
        // viewpoints are exact mirrors.
        let pos = position(
            "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . o . . . . . . . . .
            . . . . . o . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . x x . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
            White,
        );

        let mut evaluator = Evaluator::default();
        let options = EvalOptions::default();

        let black_view = evaluator.evaluate_board(&pos, Black, &options);
        let white_view = evaluator.evaluate_board(&pos, White, &options);

        assert_eq!(black_view, -white_view);
    }

    #[test]
    fn tempo_discount_applies_to_the_last_mover() {
        let diagram = "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . x x x . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ";

        let mut evaluator = Evaluator::default();
        let options = EvalOptions::default();

        // White to move: black moved last, so black's open three is
        // discounted from black's own perspective.
        let fresh = evaluator.evaluate_board(
            &position(diagram, Black),
            Black,
            &options,
        );
        let stale = evaluator.evaluate_board(
            &position(diagram, White),
            Black,
            &options,
        );

        assert!(stale < fresh);
    }

    #[test]
    fn four_three_threat_is_spotted() {
        // Black has five stones arranged so that (7, 7) makes a four-three.
        let pos = position(
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
            Black,
        );

        let mut evaluator = Evaluator::default();
        let breakdown = evaluator.evaluate_board_breakdown(
            &pos,
            Black,
            &EvalOptions::default(),
        );

        assert!(breakdown.my_four_three_threat);
        assert!(breakdown.total() >= PatternScores::default().leaf_four_three_threat);
    }

    #[test]
    fn scan_order_does_not_change_the_score() {
        // The evaluation reads per-stone features; feeding the same board
        // built in two different stone orders must give the same score.
        let mut first = Board::new();
        let mut second = Board::new();

        let stones = [
            (Square::new(7, 4), Black),
            (Square::new(7, 5), Black),
            (Square::new(8, 8), White),
            (Square::new(4, 5), White),
            (Square::new(6, 6), Black),
        ];

        for &(sq, stone) in &stones {
            first.place(sq, stone);
        }
        for &(sq, stone) in stones.iter().rev() {
            second.place(sq, stone);
        }

        let mut evaluator = Evaluator::default();
        let options = EvalOptions::default();

        assert_eq!(
            evaluator.evaluate_board(&Position::new(first, Black), Black, &options),
            evaluator.evaluate_board(&Position::new(second, Black), Black, &options),
        );
    }
}
