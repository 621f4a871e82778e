//! Victory by Continuous Threats.
//!
//! VCT extends VCF by letting the attacker force with open threes as well
//! as fours. That widens the defender's side too: besides the direct
//! defences of each threat, the defender may answer with any counter-four
//! or counter-three of their own, and the proof must beat every one of
//! those. The search is therefore an AND/OR tree — OR over attacker
//! threats, AND over defender answers — and much broader than VCF, so its
//! depth bound is tight.
//!
//! Two guards keep the proofs honest:
//!
//! - A standing defender open three cannot be out-forced by threes; when
//!   one is on the board, only a VCF is attempted.
//! - A root candidate is rejected when its forced defence hands the
//!   defender a counter-four the attacker can only block passively, or a
//!   counter-three the attacker cannot answer with a VCF.

use super::{four_defences, three_defences, ProofBranch, ProofSequence, ProofStep, Solver};
use crate::evaluate::tactics::{creates_four, creates_open_three};
use crate::threats::detect_opponent_threats;
use board::board::Board;
use board::rules::check_win;
use board::square::Square;
use board::stone::Stone;

impl Solver {
    /// Look for a VCT for `stone`.
    pub fn find_vct(&mut self, board: &Board, stone: Stone) -> Option<ProofSequence> {
        self.start_query();

        let mut scratch = board.clone();

        // Open three against us already on the board: a three of ours
        // never forces faster than it converts. VCF or nothing.
        let standing = detect_opponent_threats(&scratch, !stone);
        if !standing.open_threes.is_empty() {
            let mut steps = Vec::new();

            return self
                .vcf(&mut scratch, stone, 0, &mut steps)
                .then(|| ProofSequence {
                    steps,
                    branches: Vec::new(),
                });
        }

        let candidates = self.candidates(&scratch, stone);

        // Immediate wins don't need the machinery.
        for &sq in &candidates {
            if check_win(&scratch, sq, stone) {
                return Some(ProofSequence {
                    steps: vec![ProofStep {
                        attack: sq,
                        defence: None,
                    }],
                    branches: Vec::new(),
                });
            }
        }

        for &sq in &candidates {
            let makes_four = creates_four(&mut scratch, sq, stone);
            let makes_three = !makes_four && creates_open_three(&mut scratch, sq, stone);

            if !makes_four && !makes_three {
                continue;
            }

            if self.rejected_root(&mut scratch, sq, stone, makes_four) {
                continue;
            }

            let mut steps = Vec::new();
            let mut branches = Vec::new();

            if self.vct_attack(&mut scratch, stone, 0, sq, &mut steps, &mut branches) {
                return Some(ProofSequence { steps, branches });
            }
        }

        None
    }

    /// The root false-positive filters: does the forced defence hand the
    /// defender a counter-threat the attacker cannot profit from?
    fn rejected_root(
        &mut self,
        board: &mut Board,
        sq: Square,
        stone: Stone,
        makes_four: bool,
    ) -> bool {
        let defender = !stone;

        board.place(sq, stone);

        let defences = if makes_four {
            four_defences(board, sq, stone)
        } else {
            three_defences(board, sq, stone)
        };

        let mut rejected = false;

        'defences: for &d in &defences {
            if !self.playable(board, d, defender) {
                continue;
            }

            board.place(d, defender);

            // Counter-four: the attacker is pushed onto the block square;
            // if no block keeps a threat alive, the "proof" was optimism.
            let counter_blocks = four_defences(board, d, defender);

            if !counter_blocks.is_empty() {
                let mut productive = false;

                for &block in &counter_blocks {
                    if board.is_empty(block)
                        && self.playable(board, block, stone)
                        && (creates_four(board, block, stone)
                            || creates_open_three(board, block, stone))
                    {
                        productive = true;
                        break;
                    }
                }

                if !productive {
                    rejected = true;
                }
            }
            // Counter-three: only a VCF continues through it.
            else if creates_open_three_placed(board, d, defender)
                && !self.has_vcf_scratch(board, stone)
            {
                rejected = true;
            }

            board.remove(d);

            if rejected {
                break 'defences;
            }
        }

        board.remove(sq);

        rejected
    }

    fn has_vcf_scratch(&mut self, board: &Board, stone: Stone) -> bool {
        let mut scratch = board.clone();
        let mut steps = Vec::new();
        self.vcf(&mut scratch, stone, 0, &mut steps)
    }

    /// OR-node: try every forcing move for the attacker.
    fn vct(
        &mut self,
        board: &mut Board,
        stone: Stone,
        depth: u8,
        steps: &mut Vec<ProofStep>,
        branches: &mut Vec<ProofBranch>,
    ) -> bool {
        if depth > self.limits.max_vct_depth || !self.tick() {
            return false;
        }

        let candidates = self.candidates(board, stone);

        for &sq in &candidates {
            if check_win(board, sq, stone) {
                steps.push(ProofStep {
                    attack: sq,
                    defence: None,
                });
                return true;
            }
        }

        for &sq in &candidates {
            if self.vct_attack(board, stone, depth, sq, steps, branches) {
                return true;
            }
        }

        false
    }

    /// AND-node: play one forcing move and beat every defender answer.
    fn vct_attack(
        &mut self,
        board: &mut Board,
        stone: Stone,
        depth: u8,
        sq: Square,
        steps: &mut Vec<ProofStep>,
        branches: &mut Vec<ProofBranch>,
    ) -> bool {
        let defender = !stone;

        let makes_four = creates_four(board, sq, stone);
        let makes_three = !makes_four && creates_open_three(board, sq, stone);

        if !makes_four && !makes_three {
            return false;
        }

        board.place(sq, stone);

        // A four with two five points finishes like in VCF.
        if makes_four {
            let defences = four_defences(board, sq, stone);

            if defences.len() >= 2 {
                board.remove(sq);
                steps.push(ProofStep {
                    attack: sq,
                    defence: Some(defences[0]),
                });
                steps.push(ProofStep {
                    attack: defences[1],
                    defence: None,
                });
                return true;
            }
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Build the defender's options: direct defences plus every
        // counter-four and counter-three of their own.
        //
        ////////////////////////////////////////////////////////////////////

        let mut options = if makes_four {
            four_defences(board, sq, stone)
        } else {
            three_defences(board, sq, stone)
        };

        let defender_candidates = self.candidates(board, defender);

        for &option in &defender_candidates {
            // A defender with a five in hand just wins; our three was too
            // slow (a four would have been caught as their forced block).
            if check_win(board, option, defender) {
                board.remove(sq);
                return false;
            }

            if creates_four(board, option, defender)
                || creates_open_three(board, option, defender)
            {
                if !options.contains(&option) {
                    options.push(option);
                }
            }
        }

        let mut playable_options = Vec::with_capacity(options.len());
        for option in options {
            if self.playable(board, option, defender) {
                playable_options.push(option);
            }
        }

        // Every answer forbidden or none at all: the threat converts
        // unopposed.
        if playable_options.is_empty() {
            board.remove(sq);
            steps.push(ProofStep {
                attack: sq,
                defence: None,
            });
            return true;
        }

        ////////////////////////////////////////////////////////////////////
        //
        // AND over the options: each one must lose to a continuation.
        //
        ////////////////////////////////////////////////////////////////////

        let mut principal: Option<(Square, Vec<ProofStep>, Vec<ProofBranch>)> = None;

        for &option in &playable_options {
            board.place(option, defender);

            let mut sub_steps = Vec::new();
            let mut sub_branches = Vec::new();
            let won =
                self.vct(board, stone, depth + 1, &mut sub_steps, &mut sub_branches);

            board.remove(option);

            if !won {
                board.remove(sq);
                return false;
            }

            if principal.is_none() {
                principal = Some((option, sub_steps, sub_branches));
            } else if self.limits.collect_branches {
                branches.push(ProofBranch {
                    ply: depth as usize,
                    defence: option,
                    reply: sub_steps.first().map(|step| step.attack),
                });
            }
        }

        board.remove(sq);

        let (defence, line, sub_branches) = principal.expect("options were non-empty");
        steps.push(ProofStep {
            attack: sq,
            defence: Some(defence),
        });
        steps.extend(line);
        branches.extend(sub_branches);

        true
    }
}

/// Does the stone already sitting at `sq` make a playable open three?
fn creates_open_three_placed(board: &Board, sq: Square, stone: Stone) -> bool {
    board::direction::Direction::ALL
        .iter()
        .any(|&dir| board::rules::is_valid_open_three(board, sq, dir, stone))
}

#[cfg(test)]
mod tests {
    use super::super::SolverLimits;
    use super::*;
    use Stone::*;

    fn board(diagram: &str) -> Board {
        diagram.parse().unwrap()
    }

    fn solver() -> Solver {
        Solver::new(SolverLimits {
            collect_branches: true,
            ..SolverLimits::default()
        })
    }

    #[test]
    fn double_three_fork_is_a_vct_win_for_white() {
        // White plays (7, 7): two open threes at once. Whatever black
        // blocks, the other three becomes a straight four.
        let b = board(
            "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . o . . . . . . .
            . . . . . . . o . . . . . . .
            . . . . . o o . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
        );

        let proof = solver().find_vct(&b, White).expect("VCT exists");

        // Replay the principal line: it must end on a white win.
        let mut replay = b.clone();
        let mut last = proof.steps[0].attack;

        for step in &proof.steps {
            replay.place(step.attack, White);
            last = step.attack;

            if let Some(defence) = step.defence {
                replay.place(defence, Black);
            }
        }

        assert!(check_win(&replay, last, White));
    }

    #[test]
    fn standing_defender_three_blocks_vct() {
        // White holds an open three; black has no VCF, so no proof may be
        // claimed.
        let b = board(
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
            . . . x x . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . x . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
        );

        assert!(solver().find_vct(&b, Black).is_none());
    }

    #[test]
    fn vcf_positions_still_prove_through_vct() {
        // A straight-four point: pure VCF territory, which VCT must also
        // find.
        let mut b = Board::new();
        for col in 4..7 {
            b.place(Square::new(7, col), Black);
        }

        let proof = solver().find_vct(&b, Black).expect("VCT exists");

        let mut replay = b.clone();
        let mut last = proof.steps[0].attack;

        for step in &proof.steps {
            replay.place(step.attack, Black);
            last = step.attack;

            if let Some(defence) = step.defence {
                replay.place(defence, White);
            }
        }

        assert!(board::rules::check_five(&replay, last, Black));
    }

    #[test]
    fn board_is_unchanged_by_the_search() {
        let b = board(
            "
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . o . . . . . . .
            . . . . . . . o . . . . . . .
            . . . . . o o . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . x . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        ",
        );

        let before = b.clone();
        solver().find_vct(&b, White);
        assert_eq!(b, before);
    }
}
