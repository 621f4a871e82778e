//! Victory by Continuous Fours.
//!
//! The attacker only ever plays moves that win outright or make a four; the
//! defender's reply to a four is forced onto its five point. The chain
//! either reaches a five (a proof) or runs dry. Because the defender never
//! gets a free move, depth can go quite deep at very low cost.

use super::{four_defences, ProofSequence, ProofStep, Solver};
use board::board::Board;
use board::rules::check_win;
use board::stone::Stone;

impl Solver {
    /// Look for a VCF for `stone`. The returned sequence, played out with
    /// the forced defences, ends in a five.
    pub fn find_vcf(&mut self, board: &Board, stone: Stone) -> Option<ProofSequence> {
        self.start_query();

        let mut scratch = board.clone();
        let mut steps = Vec::new();

        if self.vcf(&mut scratch, stone, 0, &mut steps) {
            Some(ProofSequence {
                steps,
                branches: Vec::new(),
            })
        } else {
            None
        }
    }

    /// Quick existence check, without keeping the line.
    pub fn has_vcf(&mut self, board: &mut Board, stone: Stone) -> bool {
        let mut steps = Vec::new();
        self.vcf(board, stone, 0, &mut steps)
    }

    /// The recursive chain search. On success, prepends its line to
    /// `steps`; on failure the board and `steps` are left as found.
    pub(in crate::solver) fn vcf(
        &mut self,
        board: &mut Board,
        stone: Stone,
        depth: u8,
        steps: &mut Vec<ProofStep>,
    ) -> bool {
        if depth > self.limits.max_vcf_depth || !self.tick() {
            return false;
        }

        let defender = !stone;
        let candidates = self.candidates(board, stone);

        ////////////////////////////////////////////////////////////////////
        //
        // Wins first: any five-maker ends the chain.
        //
        ////////////////////////////////////////////////////////////////////

        for &sq in &candidates {
            if check_win(board, sq, stone) {
                steps.push(ProofStep {
                    attack: sq,
                    defence: None,
                });
                return true;
            }
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Four-makers: each forces the defender onto the five point, after
        // which we chain.
        //
        ////////////////////////////////////////////////////////////////////

        for &sq in &candidates {
            if !crate::evaluate::tactics::creates_four(board, sq, stone) {
                continue;
            }

            board.place(sq, stone);
            let defences = four_defences(board, sq, stone);

            // Two or more five points means an open four (or a double
            // four): whichever the defender blocks, the other one is the
            // five.
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

            let block = defences[0];

            // A Black defender facing a forbidden block square simply may
            // not defend.
            if !self.playable(board, block, defender) {
                board.remove(sq);
                steps.push(ProofStep {
                    attack: sq,
                    defence: None,
                });
                return true;
            }

            // If the block completes the defender's own five, this four was
            // a losing move; try another.
            if check_win(board, block, defender) {
                board.remove(sq);
                continue;
            }

            steps.push(ProofStep {
                attack: sq,
                defence: Some(block),
            });
            board.place(block, defender);

            let won = self.vcf(board, stone, depth + 1, steps);

            board.remove(block);
            board.remove(sq);

            if won {
                return true;
            }

            steps.pop();
        }

        false
    }
}
