//! Mise-VCF: a quiet-looking move that cannot be defended.
//!
//! A mise move threatens a four-three next turn. When, in addition, every
//! reply the defender has — covering the mise targets, or answering the
//! threes the mise itself made — still leaves a VCF for the mover, the mise
//! is as good as a proven win, one tempo earlier than VCF alone can see.
//!
//! The caller usually applies the "nori" filter on top: a mise whose direct
//! defence arrives with a counter-threat (the defence itself makes a four
//! or an open three) gives the tempo right back and proves nothing.

use super::{three_defences, ProofSequence, ProofStep, Solver};
use crate::evaluate::tactics::{creates_four, creates_open_three, find_mise_targets};
use board::board::Board;
use board::square::Square;
use board::stone::Stone;

impl Solver {
    /// Look for a mise move for `stone` such that every defender reply
    /// leaves a VCF. `apply_nori` additionally rejects mises whose defence
    /// comes with tempo.
    pub fn find_mise_vcf(
        &mut self,
        board: &Board,
        stone: Stone,
        apply_nori: bool,
    ) -> Option<ProofSequence> {
        self.start_query();

        let mut scratch = board.clone();
        let candidates = self.candidates(&scratch, stone);

        for &sq in &candidates {
            if let Some(proof) = self.try_mise(&mut scratch, sq, stone, apply_nori) {
                return Some(proof);
            }
        }

        None
    }

    fn try_mise(
        &mut self,
        board: &mut Board,
        sq: Square,
        stone: Stone,
        apply_nori: bool,
    ) -> Option<ProofSequence> {
        if !self.tick() {
            return None;
        }

        let defender = !stone;
        let scores = self.scores();

        // A mise that is itself a four belongs to VCF, not here.
        if creates_four(board, sq, stone) {
            return None;
        }

        board.place(sq, stone);

        let targets = {
            let cache = self.forbidden_cache();
            find_mise_targets(board, sq, stone, &scores, cache)
        };

        if targets.is_empty() {
            board.remove(sq);
            return None;
        }

        ////////////////////////////////////////////////////////////////////
        //
        // The defence set: the mise targets themselves, plus the defences
        // of whatever threats the mise move created (a mise is often also
        // a three the defender must answer).
        //
        ////////////////////////////////////////////////////////////////////

        let mut defences = targets;

        for cell in three_defences(board, sq, stone) {
            if !defences.contains(&cell) {
                defences.push(cell);
            }
        }

        let mut result = None;
        let mut principal: Option<(Square, Vec<ProofStep>)> = None;
        let mut all_answered = true;

        for &defence in &defences {
            if !self.playable(board, defence, defender) {
                continue;
            }

            // Nori: the defence makes its own threat, the tempo is gone.
            if apply_nori
                && (creates_four(board, defence, defender)
                    || creates_open_three(board, defence, defender))
            {
                all_answered = false;
                break;
            }

            board.place(defence, defender);

            let mut steps = Vec::new();
            let proven = self.vcf(board, stone, 0, &mut steps);

            board.remove(defence);

            if !proven {
                all_answered = false;
                break;
            }

            if principal.is_none() {
                principal = Some((defence, steps));
            }
        }

        board.remove(sq);

        if all_answered {
            if let Some((defence, line)) = principal {
                let mut steps = vec![ProofStep {
                    attack: sq,
                    defence: Some(defence),
                }];
                steps.extend(line);

                result = Some(ProofSequence {
                    steps,
                    branches: Vec::new(),
                });
            }
        }

        result
    }
}
