//! The main alpha-beta function of the search routine.
//!
//! A fail-soft negamax over scored candidate moves. The position evaluator
//! does double duty at every node: its score orders the moves, its veto
//! (`MINUS_INF`) removes moves that ignore a mandatory defence, and a
//! winning score short-circuits the recursion entirely — no node ever sits
//! below a completed five.

use super::params::*;
use super::{RootCandidate, SearchRunner};
use crate::evaluate::{PatternScores, Score, ScoreExt};
use crate::history_tables::pv::PVTable;
use crate::move_picker::{MovePicker, ScoredMove};
use crate::position::Position;
use crate::transpositions::{NodeType, TTEntry};
use arrayvec::ArrayVec;
use board::movegen::generate_moves;
use board::square::Square;

impl<'a> SearchRunner<'a> {
    pub fn negamax(
        &mut self,
        pos: &Position,
        ply: usize,
        depth: usize,
        alpha: Score,
        beta: Score,
        pv: &mut PVTable,
        try_null: bool,
    ) -> Score {
        if self.aborted {
            return alpha;
        }

        let in_root = ply == 0;

        self.stats.nodes += 1;

        if !self.tc.should_continue(self.stats.nodes) {
            self.aborted = true;
            return alpha;
        }

        ////////////////////////////////////////////////////////////////////
        //
        // TT probe
        //
        // Reuse an earlier result for this position when it searched at
        // least as deep and its bound decides this window. Never cut at
        // the root: the root must rank all of its moves.
        //
        ////////////////////////////////////////////////////////////////////

        let tt_entry = self.tt.probe(pos.hash);
        let tt_move = tt_entry.and_then(|entry| entry.get_move());

        if tt_entry.is_some() {
            self.stats.tt_hits += 1;
        }

        if !in_root {
            if let Some(entry) = tt_entry {
                if let Some(score) = entry.try_score(depth, alpha, beta) {
                    self.stats.tt_cutoffs += 1;
                    return score;
                }
            }
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Horizon: hand over to the leaf evaluator.
        //
        ////////////////////////////////////////////////////////////////////

        if depth == 0 || ply >= MAX_DEPTH - 1 {
            let options = self.options_for(pos.side);
            return self.evaluator.evaluate_board(pos, pos.side, options);
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Null move pruning
        //
        // Hand the opponent a free move and search shallower with a null
        // window around beta. If we still clear beta, the real move can
        // only do better. Kept away from sparse boards and the root.
        //
        ////////////////////////////////////////////////////////////////////

        if try_null
            && self.options.enable_null_move_pruning
            && !in_root
            && depth >= NMP_MIN_DEPTH
            && beta < PatternScores::WIN_THRESHOLD
            && pos.stone_count() >= 6
        {
            let reduction = NMP_BASE_REDUCTION + depth / NMP_REDUCTION_DIVISOR;
            let null_depth = depth.saturating_sub(1 + reduction);

            let score = -self.negamax(
                &pos.play_null(),
                ply + 1,
                null_depth,
                -beta,
                -beta + 1,
                &mut PVTable::new(),
                false,
            );

            if self.aborted {
                return alpha;
            }

            if score >= beta {
                return beta;
            }
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Generate and score the moves
        //
        // Every candidate goes through the position evaluator once. A
        // veto drops the move; a winning score decides the node without
        // recursing.
        //
        ////////////////////////////////////////////////////////////////////

        let candidates =
            generate_moves(&pos.board, pos.side, false, &mut self.evaluator.forbidden);

        let node_options = self.options_for(pos.side);
        let mut scratch = pos.board.clone();
        let mut scored: ArrayVec<ScoredMove, { Square::COUNT }> = ArrayVec::new();

        for &sq in &candidates {
            let eval =
                self.evaluator
                    .evaluate_position(&mut scratch, sq, pos.side, node_options);

            if eval == Score::MINUS_INF {
                continue;
            }

            scored.push(ScoredMove { sq, eval });
        }

        // Every move ignores an unanswerable threat: the position is lost
        // in one.
        if scored.is_empty() {
            return ply as Score + 1 - PatternScores::FIVE;
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Futility grounds: at the last full-width ply, a static eval far
        // below alpha means quiet moves are not going to climb back.
        //
        ////////////////////////////////////////////////////////////////////

        let futile = self.options.enable_futility_pruning
            && depth == 1
            && !in_root
            && alpha.abs() < PatternScores::WIN_THRESHOLD
            && self.evaluator.evaluate_board(pos, pos.side, node_options) + FUTILITY_MARGIN
                < alpha;

        ////////////////////////////////////////////////////////////////////
        //
        // Clear the next ply's killers, so child nodes only see killers
        // coming from their own siblings.
        //
        ////////////////////////////////////////////////////////////////////

        if ply + 1 < MAX_DEPTH {
            self.history.clear_killers(ply + 1);
        }

        let principal = if in_root { self.principal } else { tt_move };

        let mut picker = MovePicker::new(
            scored,
            principal,
            &self.history.killers[ply],
            self.history,
            &pos.board,
            pos.side,
        );

        ////////////////////////////////////////////////////////////////////
        //
        // Iterate over the moves
        //
        ////////////////////////////////////////////////////////////////////

        let mut alpha = alpha;
        let mut best_score = Score::MINUS_INF;
        let mut best_move = None;
        let mut node_type = NodeType::Upper;
        let mut move_count = 0;
        let mut local_pv = PVTable::new();

        while let Some(mv) = picker.next() {
            local_pv.clear();

            // Quiet moves can't save a futile node.
            if futile && move_count > 0 && mv.eval < FUTILITY_QUIET_CEILING {
                move_count += 1;
                continue;
            }

            let nodes_before = self.stats.nodes;

            let score = if mv.eval >= PatternScores::FIVE {
                // The evaluator already proved this move wins; prefer the
                // shortest distance to it.
                PatternScores::FIVE - ply as Score
            } else {
                -self.negamax(
                    &pos.play(mv.sq),
                    ply + 1,
                    depth - 1,
                    -beta,
                    -alpha,
                    &mut local_pv,
                    true,
                )
            };

            move_count += 1;

            if in_root {
                let nodes = self.stats.nodes - nodes_before;
                self.history.add_nodes(mv.sq, nodes);
                self.root_moves.push(RootCandidate {
                    position: mv.sq,
                    score,
                    nodes,
                });
            }

            if self.aborted {
                // Report the best we actually finished.
                return if best_score > alpha { best_score } else { alpha };
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv.sq);
            }

            if score >= beta {
                node_type = NodeType::Lower;
                self.stats.beta_cutoffs += 1;
                self.history.add_killer(ply, mv.sq);
                self.history.add_cutoff(pos.side, mv.sq, depth);
                break;
            }

            if score > alpha {
                alpha = score;
                node_type = NodeType::Exact;
                pv.add_to_front(mv.sq, &local_pv);
            }
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Store the result and hand the score up.
        //
        ////////////////////////////////////////////////////////////////////

        self.tt.insert(TTEntry::new(
            pos.hash,
            best_move,
            best_score,
            depth,
            node_type,
            self.tt.get_age(),
        ));

        best_score
    }
}
