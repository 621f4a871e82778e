//! The search logic for Hoshi.
//!
//! The driver here runs an iterative-deepening loop over the negamax
//! search: depth 1, then 2, and so on until the depth cap or a time or
//! node limit ends it. Each iteration seeds the next — the previous best
//! move is searched first, the transposition table remembers scores and
//! moves, and killer and history tables carry ordering hints across
//! siblings.
//!
//! Before any of that, the root tries to settle the position outright with
//! the proof searches: VCT when the board is busy enough, then VCF, then
//! mise-VCF. A proof beats any heuristic search, so a hit skips the
//! minimax entirely.
//!
//! When a limit interrupts the last iteration, its half-searched result is
//! not trusted blindly: a score that collapsed against the previous
//! iteration usually means the search stumbled into a problem it didn't
//! finish analysing, and the previous iteration's move is preferred (the
//! time-pressure fallback).

pub(crate) mod params;
mod negamax;

use crate::evaluate::{EvalOptions, Evaluator, PatternScores, Score, ScoreExt};
use crate::history_tables::pv::PVTable;
use crate::history_tables::History;
use crate::position::Position;
use crate::solver::{Solver, SolverLimits};
use crate::threats::detect_opponent_threats;
use crate::time_control::TimeController;
use crate::transpositions::TTable;
use board::board::Board;
use board::square::Square;
use board::stone::Stone;
use params::*;
use std::time::Duration;

////////////////////////////////////////////////////////////////////////////////
//
// Limits, stats, outcome
//
////////////////////////////////////////////////////////////////////////////////

/// The caller-facing search budget.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Nominal depth cap for the iterative deepening loop.
    pub depth: usize,

    /// Soft time budget.
    pub time_limit: Option<Duration>,

    /// Hard wall-clock cap.
    pub absolute_time_limit: Duration,

    /// Node budget.
    pub max_nodes: Option<u64>,

    /// Pick among near-equal root moves instead of always the first, in
    /// `0.0..=1.0`. Zero is deterministic.
    pub random_factor: f64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            depth: 6,
            time_limit: None,
            absolute_time_limit: Duration::from_millis(DEFAULT_ABSOLUTE_TIME_LIMIT_MS),
            max_nodes: None,
            random_factor: 0.0,
        }
    }
}

/// Aggregated counters for one `find_best_move` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
    pub beta_cutoffs: u64,
    pub solver_nodes: u64,

    /// Transposition table occupancy at the end of the search (0 - 1).
    pub tt_occupancy: f32,
}

impl SearchStats {
    /// The fraction of non-leaf probes that found their position.
    pub fn tt_hit_rate(&self) -> f64 {
        if self.nodes == 0 {
            0.0
        } else {
            self.tt_hits as f64 / self.nodes as f64
        }
    }
}

/// One completed (or interrupted) iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthRecord {
    pub depth: usize,
    pub best_move: Square,
    pub score: Score,
}

/// A root move with its final score and the nodes spent below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootCandidate {
    pub position: Square,
    pub score: Score,
    pub nodes: u64,
}

/// Everything `find_best_move` has to say.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The chosen move. `None` only when the side to move has no move at
    /// all worth naming (every square lost on the spot).
    pub position: Option<Square>,

    /// The score of the chosen move, from the mover's point of view.
    pub score: Score,

    /// The deepest fully completed iteration (0 when a proof search
    /// settled the position before any iteration ran).
    pub completed_depth: usize,

    /// Whether a time or node limit cut the search short.
    pub interrupted: bool,

    pub elapsed: Duration,
    pub stats: SearchStats,

    /// Best move and score per iteration, in depth order.
    pub depth_history: Vec<DepthRecord>,

    /// The root moves of the last iteration, best first.
    pub candidates: Vec<RootCandidate>,

    /// The fallback kicked in: the reported move comes from an earlier,
    /// fully analysed iteration.
    pub time_pressure_fallback: bool,
    pub fallback_from_depth: Option<usize>,
}

////////////////////////////////////////////////////////////////////////////////
//
// The runner: one iteration's worth of mutable search state.
//
////////////////////////////////////////////////////////////////////////////////

pub(crate) struct SearchRunner<'a> {
    pub tt: &'a mut TTable,
    pub history: &'a mut History,
    pub evaluator: &'a mut Evaluator,
    pub tc: &'a mut TimeController,

    /// Root-side options, carrying the root threat snapshot.
    pub options: &'a EvalOptions,

    /// The same options without the snapshot, for the opponent's nodes:
    /// the snapshot describes the root side's opponent, nobody else.
    pub opponent_options: &'a EvalOptions,

    /// The side the search is running for.
    pub root_side: Stone,

    /// The previous iteration's best move, searched first at the root.
    pub principal: Option<Square>,

    pub stats: SearchStats,
    pub aborted: bool,
    pub root_moves: Vec<RootCandidate>,
}

impl<'a> SearchRunner<'a> {
    /// The options a node for `side` should evaluate with.
    pub(crate) fn options_for(&self, side: Stone) -> &'a EvalOptions {
        if side == self.root_side {
            self.options
        } else {
            self.opponent_options
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// The searcher
//
////////////////////////////////////////////////////////////////////////////////

/// A reusable search session: transposition table, history, evaluator and
/// solver survive across moves of the same game.
pub struct Searcher {
    pub tt: TTable,
    pub history: History,
    pub evaluator: Evaluator,
    pub solver: Solver,
}

impl Searcher {
    pub fn new() -> Self {
        Self::with_table_size(DEFAULT_TT_MB)
    }

    pub fn with_table_size(mb: usize) -> Self {
        Self {
            tt: TTable::with_capacity(mb),
            history: History::new(),
            evaluator: Evaluator::default(),
            solver: Solver::new(SolverLimits::default()),
        }
    }

    /// Pick the best move for `stone` under the given limits.
    pub fn find_best_move(
        &mut self,
        board: &Board,
        stone: Stone,
        limits: &SearchLimits,
        options: &EvalOptions,
    ) -> SearchOutcome {
        let mut options = options.clone();
        let mut tc = TimeController::new(
            limits.time_limit,
            Some(limits.absolute_time_limit),
            limits.max_nodes,
        );

        self.tt.increment_age();
        self.history.age_scores();
        self.history.clear_nodes();

        let position = Position::new(board.clone(), stone);
        let mut stats = SearchStats::default();

        ////////////////////////////////////////////////////////////////////
        //
        // One threat snapshot for the whole search: every depth defends
        // against the same picture of the opponent.
        //
        ////////////////////////////////////////////////////////////////////

        if options.precomputed_threats.is_none() {
            options.precomputed_threats = Some(detect_opponent_threats(board, !stone));
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Proof searches at the root: VCT on busy boards, then VCF, then
        // mise-VCF. A proof ends the search on the spot.
        //
        ////////////////////////////////////////////////////////////////////

        if !board.is_blank() {
            if options.enable_vct && board.total_stones() >= VCT_STONE_THRESHOLD {
                if let Some(proof) = self.solver.find_vct(board, stone) {
                    stats.solver_nodes += self.solver.nodes();
                    return Self::proof_outcome(proof.first_move(), stats, &tc);
                }
                stats.solver_nodes += self.solver.nodes();
            }

            if let Some(proof) = self.solver.find_vcf(board, stone) {
                stats.solver_nodes += self.solver.nodes();
                return Self::proof_outcome(proof.first_move(), stats, &tc);
            }
            stats.solver_nodes += self.solver.nodes();

            if options.enable_mise {
                if let Some(proof) = self.solver.find_mise_vcf(board, stone, true) {
                    stats.solver_nodes += self.solver.nodes();
                    return Self::proof_outcome(proof.first_move(), stats, &tc);
                }
                stats.solver_nodes += self.solver.nodes();
            }
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Iterative deepening
        //
        ////////////////////////////////////////////////////////////////////

        let opponent_options = EvalOptions {
            precomputed_threats: None,
            ..options.clone()
        };

        let max_depth = limits.depth.clamp(1, MAX_DEPTH - 1);
        let mut depth_history: Vec<DepthRecord> = Vec::new();
        let mut candidates: Vec<RootCandidate> = Vec::new();
        let mut best_move = None;
        let mut best_score = Score::MINUS_INF;
        let mut completed_depth = 0;
        let mut depth = 1;

        while depth <= max_depth && tc.should_start_iteration(depth) {
            let mut pv = PVTable::new();
            self.history.clear_all_killers();

            let mut runner = SearchRunner {
                tt: &mut self.tt,
                history: &mut self.history,
                evaluator: &mut self.evaluator,
                tc: &mut tc,
                options: &options,
                opponent_options: &opponent_options,
                root_side: stone,
                principal: best_move,
                stats: SearchStats::default(),
                aborted: false,
                root_moves: Vec::new(),
            };

            let score = runner.negamax(
                &position,
                0,
                depth,
                Score::MINUS_INF,
                Score::INF,
                &mut pv,
                true,
            );

            let aborted = runner.aborted;
            let mut root_moves = runner.root_moves;

            stats.nodes += runner.stats.nodes;
            stats.tt_hits += runner.stats.tt_hits;
            stats.tt_cutoffs += runner.stats.tt_cutoffs;
            stats.beta_cutoffs += runner.stats.beta_cutoffs;

            root_moves.sort_by(|a, b| b.score.cmp(&a.score));

            let iteration_move = pv
                .pv_move()
                .or_else(|| root_moves.first().map(|c| c.position));

            if let Some(mv) = iteration_move {
                depth_history.push(DepthRecord {
                    depth,
                    best_move: mv,
                    score,
                });

                best_move = Some(mv);
                best_score = score;

                if !root_moves.is_empty() {
                    candidates = root_moves;
                }
            }

            if aborted {
                break;
            }

            completed_depth = depth;

            // A proven win or loss doesn't get better with depth.
            if score.is_win() || score.is_loss() {
                break;
            }

            depth += 1;
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Time-pressure fallback
        //
        // An interrupted iteration whose score collapsed saw a problem it
        // didn't finish reading. The deepest fully-analysed iteration
        // whose move still scored well is the safer answer.
        //
        ////////////////////////////////////////////////////////////////////

        let interrupted = tc.interrupted();
        let mut time_pressure_fallback = false;
        let mut fallback_from_depth = None;

        if interrupted && depth_history.len() >= 2 {
            let latest = *depth_history.last().unwrap();
            let prior = depth_history[..depth_history.len() - 1]
                .iter()
                .max_by_key(|record| record.score)
                .copied()
                .unwrap();

            if prior.score - latest.score >= TIME_PRESSURE_SCORE_DROP && prior.depth > 0 {
                best_move = Some(prior.best_move);
                best_score = prior.score;
                time_pressure_fallback = true;
                fallback_from_depth = Some(prior.depth);
            }
        }

        ////////////////////////////////////////////////////////////////////
        //
        // Optional variety between near-equal root moves.
        //
        ////////////////////////////////////////////////////////////////////

        if limits.random_factor > 0.0
            && !time_pressure_fallback
            && !best_score.is_win()
            && candidates.len() > 1
        {
            let margin = (limits.random_factor * 400.0).round() as Score;
            let eligible: Vec<&RootCandidate> = candidates
                .iter()
                .filter(|c| c.score >= best_score - margin)
                .collect();

            if eligible.len() > 1 {
                let seed = tc.elapsed().as_nanos() as u64 | 1;
                let roll = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                let picked = eligible[(roll >> 33) as usize % eligible.len()];

                best_move = Some(picked.position);
                best_score = picked.score;
            }
        }

        stats.tt_occupancy = self.tt.occupancy();

        SearchOutcome {
            position: best_move,
            score: best_score,
            completed_depth,
            interrupted,
            elapsed: tc.elapsed(),
            stats,
            depth_history,
            candidates,
            time_pressure_fallback,
            fallback_from_depth,
        }
    }

    fn proof_outcome(first_move: Square, stats: SearchStats, tc: &TimeController) -> SearchOutcome {
        SearchOutcome {
            position: Some(first_move),
            score: PatternScores::FIVE,
            completed_depth: 0,
            interrupted: false,
            elapsed: tc.elapsed(),
            stats,
            depth_history: Vec::new(),
            candidates: vec![RootCandidate {
                position: first_move,
                score: PatternScores::FIVE,
                nodes: stats.solver_nodes,
            }],
            time_pressure_fallback: false,
            fallback_from_depth: None,
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience wrapper around [`Searcher::find_best_move`].
pub fn find_best_move(
    board: &Board,
    stone: Stone,
    limits: &SearchLimits,
    options: &EvalOptions,
) -> SearchOutcome {
    Searcher::new().find_best_move(board, stone, limits, options)
}
