//! Forcing-sequence solvers.
//!
//! Alpha-beta with a heuristic evaluation can misjudge a position; these
//! searches don't. They only ever consider forcing moves — fours, and for
//! VCT also open threes — so every line they explore keeps the opponent
//! pinned, and a returned sequence is a proof: play it out and the five
//! appears, whatever the defender does.
//!
//! Three searches share the plumbing here:
//!
//! - VCF (victory by continuous fours), in [`vcf`]
//! - VCT (victory by continuous threats), in [`vct`]
//! - Mise-VCF (a mise move whose every answer leaves a VCF), in [`mise`]

mod mise;
mod vcf;
mod vct;

use crate::evaluate::PatternScores;
use board::board::Board;
use board::direction::{analyze_direction, Direction};
use board::movegen::{generate_moves, MoveList};
use board::rules::{check_jump_three, jump_three_gaps, ForbiddenCache};
use board::square::Square;
use board::stone::Stone;

/// Depth and node bounds for the forcing searches.
#[derive(Debug, Clone, Copy)]
pub struct SolverLimits {
    /// Maximum attacker moves in a VCF chain.
    pub max_vcf_depth: u8,

    /// Maximum attacker moves in a VCT chain. VCT branches much wider than
    /// VCF, so this sits a lot lower.
    pub max_vct_depth: u8,

    /// Hard cap on solver nodes per top-level query.
    pub max_nodes: u64,

    /// Record alternative defender choices alongside the principal line.
    pub collect_branches: bool,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            max_vcf_depth: 16,
            max_vct_depth: 6,
            max_nodes: 200_000,
            collect_branches: false,
        }
    }
}

/// One attacker move and the defender reply it forced (`None` on the final,
/// winning move, or when every defence was unplayable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofStep {
    pub attack: Square,
    pub defence: Option<Square>,
}

/// A defender choice other than the principal line, with the attacker's
/// winning answer to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofBranch {
    /// The ply (attacker move index) at which the defender deviates.
    pub ply: usize,

    /// The deviating defence.
    pub defence: Square,

    /// The attacker's winning reply, when one move suffices to name it.
    pub reply: Option<Square>,
}

/// A proven winning sequence.
#[derive(Debug, Clone, Default)]
pub struct ProofSequence {
    /// The principal line, attacker move by attacker move.
    pub steps: Vec<ProofStep>,

    /// Defender deviations collected on request.
    pub branches: Vec<ProofBranch>,
}

impl ProofSequence {
    /// The move that starts the proof.
    pub fn first_move(&self) -> Square {
        self.steps[0].attack
    }

    /// The attacker moves of the principal line.
    pub fn attacker_moves(&self) -> impl Iterator<Item = Square> + '_ {
        self.steps.iter().map(|step| step.attack)
    }
}

/// A solver session: limits, node budget, and the shared forbidden cache.
#[derive(Debug)]
pub struct Solver {
    pub limits: SolverLimits,
    scores: PatternScores,
    cache: ForbiddenCache,
    nodes: u64,
}

impl Solver {
    pub fn new(limits: SolverLimits) -> Self {
        Self {
            limits,
            scores: PatternScores::default(),
            cache: ForbiddenCache::new(),
            nodes: 0,
        }
    }

    /// Nodes spent since the last top-level query.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub(in crate::solver) fn start_query(&mut self) {
        self.nodes = 0;
    }

    /// Count a node against the budget; `false` means stop searching.
    pub(in crate::solver) fn tick(&mut self) -> bool {
        self.nodes += 1;
        self.nodes <= self.limits.max_nodes
    }

    pub(in crate::solver) fn scores(&self) -> PatternScores {
        self.scores.clone()
    }

    /// Candidate squares for either side: empty squares near stones, with
    /// Black's forbidden squares already filtered (five-makers kept).
    pub(in crate::solver) fn candidates(&mut self, board: &Board, stone: Stone) -> MoveList {
        generate_moves(board, stone, false, &mut self.cache)
    }

    /// Whether the square is playable for the colour (not a dead forbidden
    /// square).
    pub(in crate::solver) fn playable(&mut self, board: &Board, sq: Square, stone: Stone) -> bool {
        if !board.is_empty(sq) {
            return false;
        }

        if stone.is_white() {
            return true;
        }

        !self.cache.is_forbidden(board, sq) || board::rules::check_five(board, sq, stone)
    }

    pub(in crate::solver) fn forbidden_cache(&mut self) -> &mut ForbiddenCache {
        &mut self.cache
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// Threat geometry shared by the searches
//
////////////////////////////////////////////////////////////////////////////////

/// The squares that answer the fours made by the stone at `sq`: every five
/// point over every direction.
pub(in crate::solver) fn four_defences(board: &Board, sq: Square, stone: Stone) -> Vec<Square> {
    let mut defences = Vec::new();

    for dir in Direction::ALL {
        for point in board::rules::five_points(board, sq, dir, stone) {
            if !defences.contains(&point) {
                defences.push(point);
            }
        }
    }

    defences
}

/// The squares that answer the open threes made by the stone at `sq`:
/// extensions, natsu-dome squares, jump gaps and their outer bounds.
pub(in crate::solver) fn three_defences(board: &Board, sq: Square, stone: Stone) -> Vec<Square> {
    let mut defences = Vec::new();
    let mut push = |cell: Square| {
        if !defences.contains(&cell) {
            defences.push(cell);
        }
    };

    for dir in Direction::ALL {
        let pattern = analyze_direction(board, sq, dir, stone);

        if pattern.count == 3 && pattern.is_open() {
            let ends = open_run_ends(board, sq, dir, stone);

            for (end, sense) in ends.into_iter().flatten() {
                push(end);

                // Natsu-dome: when the other far side is blocked, one past
                // this end blocks too.
                let this_beyond = end.offset(dir, sense);
                let other_blocked = ends
                    .iter()
                    .flatten()
                    .filter(|(other, _)| *other != end)
                    .any(|(other, other_sense)| {
                        other
                            .offset(dir, *other_sense)
                            .map_or(true, |cell| !board.is_empty(cell))
                    });

                if other_blocked {
                    if let Some(beyond) = this_beyond {
                        if board.is_empty(beyond) {
                            push(beyond);
                        }
                    }
                }
            }
        } else if pattern.count != 3 && check_jump_three(board, sq, dir, stone) {
            for gap in jump_three_gaps(board, sq, dir, stone) {
                push(gap);
            }

            for (end, _) in open_run_ends(board, sq, dir, stone).into_iter().flatten() {
                push(end);
            }
        }
    }

    defences
}

/// The empty squares just past the run through `sq`, with the sense they
/// extend in.
fn open_run_ends(
    board: &Board,
    sq: Square,
    dir: Direction,
    stone: Stone,
) -> [Option<(Square, i32)>; 2] {
    let mut ends = [None, None];

    for (slot, sense) in [(0, 1), (1, -1)] {
        let mut step = 1;

        loop {
            match sq.offset(dir, sense * step) {
                Some(cell) if board.get(cell) == Some(stone) => step += 1,
                Some(cell) if board.is_empty(cell) => {
                    ends[slot] = Some((cell, sense));
                    break;
                }
                _ => break,
            }
        }
    }

    ends
}
