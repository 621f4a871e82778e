//! Scores, the pattern table, and the two evaluators.
//!
//! All scoring in Hoshi flows through one immutable [`PatternScores`] table
//! held by the evaluator instance. The search reasons about a single signed
//! 32-bit `Score`; `FIVE` marks a win, and everything composite stays well
//! below `2 * FIVE`, so there is ample headroom in the accumulator.
//!
//! Two evaluators share the table:
//!
//! - [`Evaluator::evaluate_position`]: "what is placing a stone here worth",
//!   used at every interior choice point of the search. It can also answer
//!   `MINUS_INF` to flag a move that ignores a threat the side is obliged
//!   to answer.
//! - [`Evaluator::evaluate_board`]: the whole-board leaf evaluation at the
//!   search horizon.

mod eval_board;
mod eval_position;
pub mod options;
pub mod tactics;

use board::direction::DirectionPattern;
use board::lines::LineFeatures;
use board::rules::ForbiddenCache;
use board::square::Square;

pub use options::EvalOptions;

/// A score, in the engine's internal units.
pub type Score = i32;

/// Convenience methods on scores.
pub trait ScoreExt {
    /// A worse score than any real evaluation; also the in-band marker for
    /// a move that violates a mandatory defence.
    const MINUS_INF: Self;

    /// A better score than any real evaluation.
    const INF: Self;

    /// Whether the score means a forced or actual win (a five, possibly
    /// discounted by the distance to it).
    fn is_win(self) -> bool;

    /// Whether the score means the opponent has a forced or actual win.
    fn is_loss(self) -> bool;
}

impl ScoreExt for Score {
    const MINUS_INF: Self = -1_000_000;
    const INF: Self = 1_000_000;

    fn is_win(self) -> bool {
        self >= PatternScores::WIN_THRESHOLD
    }

    fn is_loss(self) -> bool {
        self <= -PatternScores::WIN_THRESHOLD
    }
}

/// The recognised pattern shapes, weakest first so the strongest shape in a
/// set of directions is just the max.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum PatternKind {
    Two,
    OpenTwo,
    Three,
    OpenThree,
    Four,
    OpenFour,
    Five,
}

/// Classify a direction pattern, or `None` for shapes worth nothing (a
/// fully blocked run, a lone stone).
pub fn pattern_kind(pattern: DirectionPattern) -> Option<PatternKind> {
    use PatternKind::*;

    // Overline handling is the rule engine's business: as far as scoring
    // goes, six in a row is no worse than five.
    match (pattern.count, pattern.open_ends()) {
        (5.., _) => Some(Five),
        (4, 2) => Some(OpenFour),
        (4, 1) => Some(Four),
        (3, 2) => Some(OpenThree),
        (3, 1) => Some(Three),
        (2, 2) => Some(OpenTwo),
        (2, 1) => Some(Two),
        _ => None,
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// The score table
//
////////////////////////////////////////////////////////////////////////////////

/// The table of pattern values and tactical bonuses.
///
/// Values are fixed at construction of an evaluator; the defaults below are
/// the tuned reference values. Keeping the table immutable per instance is
/// what makes the evaluators referentially transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternScores {
    /// A five: winning.
    pub five: Score,

    /// An open four: no defence exists.
    pub open_four: Score,

    /// A closed four or jump four: forces a reply.
    pub four: Score,

    /// An open three: forcing, one tempo slower.
    pub open_three: Score,

    /// A closed three.
    pub three: Score,

    /// Open and closed twos: material.
    pub open_two: Score,
    pub two: Score,

    /// A move making a four and a playable open three at once.
    pub four_three_bonus: Score,

    /// Mise moves: one, or two with no common answer.
    pub mise_bonus: Score,
    pub double_mise_bonus: Score,

    /// White traps built on Black's forbidden squares.
    pub forbidden_trap_strong: Score,
    pub forbidden_trap_setup: Score,
    pub forbidden_trap_three: Score,

    /// Penalties for Black threes whose own extensions are forbidden.
    pub forbidden_vulnerability_strong: Score,
    pub forbidden_vulnerability_mild: Score,
    pub forbidden_vulnerability_cap: Score,

    /// Per extra threatening direction beyond the first.
    pub multi_threat_bonus: Score,
    pub defense_multi_threat_bonus: Score,

    /// Defence weight scaling when the defending move is itself a four.
    pub counter_four_multiplier: f64,

    /// Diagonal shapes are slightly harder to see and to block.
    pub diagonal_bonus_multiplier: f64,

    /// Per extra active direction on one stone.
    pub connectivity_bonus: Score,

    /// Leaf discount on the last mover's open threes (they are one tempo
    /// stale by the time the opponent replies).
    pub tempo_open_three_discount: f64,

    /// Leaf bonus when a side has an empty square that makes a four-three.
    pub leaf_four_three_threat: Score,

    /// Maximum centre-proximity bonus.
    pub center_bonus: Score,

    /// Historical fukumi bonus. Shown in evaluation breakdowns for
    /// comparison with old logs, never added to a score.
    pub fukumi_bonus: Score,
}

impl Default for PatternScores {
    fn default() -> Self {
        Self {
            five: Self::FIVE,
            open_four: 10_000,
            four: 1_500,
            open_three: 1_000,
            three: 30,
            open_two: 50,
            two: 10,
            four_three_bonus: 5_000,
            mise_bonus: 1_000,
            double_mise_bonus: 4_000,
            forbidden_trap_strong: 5_000,
            forbidden_trap_setup: 1_500,
            forbidden_trap_three: 3_000,
            forbidden_vulnerability_strong: 800,
            forbidden_vulnerability_mild: 300,
            forbidden_vulnerability_cap: 1_500,
            multi_threat_bonus: 500,
            defense_multi_threat_bonus: 300,
            counter_four_multiplier: 1.5,
            diagonal_bonus_multiplier: 1.05,
            connectivity_bonus: 30,
            tempo_open_three_discount: 0.5,
            leaf_four_three_threat: 2_000,
            center_bonus: 5,
            fukumi_bonus: 800,
        }
    }
}

impl PatternScores {
    /// The winning score. A constant rather than a field so the search can
    /// compare against it without carrying a table around.
    pub const FIVE: Score = 100_000;

    /// Scores at or above this are wins (allowing for the per-ply discount
    /// the search applies to prefer shorter wins).
    pub const WIN_THRESHOLD: Score = Self::FIVE - 1_000;

    /// The value of a recognised pattern shape.
    pub fn score_of(&self, kind: PatternKind) -> Score {
        use PatternKind::*;

        match kind {
            Five => self.five,
            OpenFour => self.open_four,
            Four => self.four,
            OpenThree => self.open_three,
            Three => self.three,
            OpenTwo => self.open_two,
            Two => self.two,
        }
    }

    /// The value of a direction pattern.
    pub fn pattern_score(&self, pattern: DirectionPattern) -> Score {
        pattern_kind(pattern).map_or(0, |kind| self.score_of(kind))
    }

    /// How much of a pattern's value counts when an opposing stone on the
    /// same square would block it.
    pub fn defense_multiplier(kind: PatternKind) -> f64 {
        use PatternKind::*;

        match kind {
            Five => 1.0,
            OpenFour => 0.95,
            Four => 0.7,
            OpenThree => 0.7,
            Three => 0.3,
            OpenTwo => 0.2,
            Two => 0.1,
        }
    }

    /// The centre-proximity bonus for a square, falling off linearly with
    /// Manhattan distance from the centre.
    pub fn center_bonus(&self, sq: Square) -> Score {
        let distance = sq.distance(Square::CENTER) as f64;
        let bonus = self.center_bonus as f64 * (14.0 - distance) / 14.0;

        Score::max(0, bonus.round() as Score)
    }
}

////////////////////////////////////////////////////////////////////////////////
//
// The evaluator
//
////////////////////////////////////////////////////////////////////////////////

/// An evaluator instance: the score table, the forbidden-verdict cache, and
/// the leaf evaluator's line-feature scratch.
///
/// The scratch is owned here so only one leaf evaluation can be filling it
/// at a time; replicate the evaluator per search context if searches ever
/// run concurrently.
#[derive(Debug)]
pub struct Evaluator {
    /// The immutable score table.
    pub scores: PatternScores,

    /// Memoised forbidden verdicts, shared by every helper that asks.
    pub forbidden: ForbiddenCache,

    /// Scratch for `precompute` during leaf evaluation.
    features: Box<LineFeatures>,
}

impl Evaluator {
    pub fn new(scores: PatternScores) -> Self {
        Self {
            scores,
            forbidden: ForbiddenCache::new(),
            features: Box::new(LineFeatures::new()),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(PatternScores::default())
    }
}
