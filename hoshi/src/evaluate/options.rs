//! Feature flags for the evaluators and the search.
//!
//! Every tactical refinement can be switched off independently, which keeps
//! regressions bisectable and lets the benchmark driver measure what each
//! feature is worth. The defaults enable everything.

use crate::threats::ThreatInfo;

#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Track the (display-only) fukumi term in evaluation breakdowns.
    pub enable_fukumi: bool,

    /// Score mise moves (one move away from a four-three).
    pub enable_mise: bool,

    /// Score White shapes whose only answers are forbidden for Black.
    pub enable_forbidden_trap: bool,

    /// Bonus for threatening in several directions at once.
    pub enable_multi_threat: bool,

    /// Scale defence value up when the defending move makes its own four.
    pub enable_counter_four: bool,

    /// Try victory-by-continuous-threats proofs at the root.
    pub enable_vct: bool,

    /// Veto moves that ignore a threat the side must answer.
    pub enable_mandatory_defense: bool,

    /// Discount fours that lead nowhere after the forced block.
    pub enable_single_four_penalty: bool,

    /// Treat opponent mise squares as threats needing an answer.
    pub enable_mise_threat: bool,

    /// Treat a lone opponent double-three square as a threat needing an
    /// answer.
    pub enable_double_three_threat: bool,

    /// Null-move pruning in the alpha-beta search.
    pub enable_null_move_pruning: bool,

    /// Depth-1 futility pruning in the alpha-beta search.
    pub enable_futility_pruning: bool,

    /// Penalise Black threes whose extensions are forbidden squares.
    pub enable_forbidden_vulnerability: bool,

    /// How much of a pointless single four's value survives, in `0.0..=1.0`
    /// (1.0 disables the penalty entirely).
    pub single_four_penalty_multiplier: f64,

    /// A threat snapshot computed once at the root and reused at every
    /// depth, so the whole iteration defends against the same picture.
    pub precomputed_threats: Option<ThreatInfo>,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            enable_fukumi: true,
            enable_mise: true,
            enable_forbidden_trap: true,
            enable_multi_threat: true,
            enable_counter_four: true,
            enable_vct: true,
            enable_mandatory_defense: true,
            enable_single_four_penalty: true,
            enable_mise_threat: true,
            enable_double_three_threat: true,
            enable_null_move_pruning: true,
            enable_futility_pruning: true,
            enable_forbidden_vulnerability: true,
            single_four_penalty_multiplier: 0.5,
            precomputed_threats: None,
        }
    }
}
