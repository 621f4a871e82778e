//! Search tunables, collected in one place.

use crate::evaluate::Score;

/// The maximum ply depth the search will ever reach.
pub const MAX_DEPTH: usize = 64;

/// Killer-move slots per ply.
pub const MAX_KILLERS: usize = 2;

/// Default transposition table size, in MiB.
pub const DEFAULT_TT_MB: usize = 16;

/// How many nodes between clock checks.
pub const CHECKUP_WINDOW: u64 = 1024;

/// Hard wall-clock cap when the caller doesn't set one, in milliseconds.
pub const DEFAULT_ABSOLUTE_TIME_LIMIT_MS: u64 = 10_000;

/// Null-move pruning: minimum depth, and the reduction `R = BASE + d / DIV`.
pub const NMP_MIN_DEPTH: usize = 3;
pub const NMP_BASE_REDUCTION: usize = 2;
pub const NMP_REDUCTION_DIVISOR: usize = 4;

/// Futility pruning at depth 1: margin below alpha, and the move-score
/// ceiling under which a move counts as quiet.
pub const FUTILITY_MARGIN: Score = 800;
pub const FUTILITY_QUIET_CEILING: Score = 900;

/// A drop this large between iterations triggers the time-pressure
/// fallback to the previous iteration's move.
pub const TIME_PRESSURE_SCORE_DROP: Score = 1500;

/// Minimum stones on the board before the root tries a full VCT proof.
pub const VCT_STONE_THRESHOLD: usize = 14;

/// Move-ordering bonuses: the principal/TT move first, then killers.
pub const PRINCIPAL_MOVE_BONUS: i32 = 1_000_000;
pub const KILLER_BONUS: i32 = 10_000;

/// Weight of stone proximity in the shallow ordering score.
pub const PROXIMITY_BONUS: i32 = 10;
