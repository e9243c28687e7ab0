//! Constants for board geometry, search parameters, and score sentinels.
//!
//! The board is stored as a bitboard where each row is `WIDTH` playable cells
//! followed by two padding bits. A knight jump never moves more than two
//! columns sideways, so the padding catches every jump that would otherwise
//! wrap onto the neighbouring row.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of playable columns.
pub const WIDTH: usize = 11;

/// Number of playable rows.
pub const HEIGHT: usize = 9;

/// Row stride in the flat layout (two padding columns per row).
pub const STRIDE: usize = WIDTH + 2;

/// Number of bits used by the bitboard. The last row does not need padding.
pub const BOARD_BITS: usize = STRIDE * HEIGHT - 2;

/// Number of playable cells on an empty board.
pub const OPEN_CELLS: usize = WIDTH * HEIGHT;

// =============================================================================
// Agent and Search Parameters
// =============================================================================

/// Fixed depth bound used by the custom agent.
pub const SEARCH_DEPTH: u32 = 4;

/// Plies during which the custom agent plays a uniformly random move.
pub const RANDOM_OPENING_PLIES: u32 = 2;

/// Depth bound of the sample minimax opponent.
pub const MINIMAX_DEPTH: u32 = 3;

/// Default time budget per move, in milliseconds.
pub const TIME_LIMIT_MS: u64 = 150;

/// Default number of match rounds (each round is two games).
pub const NUM_ROUNDS: usize = 5;

// =============================================================================
// Scores
// =============================================================================

/// Numeric desirability of a state. Only relative order matters.
pub type Score = f64;

/// Terminal utility of a won game.
pub const WIN_SCORE: Score = 1.0e6;

/// Terminal utility of a lost game.
pub const LOSS_SCORE: Score = -WIN_SCORE;

/// Initial alpha-beta window. Strictly outside every reachable score.
pub const SCORE_BOUND: Score = 1.0e9;

// =============================================================================
// Heuristic Tuning
// =============================================================================

/// Own-mobility weight of the aggressive heuristic.
pub const AGGRESSIVE_WEIGHT: Score = 1.5;

/// Divisor applied to the centrality difference.
pub const CENTRALITY_SCALE: Score = 10.0;

/// Opponent-mobility multipliers of the build heuristic, keyed by the
/// open-cell fraction they apply above. Checked in order; strict `>`.
pub const BUILD_PHASES: [(f64, Score); 3] = [(0.9, 1.50), (0.7, 1.75), (0.5, 2.00)];

/// Build multiplier once the open-cell fraction drops to 0.5 or below.
pub const BUILD_ENDGAME_MULTIPLIER: Score = 1.00;
