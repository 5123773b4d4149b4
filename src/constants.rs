//! Constants for board encoding, default sizes, and search parameters.
//!
//! The board is a `(2N-1) x (2N-1)` matrix. Cells with an even row and an
//! even column are platforms; every other cell is a border slot that can hold
//! a wall segment. Slot values are positive while open and negative once a
//! wall covers them.

// =============================================================================
// Board Encoding
// =============================================================================

/// Value of every platform cell. Platforms never change.
pub const PLATFORM: i8 = 0;

/// Value of an open border slot.
pub const OPEN_SLOT: i8 = 1;

/// Slot value for a wall placed by player one.
pub const WALL_P1: i8 = -1;

/// Slot value for a wall placed by player two.
pub const WALL_P2: i8 = -2;

/// Default number of platforms per side (a classic 9x9 board).
pub const DEFAULT_SIZE: usize = 9;

/// Smallest playable board: two platforms per side.
pub const MIN_SIZE: usize = 2;

/// Largest accepted board.
pub const MAX_SIZE: usize = 64;

/// Number of border slots covered by one wall.
pub const WALL_LEN: usize = 3;

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// Unit steps `(dx, dy)` in scan order: Up, Down, Left, Right.
///
/// One step lands on the border slot, two steps on the next platform.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of search iterations per decision.
pub const N_ITERATIONS: usize = 1000;

/// Constant inside the UCB1 exploration term `sqrt(C * ln(N) / n)`.
pub const EXPLORATION: f64 = 2.0;

/// Weight applied to the route-length differential added to UCB1.
pub const HEURISTIC_WEIGHT: f64 = 1.0;

/// Magnitude of the score propagated from a node whose state is already decided.
pub const TERMINAL_SCORE: f64 = 1000.0;

/// Progress report period (iterations between debug log lines).
pub const REPORT_PERIOD: usize = 200;

// =============================================================================
// Rollout Policy Probabilities
// =============================================================================

/// Probability of moving the pawn instead of placing a wall.
pub const PROB_MOVE: f64 = 0.7;

/// Probability of stepping along the cached shortest route when moving.
pub const PROB_FOLLOW_ROUTE: f64 = 0.75;

/// Upper bound on rollout length before the leader is declared the winner.
pub const MAX_ROLLOUT_TURNS: usize = 400;
