// ============================================================================
// Lifecycle Timing (ticks)
// ============================================================================

pub const WAIT_TIME: u32 = 100; // Pause after being caught, and half the pause after a cleared level
pub const SPIN_TIME: u32 = 100; // Length of the death spin
pub const SPIN_SPEED: u32 = 5; // Ticks per quarter turn while spinning

// ============================================================================
// Scoring
// ============================================================================

pub const DOT_SCORE: u64 = 10;
pub const ENERGIZER_SCORE: u64 = 40; // A dot lies under every energizer, so a pickup shows up as 50
pub const EAT_GHOST_BASE_SCORE: u64 = 200; // Doubles with every ghost eaten during one frighten window

// ============================================================================
// Direction Scores
// ============================================================================

pub const SCORE_BLOCKED: f64 = 0.0;
pub const SCORE_OPEN: f64 = 1.0;
pub const SCORE_REWARD: f64 = 2.0;
pub const SCORE_UNEXPLORED: f64 = 2.0; // Promotion for directions leading to unknown territory
pub const QUADRANT_BONUS: f64 = 0.5;
pub const JITTER_FLOOR: f64 = 0.51; // Lower bound of the multiplicative jitter factor

// ============================================================================
// Ghosts
// ============================================================================

pub const FRIGHTEN_TIME: u32 = 360; // Ticks a ghost stays edible after the frighten flag
pub const JAIL_TIME: u32 = 120; // Ticks an eaten ghost waits in the holding area
pub const GHOST_RANDOM_TURN_PROBABILITY: f64 = 0.1;

// ============================================================================
// Scheduler Orderings (lower runs first within a tick)
// ============================================================================

pub const ORDER_LIFECYCLE: i32 = 0; // Lifecycle driver and frighten reset
pub const ORDER_PAC: i32 = 1; // Player agents decide and move before pursuers react
pub const ORDER_GHOST: i32 = 2;
pub const ORDER_LEVEL_RESET: i32 = 3; // After everyone has moved; runs before a death in the same tick
pub const ORDER_DEATH: i32 = 4;

// ============================================================================
// Run Defaults
// ============================================================================

pub const DEFAULT_LEVELS: u32 = 500;
pub const DEFAULT_SEED: u64 = 0x5eed;
