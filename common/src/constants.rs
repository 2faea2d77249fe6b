// ============================================================================
// Maze Grid
// ============================================================================

pub const MAZE_COLS: i32 = 28; // Number of grid columns (X axis)
pub const MAZE_ROWS: i32 = 35; // Number of grid rows (Y axis, grows southward)
pub const MAZE_CELLS: usize = (MAZE_COLS * MAZE_ROWS) as usize;

// Quadrant split lines (cells with x < QUADRANT_SPLIT_COL are western, y < QUADRANT_SPLIT_ROW northern)
pub const QUADRANT_SPLIT_COL: i32 = MAZE_COLS / 2;
pub const QUADRANT_SPLIT_ROW: i32 = MAZE_ROWS / 2;

// ============================================================================
// Movement
// ============================================================================

// Sub-steps per cell. Player agents use a finer lattice than ghosts, which makes them faster.
pub const PAC_DISCRETIZATION: i32 = 9;
pub const GHOST_DISCRETIZATION: i32 = 10;

// ============================================================================
// Proximity
// ============================================================================

// Radius for "on top of" queries (collectibles, ghosts at a probed cell).
pub const CONTACT_RADIUS: f64 = 0.3;

// Squared distance at which a ghost touches a player agent (about 0.447 units).
pub const CATCH_DISTANCE_SQ: f64 = 0.2;

// Radius within which a dangerous ghost forces a re-evaluation off the grid lines.
pub const GHOST_SENSE_RADIUS: f64 = 1.0;
