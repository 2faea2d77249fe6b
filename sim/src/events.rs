use common::components::{GhostId, PacTag};

// ============================================================================
// Scheduled Events
// ============================================================================

// Everything that can sit in the scheduler. Handlers read their state from the game context, so
// events carry only the id of whoever they are about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    // Clear the frighten flag one tick after an energizer pickup
    Unfrighten,
    // Lifecycle driver, one call per tick while a death or level-clear sequence runs
    Lifecycle,
    PacStep(PacTag),
    GhostStep(GhostId),
    // Last item eaten
    LevelCleared,
    // Caught by a dangerous ghost
    Caught(PacTag),
}
