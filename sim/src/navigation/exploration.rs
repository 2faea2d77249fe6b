use bevy_math::IVec2;

use super::perception::{Cell, PerceptionMemory};
use common::{direction::Direction, maze::in_bounds};

// Walk from the cell next to `from` in `dir` towards the grid edge. True as soon as an unknown cell
// shows up, false on the first remembered wall or when the edge is reached. Scans never wrap.
#[must_use]
pub fn scan(memory: &PerceptionMemory, dir: Direction, from: IVec2) -> bool {
    let mut cell = from + dir.offset();
    while in_bounds(cell) {
        match memory.query(cell) {
            Cell::Unknown => return true,
            Cell::Wall => return false,
            Cell::Open => cell += dir.offset(),
        }
    }
    false
}

#[must_use]
pub fn scan_all(memory: &PerceptionMemory, from: IVec2) -> [bool; 4] {
    Direction::ALL.map(|dir| scan(memory, dir, from))
}
