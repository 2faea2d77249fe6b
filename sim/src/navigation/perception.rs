use bevy_math::IVec2;
#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use common::{
    constants::{MAZE_CELLS, MAZE_COLS, MAZE_ROWS, QUADRANT_SPLIT_COL, QUADRANT_SPLIT_ROW},
    direction::Direction,
    maze::{cell_from_index, cell_index, in_bounds, wrap_cell},
};

// What the agent has learned about a single maze cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Cell {
    #[default]
    Unknown,
    Wall,
    Open,
}

// ============================================================================
// Quadrants
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Quadrant {
    NorthWest = 0,
    NorthEast = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    pub const ALL: [Self; 4] = [Self::NorthWest, Self::NorthEast, Self::SouthWest, Self::SouthEast];

    #[must_use]
    pub const fn of(cell: IVec2) -> Self {
        match (cell.x < QUADRANT_SPLIT_COL, cell.y < QUADRANT_SPLIT_ROW) {
            (true, true) => Self::NorthWest,
            (false, true) => Self::NorthEast,
            (true, false) => Self::SouthWest,
            (false, false) => Self::SouthEast,
        }
    }

    // Outer corner cell the exploration bias steers towards.
    #[must_use]
    pub const fn target_corner(self) -> IVec2 {
        match self {
            Self::NorthWest => IVec2::new(0, 0),
            Self::NorthEast => IVec2::new(MAZE_COLS - 1, 0),
            Self::SouthWest => IVec2::new(0, MAZE_ROWS - 1),
            Self::SouthEast => IVec2::new(MAZE_COLS - 1, MAZE_ROWS - 1),
        }
    }
}

// ============================================================================
// Perception Memory
// ============================================================================

// Persistent grid of discovered cell classifications. Cells only ever move from Unknown to Wall or
// Open; a known cell never changes class. Unknown counts per quadrant are kept up to date on every
// discovery so the exploration bias does not have to rescan the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct PerceptionMemory {
    cells: Vec<Cell>,
    unknown: [usize; 4],
}

impl Default for PerceptionMemory {
    fn default() -> Self {
        let mut unknown = [0; 4];
        for index in 0..MAZE_CELLS {
            unknown[Quadrant::of(cell_from_index(index)) as usize] += 1;
        }
        Self {
            cells: vec![Cell::Unknown; MAZE_CELLS],
            unknown,
        }
    }
}

impl PerceptionMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Apply the horizontal tunnel wrap. Rows are left alone; indexing an out-of-range row panics.
    #[must_use]
    pub const fn wrap(cell: IVec2) -> IVec2 {
        wrap_cell(cell)
    }

    #[must_use]
    pub fn query(&self, cell: IVec2) -> Cell {
        self.cells[cell_index(Self::wrap(cell))]
    }

    // Record what was observed at `cell`. Re-recording the same class is a no-op; a contradicting
    // observation means the maze changed under us and is treated as a bug.
    pub fn record(&mut self, cell: IVec2, is_wall: bool) {
        let cell = Self::wrap(cell);
        let observed = if is_wall { Cell::Wall } else { Cell::Open };
        let slot = &mut self.cells[cell_index(cell)];

        match *slot {
            Cell::Unknown => {
                *slot = observed;
                self.unknown[Quadrant::of(cell) as usize] -= 1;
            }
            known => assert_eq!(
                known, observed,
                "cell ({}, {}) was {known:?}, now observed as {observed:?}",
                cell.x, cell.y
            ),
        }
    }

    #[must_use]
    pub const fn unknown_in(&self, quadrant: Quadrant) -> usize {
        self.unknown[quadrant as usize]
    }

    // Unknown cells next to a remembered open cell, per quadrant. Cells sealed off behind walls (wall
    // interiors, the ghost pen) never touch an open cell, so they drop out once their border is seen.
    #[must_use]
    pub fn frontier(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for (index, cell) in self.cells.iter().enumerate() {
            if *cell != Cell::Unknown {
                continue;
            }
            let pos = cell_from_index(index);
            let touches_open = Direction::ALL.iter().any(|dir| {
                let next = wrap_cell(pos + dir.offset());
                in_bounds(next) && self.cells[cell_index(next)] == Cell::Open
            });
            if touches_open {
                counts[Quadrant::of(pos) as usize] += 1;
            }
        }
        counts
    }

    // Quadrant with the most reachable unexplored cells; earlier quadrants win ties. None once there
    // is nothing left to explore.
    #[must_use]
    pub fn densest_quadrant(&self) -> Option<Quadrant> {
        let frontier = self.frontier();
        let mut best: Option<Quadrant> = None;
        for quadrant in Quadrant::ALL {
            let count = frontier[quadrant as usize];
            if count > 0 && best.is_none_or(|b| count > frontier[b as usize]) {
                best = Some(quadrant);
            }
        }
        best
    }

    #[must_use]
    pub fn known_count(&self) -> usize {
        MAZE_CELLS - self.unknown.iter().sum::<usize>()
    }

    // Forget everything (full game reset only).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
