use bevy_math::DVec2;
use rand::Rng;

use super::movement::{can_move, perform};
use crate::constants::*;
use common::{
    components::GhostId,
    constants::GHOST_DISCRETIZATION,
    direction::Direction,
    maze::{MazeLayout, cell_of, is_grid_aligned},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn open_directions(maze: &MazeLayout, pos: DVec2) -> Vec<Direction> {
    Direction::ALL
        .iter()
        .copied()
        .filter(|dir| maze.is_passable(cell_of(pos) + dir.offset()))
        .collect()
}

fn forward_directions(open: &[Direction], heading: Direction) -> Vec<Direction> {
    open.iter().copied().filter(|dir| *dir != heading.opposite()).collect()
}

fn pick_direction<R: Rng + ?Sized>(rng: &mut R, options: &[Direction]) -> Option<Direction> {
    if options.is_empty() {
        None
    } else {
        Some(options[rng.random_range(0..options.len())])
    }
}

// ============================================================================
// Ghost
// ============================================================================

// Pursuer stand-in: wanders the maze, can be frightened and eaten.
#[derive(Clone, Debug)]
pub struct Ghost {
    pub id: GhostId,
    pub position: DVec2,
    pub heading: Direction,
    start: DVec2,
    frightened: u32,
    jailed: u32,
}

impl Ghost {
    #[must_use]
    pub const fn new(id: GhostId, start: DVec2) -> Self {
        Self {
            id,
            position: start,
            heading: Direction::West,
            start,
            frightened: 0,
            jailed: 0,
        }
    }

    #[must_use]
    pub const fn is_frightened(&self) -> bool {
        self.frightened > 0
    }

    // Eaten: sit in the holding area for a while, no longer edible.
    pub const fn send_to_holding(&mut self, holding: DVec2) {
        self.position = holding;
        self.frightened = 0;
        self.jailed = JAIL_TIME;
    }

    pub const fn respawn(&mut self) {
        self.position = self.start;
        self.heading = Direction::West;
        self.frightened = 0;
        self.jailed = 0;
    }

    // One tick. `frighten` is the game-wide flag raised by an energizer pickup this tick.
    pub fn step<R: Rng + ?Sized>(&mut self, maze: &MazeLayout, frighten: bool, rng: &mut R) {
        if self.jailed > 0 {
            self.jailed -= 1;
            if self.jailed == 0 {
                self.position = self.start;
            }
            return;
        }

        if frighten {
            self.frightened = FRIGHTEN_TIME;
        } else {
            self.frightened = self.frightened.saturating_sub(1);
        }

        if is_grid_aligned(self.position) {
            let open = open_directions(maze, self.position);
            let forward = forward_directions(&open, self.heading);
            let blocked = !open.contains(&self.heading);

            if blocked || rng.random_bool(GHOST_RANDOM_TURN_PROBABILITY) {
                // Dead ends are the only place a ghost turns around
                if let Some(dir) = pick_direction(rng, &forward).or_else(|| open.first().copied()) {
                    self.heading = dir;
                }
            }
        }

        if can_move(maze, self.position, self.heading) {
            self.position = perform(self.position, self.heading, GHOST_DISCRETIZATION);
        }
    }
}
