use bevy_math::DVec2;

use common::{
    constants::MAZE_COLS,
    direction::Direction,
    maze::{MazeLayout, cell_of, is_integral},
};

// ============================================================================
// Move Primitive
// ============================================================================

// Agents travel along grid lines only: a horizontal move needs an integral y and a vertical move an
// integral x. Between cells the way ahead is always free; on a cell boundary the next cell must be
// open.
#[must_use]
pub fn can_move(maze: &MazeLayout, pos: DVec2, dir: Direction) -> bool {
    let (along, across) = if dir.is_horizontal() { (pos.x, pos.y) } else { (pos.y, pos.x) };
    if !is_integral(across) {
        return false;
    }
    if !is_integral(along) {
        return true;
    }
    maze.is_passable(cell_of(pos) + dir.offset())
}

// One sub-step of `1 / discretization` cells in `dir`. The result is snapped onto the agent's
// lattice and wrapped through the horizontal tunnel.
#[must_use]
pub fn perform(pos: DVec2, dir: Direction, discretization: i32) -> DVec2 {
    let disc = f64::from(discretization);
    let steps = (pos * disc).round() + dir.unit();
    let width = f64::from(MAZE_COLS) * disc;
    DVec2::new(steps.x.rem_euclid(width), steps.y) / disc
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::constants::PAC_DISCRETIZATION;

    fn maze() -> MazeLayout {
        MazeLayout::classic().expect("classic layout")
    }

    #[test]
    fn turns_only_on_grid_lines() {
        let maze = maze();
        let pos = DVec2::new(6.0, 9.5);
        assert!(can_move(&maze, pos, Direction::North));
        assert!(!can_move(&maze, pos, Direction::East));
    }

    #[test]
    fn walls_block_at_cell_boundaries() {
        let maze = maze();
        // (1, 2) has a wall to the north and open floor to the east
        let pos = DVec2::new(1.0, 2.0);
        assert!(!can_move(&maze, pos, Direction::North));
        assert!(can_move(&maze, pos, Direction::East));
    }

    #[test]
    fn reaches_the_next_cell_exactly() {
        let mut pos = DVec2::new(1.0, 2.0);
        for _ in 0..PAC_DISCRETIZATION {
            pos = perform(pos, Direction::East, PAC_DISCRETIZATION);
        }
        assert_eq!(pos, DVec2::new(2.0, 2.0));
    }

    #[test]
    fn tunnel_wraps_both_ways() {
        let maze = maze();
        let mut pos = DVec2::new(27.0, 16.0);
        assert!(can_move(&maze, pos, Direction::East));
        for _ in 0..PAC_DISCRETIZATION {
            pos = perform(pos, Direction::East, PAC_DISCRETIZATION);
        }
        assert_eq!(pos, DVec2::new(0.0, 16.0));

        assert!(can_move(&maze, pos, Direction::West));
        pos = perform(pos, Direction::West, PAC_DISCRETIZATION);
        assert!(pos.x > 27.0 && pos.x < 28.0);
    }
}
