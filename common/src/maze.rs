use anyhow::{Context, Result, bail};
use bevy_math::{DVec2, IVec2};
use std::path::Path;

use crate::constants::{MAZE_CELLS, MAZE_COLS, MAZE_ROWS};

// ============================================================================
// Built-in Layout
// ============================================================================

// Glyphs:
//   '#' wall            '-' ghost pen door (wall)
//   '.' dot             'o' energizer (a dot lies underneath)
//   ' ' open floor      'P' player start (the start is the centroid of all 'P' cells)
//   'G' ghost start     'H' holding area (ghost jail)
pub const CLASSIC_LAYOUT: &str = "\
############################
############################
#............##............#
#.####.#####.##.#####.####.#
#o####.#####.##.#####.####o#
#.####.#####.##.#####.####.#
#..........................#
#.####.##.########.##.####.#
#.####.##.########.##.####.#
#......##....##....##......#
######.##### ## #####.######
######.##### ## #####.######
######.##### ## #####.######
######.##  GG  GG  ##.######
######.## ###--### ##.######
######.## #HHHHHH# ##.######
      .   #HHHHHH#   .      
######.## #HHHHHH# ##.######
######.## ######## ##.######
######.##          ##.######
######.## ######## ##.######
######.## ######## ##.######
#............##............#
#.####.#####.##.#####.####.#
#.####.#####.##.#####.####.#
#o..##.......PP.......##..o#
###.##.##.########.##.##.###
###.##.##.########.##.##.###
#......##....##....##......#
#.##########.##.##########.#
#.##########.##.##########.#
#..........................#
############################
############################
############################";

// ============================================================================
// Grid Helpers
// ============================================================================

#[must_use]
pub const fn in_bounds(cell: IVec2) -> bool {
    cell.x >= 0 && cell.x < MAZE_COLS && cell.y >= 0 && cell.y < MAZE_ROWS
}

// Horizontal tunnel wrap: the column east of the last one is column 0 and vice versa.
// Rows never wrap.
#[must_use]
pub const fn wrap_cell(cell: IVec2) -> IVec2 {
    IVec2::new(cell.x.rem_euclid(MAZE_COLS), cell.y)
}

// Row-major storage index. Panics on cells outside the grid, which is always a caller bug.
#[must_use]
pub fn cell_index(cell: IVec2) -> usize {
    assert!(in_bounds(cell), "maze cell OOB: ({}, {})", cell.x, cell.y);
    (cell.y * MAZE_COLS + cell.x) as usize
}

#[must_use]
pub const fn cell_from_index(index: usize) -> IVec2 {
    IVec2::new(index as i32 % MAZE_COLS, index as i32 / MAZE_COLS)
}

// Discretized cell of a continuous position (both components truncated).
#[must_use]
pub fn cell_of(pos: DVec2) -> IVec2 {
    IVec2::new(pos.x as i32, pos.y as i32)
}

#[must_use]
pub fn cell_center(cell: IVec2) -> DVec2 {
    cell.as_dvec2()
}

#[must_use]
pub fn is_integral(value: f64) -> bool {
    value == value.trunc()
}

#[must_use]
pub fn is_grid_aligned(pos: DVec2) -> bool {
    is_integral(pos.x) && is_integral(pos.y)
}

// ============================================================================
// Maze Layout
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
}

// Static, read-only maze: tile classification plus the initial placement of collectibles and agents.
#[derive(Clone, Debug)]
pub struct MazeLayout {
    tiles: Vec<Tile>,
    pub dots: Vec<IVec2>,
    pub energizers: Vec<IVec2>,
    pub pac_start: DVec2,
    pub ghost_starts: Vec<IVec2>,
    pub holding: IVec2,
}

impl MazeLayout {
    pub fn classic() -> Result<Self> {
        Self::parse(CLASSIC_LAYOUT).context("built-in layout is malformed")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse maze layout {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
        if rows.len() != MAZE_ROWS as usize {
            bail!("expected {MAZE_ROWS} rows, found {}", rows.len());
        }

        let mut tiles = Vec::with_capacity(MAZE_CELLS);
        let mut dots = Vec::new();
        let mut energizers = Vec::new();
        let mut pac_cells = Vec::new();
        let mut ghost_starts = Vec::new();
        let mut holding = None;

        for (y, row) in rows.iter().enumerate() {
            let glyphs: Vec<char> = row.chars().collect();
            if glyphs.len() != MAZE_COLS as usize {
                bail!("row {y}: expected {MAZE_COLS} columns, found {}", glyphs.len());
            }

            for (x, glyph) in glyphs.into_iter().enumerate() {
                let cell = IVec2::new(x as i32, y as i32);
                let tile = match glyph {
                    '#' | '-' => Tile::Wall,
                    '.' => {
                        dots.push(cell);
                        Tile::Open
                    }
                    'o' => {
                        dots.push(cell);
                        energizers.push(cell);
                        Tile::Open
                    }
                    'P' => {
                        pac_cells.push(cell);
                        Tile::Open
                    }
                    'G' => {
                        ghost_starts.push(cell);
                        Tile::Open
                    }
                    'H' => {
                        holding.get_or_insert(cell);
                        Tile::Open
                    }
                    ' ' => Tile::Open,
                    other => bail!("row {y}, column {x}: unknown glyph {other:?}"),
                };
                // Only columns wrap, so the top and bottom rows must be sealed
                if tile == Tile::Open && (y == 0 || y == MAZE_ROWS as usize - 1) {
                    bail!("row {y}, column {x}: open {glyph:?} on the outer border");
                }
                tiles.push(tile);
            }
        }

        if pac_cells.is_empty() {
            bail!("layout has no player start ('P')");
        }
        let pac_start = pac_cells.iter().map(|cell| cell.as_dvec2()).sum::<DVec2>() / pac_cells.len() as f64;

        let holding = match holding {
            Some(cell) => cell,
            None if ghost_starts.is_empty() => cell_of(pac_start),
            None => bail!("layout has ghost starts but no holding area ('H')"),
        };

        Ok(Self {
            tiles,
            dots,
            energizers,
            pac_start,
            ghost_starts,
            holding,
        })
    }

    #[must_use]
    pub fn tile(&self, cell: IVec2) -> Tile {
        self.tiles[cell_index(cell)]
    }

    #[must_use]
    pub fn is_wall(&self, cell: IVec2) -> bool {
        self.tile(cell) == Tile::Wall
    }

    // Like `is_wall`, but rows outside the grid count as walls and columns wrap.
    #[must_use]
    pub fn is_passable(&self, cell: IVec2) -> bool {
        let cell = wrap_cell(cell);
        in_bounds(cell) && self.tile(cell) == Tile::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_layout_parses() {
        let maze = MazeLayout::classic().expect("classic layout");
        assert_eq!(maze.pac_start, DVec2::new(13.5, 25.0));
        assert_eq!(maze.energizers.len(), 4);
        assert_eq!(maze.ghost_starts.len(), 4);
        assert!(maze.dots.len() > 200);
        assert!(maze.is_wall(IVec2::new(0, 0)));
        assert!(!maze.is_wall(IVec2::new(0, 16)));
    }

    #[test]
    fn tunnel_wraps_horizontally() {
        assert_eq!(wrap_cell(IVec2::new(MAZE_COLS, 16)), IVec2::new(0, 16));
        assert_eq!(wrap_cell(IVec2::new(-1, 16)), IVec2::new(MAZE_COLS - 1, 16));
        assert_eq!(wrap_cell(IVec2::new(-2, 16)), IVec2::new(MAZE_COLS - 2, 16));
        assert_eq!(wrap_cell(IVec2::new(5, -1)), IVec2::new(5, -1));
    }

    #[test]
    fn passable_treats_vertical_edges_as_walls() {
        let maze = MazeLayout::classic().expect("classic layout");
        assert!(maze.is_passable(IVec2::new(-1, 16)));
        assert!(!maze.is_passable(IVec2::new(3, -1)));
        assert!(!maze.is_passable(IVec2::new(3, MAZE_ROWS)));
    }

    #[test]
    fn rejects_wrong_dimensions() {
        assert!(MazeLayout::parse("###").is_err());
    }

    #[test]
    fn rejects_unknown_glyphs() {
        let text = CLASSIC_LAYOUT.replacen('#', "x", 1);
        assert!(MazeLayout::parse(&text).is_err());
    }

    #[test]
    fn rejects_open_vertical_border() {
        let mut rows: Vec<String> = CLASSIC_LAYOUT.lines().map(str::to_owned).collect();
        rows[0].replace_range(5..6, " ");
        let err = MazeLayout::parse(&rows.join("\n")).expect_err("open top row");
        assert!(err.to_string().contains("row 0, column 5"), "{err}");

        let mut rows: Vec<String> = CLASSIC_LAYOUT.lines().map(str::to_owned).collect();
        let last = MAZE_ROWS as usize - 1;
        rows[last].replace_range(5..6, ".");
        assert!(MazeLayout::parse(&rows.join("\n")).is_err());
    }

    #[test]
    #[should_panic(expected = "maze cell OOB")]
    fn indexing_outside_grid_panics() {
        let _ = cell_index(IVec2::new(0, MAZE_ROWS));
    }
}
