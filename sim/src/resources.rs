use std::collections::HashMap;

use crate::{
    lifecycle::Lifecycle,
    systems::{ghosts::Ghost, items::ItemMap},
};
use common::{
    components::{Actor, GhostId},
    maze::MazeLayout,
    spatial::SpatialIndex,
};

// ============================================================================
// Game Resources
// ============================================================================

// Map of all ghosts in the game
#[derive(Clone, Debug, Default)]
pub struct GhostMap(pub HashMap<GhostId, Ghost>);

impl GhostMap {
    #[must_use]
    pub fn from_layout(maze: &MazeLayout) -> Self {
        Self(
            maze.ghost_starts
                .iter()
                .enumerate()
                .map(|(index, cell)| {
                    let id = GhostId(index as u32);
                    (id, Ghost::new(id, cell.as_dvec2()))
                })
                .collect(),
        )
    }

    // Ghost ids in a stable order (scheduling and tests rely on it).
    #[must_use]
    pub fn ids(&self) -> Vec<GhostId> {
        let mut ids: Vec<_> = self.0.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

// Everything the handlers share. Owned by the simulation and handed to each handler by `&mut`.
pub struct GameContext {
    pub maze: MazeLayout,
    pub items: ItemMap,
    pub agents: SpatialIndex<Actor>,
    pub ghosts: GhostMap,
    pub frighten_ghosts: bool,
    pub lifecycle: Lifecycle,
    pub score: u64,
    pub level: u32,
    pub deaths: u32,
    pub levels_won: u32,
    pub counted_steps: u64,
}

impl GameContext {
    #[must_use]
    pub fn new(maze: MazeLayout, lifecycle: Lifecycle, with_ghosts: bool) -> Self {
        let items = ItemMap::from_layout(&maze);
        let ghosts = if with_ghosts { GhostMap::from_layout(&maze) } else { GhostMap::default() };
        Self {
            maze,
            items,
            agents: SpatialIndex::new(),
            ghosts,
            frighten_ghosts: false,
            lifecycle,
            score: 0,
            level: 1,
            deaths: 0,
            levels_won: 0,
            counted_steps: 0,
        }
    }
}
