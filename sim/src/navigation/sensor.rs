use bevy_math::{DVec2, IVec2};

use super::scoring::Surroundings;
use crate::resources::{GameContext, GhostMap};
use common::{
    components::Actor,
    constants::{CONTACT_RADIUS, GHOST_SENSE_RADIUS},
    maze::{cell_center, wrap_cell},
    spatial::SpatialIndex,
};

// The agent's view of the live game from one position.
pub struct Sensor<'a> {
    ctx: &'a GameContext,
    position: DVec2,
}

impl<'a> Sensor<'a> {
    #[must_use]
    pub const fn new(ctx: &'a GameContext, position: DVec2) -> Self {
        Self { ctx, position }
    }

    fn dangerous_within(agents: &SpatialIndex<Actor>, ghosts: &GhostMap, point: DVec2, radius: f64) -> bool {
        agents.neighbors_within(point, radius).into_iter().any(|actor| match actor {
            Actor::Ghost(id) => ghosts.0.get(&id).is_some_and(|ghost| !ghost.is_frightened()),
            Actor::Pac(_) => false,
        })
    }
}

impl Surroundings for Sensor<'_> {
    fn is_wall(&self, cell: IVec2) -> bool {
        !self.ctx.maze.is_passable(cell)
    }

    fn has_reward(&self, cell: IVec2) -> bool {
        self.ctx.items.occupied(cell)
    }

    fn dangerous_ghost_at(&self, cell: IVec2) -> bool {
        let point = cell_center(wrap_cell(cell));
        Self::dangerous_within(&self.ctx.agents, &self.ctx.ghosts, point, CONTACT_RADIUS)
    }

    fn ghost_nearby(&self) -> bool {
        Self::dangerous_within(&self.ctx.agents, &self.ctx.ghosts, self.position, GHOST_SENSE_RADIUS)
    }
}
