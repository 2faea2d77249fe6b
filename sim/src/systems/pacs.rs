use bevy_math::{DVec2, IVec2};
use tracing::debug;

use super::movement::{can_move, perform};
use crate::{
    constants::*,
    events::GameEvent,
    navigation::{DirectionScorer, PerceptionMemory, Sensor, Surroundings as _},
    resources::GameContext,
};
use common::{
    components::{Actor, ItemKind, PacTag},
    constants::{CATCH_DISTANCE_SQ, CONTACT_RADIUS, PAC_DISCRETIZATION},
    direction::Direction,
    maze::{cell_of, is_grid_aligned},
    schedule::{Scheduler, Stopper},
};

// ============================================================================
// Player Agent
// ============================================================================

// Autonomous player agent. Owns what it has learned about the maze; the memory survives deaths and
// is only wiped by a full game reset.
pub struct Pac {
    pub tag: PacTag,
    pub position: DVec2,
    // Direction last moved in (also what the death spin rotates)
    pub last_action: Direction,
    // Direction picked at the last decision point
    pub next_action: Direction,
    eat_ghost_score: u64,
    stopper: Option<Stopper>,
    memory: PerceptionMemory,
    scorer: DirectionScorer,
}

impl Pac {
    #[must_use]
    pub fn new(tag: PacTag, start: DVec2, scorer: DirectionScorer) -> Self {
        Self {
            tag,
            position: start,
            last_action: Direction::North,
            next_action: Direction::North,
            eat_ghost_score: EAT_GHOST_BASE_SCORE,
            stopper: None,
            memory: PerceptionMemory::new(),
            scorer,
        }
    }

    #[must_use]
    pub fn cell(&self) -> IVec2 {
        cell_of(self.position)
    }

    #[must_use]
    pub const fn memory(&self) -> &PerceptionMemory {
        &self.memory
    }

    #[must_use]
    pub const fn eat_ghost_score(&self) -> u64 {
        self.eat_ghost_score
    }

    pub const fn set_stopper(&mut self, stopper: Stopper) {
        self.stopper = Some(stopper);
    }

    pub const fn take_stopper(&mut self) -> Option<Stopper> {
        self.stopper.take()
    }

    // Back to the start after a lost life. The memory is kept.
    pub const fn respawn(&mut self, start: DVec2) {
        self.position = start;
        self.last_action = Direction::North;
        self.next_action = Direction::North;
        self.eat_ghost_score = EAT_GHOST_BASE_SCORE;
        self.stopper = None;
    }

    // New game: forget the maze as well.
    pub fn reset(&mut self, start: DVec2) {
        self.respawn(start);
        self.memory.clear();
    }

    // Quarter turn of the displayed direction during the death spin.
    pub const fn spin(&mut self) {
        self.last_action = self.last_action.rotated();
    }

    // ========================================================================
    // Per-Tick Entry Point
    // ========================================================================

    pub fn step(&mut self, ctx: &mut GameContext, schedule: &mut Scheduler<GameEvent>) {
        ctx.counted_steps += 1;
        self.decide(ctx);
        self.advance(ctx);
        self.collect_rewards(ctx, schedule);
        self.check_ghosts(ctx, schedule);
    }

    fn decide(&mut self, ctx: &GameContext) {
        let sensor = Sensor::new(ctx, self.position);
        let at_decision_point =
            self.position == ctx.maze.pac_start || is_grid_aligned(self.position) || sensor.ghost_nearby();

        self.next_action = if at_decision_point {
            let cell = self.cell();
            self.scorer.choose(&mut self.memory, &sensor, cell, self.next_action)
        } else {
            self.last_action
        };
    }

    // Try the chosen direction, fall back to the current one until the turn becomes possible.
    fn advance(&mut self, ctx: &mut GameContext) {
        let dir = [self.next_action, self.last_action]
            .into_iter()
            .find(|dir| can_move(&ctx.maze, self.position, *dir));

        if let Some(dir) = dir {
            self.position = perform(self.position, dir, PAC_DISCRETIZATION);
            self.last_action = dir;
            ctx.agents.insert(Actor::Pac(self.tag), self.position);
        }
    }

    fn collect_rewards(&mut self, ctx: &mut GameContext, schedule: &mut Scheduler<GameEvent>) {
        let nearby = ctx.items.within(self.position, CONTACT_RADIUS);
        if nearby.is_empty() {
            return;
        }

        for id in nearby {
            // Only items right under the agent count
            if ctx.items.location_of(id) != Some(self.position) {
                continue;
            }
            match ctx.items.take(id) {
                Some(ItemKind::Energizer) => {
                    ctx.score += ENERGIZER_SCORE;
                    self.eat_ghost_score = EAT_GHOST_BASE_SCORE;
                    ctx.frighten_ghosts = true;
                    // Ghosts see the flag later this tick; it is cleared first thing next tick
                    schedule.schedule_once(GameEvent::Unfrighten, 1, ORDER_LIFECYCLE);
                    debug!(tag = ?self.tag, "energizer eaten");
                }
                Some(ItemKind::Dot) => ctx.score += DOT_SCORE,
                None => {}
            }
        }

        if ctx.items.is_empty() {
            schedule.schedule_once(GameEvent::LevelCleared, 0, ORDER_LEVEL_RESET);
        }
    }

    fn check_ghosts(&mut self, ctx: &mut GameContext, schedule: &mut Scheduler<GameEvent>) {
        let holding = ctx.maze.holding.as_dvec2();

        for actor in ctx.agents.neighbors_within(self.position, CATCH_DISTANCE_SQ.sqrt()) {
            let Actor::Ghost(id) = actor else {
                continue;
            };
            let Some(ghost) = ctx.ghosts.0.get_mut(&id) else {
                continue;
            };

            if ghost.is_frightened() {
                ctx.score += self.eat_ghost_score;
                debug!(tag = ?self.tag, ghost = ?id, points = self.eat_ghost_score, "ghost eaten");
                self.eat_ghost_score *= 2;
                ghost.send_to_holding(holding);
                ctx.agents.insert(actor, holding);
            } else {
                schedule.schedule_once(GameEvent::Caught(self.tag), 0, ORDER_DEATH);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lifecycle::Lifecycle, resources::GhostMap, systems::ghosts::Ghost, systems::items::ItemMap};
    use common::{
        components::{GhostId, ItemId},
        maze::MazeLayout,
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn context() -> GameContext {
        let maze = MazeLayout::classic().expect("classic layout");
        GameContext::new(maze, Lifecycle::default(), false)
    }

    #[test]
    fn energizer_then_three_ghosts_is_1440() {
        let mut ctx = context();
        let mut schedule = Scheduler::new();
        let cell = IVec2::new(1, 2);
        let pos = cell.as_dvec2();

        // A lone energizer plus one far-away dot so the level does not end
        ctx.items = ItemMap::default();
        ctx.items.place(ItemId(0), ItemKind::Energizer, cell);
        ctx.items.place(ItemId(1), ItemKind::Dot, IVec2::new(26, 32));

        let mut ghosts = GhostMap::default();
        for index in 0..3 {
            let id = GhostId(index);
            ghosts.0.insert(id, Ghost::new(id, pos));
            ctx.agents.insert(Actor::Ghost(id), pos);
        }
        ctx.ghosts = ghosts;

        let mut pac = Pac::new(PacTag(0), pos, DirectionScorer::from_seed(1));
        let before = ctx.score;
        pac.collect_rewards(&mut ctx, &mut schedule);
        assert!(ctx.frighten_ghosts);

        let mut rng = StdRng::seed_from_u64(9);
        for ghost in ctx.ghosts.0.values_mut() {
            ghost.step(&ctx.maze, ctx.frighten_ghosts, &mut rng);
            ctx.agents.insert(Actor::Ghost(ghost.id), ghost.position);
        }
        pac.check_ghosts(&mut ctx, &mut schedule);

        assert_eq!(ctx.score - before, 40 + 200 + 400 + 800);
        assert_eq!(pac.eat_ghost_score(), 1600);
        assert!(ctx.ghosts.0.values().all(|ghost| ghost.position == ctx.maze.holding.as_dvec2()));
        // Only the frighten reset is pending: nobody died, the level goes on
        assert_eq!(schedule.pending(), 1);
        assert_eq!(schedule.pop_due(), None);
    }

    #[test]
    fn dot_under_energizer_adds_up_to_fifty() {
        let mut ctx = context();
        let mut schedule = Scheduler::new();
        let cell = ctx.maze.energizers[0];
        let mut pac = Pac::new(PacTag(0), cell.as_dvec2(), DirectionScorer::from_seed(1));

        pac.collect_rewards(&mut ctx, &mut schedule);
        assert_eq!(ctx.score, 50);
        assert!(!ctx.items.occupied(cell));
    }

    #[test]
    fn dangerous_ghost_schedules_death() {
        let mut ctx = context();
        let mut schedule = Scheduler::new();
        let pos = IVec2::new(6, 9).as_dvec2();
        let id = GhostId(0);
        ctx.ghosts.0.insert(id, Ghost::new(id, pos + DVec2::new(0.2, 0.0)));
        ctx.agents.insert(Actor::Ghost(id), pos + DVec2::new(0.2, 0.0));

        let mut pac = Pac::new(PacTag(0), pos, DirectionScorer::from_seed(1));
        pac.check_ghosts(&mut ctx, &mut schedule);
        assert_eq!(schedule.pop_due(), Some(GameEvent::Caught(PacTag(0))));
    }

    #[test]
    fn ghost_touching_from_almost_half_a_cell_catches() {
        let mut ctx = context();
        let mut schedule = Scheduler::new();
        let pos = IVec2::new(6, 9).as_dvec2();
        let id = GhostId(0);
        let ghost_at = pos + DVec2::new(0.4, 0.0);
        ctx.ghosts.0.insert(id, Ghost::new(id, ghost_at));
        ctx.agents.insert(Actor::Ghost(id), ghost_at);

        let mut pac = Pac::new(PacTag(0), pos, DirectionScorer::from_seed(1));
        pac.check_ghosts(&mut ctx, &mut schedule);
        assert_eq!(schedule.pop_due(), Some(GameEvent::Caught(PacTag(0))));

        // Half a cell away is out of reach
        let far = pos + DVec2::new(0.5, 0.0);
        ctx.agents.insert(Actor::Ghost(id), far);
        if let Some(ghost) = ctx.ghosts.0.get_mut(&id) {
            ghost.position = far;
        }
        pac.check_ghosts(&mut ctx, &mut schedule);
        assert!(schedule.is_empty());
    }

    #[test]
    fn eating_the_last_item_clears_the_level() {
        let mut ctx = context();
        let mut schedule = Scheduler::new();
        let cell = IVec2::new(1, 2);
        ctx.items = ItemMap::default();
        ctx.items.place(ItemId(0), ItemKind::Dot, cell);

        let mut pac = Pac::new(PacTag(0), cell.as_dvec2(), DirectionScorer::from_seed(1));
        pac.collect_rewards(&mut ctx, &mut schedule);
        assert_eq!(schedule.pop_due(), Some(GameEvent::LevelCleared));
    }

    #[test]
    fn respawn_keeps_memory() {
        let mut ctx = context();
        let mut pac = Pac::new(PacTag(0), ctx.maze.pac_start, DirectionScorer::from_seed(4));
        let mut schedule = Scheduler::new();
        for _ in 0..30 {
            pac.step(&mut ctx, &mut schedule);
        }
        let learned = pac.memory().clone();
        assert!(learned.known_count() > 0);

        pac.respawn(ctx.maze.pac_start);
        assert_eq!(pac.memory(), &learned);
        assert_eq!(pac.position, ctx.maze.pac_start);

        pac.reset(ctx.maze.pac_start);
        assert_eq!(pac.memory().known_count(), 0);
    }
}
