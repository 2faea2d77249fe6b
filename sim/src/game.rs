use rand::{SeedableRng, rngs::StdRng};
#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::SimConfig,
    constants::*,
    events::GameEvent,
    lifecycle::{Lifecycle, LifecycleAction},
    navigation::DirectionScorer,
    resources::GameContext,
    systems::{items::ItemMap, pacs::Pac},
};
use common::{
    components::{Actor, GhostId, PacTag},
    maze::MazeLayout,
    schedule::{Scheduler, Tick},
};

// ============================================================================
// Run Summary
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct RunSummary {
    pub ticks: Tick,
    pub score: u64,
    pub level: u32,
    pub levels_won: u32,
    pub deaths: u32,
    pub counted_steps: u64,
}

// ============================================================================
// Simulation
// ============================================================================

// Owns the game context, the scheduler and the player agents, and dispatches scheduled events.
pub struct Simulation {
    pub ctx: GameContext,
    schedule: Scheduler<GameEvent>,
    pacs: Vec<Option<Pac>>,
    rng: StdRng,
    config: SimConfig,
}

impl Simulation {
    #[must_use]
    pub fn new(maze: MazeLayout, config: SimConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let ctx = GameContext::new(maze, Lifecycle::new(config.timing), config.ghosts);
        let start = ctx.maze.pac_start;
        let pacs = (0..config.pacs)
            .map(|tag| Some(Pac::new(PacTag(tag), start, DirectionScorer::new(StdRng::from_rng(&mut rng)))))
            .collect();

        let mut sim = Self {
            ctx,
            schedule: Scheduler::new(),
            pacs,
            rng,
            config,
        };
        sim.restart_agents();
        sim
    }

    #[must_use]
    pub const fn now(&self) -> Tick {
        self.schedule.now()
    }

    #[must_use]
    pub fn pac(&self, tag: PacTag) -> Option<&Pac> {
        self.pacs.get(tag.0 as usize).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn pacs_left(&self) -> usize {
        self.pacs.iter().flatten().count()
    }

    #[must_use]
    pub fn finished(&self) -> bool {
        self.ctx.levels_won >= self.config.levels || self.config.max_ticks.is_some_and(|max| self.now() >= max)
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.now(),
            score: self.ctx.score,
            level: self.ctx.level,
            levels_won: self.ctx.levels_won,
            deaths: self.ctx.deaths,
            counted_steps: self.ctx.counted_steps,
        }
    }

    // Run every event due this tick, then move on to the next one.
    pub fn step(&mut self) {
        while let Some(event) = self.schedule.pop_due() {
            self.dispatch(event);
        }
        self.schedule.advance();
    }

    pub fn run(&mut self) -> RunSummary {
        while !self.finished() {
            self.step();
        }
        self.summary()
    }

    // The agent was caught; it dies once everyone else has moved this tick.
    pub fn register_death(&mut self, tag: PacTag) {
        self.schedule.schedule_once(GameEvent::Caught(tag), 0, ORDER_DEATH);
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::Unfrighten => self.ctx.frighten_ghosts = false,
            GameEvent::Lifecycle => self.drive_lifecycle(),
            GameEvent::PacStep(tag) => {
                if let Some(pac) = self.pacs.get_mut(tag.0 as usize).and_then(Option::as_mut) {
                    pac.step(&mut self.ctx, &mut self.schedule);
                }
            }
            GameEvent::GhostStep(id) => self.step_ghost(id),
            GameEvent::LevelCleared => self.level_cleared(),
            GameEvent::Caught(tag) => self.die(tag),
        }
    }

    fn step_ghost(&mut self, id: GhostId) {
        let Some(ghost) = self.ctx.ghosts.0.get_mut(&id) else {
            return;
        };
        ghost.step(&self.ctx.maze, self.ctx.frighten_ghosts, &mut self.rng);
        self.ctx.agents.insert(Actor::Ghost(id), ghost.position);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    fn die(&mut self, tag: PacTag) {
        let index = tag.0 as usize;
        if self.pacs.get(index).is_none_or(Option::is_none) {
            return;
        }

        self.ctx.deaths += 1;
        info!(
            "deaths: {} | score: {} | steps: {}",
            self.ctx.deaths, self.ctx.score, self.ctx.counted_steps
        );

        if self.pacs_left() > 1 {
            // Others are still playing; this one just drops out
            if let Some(mut pac) = self.pacs[index].take()
                && let Some(stopper) = pac.take_stopper()
            {
                self.schedule.stop(stopper);
            }
            self.ctx.agents.remove(Actor::Pac(tag));
            return;
        }

        self.schedule.clear();
        self.ctx.lifecycle.begin_death(tag);
        self.schedule.schedule_repeating(GameEvent::Lifecycle, 1, 1, ORDER_LIFECYCLE);
    }

    fn level_cleared(&mut self) {
        self.ctx.levels_won += 1;
        info!(level = self.ctx.level, levels_won = self.ctx.levels_won, score = self.ctx.score, "level won");

        self.schedule.clear();
        self.ctx.lifecycle.begin_win();
        self.schedule.schedule_repeating(GameEvent::Lifecycle, 1, 1, ORDER_LIFECYCLE);
    }

    fn drive_lifecycle(&mut self) {
        let Some(action) = self.ctx.lifecycle.advance() else {
            return;
        };
        debug!(?action, state = ?self.ctx.lifecycle.state(), "lifecycle");

        match action {
            LifecycleAction::RemoveOthers => self.remove_others(),
            LifecycleAction::Spin => {
                if let Some(pac) = self
                    .ctx
                    .lifecycle
                    .subject()
                    .and_then(|tag| self.pacs.get_mut(tag.0 as usize))
                    .and_then(Option::as_mut)
                {
                    pac.spin();
                }
            }
            LifecycleAction::ResetAgents => self.reset_agents(),
            LifecycleAction::AdvanceLevel => {
                self.ctx.level += 1;
                self.reset_game();
            }
        }
    }

    // Everything but the dying agent leaves the field.
    fn remove_others(&mut self) {
        let keep = self.ctx.lifecycle.subject().map(Actor::Pac);
        let others: Vec<Actor> = self.ctx.agents.keys().filter(|actor| Some(*actor) != keep).collect();
        for actor in others {
            self.ctx.agents.remove(actor);
        }
    }

    // Lost a life: survivors back to the start, memory intact.
    fn reset_agents(&mut self) {
        let start = self.ctx.maze.pac_start;
        for pac in self.pacs.iter_mut().flatten() {
            pac.respawn(start);
        }
        self.restart_agents();
    }

    // New level: fresh items, every agent back in play with an empty memory.
    fn reset_game(&mut self) {
        self.ctx.items = ItemMap::from_layout(&self.ctx.maze);
        let start = self.ctx.maze.pac_start;
        for (tag, slot) in self.pacs.iter_mut().enumerate() {
            match slot {
                Some(pac) => pac.reset(start),
                None => {
                    let scorer = DirectionScorer::new(StdRng::from_rng(&mut self.rng));
                    *slot = Some(Pac::new(PacTag(tag as u32), start, scorer));
                }
            }
        }
        self.restart_agents();
    }

    // Drop whatever is scheduled and register every agent from its start position. Agents take their
    // first step on the next tick.
    fn restart_agents(&mut self) {
        self.schedule.clear();
        self.ctx.frighten_ghosts = false;
        self.ctx.agents.clear();

        for pac in self.pacs.iter_mut().flatten() {
            self.ctx.agents.insert(Actor::Pac(pac.tag), pac.position);
            pac.set_stopper(self.schedule.schedule_repeating(GameEvent::PacStep(pac.tag), 1, 1, ORDER_PAC));
        }

        for id in self.ctx.ghosts.ids() {
            if let Some(ghost) = self.ctx.ghosts.0.get_mut(&id) {
                ghost.respawn();
                self.ctx.agents.insert(Actor::Ghost(id), ghost.position);
            }
            self.schedule.schedule_repeating(GameEvent::GhostStep(id), 1, 1, ORDER_GHOST);
        }
    }
}
