use bevy_math::IVec2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::ops::{Index, IndexMut};
use tracing::debug;

use super::{exploration::scan_all, perception::PerceptionMemory};
use crate::constants::*;
use common::{direction::Direction, maze::wrap_cell};

// ============================================================================
// Surroundings
// ============================================================================

// What the agent can sense of the world around it. Cells passed in may lie one column outside the
// grid; implementations apply the tunnel wrap themselves.
pub trait Surroundings {
    fn is_wall(&self, cell: IVec2) -> bool;

    // A dot or energizer lies on the cell.
    fn has_reward(&self, cell: IVec2) -> bool;

    // A ghost that is not frightened stands on (or right next to the center of) the cell.
    fn dangerous_ghost_at(&self, cell: IVec2) -> bool;

    // A dangerous ghost is within one cell of the agent's current position.
    fn ghost_nearby(&self) -> bool;
}

// ============================================================================
// Direction Scores
// ============================================================================

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DirectionScores(pub [f64; 4]);

impl Index<Direction> for DirectionScores {
    type Output = f64;

    fn index(&self, dir: Direction) -> &f64 {
        &self.0[dir.index()]
    }
}

impl IndexMut<Direction> for DirectionScores {
    fn index_mut(&mut self, dir: Direction) -> &mut f64 {
        &mut self.0[dir.index()]
    }
}

impl DirectionScores {
    // Highest scoring direction. The first one wins ties and an all-zero array picks North.
    #[must_use]
    pub fn best(&self) -> Direction {
        let mut best = Direction::North;
        for dir in Direction::ALL {
            if self[dir] > self[best] {
                best = dir;
            }
        }
        best
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(SCORE_BLOCKED, f64::max)
    }

    #[must_use]
    pub fn blocked(&self) -> usize {
        self.0.iter().filter(|score| **score == SCORE_BLOCKED).count()
    }

    // Best remaining direction with a positive score once `excluded` is ruled out.
    #[must_use]
    pub fn runner_up(&self, excluded: Direction) -> Option<Direction> {
        let mut best: Option<Direction> = None;
        for dir in Direction::ALL {
            if dir == excluded || self[dir] <= SCORE_BLOCKED {
                continue;
            }
            if best.is_none_or(|b| self[dir] > self[b]) {
                best = Some(dir);
            }
        }
        best
    }
}

// Multiplicative shuffle factor in [0.51, 1.0]. Anything open with a reward still beats anything
// open without one.
pub fn jitter_factor<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (rng.random::<f64>() + JITTER_FLOOR).min(1.0)
}

// Range-1 percept in every direction. Every probed cell is written into `memory`.
pub fn percept(memory: &mut PerceptionMemory, senses: &impl Surroundings, cell: IVec2) -> DirectionScores {
    let mut scores = DirectionScores::default();
    for dir in Direction::ALL {
        let target = cell + dir.offset();
        if senses.is_wall(target) {
            memory.record(target, true);
            scores[dir] = SCORE_BLOCKED;
            continue;
        }

        memory.record(target, false);
        scores[dir] = if senses.dangerous_ghost_at(target) {
            SCORE_BLOCKED
        } else if senses.has_reward(target) {
            SCORE_REWARD
        } else {
            SCORE_OPEN
        };
    }
    scores
}

// Nudge open directions towards the corner of the quadrant with the most frontier left. Blocked
// directions stay blocked. Does nothing once everything reachable has been seen.
pub fn quadrant_bias(memory: &PerceptionMemory, cell: IVec2, scores: &mut DirectionScores) {
    let Some(quadrant) = memory.densest_quadrant() else {
        return;
    };
    let target = quadrant.target_corner();
    let distance = (target - cell).abs().element_sum();
    for dir in Direction::ALL {
        let closer = (target - (cell + dir.offset())).abs().element_sum() < distance;
        if closer && scores[dir] > SCORE_BLOCKED {
            scores[dir] += QUADRANT_BONUS;
        }
    }
}

// ============================================================================
// Direction Scorer
// ============================================================================

// Greedy, memory-augmented choice of the next direction.
pub struct DirectionScorer<R = StdRng> {
    rng: R,
}

impl DirectionScorer<StdRng> {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DirectionScorer<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    // Pick a direction for an agent standing on `cell`. `previous` is the direction chosen at the
    // last decision point.
    pub fn choose(
        &mut self,
        memory: &mut PerceptionMemory,
        senses: &impl Surroundings,
        cell: IVec2,
        previous: Direction,
    ) -> Direction {
        let raw = percept(memory, senses, cell);

        let mut scores = raw;
        for score in &mut scores.0 {
            *score *= jitter_factor(&mut self.rng);
        }

        // Corridors: keep going while the way ahead stays open
        if scores.blocked() >= 2 && scores[previous] > SCORE_BLOCKED {
            debug!(?cell, ?previous, "keeping direction");
            return previous;
        }

        let ghost_nearby = senses.ghost_nearby();
        if raw.max() <= SCORE_OPEN && !ghost_nearby {
            let unexplored = scan_all(memory, cell);
            for dir in Direction::ALL {
                if unexplored[dir.index()] {
                    scores[dir] = SCORE_UNEXPLORED;
                }
            }
        }

        quadrant_bias(memory, cell, &mut scores);

        let mut choice = scores.best();

        let ahead = wrap_cell(cell + choice.offset() * 2);
        if senses.dangerous_ghost_at(ahead)
            && let Some(alternative) = scores.runner_up(choice)
        {
            debug!(?cell, from = ?choice, to = ?alternative, "ghost ahead, turning away");
            choice = alternative;
        }

        debug!(?cell, scores = ?scores.0, ?choice, "direction chosen");
        choice
    }
}
