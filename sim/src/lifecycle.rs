#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use crate::constants::{SPIN_SPEED, SPIN_TIME, WAIT_TIME};
use common::components::PacTag;

// ============================================================================
// Lifecycle Timing
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LifecycleTiming {
    pub wait_time: u32,
    pub spin_time: u32,
    pub spin_speed: u32,
}

impl Default for LifecycleTiming {
    fn default() -> Self {
        Self {
            wait_time: WAIT_TIME,
            spin_time: SPIN_TIME,
            spin_speed: SPIN_SPEED,
        }
    }
}

impl LifecycleTiming {
    #[must_use]
    pub const fn new(wait_time: u32, spin_time: u32, spin_speed: u32) -> Self {
        assert!(wait_time >= 1, "wait time must be at least one tick");
        assert!(spin_speed >= 1, "spin speed must be at least one tick");
        Self {
            wait_time,
            spin_time,
            spin_speed,
        }
    }

    // Driver calls from the death tick until the agents are back at their starts.
    #[must_use]
    pub const fn respawn_at(&self) -> u32 {
        2 * self.wait_time + self.spin_time + 1
    }

    #[must_use]
    pub const fn level_advance_at(&self) -> u32 {
        2 * self.wait_time
    }
}

// ============================================================================
// Lifecycle State Machine
// ============================================================================

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum LifecycleState {
    #[default]
    Active,
    DeathPause,
    DeathRemoveOthers,
    DeathSpin,
    Respawn,
    WinPause,
    LevelAdvance,
}

// Side effect the game has to carry out for the tick the driver just ran.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LifecycleAction {
    RemoveOthers,
    Spin,
    ResetAgents,
    AdvanceLevel,
}

// Death and level-clear sequencing. `advance` is called once per tick by a repeating scheduler
// entry; the tick counter lives here rather than in the scheduled event.
#[derive(Clone, Debug, Default)]
pub struct Lifecycle {
    state: LifecycleState,
    elapsed: u32,
    subject: Option<PacTag>,
    timing: LifecycleTiming,
}

impl Lifecycle {
    #[must_use]
    pub fn new(timing: LifecycleTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, LifecycleState::Active)
    }

    // The agent whose death is being played out.
    #[must_use]
    pub const fn subject(&self) -> Option<PacTag> {
        self.subject
    }

    pub const fn begin_death(&mut self, tag: PacTag) {
        self.state = LifecycleState::DeathPause;
        self.elapsed = 0;
        self.subject = Some(tag);
    }

    pub const fn begin_win(&mut self) {
        self.state = LifecycleState::WinPause;
        self.elapsed = 0;
        self.subject = None;
    }

    // Run one tick of the current sequence.
    pub fn advance(&mut self) -> Option<LifecycleAction> {
        if self.is_active() {
            return None;
        }
        self.elapsed += 1;
        let k = self.elapsed;
        let LifecycleTiming {
            wait_time,
            spin_time,
            spin_speed,
        } = self.timing;

        match self.state {
            LifecycleState::WinPause | LifecycleState::LevelAdvance => {
                if k < self.timing.level_advance_at() {
                    None
                } else {
                    self.state = LifecycleState::LevelAdvance;
                    self.finish();
                    Some(LifecycleAction::AdvanceLevel)
                }
            }
            _ if k < wait_time => None,
            _ if k == wait_time => {
                self.state = LifecycleState::DeathRemoveOthers;
                Some(LifecycleAction::RemoveOthers)
            }
            _ if k <= wait_time + spin_time => {
                self.state = LifecycleState::DeathSpin;
                ((k - wait_time - 1) % spin_speed == 0).then_some(LifecycleAction::Spin)
            }
            _ if k < self.timing.respawn_at() => {
                self.state = LifecycleState::Respawn;
                None
            }
            _ => {
                self.finish();
                Some(LifecycleAction::ResetAgents)
            }
        }
    }

    fn finish(&mut self) {
        self.state = LifecycleState::Active;
        self.elapsed = 0;
        self.subject = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lifecycle: &mut Lifecycle, ticks: u32) -> Vec<(u32, LifecycleAction)> {
        (1..=ticks).filter_map(|k| lifecycle.advance().map(|action| (k, action))).collect()
    }

    #[test]
    fn death_sequence_follows_timing() {
        let mut lifecycle = Lifecycle::new(LifecycleTiming::new(4, 6, 3));
        lifecycle.begin_death(PacTag(0));
        assert_eq!(lifecycle.state(), LifecycleState::DeathPause);

        let actions = run(&mut lifecycle, 15);
        assert_eq!(
            actions,
            vec![
                (4, LifecycleAction::RemoveOthers),
                (5, LifecycleAction::Spin),
                (8, LifecycleAction::Spin),
                (15, LifecycleAction::ResetAgents),
            ]
        );
        assert!(lifecycle.is_active());
    }

    #[test]
    fn states_change_at_phase_boundaries() {
        let mut lifecycle = Lifecycle::new(LifecycleTiming::new(2, 2, 1));
        lifecycle.begin_death(PacTag(3));
        let mut states = Vec::new();
        for _ in 0..7 {
            lifecycle.advance();
            states.push(lifecycle.state());
        }
        assert_eq!(
            states,
            vec![
                LifecycleState::DeathPause,
                LifecycleState::DeathRemoveOthers,
                LifecycleState::DeathSpin,
                LifecycleState::DeathSpin,
                LifecycleState::Respawn,
                LifecycleState::Respawn,
                LifecycleState::Active,
            ]
        );
        assert_eq!(lifecycle.subject(), None);
    }

    #[test]
    fn win_pauses_twice_the_wait() {
        let mut lifecycle = Lifecycle::new(LifecycleTiming::new(3, 10, 2));
        lifecycle.begin_win();
        assert_eq!(run(&mut lifecycle, 6), vec![(6, LifecycleAction::AdvanceLevel)]);
        assert!(lifecycle.is_active());
    }

    #[test]
    fn idle_machine_does_nothing() {
        let mut lifecycle = Lifecycle::default();
        assert_eq!(lifecycle.advance(), None);
        assert_eq!(lifecycle.state(), LifecycleState::Active);
    }
}
