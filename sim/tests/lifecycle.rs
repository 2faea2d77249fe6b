//! Death and level-clear sequences driven through the full simulation.

use common::{
    IVec2,
    components::{Actor, GhostId, ItemId, ItemKind, PacTag},
    maze::MazeLayout,
};
use sim::{
    SimConfig, Simulation,
    constants::{SPIN_SPEED, SPIN_TIME, WAIT_TIME},
    lifecycle::LifecycleState,
    systems::items::ItemMap,
};

const PAC: PacTag = PacTag(0);

fn simulation() -> Simulation {
    let maze = MazeLayout::classic().expect("classic layout");
    Simulation::new(maze, SimConfig::default())
}

fn warm_up(sim: &mut Simulation, ticks: u64) {
    for _ in 0..ticks {
        sim.step();
    }
}

// Cell the pac is about to enter.
fn cell_ahead(sim: &Simulation) -> IVec2 {
    let pac = sim.pac(PAC).expect("pac alive");
    (pac.position + pac.last_action.unit() * 0.5).round().as_ivec2()
}

// ============== Death Sequence ==============

#[test]
fn test_last_life_death_timeline() {
    let mut sim = simulation();
    warm_up(&mut sim, 40);

    let caught_at = sim.now();
    sim.register_death(PAC);
    sim.step();

    let pac = sim.pac(PAC).expect("pac alive");
    let position = pac.position;
    let memory = pac.memory().clone();
    let start = sim.ctx.maze.pac_start;
    assert_ne!(position, start);
    assert_eq!(sim.ctx.deaths, 1);
    assert_eq!(sim.ctx.lifecycle.state(), LifecycleState::DeathPause);

    let mut spins = 0;
    let mut heading = pac.last_action;
    let respawn_tick = caught_at + u64::from(2 * WAIT_TIME + SPIN_TIME) + 1;

    while sim.now() < respawn_tick {
        sim.step();
        let k = sim.now() - 1 - caught_at;
        let pac = sim.pac(PAC).expect("pac alive");
        assert_eq!(pac.position, position, "moved during death sequence at k = {k}");

        if pac.last_action != heading {
            assert!(k > u64::from(WAIT_TIME) && k <= u64::from(WAIT_TIME + SPIN_TIME), "spun at k = {k}");
            spins += 1;
            heading = pac.last_action;
        }
    }

    assert_eq!(spins, SPIN_TIME.div_ceil(SPIN_SPEED));

    // Tick T + 2 * WAIT_TIME + SPIN_TIME + 1
    sim.step();
    let pac = sim.pac(PAC).expect("pac alive");
    assert_eq!(pac.position, start);
    assert_eq!(pac.memory(), &memory);
    assert!(sim.ctx.lifecycle.is_active());

    // And play resumes the tick after
    sim.step();
    assert_ne!(sim.pac(PAC).map(|pac| pac.position), Some(start));
}

#[test]
fn test_ghosts_leave_the_field_after_the_pause() {
    let mut sim = simulation();
    warm_up(&mut sim, 10);
    let ghost = Actor::Ghost(GhostId(0));

    sim.register_death(PAC);
    sim.step();
    warm_up(&mut sim, u64::from(WAIT_TIME) - 1);
    assert!(sim.ctx.agents.contains(ghost));
    assert_eq!(sim.ctx.lifecycle.state(), LifecycleState::DeathPause);

    sim.step();
    assert!(!sim.ctx.agents.contains(ghost));
    assert!(sim.ctx.agents.contains(Actor::Pac(PAC)));
    assert_eq!(sim.ctx.lifecycle.state(), LifecycleState::DeathRemoveOthers);

    warm_up(&mut sim, u64::from(WAIT_TIME + SPIN_TIME) + 1);
    assert!(sim.ctx.lifecycle.is_active());
    assert_eq!(
        sim.ctx.agents.location_of(ghost),
        sim.ctx.maze.ghost_starts.first().map(|cell| cell.as_dvec2())
    );
}

#[test]
fn test_second_catch_in_the_same_tick_is_ignored() {
    let mut sim = simulation();
    warm_up(&mut sim, 5);
    sim.register_death(PAC);
    sim.register_death(PAC);
    sim.step();
    assert_eq!(sim.ctx.deaths, 1);
}

// ============== Level Clear ==============

#[test]
fn test_level_clear_advances_after_double_pause() {
    let mut sim = simulation();
    warm_up(&mut sim, 5);

    // Leave a single dot on the cell the pac is heading into
    let ahead = cell_ahead(&sim);
    sim.ctx.items = ItemMap::default();
    sim.ctx.items.place(ItemId(0), ItemKind::Dot, ahead);

    let mut cleared_at = None;
    for _ in 0..20 {
        sim.step();
        if sim.ctx.levels_won == 1 {
            cleared_at = Some(sim.now() - 1);
            break;
        }
    }
    let cleared_at = cleared_at.expect("level cleared");
    assert_eq!(sim.ctx.lifecycle.state(), LifecycleState::WinPause);
    assert_eq!(sim.ctx.level, 1);

    while sim.now() <= cleared_at + u64::from(2 * WAIT_TIME) {
        sim.step();
    }
    assert_eq!(sim.ctx.level, 2);
    assert!(sim.ctx.lifecycle.is_active());
    assert_eq!(sim.ctx.items.len(), sim.ctx.maze.dots.len() + sim.ctx.maze.energizers.len());
    assert_eq!(sim.pac(PAC).map(|pac| pac.memory().known_count()), Some(0));
}

#[test]
fn test_run_stops_after_configured_levels() {
    let maze = MazeLayout::classic().expect("classic layout");
    let config = SimConfig {
        levels: 0,
        ..SimConfig::default()
    };
    let summary = Simulation::new(maze, config).run();
    assert_eq!(summary.ticks, 0);
}

#[test]
fn test_classic_level_is_finished() {
    let maze = MazeLayout::classic().expect("classic layout");
    let config = SimConfig {
        seed: 0,
        pacs: 1,
        levels: 1,
        ghosts: false,
        max_ticks: Some(1_000_000),
        ..SimConfig::default()
    };
    let summary = Simulation::new(maze, config).run();
    assert_eq!(summary.levels_won, 1, "{summary:?}");
}

// ============== Frightened Ghosts ==============

#[test]
fn test_frighten_flag_lasts_one_tick() {
    let mut sim = simulation();
    warm_up(&mut sim, 5);

    // Energizer right ahead, plus a far dot so the level goes on
    let ahead = cell_ahead(&sim);
    sim.ctx.items = ItemMap::default();
    sim.ctx.items.place(ItemId(0), ItemKind::Energizer, ahead);
    sim.ctx.items.place(ItemId(1), ItemKind::Dot, IVec2::new(26, 32));

    let mut eaten = false;
    for _ in 0..20 {
        sim.step();
        if sim.ctx.score >= 40 {
            eaten = true;
            break;
        }
    }
    assert!(eaten, "energizer never reached");
    assert!(sim.ctx.frighten_ghosts);
    assert!(!sim.ctx.items.occupied(ahead));

    sim.step();
    assert!(!sim.ctx.frighten_ghosts);
    assert!(sim.ctx.lifecycle.is_active());
}
