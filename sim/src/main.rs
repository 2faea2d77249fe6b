use anyhow::{Context, Result};
use clap::Parser;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{info, warn};

use sim::{Args, RunSummary, SimConfig, Simulation, init_tracing, load_maze};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let config = SimConfig::from_args(&args)?;
    let maze = load_maze(&args).context("failed to load maze layout")?;
    info!(
        "maze loaded: {} dots, {} energizers, {} ghosts",
        maze.dots.len(),
        maze.energizers.len(),
        if config.ghosts { maze.ghost_starts.len() } else { 0 }
    );

    let mut sim = Simulation::new(maze, config);

    let summary = if args.tick_hz == 0 {
        sim.run()
    } else {
        run_paced(&mut sim, args.tick_hz).await
    };

    info!(
        "run finished after {} ticks: score {}, level {}, {} levels won, {} deaths",
        summary.ticks, summary.score, summary.level, summary.levels_won, summary.deaths
    );
    report(&args, &summary)
}

// Step the simulation at `tick_hz` ticks per second.
async fn run_paced(sim: &mut Simulation, tick_hz: u64) -> RunSummary {
    let tick_duration = Duration::from_nanos(1_000_000_000 / tick_hz);
    let mut interval = time::interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !sim.finished() {
        interval.tick().await;

        let update_start = Instant::now();
        sim.step();
        let update_elapsed = update_start.elapsed();

        if update_elapsed > tick_duration {
            warn!(
                "tick {} took {:.2}ms (exceeded {:.2}ms budget)",
                sim.now(),
                update_elapsed.as_secs_f64() * 1000.0,
                tick_duration.as_secs_f64() * 1000.0
            );
        }
    }
    sim.summary()
}

#[cfg(feature = "json")]
fn report(args: &Args, summary: &RunSummary) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("{summary:?}");
    }
    Ok(())
}

#[cfg(not(feature = "json"))]
fn report(_args: &Args, summary: &RunSummary) -> Result<()> {
    println!("{summary:?}");
    Ok(())
}
