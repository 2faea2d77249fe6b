pub mod config;
pub mod constants;
pub mod events;
pub mod game;
pub mod lifecycle;
pub mod navigation;
pub mod resources;
pub mod systems;

pub use config::{Args, SimConfig, init_tracing, load_maze};
pub use game::{RunSummary, Simulation};
