pub mod exploration;
pub mod perception;
pub mod scoring;
pub mod sensor;

pub use perception::{Cell, PerceptionMemory, Quadrant};
pub use scoring::{DirectionScorer, DirectionScores, Surroundings};
pub use sensor::Sensor;
