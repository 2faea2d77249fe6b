pub mod components;
pub mod constants;
pub mod direction;
pub mod maze;
pub mod schedule;
pub mod spatial;

pub use bevy_math::{DVec2, IVec2};
