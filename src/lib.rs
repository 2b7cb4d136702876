//! Seaborne library - boats on an analytic ocean, with an autonomous fleet

pub mod camera;
pub mod cli;
pub mod clock;
pub mod fleet;
pub mod game;
pub mod input;
pub mod math;
pub mod ocean;
pub mod params;
pub mod rendering;
pub mod vessel;
