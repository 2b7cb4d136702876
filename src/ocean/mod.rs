//! Ocean surface: analytic wave field, buoyancy sampling and the render grid.

pub mod mesh;
pub mod sampler;
pub mod wave;

pub use mesh::{OceanGrid, Vertex};
pub use sampler::{BuoyancyTarget, SurfaceSampler};
pub use wave::{random_directions, SurfaceSample, WaveField, WaveTerm};
