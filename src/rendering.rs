//! Renderer seam between the simulation and the GPU.
//!
//! The game only ever talks to [`Renderer`]: one call per mesh per frame with
//! its transforms and a uniform set. [`gpu::GpuRenderer`] is the wgpu backend.

pub mod gpu;

use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::ocean::WaveField;
use crate::params::LightingParams;

pub use gpu::GpuRenderer;

/// Meshes the renderer holds on the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshHandle {
    /// Flat grid displaced by the wave field in the vertex stage
    Ocean,

    /// Vessel hull
    Hull,
}

/// Model, view and projection for one draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

/// Directional light with Phong terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl From<&LightingParams> for DirectionalLight {
    fn from(params: &LightingParams) -> Self {
        Self {
            direction: Vec3::from_array(params.direction),
            ambient: Vec3::from_array(params.ambient),
            diffuse: Vec3::from_array(params.diffuse),
            specular: Vec3::from_array(params.specular),
        }
    }
}

/// Shader inputs for one draw
#[derive(Debug, Clone, Copy)]
pub struct UniformSet<'a> {
    pub light: DirectionalLight,
    pub camera_position: Vec3,
    pub base_color: Vec3,
    pub shininess: f32,

    /// Accumulated wave time (seconds)
    pub time: f32,

    /// Wave terms for meshes the vertex stage displaces
    pub waves: Option<&'a WaveField>,
}

/// Anything that can draw the scene's meshes
pub trait Renderer {
    /// Width over height of the current target
    fn aspect_ratio(&self) -> f32;

    /// Queue `mesh` for this frame
    fn draw_mesh(&mut self, mesh: MeshHandle, transforms: &Transforms, uniforms: &UniformSet<'_>);
}

/// GPU setup and presentation failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface does not support any texture format")]
    NoSurfaceFormat,

    #[error("failed to acquire frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Records draw calls instead of submitting them
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingRenderer {
    pub draws: Vec<RecordedDraw>,
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct RecordedDraw {
    pub mesh: MeshHandle,
    pub transforms: Transforms,
    pub camera_position: Vec3,
    pub time: f32,
    pub wave_terms: Option<usize>,
}

#[cfg(test)]
impl Renderer for RecordingRenderer {
    fn aspect_ratio(&self) -> f32 {
        16.0 / 9.0
    }

    fn draw_mesh(&mut self, mesh: MeshHandle, transforms: &Transforms, uniforms: &UniformSet<'_>) {
        self.draws.push(RecordedDraw {
            mesh,
            transforms: *transforms,
            camera_position: uniforms.camera_position,
            time: uniforms.time,
            wave_terms: uniforms.waves.map(|field| field.terms().len()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_from_params() {
        let light = DirectionalLight::from(&LightingParams::default());
        assert!((light.direction.length() - 1.0).abs() < 1.0e-3);
        assert_eq!(light.ambient, Vec3::splat(0.4));
        assert_eq!(light.specular, Vec3::splat(0.9));
    }
}
