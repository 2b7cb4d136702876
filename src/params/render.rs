//! Window, projection and lighting configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (meters)
    pub near_plane_m: f32,

    /// Far clipping plane (meters)
    pub far_plane_m: f32,

    /// Target frame rate; also the headless step rate
    pub target_fps: u32,

    /// Largest frame delta handed to the simulation (seconds)
    pub max_frame_dt_s: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1600,
            window_height: 900,
            fov_degrees: 60.0,
            near_plane_m: 0.1,
            far_plane_m: 1000.0,
            target_fps: 144,
            max_frame_dt_s: 0.1,
        }
    }
}

impl RenderConfig {
    /// Seconds per frame at the target rate
    pub fn frame_step_s(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}

/// Scene lighting and surface colours
#[derive(Debug, Clone)]
pub struct LightingParams {
    /// Direction the light travels (unit vector, world space)
    pub direction: [f32; 3],

    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],

    /// Blinn-Phong exponent
    pub shininess: f32,

    /// Linear RGB water colour
    pub water_color: [f32; 3],

    /// Linear RGB hull colour
    pub hull_color: [f32; 3],

    /// Clear colour behind the ocean
    pub sky_color: [f64; 3],
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            direction: [-0.486897, -0.0627906, 0.8712],
            ambient: [0.4; 3],
            diffuse: [0.6; 3],
            specular: [0.9; 3],
            shininess: 16.0,
            water_color: [0.113_725_49, 0.635_294_1, 0.847_058_8],
            hull_color: [0.82, 0.76, 0.64],
            sky_color: [0.53, 0.71, 0.86],
        }
    }
}
