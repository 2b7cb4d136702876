//! Wave spectrum, buoyancy sampling and ocean mesh parameters.

/// Capacity of the wave-term table the ocean shader reads
pub const MAX_WAVE_TERMS: usize = 36;

/// One entry of the base wave table.
///
/// The spectrum cycles through these entries, so term `i` uses
/// `components[i % components.len()]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveComponent {
    /// Peak height contribution before spectral falloff (meters)
    pub amplitude_m: f32,

    /// Crest-to-crest distance (meters). Spatial frequency is `2 / wavelength`.
    pub wavelength_m: f32,

    /// Phase speed (meters per second)
    pub speed_m_per_s: f32,
}

impl WaveComponent {
    pub const fn new(amplitude_m: f32, wavelength_m: f32, speed_m_per_s: f32) -> Self {
        Self {
            amplitude_m,
            wavelength_m,
            speed_m_per_s,
        }
    }
}

/// Summed-sine wave spectrum shared by buoyancy and the ocean shader
#[derive(Debug, Clone)]
pub struct WaveSpectrum {
    /// Base table, cycled across all terms
    pub components: Vec<WaveComponent>,

    /// Number of summed terms (the shader table holds at most 36)
    pub term_count: usize,

    /// Number of random horizontal directions generated at startup, cycled across terms
    pub direction_count: usize,

    /// Amplitude multiplier applied per successive term (dimensionless)
    pub amplitude_decay: f32,

    /// Frequency multiplier applied per successive term (dimensionless)
    pub frequency_growth: f32,

    /// Scale applied to the summed height when floating a hull (dimensionless)
    pub height_damping: f32,

    /// Offset added after damping so hulls sit slightly low in the water (meters)
    pub floating_offset_m: f32,
}

impl Default for WaveSpectrum {
    fn default() -> Self {
        Self {
            components: vec![
                WaveComponent::new(2.0, 20.0, 3.0),
                WaveComponent::new(2.0, 10.0, 5.0),
                WaveComponent::new(0.5, 5.0, 3.0),
                WaveComponent::new(0.25, 2.5, 6.0),
            ],
            term_count: 36,
            direction_count: 12,
            amplitude_decay: 0.92,
            frequency_growth: 1.08,
            height_damping: 0.95,
            floating_offset_m: -0.5,
        }
    }
}

/// Footprint used to average the surface under a hull
#[derive(Debug, Clone)]
pub struct SurfaceSampling {
    /// Samples per side of the square grid (5 = 25 samples)
    pub grid_size: usize,

    /// Distance between neighbouring samples (meters)
    pub spacing_m: f32,
}

impl Default for SurfaceSampling {
    fn default() -> Self {
        Self {
            grid_size: 5,
            spacing_m: 0.25,
        }
    }
}

/// Visual ocean grid that follows the camera
#[derive(Debug, Clone)]
pub struct OceanMesh {
    /// Cells per side (400 = 160,801 vertices)
    pub grid_size: usize,

    /// Spacing between grid vertices (meters)
    pub grid_spacing_m: f32,
}

impl Default for OceanMesh {
    fn default() -> Self {
        Self {
            grid_size: 400,
            grid_spacing_m: 1.0,
        }
    }
}
