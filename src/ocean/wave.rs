//! Analytic wave field: a sum of exponentiated sines.
//!
//! Each term contributes `amplitude * exp(sin(phase) - 1)`, which keeps crests
//! sharp and troughs flat without any square roots. The field is a pure
//! function of `(x, z, time)` once the term table is built.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::math::normalize_or;
use crate::params::WaveSpectrum;

/// Height and surface normal at one point of the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Damped and offset surface height (meters)
    pub height: f32,

    /// Unit normal from the first-order tangent plane
    pub normal: Vec3,
}

/// One summed term of the spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveTerm {
    /// Unit direction of travel in the XZ plane
    pub direction: Vec2,

    /// Base amplitude from the wave table (meters)
    pub amplitude: f32,

    /// Base wavelength from the wave table (meters)
    pub wavelength: f32,

    /// Phase speed (meters per second)
    pub speed: f32,

    /// Spectral falloff applied to the amplitude
    pub amplitude_scale: f32,

    /// Spectral growth applied to the spatial frequency
    pub frequency_scale: f32,
}

impl WaveTerm {
    /// Base spatial frequency, `2 / wavelength`
    pub fn base_frequency(&self) -> f32 {
        2.0 / self.wavelength
    }

    /// Temporal phase rate. Uses the unscaled frequency, so higher terms
    /// get finer without also getting faster.
    pub fn phase_rate(&self) -> f32 {
        self.speed * self.base_frequency()
    }

    /// Returns `(height, d/dx, d/dz)` of this term's contribution
    fn evaluate(&self, x: f32, z: f32, time: f32) -> (f32, f32, f32) {
        let amplitude = self.amplitude * self.amplitude_scale;
        let frequency = self.base_frequency() * self.frequency_scale;

        let phase = (self.direction.x * x + self.direction.y * z) * frequency
            + time * self.phase_rate();
        let (sine, cosine) = phase.sin_cos();
        let exponent = (sine - 1.0).exp();

        let slope = amplitude * cosine * exponent * frequency;
        (
            amplitude * exponent,
            self.direction.x * slope,
            self.direction.y * slope,
        )
    }
}

/// Draw `count` random unit directions in the horizontal plane
pub fn random_directions<R: Rng>(rng: &mut R, count: usize) -> Vec<Vec2> {
    (0..count)
        .map(|_| Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU)))
        .collect()
}

/// Immutable wave field shared by buoyancy sampling and rendering
#[derive(Debug, Clone)]
pub struct WaveField {
    terms: Vec<WaveTerm>,
    height_damping: f32,
    floating_offset: f32,
}

impl WaveField {
    /// Build the term table from a spectrum and the startup directions.
    ///
    /// Term `i` takes component `i % components` and direction `i % directions`;
    /// amplitude and frequency scales compound per term.
    pub fn from_spectrum(spectrum: &WaveSpectrum, directions: &[Vec2]) -> Self {
        let mut terms = Vec::with_capacity(spectrum.term_count);
        let mut amplitude_scale = 1.0;
        let mut frequency_scale = 1.0;

        if !spectrum.components.is_empty() && !directions.is_empty() {
            for i in 0..spectrum.term_count {
                let component = spectrum.components[i % spectrum.components.len()];
                let direction = directions[i % directions.len()];
                terms.push(WaveTerm {
                    direction: direction.try_normalize().unwrap_or(Vec2::X),
                    amplitude: component.amplitude_m,
                    wavelength: component.wavelength_m,
                    speed: component.speed_m_per_s,
                    amplitude_scale,
                    frequency_scale,
                });
                amplitude_scale *= spectrum.amplitude_decay;
                frequency_scale *= spectrum.frequency_growth;
            }
        }

        Self::from_terms(terms, spectrum.height_damping, spectrum.floating_offset_m)
    }

    /// Build a field from an explicit term table
    pub fn from_terms(terms: Vec<WaveTerm>, height_damping: f32, floating_offset: f32) -> Self {
        Self {
            terms,
            height_damping,
            floating_offset,
        }
    }

    pub fn terms(&self) -> &[WaveTerm] {
        &self.terms
    }

    pub fn height_damping(&self) -> f32 {
        self.height_damping
    }

    pub fn floating_offset(&self) -> f32 {
        self.floating_offset
    }

    /// Sample the surface at world `(x, z)` and time `time` (seconds)
    pub fn sample(&self, x: f32, z: f32, time: f32) -> SurfaceSample {
        let mut height = 0.0;
        let mut dx = 0.0;
        let mut dz = 0.0;

        for term in &self.terms {
            let (h, tx, tz) = term.evaluate(x, z, time);
            height += h;
            dx += tx;
            dz += tz;
        }

        SurfaceSample {
            height: height * self.height_damping + self.floating_offset,
            normal: normalize_or(Vec3::new(-dx, 1.0, -dz), Vec3::Y),
        }
    }
}
