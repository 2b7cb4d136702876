//! Parameter definitions with physical units and documented semantics.
//!
//! All tuning constants live here with:
//! - Physical units (meters, seconds, radians, etc.)
//! - Documented ranges and meanings
//! - Startup validation of the preconditions the simulation relies on

mod camera;
mod ocean;
mod render;
mod vessel;

use thiserror::Error;

// Re-export all types
pub use camera::CameraParams;
pub use ocean::{OceanMesh, SurfaceSampling, WaveComponent, WaveSpectrum, MAX_WAVE_TERMS};
pub use render::{LightingParams, RenderConfig};
pub use vessel::{FleetParams, VesselParams, MAX_FLEET_VESSELS};

/// Startup preconditions that a parameter set violates
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("wave spectrum has no base components")]
    EmptySpectrum,

    #[error("wave spectrum asks for {requested} terms, the shader table holds {max}")]
    TooManyWaveTerms { requested: usize, max: usize },

    #[error("wave spectrum needs at least one direction")]
    NoWaveDirections,

    #[error("wave component {index} has non-positive wavelength {wavelength_m}")]
    InvalidWavelength { index: usize, wavelength_m: f32 },

    #[error("surface sampling grid must have at least one sample per side")]
    EmptySamplingGrid,

    #[error("{followers} followers requested but the fleet only has {fleet} vessels")]
    FollowersExceedFleet { followers: usize, fleet: usize },

    #[error("fleet of {requested} vessels exceeds the {max} the renderer can draw")]
    FleetExceedsDrawSlots { requested: usize, max: usize },

    #[error("max spawn distance must be positive, got {max_m} m")]
    NonPositiveSpawnDistance { max_m: f32 },

    #[error("spawn ring is empty: min distance {min_m} m exceeds max distance {max_m} m")]
    InvalidSpawnRing { min_m: f32, max_m: f32 },

    #[error("ocean mesh must have at least one cell per side")]
    EmptyOceanMesh,
}

/// Every simulation parameter group in one place
#[derive(Debug, Clone, Default)]
pub struct SimParams {
    pub spectrum: WaveSpectrum,
    pub sampling: SurfaceSampling,
    pub ocean_mesh: OceanMesh,
    pub vessel: VesselParams,
    pub fleet: FleetParams,
    pub camera: CameraParams,
    pub lighting: LightingParams,
}

impl SimParams {
    /// Check the preconditions the simulation assumes hold for its whole lifetime
    pub fn validate(&self) -> Result<(), ConfigError> {
        let spectrum = &self.spectrum;
        if spectrum.components.is_empty() {
            return Err(ConfigError::EmptySpectrum);
        }
        if spectrum.term_count > MAX_WAVE_TERMS {
            return Err(ConfigError::TooManyWaveTerms {
                requested: spectrum.term_count,
                max: MAX_WAVE_TERMS,
            });
        }
        if spectrum.direction_count == 0 {
            return Err(ConfigError::NoWaveDirections);
        }
        if let Some((index, component)) = spectrum
            .components
            .iter()
            .enumerate()
            .find(|(_, c)| !c.wavelength_m.is_finite() || c.wavelength_m <= 0.0)
        {
            return Err(ConfigError::InvalidWavelength {
                index,
                wavelength_m: component.wavelength_m,
            });
        }
        if self.sampling.grid_size == 0 {
            return Err(ConfigError::EmptySamplingGrid);
        }
        if self.ocean_mesh.grid_size == 0 {
            return Err(ConfigError::EmptyOceanMesh);
        }
        if self.fleet.vessel_count > MAX_FLEET_VESSELS {
            return Err(ConfigError::FleetExceedsDrawSlots {
                requested: self.fleet.vessel_count,
                max: MAX_FLEET_VESSELS,
            });
        }
        if self.fleet.follower_count > self.fleet.vessel_count {
            return Err(ConfigError::FollowersExceedFleet {
                followers: self.fleet.follower_count,
                fleet: self.fleet.vessel_count,
            });
        }
        let max_m = self.fleet.max_spawn_distance_m;
        if !max_m.is_finite() || max_m <= 0.0 {
            return Err(ConfigError::NonPositiveSpawnDistance { max_m });
        }
        if self.fleet.min_spawn_distance_m > self.fleet.max_spawn_distance_m {
            return Err(ConfigError::InvalidSpawnRing {
                min_m: self.fleet.min_spawn_distance_m,
                max_m: self.fleet.max_spawn_distance_m,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        assert_eq!(SimParams::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_chase_distance_is_midpoint() {
        let camera = CameraParams::default();
        assert!((camera.default_chase_distance_m() - 72.5).abs() < 1.0e-4);
    }

    #[test]
    fn test_rejects_oversized_spectrum() {
        let mut params = SimParams::default();
        params.spectrum.term_count = MAX_WAVE_TERMS + 1;
        assert_eq!(
            params.validate(),
            Err(ConfigError::TooManyWaveTerms {
                requested: MAX_WAVE_TERMS + 1,
                max: MAX_WAVE_TERMS
            })
        );
    }

    #[test]
    fn test_rejects_degenerate_wave_table() {
        let mut params = SimParams::default();
        params.spectrum.components.clear();
        assert_eq!(params.validate(), Err(ConfigError::EmptySpectrum));

        let mut params = SimParams::default();
        params.spectrum.components[2].wavelength_m = 0.0;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidWavelength { index: 2, .. })
        ));

        let mut params = SimParams::default();
        params.spectrum.direction_count = 0;
        assert_eq!(params.validate(), Err(ConfigError::NoWaveDirections));

        let mut params = SimParams::default();
        params.spectrum.components[0].wavelength_m = f32::NAN;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidWavelength { index: 0, .. })
        ));
    }

    #[test]
    fn test_fleet_size_is_capped_by_draw_slots() {
        let mut params = SimParams::default();
        params.fleet.vessel_count = MAX_FLEET_VESSELS;
        assert_eq!(params.validate(), Ok(()));

        params.fleet.vessel_count = 100;
        assert_eq!(
            params.validate(),
            Err(ConfigError::FleetExceedsDrawSlots {
                requested: 100,
                max: MAX_FLEET_VESSELS
            })
        );
    }

    #[test]
    fn test_rejects_non_positive_spawn_distance() {
        let mut params = SimParams::default();
        params.fleet.min_spawn_distance_m = -20.0;
        params.fleet.max_spawn_distance_m = -10.0;
        assert_eq!(
            params.validate(),
            Err(ConfigError::NonPositiveSpawnDistance { max_m: -10.0 })
        );

        params.fleet.min_spawn_distance_m = 0.0;
        params.fleet.max_spawn_distance_m = 0.0;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NonPositiveSpawnDistance { .. })
        ));
    }

    #[test]
    fn test_rejects_fleet_misconfiguration() {
        let mut params = SimParams::default();
        params.fleet.follower_count = params.fleet.vessel_count + 1;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::FollowersExceedFleet { .. })
        ));

        let mut params = SimParams::default();
        params.fleet.min_spawn_distance_m = 500.0;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidSpawnRing { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_sampling_grid() {
        let mut params = SimParams::default();
        params.sampling.grid_size = 0;
        assert_eq!(params.validate(), Err(ConfigError::EmptySamplingGrid));
    }

    #[test]
    fn test_frame_step_matches_target_fps() {
        let config = RenderConfig::default();
        assert!((config.frame_step_s() - 1.0 / 144.0).abs() < 1.0e-7);
    }
}
