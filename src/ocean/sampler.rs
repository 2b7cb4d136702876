//! Footprint-averaged surface sampling for buoyancy.

use glam::Vec3;

use super::wave::WaveField;
use crate::math::normalize_or;
use crate::params::SurfaceSampling;

/// Where a hull centred on a point wants to float
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuoyancyTarget {
    /// Query x/z with the averaged surface height
    pub position: Vec3,

    /// Averaged, re-normalized surface normal
    pub normal: Vec3,
}

/// Averages the wave field over a square grid centred on the query point
#[derive(Debug, Clone)]
pub struct SurfaceSampler {
    grid_size: usize,
    spacing: f32,
}

impl SurfaceSampler {
    pub fn new(params: &SurfaceSampling) -> Self {
        Self {
            grid_size: params.grid_size.max(1),
            spacing: params.spacing_m,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Average height and normal around `center` at `time`
    pub fn averaged_sample(&self, field: &WaveField, center: Vec3, time: f32) -> BuoyancyTarget {
        let start = -self.spacing * (self.grid_size - 1) as f32 / 2.0;

        let mut height_sum = 0.0;
        let mut normal_sum = Vec3::ZERO;
        for i in 0..self.grid_size {
            for j in 0..self.grid_size {
                let x = center.x + start + self.spacing * i as f32;
                let z = center.z + start + self.spacing * j as f32;
                let sample = field.sample(x, z, time);
                height_sum += sample.height;
                normal_sum += sample.normal;
            }
        }

        let count = self.sample_count() as f32;
        BuoyancyTarget {
            position: Vec3::new(center.x, height_sum / count, center.z),
            normal: normalize_or(normal_sum / count, Vec3::Y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::wave::random_directions;
    use crate::params::WaveSpectrum;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field() -> WaveField {
        let spectrum = WaveSpectrum::default();
        let mut rng = StdRng::seed_from_u64(99);
        let directions = random_directions(&mut rng, spectrum.direction_count);
        WaveField::from_spectrum(&spectrum, &directions)
    }

    #[test]
    fn test_averaged_normal_is_unit_length() {
        let field = field();
        let sampler = SurfaceSampler::new(&SurfaceSampling::default());
        for i in 0..200 {
            let center = Vec3::new(i as f32 * 7.3 - 500.0, 12.0, i as f32 * -3.1 + 40.0);
            let target = sampler.averaged_sample(&field, center, i as f32 * 0.05);
            assert!(
                (target.normal.length() - 1.0).abs() < 1.0e-5,
                "Normal {:?} not unit at {:?}",
                target.normal,
                center
            );
        }
    }

    #[test]
    fn test_target_keeps_query_xz() {
        let field = field();
        let sampler = SurfaceSampler::new(&SurfaceSampling::default());
        let center = Vec3::new(13.5, 99.0, -4.25);
        let target = sampler.averaged_sample(&field, center, 2.0);
        assert_eq!(target.position.x, center.x);
        assert_eq!(target.position.z, center.z);
        assert!(target.position.y.is_finite());
    }

    #[test]
    fn test_single_sample_grid_matches_point_sample() {
        let field = field();
        let sampler = SurfaceSampler::new(&SurfaceSampling {
            grid_size: 1,
            spacing_m: 0.25,
        });
        let point = field.sample(8.0, -3.0, 1.5);
        let target = sampler.averaged_sample(&field, Vec3::new(8.0, 0.0, -3.0), 1.5);
        assert!((target.position.y - point.height).abs() < 1.0e-6);
        assert!(target.normal.abs_diff_eq(point.normal, 1.0e-6));
    }

    #[test]
    fn test_averaging_smooths_height() {
        let field = field();
        let sampler = SurfaceSampler::new(&SurfaceSampling {
            grid_size: 3,
            spacing_m: 1.0,
        });
        let center = Vec3::new(4.0, 0.0, 9.0);
        let target = sampler.averaged_sample(&field, center, 0.5);

        let mut heights = Vec::new();
        for dx in [-1.0, 0.0, 1.0] {
            for dz in [-1.0, 0.0, 1.0] {
                heights.push(field.sample(center.x + dx, center.z + dz, 0.5).height);
            }
        }
        let mean = heights.iter().sum::<f32>() / heights.len() as f32;
        assert!((target.position.y - mean).abs() < 1.0e-5);
    }
}
