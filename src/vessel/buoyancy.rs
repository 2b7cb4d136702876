//! Per-tick float, attitude and coasting update.

use glam::Vec3;

use super::Vessel;
use crate::math::{normalize_or, step_toward};
use crate::ocean::{SurfaceSampler, WaveField};
use crate::params::VesselParams;

/// Advance one vessel by `dt` seconds against the wave field at `time`.
///
/// Height and attitude chase the footprint-averaged surface at bounded rates.
/// Speed only decays here; steering is what sets it.
pub fn advance(
    vessel: &mut Vessel,
    sampler: &SurfaceSampler,
    field: &WaveField,
    time: f32,
    params: &VesselParams,
    dt: f32,
) {
    if dt <= 0.0 {
        return;
    }

    let target = sampler.averaged_sample(field, vessel.position, time);

    vessel.position = step_toward(
        vessel.position,
        target.position,
        params.height_lerp_speed_m_per_s * dt,
    );

    let up_step = params.up_rotation_speed_per_s * dt;
    if up_step > 0.0 {
        vessel.up = normalize_or(step_toward(vessel.up, target.normal, up_step), Vec3::Y);
    }

    vessel.rebuild_basis();

    if vessel.speed > 0.0 {
        vessel.position += vessel.bearing * vessel.speed * dt;
        vessel.speed = (vessel.speed - params.drag_per_s * dt).max(0.0);
    }

    if vessel.capsize.flipped {
        vessel.capsize.progress = (vessel.capsize.progress + params.flip_speed_per_s * dt).min(1.0);
    }
}
