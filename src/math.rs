//! Vector helpers shared by the simulation.
//!
//! Every direction that changes hands in the simulation goes through
//! [`normalize_or`], so a near-zero vector never turns into NaN.

use glam::Vec3;

/// Magnitude below which a vector is treated as having no direction.
pub const DIRECTION_EPSILON: f32 = 1.0e-4;

/// Normalize `v`, or return `fallback` when `v` is shorter than [`DIRECTION_EPSILON`].
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let length = v.length();
    if length < DIRECTION_EPSILON || !length.is_finite() {
        fallback
    } else {
        v / length
    }
}

/// Project onto the horizontal (XZ) plane.
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Horizontal distance between two world points, ignoring height.
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(b - a).length()
}

/// Move `current` toward `target` by at most `max_step`, never past it.
pub fn step_toward(current: Vec3, target: Vec3, max_step: f32) -> Vec3 {
    let delta = target - current;
    let distance = delta.length();
    let step = distance.min(max_step);
    if step <= 0.0 {
        return current;
    }
    current + normalize_or(delta, Vec3::ZERO) * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_or_uses_fallback_for_tiny_vectors() {
        let fallback = Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(normalize_or(Vec3::ZERO, fallback), fallback);
        assert_eq!(normalize_or(Vec3::splat(1.0e-6), fallback), fallback);
        assert_eq!(normalize_or(Vec3::new(f32::NAN, 0.0, 0.0), fallback), fallback);
    }

    #[test]
    fn test_normalize_or_normalizes_regular_vectors() {
        let n = normalize_or(Vec3::new(3.0, 0.0, 4.0), Vec3::Y);
        assert!(n.abs_diff_eq(Vec3::new(0.6, 0.0, 0.8), 1.0e-6));
    }

    #[test]
    fn test_flatten_and_horizontal_distance() {
        assert_eq!(flatten(Vec3::new(1.0, 5.0, -2.0)), Vec3::new(1.0, 0.0, -2.0));
        let d = horizontal_distance(Vec3::new(0.0, 10.0, 0.0), Vec3::new(3.0, -4.0, 4.0));
        assert!((d - 5.0).abs() < 1.0e-6);
    }

    #[test]
    fn test_step_toward_never_overshoots() {
        let start = Vec3::ZERO;
        let target = Vec3::new(0.0, 2.0, 0.0);
        assert!(step_toward(start, target, 0.5).abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1.0e-6));
        assert_eq!(step_toward(start, target, 10.0), target);
        assert_eq!(step_toward(start, target, 0.0), start);
    }
}
