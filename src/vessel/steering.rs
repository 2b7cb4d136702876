//! Bounded bearing changes toward a desired heading.

use glam::{Quat, Vec3};

use crate::math::{flatten, normalize_or};

/// Angle below which two headings count as aligned (radians)
pub const ALIGNED_EPSILON: f32 = 1.0e-4;

/// Turn `current` toward `desired` by at most `max_turn` radians about world up.
///
/// Both inputs are flattened onto the water plane first. A desired heading more
/// than 90 degrees away is replaced by whichever side (current right or left) is
/// closer to it, so the turn never has to pick a direction near 180 degrees.
/// The step is the smaller of the remaining angle and `max_turn`, so a bearing
/// never overshoots its target.
pub fn turn_toward(current: Vec3, desired: Vec3, max_turn: f32) -> Vec3 {
    let current = normalize_or(flatten(current), Vec3::Z);
    let mut desired = normalize_or(flatten(desired), current);

    if desired.dot(current) < 0.0 {
        let right = normalize_or(current.cross(Vec3::Y), Vec3::X);
        desired = if right.dot(desired) >= (-right).dot(desired) {
            right
        } else {
            -right
        };
    }

    let angle = current.cross(desired).y.atan2(current.dot(desired));
    if angle.abs() < ALIGNED_EPSILON {
        return current;
    }

    let step = angle.clamp(-max_turn.max(0.0), max_turn.max(0.0));
    normalize_or(Quat::from_rotation_y(step) * current, current)
}
