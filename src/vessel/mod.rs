//! Vessel state shared by the player and the autonomous fleet.

pub mod buoyancy;
pub mod hull;
pub mod steering;

use glam::{Mat4, Vec3, Vec4};

use crate::math::{flatten, normalize_or};
use crate::params::VesselParams;

pub use buoyancy::advance;
pub use steering::turn_toward;

/// Who decides where a vessel goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pilot {
    /// Steered by input
    Player,

    /// Autonomous, pursues the player
    Follower,

    /// Autonomous, holds a heading and turns back when it strays too far
    Wanderer { heading: Vec3 },
}

/// Capsize animation state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Capsize {
    pub flipped: bool,

    /// Roll interpolation in `[0, 1]`, terminal at 1.0
    pub progress: f32,
}

/// A hull floating on the wave field.
///
/// `bearing` is the heading on the water plane; `forward` additionally carries
/// the pitch and roll the wave normal imposes through `up`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vessel {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub bearing: Vec3,
    pub speed: f32,
    pub capsize: Capsize,
    pub pilot: Pilot,
}

impl Vessel {
    /// Create a level vessel at rest
    pub fn new(position: Vec3, bearing: Vec3, pilot: Pilot) -> Self {
        let mut vessel = Self {
            position,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            bearing: normalize_or(flatten(bearing), Vec3::Z),
            speed: 0.0,
            capsize: Capsize::default(),
            pilot,
        };
        vessel.rebuild_basis();
        vessel
    }

    /// Re-derive `right` and `forward` from `bearing` and `up`
    pub fn rebuild_basis(&mut self) {
        let fallback_right = normalize_or(self.bearing.cross(Vec3::Y), Vec3::X);
        self.right = normalize_or(self.bearing.cross(self.up), fallback_right);
        self.forward = normalize_or(self.up.cross(self.right), self.bearing);
    }

    pub fn is_follower(&self) -> bool {
        matches!(self.pilot, Pilot::Follower)
    }

    /// Speed this vessel takes on whenever it is steered
    pub fn cruise_speed(&self, params: &VesselParams) -> f32 {
        match self.pilot {
            Pilot::Player => params.player_cruise_speed_m_per_s,
            Pilot::Follower | Pilot::Wanderer { .. } => params.fleet_cruise_speed_m_per_s,
        }
    }

    /// Turn toward `desired` within this tick's turn budget and throttle up to cruise speed
    pub fn steer(&mut self, desired: Vec3, params: &VesselParams, dt: f32) {
        self.bearing = turn_toward(self.bearing, desired, params.turn_rate_per_s * dt);
        self.speed = self.cruise_speed(params);
    }

    /// Start the capsize animation; no-op if already flipped
    pub fn begin_capsize(&mut self) -> bool {
        if self.capsize.flipped {
            return false;
        }
        self.capsize.flipped = true;
        true
    }

    /// Hull-to-world transform: orientation basis, then the capsize roll about the hull's long axis.
    ///
    /// Hull meshes face -Z in model space.
    pub fn model_matrix(&self, capsized_lift: f32) -> Mat4 {
        let basis = Mat4::from_cols(
            self.right.extend(0.0),
            self.up.extend(0.0),
            (-self.forward).extend(0.0),
            Vec4::W,
        );

        let lift = if self.capsize.flipped {
            capsized_lift
        } else {
            0.0
        };
        let roll = Mat4::from_translation(Vec3::Y * lift)
            * Mat4::from_rotation_z(std::f32::consts::PI * self.capsize.progress);

        Mat4::from_translation(self.position) * basis * roll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vessel_has_orthonormal_basis() {
        let vessel = Vessel::new(Vec3::ZERO, Vec3::new(1.0, 3.0, 1.0), Pilot::Follower);
        assert!(vessel.bearing.abs_diff_eq(Vec3::new(1.0, 0.0, 1.0).normalize(), 1.0e-6));
        assert!(vessel.forward.abs_diff_eq(vessel.bearing, 1.0e-6));
        assert!(vessel.right.dot(vessel.up).abs() < 1.0e-6);
        assert!(vessel.right.dot(vessel.forward).abs() < 1.0e-6);
        assert!((vessel.right.length() - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn test_degenerate_bearing_falls_back_to_z() {
        let vessel = Vessel::new(Vec3::ZERO, Vec3::Y, Pilot::Player);
        assert_eq!(vessel.bearing, Vec3::Z);
    }

    #[test]
    fn test_steer_sets_cruise_speed_by_pilot() {
        let params = VesselParams::default();
        let mut player = Vessel::new(Vec3::ZERO, Vec3::Z, Pilot::Player);
        let mut npc = Vessel::new(Vec3::ZERO, Vec3::Z, Pilot::Follower);
        player.steer(Vec3::X, &params, 0.1);
        npc.steer(Vec3::X, &params, 0.1);
        assert_eq!(player.speed, params.player_cruise_speed_m_per_s);
        assert_eq!(npc.speed, params.fleet_cruise_speed_m_per_s);
        assert!(player.bearing.x > 0.0);
    }

    #[test]
    fn test_capsize_only_once() {
        let mut vessel = Vessel::new(Vec3::ZERO, Vec3::Z, Pilot::Follower);
        assert!(vessel.begin_capsize());
        assert!(!vessel.begin_capsize());
        assert!(vessel.capsize.flipped);
    }

    #[test]
    fn test_model_matrix_places_bow_along_bearing() {
        let vessel = Vessel::new(Vec3::new(5.0, 1.0, -2.0), Vec3::X, Pilot::Player);
        let model = vessel.model_matrix(3.0);
        let bow = model.transform_point3(Vec3::new(0.0, 0.0, -1.0));
        assert!(bow.abs_diff_eq(Vec3::new(6.0, 1.0, -2.0), 1.0e-5));
    }

    #[test]
    fn test_fully_capsized_hull_is_upside_down() {
        let mut vessel = Vessel::new(Vec3::ZERO, Vec3::Z, Pilot::Follower);
        vessel.begin_capsize();
        vessel.capsize.progress = 1.0;
        let model = vessel.model_matrix(3.0);
        let deck = model.transform_vector3(Vec3::Y);
        assert!(deck.abs_diff_eq(-Vec3::Y, 1.0e-5));
        assert!(model.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::Y * 3.0, 1.0e-5));
    }
}
