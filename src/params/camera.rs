//! Free-fly and chase camera parameters.

/// Camera rig tuning
#[derive(Debug, Clone)]
pub struct CameraParams {
    /// Initial yaw (degrees, -90 looks down -Z)
    pub initial_yaw_deg: f32,

    /// Initial pitch (degrees)
    pub initial_pitch_deg: f32,

    /// Mouse sensitivity (degrees per mouse count)
    pub mouse_sensitivity: f32,

    /// Pitch limit (degrees, either side of the horizon)
    pub max_pitch_deg: f32,

    /// Free camera speed (meters per second)
    pub free_move_speed_m_per_s: f32,

    /// Free camera speed while boosting (meters per second)
    pub free_fast_move_speed_m_per_s: f32,

    /// Chase smoothing rate (per second); higher follows more tightly
    pub chase_smoothing_rate_per_s: f32,

    /// Closest chase distance (meters)
    pub min_chase_distance_m: f32,

    /// Farthest chase distance (meters)
    pub max_chase_distance_m: f32,

    /// Chase distance change per scroll line (meters)
    pub scroll_step_m: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            initial_yaw_deg: -90.0,
            initial_pitch_deg: 0.0,
            mouse_sensitivity: 0.1,
            max_pitch_deg: 89.0,
            free_move_speed_m_per_s: 10.0,
            free_fast_move_speed_m_per_s: 50.0,
            chase_smoothing_rate_per_s: 10.0,
            min_chase_distance_m: 20.0,
            max_chase_distance_m: 125.0,
            scroll_step_m: 1.0,
        }
    }
}

impl CameraParams {
    /// Starting chase distance, halfway between the limits
    pub fn default_chase_distance_m(&self) -> f32 {
        (self.max_chase_distance_m - self.min_chase_distance_m) * 0.5 + self.min_chase_distance_m
    }
}
