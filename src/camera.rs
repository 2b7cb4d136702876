//! Free-fly and boat-chase cameras with a toggle between them.

use glam::{Mat4, Vec3};

use crate::math::normalize_or;
use crate::params::{CameraParams, RenderConfig};

/// Which camera feeds the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Free,
    Chase,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::Free => CameraMode::Chase,
            CameraMode::Chase => CameraMode::Free,
        }
    }
}

/// Position and orientation; the view matrix is built from these
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub world_up: Vec3,
}

impl Pose {
    /// Move every field a `factor` of the way toward `target`, keeping directions unit length
    fn blend_toward(&mut self, target: &Pose, factor: f32) {
        self.position += (target.position - self.position) * factor;
        for (current, goal) in [
            (&mut self.forward, target.forward),
            (&mut self.right, target.right),
            (&mut self.up, target.up),
            (&mut self.world_up, target.world_up),
        ] {
            *current = normalize_or(*current + (goal - *current) * factor, goal);
        }
    }
}

/// Euler-angle camera with an optional low-pass filtered copy of its pose
#[derive(Debug, Clone)]
pub struct Camera {
    pose: Pose,
    yaw_deg: f32,
    pitch_deg: f32,
    max_pitch_deg: f32,
    sensitivity: f32,

    /// Present when the view should lag the raw pose
    smoothed: Option<Pose>,
    smoothing_rate: f32,
}

impl Camera {
    pub fn new(position: Vec3, params: &CameraParams) -> Self {
        let mut camera = Self {
            pose: Pose {
                position,
                forward: -Vec3::Z,
                right: Vec3::X,
                up: Vec3::Y,
                world_up: Vec3::Y,
            },
            yaw_deg: params.initial_yaw_deg,
            pitch_deg: params.initial_pitch_deg,
            max_pitch_deg: params.max_pitch_deg,
            sensitivity: params.mouse_sensitivity,
            smoothed: None,
            smoothing_rate: params.chase_smoothing_rate_per_s,
        };
        camera.update_vectors();
        camera
    }

    /// Same camera, but the view lags behind the raw pose
    pub fn smoothed(mut self) -> Self {
        self.smoothed = Some(self.pose);
        self
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.pose.position = position;
    }

    pub fn forward(&self) -> Vec3 {
        self.pose.forward
    }

    pub fn right(&self) -> Vec3 {
        self.pose.right
    }

    pub fn yaw_pitch_deg(&self) -> (f32, f32) {
        (self.yaw_deg, self.pitch_deg)
    }

    /// The pose the view is built from: the smoothed copy when smoothing is on
    pub fn view_pose(&self) -> &Pose {
        self.smoothed.as_ref().unwrap_or(&self.pose)
    }

    /// Where the eye actually is this frame
    pub fn eye(&self) -> Vec3 {
        self.view_pose().position
    }

    /// Lift the raw and smoothed positions to the surface wherever either sits below it
    pub fn keep_above(&mut self, surface_height: impl Fn(Vec3) -> f32) {
        for pose in std::iter::once(&mut self.pose).chain(self.smoothed.as_mut()) {
            let floor = surface_height(pose.position);
            if pose.position.y < floor {
                pose.position.y = floor;
            }
        }
    }

    /// Apply a mouse delta (counts, y up) to yaw and pitch
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32) {
        self.yaw_deg += dx * self.sensitivity;
        self.pitch_deg = (self.pitch_deg + dy * self.sensitivity)
            .clamp(-self.max_pitch_deg, self.max_pitch_deg);
        self.update_vectors();
    }

    /// Translate along the camera's own axes; `movement` is (right, up, forward)
    pub fn move_by(&mut self, movement: Vec3) {
        self.pose.position += self.pose.right * movement.x
            + self.pose.up * movement.y
            + self.pose.forward * movement.z;
    }

    /// Point the camera along `forward` and re-derive yaw and pitch to match
    pub fn set_forward(&mut self, forward: Vec3) {
        let forward = normalize_or(forward, self.pose.forward);
        self.pitch_deg = forward
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-self.max_pitch_deg, self.max_pitch_deg);
        if forward.x.abs() > f32::EPSILON || forward.z.abs() > f32::EPSILON {
            self.yaw_deg = forward.z.atan2(forward.x).to_degrees();
        }
        self.set_basis(forward);
    }

    /// Jump the smoothed copy straight to the raw pose
    pub fn snap_smoothing(&mut self) {
        if let Some(smoothed) = self.smoothed.as_mut() {
            *smoothed = self.pose;
        }
    }

    pub fn set_smoothed_position(&mut self, position: Vec3) {
        if let Some(smoothed) = self.smoothed.as_mut() {
            smoothed.position = position;
        }
    }

    /// First-order filter step of the smoothed pose toward the raw pose
    pub fn update_smoothing(&mut self, dt: f32) {
        let factor = (self.smoothing_rate * dt).clamp(0.0, 1.0);
        let target = self.pose;
        if let Some(smoothed) = self.smoothed.as_mut() {
            smoothed.blend_toward(&target, factor);
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        let pose = self.view_pose();
        Mat4::look_at_rh(pose.position, pose.position + pose.forward, pose.up)
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw_deg.to_radians(), self.pitch_deg.to_radians());
        let forward = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.set_basis(normalize_or(forward, self.pose.forward));
    }

    fn set_basis(&mut self, forward: Vec3) {
        self.pose.forward = forward;
        self.pose.right = normalize_or(forward.cross(self.pose.world_up), self.pose.right);
        self.pose.up = normalize_or(self.pose.right.cross(forward), self.pose.world_up);
    }
}

/// The two cameras and which one is live
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub free: Camera,
    pub chase: Camera,
    mode: CameraMode,
    chase_distance: f32,
    chase_height: f32,
    min_chase_distance: f32,
    max_chase_distance: f32,
    scroll_step: f32,
}

impl CameraRig {
    /// Build the rig around the boat's starting position
    pub fn new(boat_position: Vec3, mode: CameraMode, params: &CameraParams) -> Self {
        let mut rig = Self {
            free: Camera::new(Vec3::ZERO, params),
            chase: Camera::new(boat_position, params).smoothed(),
            mode,
            chase_distance: params.default_chase_distance_m(),
            chase_height: 0.0,
            min_chase_distance: params.min_chase_distance_m,
            max_chase_distance: params.max_chase_distance_m,
            scroll_step: params.scroll_step_m,
        };
        let target = rig.chase_target(boat_position);
        rig.chase.set_position(target);
        rig.chase.snap_smoothing();
        rig
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn active(&self) -> &Camera {
        match self.mode {
            CameraMode::Free => &self.free,
            CameraMode::Chase => &self.chase,
        }
    }

    pub fn active_mut(&mut self) -> &mut Camera {
        match self.mode {
            CameraMode::Free => &mut self.free,
            CameraMode::Chase => &mut self.chase,
        }
    }

    pub fn chase_distance(&self) -> f32 {
        self.chase_distance
    }

    pub fn chase_height(&self) -> f32 {
        self.chase_height
    }

    /// Switch cameras, carrying the outgoing view direction into the incoming one.
    ///
    /// Entering free flight starts from where the chase eye was; entering chase
    /// starts the smoothed view at the outgoing eye so the cut is continuous.
    pub fn toggle(&mut self) {
        let outgoing = self.active();
        let forward = outgoing.forward();
        let eye = outgoing.eye();

        self.mode = self.mode.toggled();
        match self.mode {
            CameraMode::Free => {
                self.free.set_forward(forward);
                self.free.set_position(eye);
            }
            CameraMode::Chase => {
                self.chase.set_forward(forward);
                self.chase.snap_smoothing();
                self.chase.set_smoothed_position(eye);
            }
        }
        log::debug!("Camera switched to {:?}", self.mode);
    }

    /// Mouse look for both cameras, or chase height while `adjusting_height` in chase mode
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, adjusting_height: bool, dt: f32) {
        if self.mode == CameraMode::Chase && adjusting_height {
            self.chase_height += dy * dt;
            return;
        }
        self.free.process_mouse_movement(dx, dy);
        self.chase.process_mouse_movement(dx, dy);
    }

    /// Scroll zoom; only the chase camera has a distance to change
    pub fn process_scroll(&mut self, lines: f32) {
        if self.mode != CameraMode::Chase {
            return;
        }
        self.chase_distance = (self.chase_distance - lines * self.scroll_step)
            .clamp(self.min_chase_distance, self.max_chase_distance);
    }

    /// Chase camera's unsmoothed position for a boat at `boat_position`
    pub fn chase_target(&self, boat_position: Vec3) -> Vec3 {
        boat_position - self.chase.forward() * self.chase_distance + Vec3::Y * self.chase_height
    }

    /// Per-tick chase update; the free camera only moves on input
    pub fn update(&mut self, boat_position: Vec3, dt: f32) {
        if self.mode != CameraMode::Chase {
            return;
        }
        self.chase.update_smoothing(dt);
        let target = self.chase_target(boat_position);
        self.chase.set_position(target);
    }

    /// Keep the live camera, and the eye it renders from, at or above the surface
    pub fn clamp_above(&mut self, surface_height: impl Fn(Vec3) -> f32) {
        self.active_mut().keep_above(surface_height);
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.active().view_matrix()
    }

    pub fn eye(&self) -> Vec3 {
        self.active().eye()
    }

    pub fn projection(&self, config: &RenderConfig, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(
            config.fov_degrees.to_radians(),
            aspect_ratio,
            config.near_plane_m,
            config.far_plane_m,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig(mode: CameraMode) -> CameraRig {
        CameraRig::new(Vec3::ZERO, mode, &CameraParams::default())
    }

    #[test]
    fn test_initial_yaw_looks_down_negative_z() {
        let camera = Camera::new(Vec3::ZERO, &CameraParams::default());
        assert!(camera.forward().abs_diff_eq(-Vec3::Z, 1.0e-6));
        assert!(camera.right().abs_diff_eq(Vec3::X, 1.0e-6));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO, &CameraParams::default());
        camera.process_mouse_movement(0.0, 10_000.0);
        assert_eq!(camera.yaw_pitch_deg().1, 89.0);
        assert!(camera.forward().y < 1.0);
        assert!((camera.right().length() - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn test_free_to_chase_keeps_forward() {
        let mut rig = rig(CameraMode::Free);
        rig.process_mouse_movement(250.0, -120.0, false, 0.016);
        rig.free.process_mouse_movement(40.0, 0.0);
        let free_forward = rig.free.forward();

        rig.toggle();
        assert_eq!(rig.mode(), CameraMode::Chase);
        assert!(
            rig.chase.forward().abs_diff_eq(free_forward, 1.0e-5),
            "Chase forward {:?} != free forward {:?}",
            rig.chase.forward(),
            free_forward
        );
        assert!(rig.chase.view_pose().forward.abs_diff_eq(free_forward, 1.0e-5));
    }

    #[test]
    fn test_chase_to_free_keeps_forward_and_eye() {
        let mut rig = rig(CameraMode::Chase);
        rig.process_mouse_movement(-300.0, -50.0, false, 0.016);
        rig.update(Vec3::new(10.0, 0.0, 5.0), 0.016);
        let forward = rig.chase.forward();
        let eye = rig.eye();

        rig.toggle();
        assert_eq!(rig.mode(), CameraMode::Free);
        assert!(rig.free.forward().abs_diff_eq(forward, 1.0e-5));
        assert_eq!(rig.eye(), eye);
    }

    #[test]
    fn test_set_forward_survives_next_mouse_move() {
        let mut camera = Camera::new(Vec3::ZERO, &CameraParams::default());
        let forward = Vec3::new(1.0, -0.5, 2.0).normalize();
        camera.set_forward(forward);
        camera.process_mouse_movement(0.0, 0.0);
        assert!(camera.forward().abs_diff_eq(forward, 1.0e-5));
    }

    #[test]
    fn test_chase_smoothing_converges_without_overshoot() {
        let mut rig = rig(CameraMode::Chase);
        let boat = Vec3::new(200.0, 0.0, 0.0);
        let mut last_gap = f32::MAX;
        for _ in 0..400 {
            rig.update(boat, 0.016);
            let gap = rig.eye().distance(rig.chase_target(boat));
            assert!(gap <= last_gap + 1.0e-3, "Gap grew from {} to {}", last_gap, gap);
            last_gap = gap;
        }
        assert!(last_gap < 1.0e-2);
    }

    #[test]
    fn test_scroll_clamps_distance() {
        let params = CameraParams::default();
        let mut rig = rig(CameraMode::Chase);
        assert_eq!(rig.chase_distance(), 72.5);
        rig.process_scroll(1000.0);
        assert_eq!(rig.chase_distance(), params.min_chase_distance_m);
        rig.process_scroll(-1000.0);
        assert_eq!(rig.chase_distance(), params.max_chase_distance_m);
    }

    #[test]
    fn test_scroll_ignored_in_free_mode() {
        let mut rig = rig(CameraMode::Free);
        rig.process_scroll(5.0);
        assert_eq!(rig.chase_distance(), 72.5);
    }

    #[test]
    fn test_right_drag_adjusts_height_instead_of_looking() {
        let mut rig = rig(CameraMode::Chase);
        let forward = rig.chase.forward();
        rig.process_mouse_movement(100.0, 50.0, true, 0.1);
        assert_eq!(rig.chase_height(), 5.0);
        assert_eq!(rig.chase.forward(), forward);
        assert!(rig.chase_target(Vec3::ZERO).y > 0.0);
    }

    #[test]
    fn test_clamp_above_surface() {
        let mut rig = rig(CameraMode::Free);
        rig.free.set_position(Vec3::new(1.0, -4.0, 2.0));
        rig.clamp_above(|_| 0.5);
        assert_eq!(rig.free.position(), Vec3::new(1.0, 0.5, 2.0));
        rig.clamp_above(|_| -3.0);
        assert_eq!(rig.free.position(), Vec3::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn test_clamp_lifts_lagging_chase_eye() {
        let mut rig = rig(CameraMode::Chase);
        rig.update(Vec3::new(0.0, 40.0, 0.0), 0.016);
        let raw_y = rig.chase.position().y;
        assert!(rig.eye().y < raw_y - 1.0);

        // Crest just under the raw position: only the lagging eye is below it
        let crest = raw_y - 1.0;
        rig.clamp_above(|_| crest);
        assert_eq!(rig.eye().y, crest);
        assert_eq!(rig.chase.position().y, raw_y);

        let eye = rig.eye();
        rig.clamp_above(|_| crest - 10.0);
        assert_eq!(rig.eye(), eye);
    }
}
