//! Owns the simulation and drives one frame: input, world update, draw submission.

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::{CameraMode, CameraRig};
use crate::fleet::{spawn_fleet, update_fleet};
use crate::input::InputSnapshot;
use crate::ocean::{random_directions, OceanGrid, SurfaceSampler, WaveField};
use crate::params::{ConfigError, RenderConfig, SimParams};
use crate::rendering::{DirectionalLight, MeshHandle, Renderer, Transforms, UniformSet};
use crate::vessel::{self, Pilot, Vessel};

/// Fleet counts for status logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FleetSummary {
    pub followers: usize,
    pub wanderers: usize,
    pub capsized: usize,

    /// Horizontal distance from the player to the closest fleet vessel (meters)
    pub nearest_m: Option<f32>,
}

/// The whole simulation
pub struct Game {
    params: SimParams,
    field: WaveField,
    sampler: SurfaceSampler,
    ocean: OceanGrid,
    player: Vessel,
    fleet: Vec<Vessel>,
    camera: CameraRig,
    time: f32,
}

impl Game {
    /// Validate `params` and build the world. `seed` fixes wave directions and fleet spawns.
    pub fn new(params: SimParams, seed: u64, camera_mode: CameraMode) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let directions = random_directions(&mut rng, params.spectrum.direction_count);
        let field = WaveField::from_spectrum(&params.spectrum, &directions);

        let player = Vessel::new(Vec3::ZERO, Vec3::Z, Pilot::Player);
        let fleet = spawn_fleet(&mut rng, player.position, &params.fleet);
        let camera = CameraRig::new(player.position, camera_mode, &params.camera);

        log::info!(
            "World ready: {} wave terms, {} vessels ({} following), seed {}",
            field.terms().len(),
            fleet.len(),
            fleet.iter().filter(|v| v.is_follower()).count(),
            seed
        );

        Ok(Self {
            sampler: SurfaceSampler::new(&params.sampling),
            ocean: OceanGrid::new(&params.ocean_mesh),
            params,
            field,
            player,
            fleet,
            camera,
            time: 0.0,
        })
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn wave_field(&self) -> &WaveField {
        &self.field
    }

    pub fn ocean_grid(&self) -> &OceanGrid {
        &self.ocean
    }

    pub fn player(&self) -> &Vessel {
        &self.player
    }

    pub fn fleet(&self) -> &[Vessel] {
        &self.fleet
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Accumulated wave time (seconds)
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance the world by `dt` seconds
    pub fn update(&mut self, input: &InputSnapshot, dt: f32) {
        self.apply_input(input, dt);

        self.time += dt;

        let vessel_params = &self.params.vessel;
        vessel::advance(
            &mut self.player,
            &self.sampler,
            &self.field,
            self.time,
            vessel_params,
            dt,
        );
        for npc in &mut self.fleet {
            vessel::advance(npc, &self.sampler, &self.field, self.time, vessel_params, dt);
        }

        update_fleet(
            &mut self.fleet,
            self.player.position,
            &self.params.fleet,
            vessel_params,
            dt,
        );

        self.camera.update(self.player.position, dt);
        let (field, time) = (&self.field, self.time);
        self.camera
            .clamp_above(|position| field.sample(position.x, position.z, time).height);
    }

    fn apply_input(&mut self, input: &InputSnapshot, dt: f32) {
        if input.toggle_camera {
            self.camera.toggle();
        }

        self.camera.process_mouse_movement(
            input.mouse_delta.x,
            input.mouse_delta.y,
            input.adjusting_height,
            dt,
        );
        self.camera.process_scroll(input.scroll_delta);

        match self.camera.mode() {
            CameraMode::Chase => {
                let camera = &self.camera.chase;
                let desired = camera.forward() * input.movement.z + camera.right() * input.movement.x;
                if desired.length_squared() > 0.0 {
                    self.player.steer(desired, &self.params.vessel, dt);
                }
            }
            CameraMode::Free => {
                let speed = if input.fast {
                    self.params.camera.free_fast_move_speed_m_per_s
                } else {
                    self.params.camera.free_move_speed_m_per_s
                };
                self.camera.free.move_by(input.movement * speed * dt);
            }
        }
    }

    /// Submit this frame's draws: ocean first, then the player and fleet hulls
    pub fn render<R: Renderer>(&self, renderer: &mut R, config: &RenderConfig) {
        let lighting = &self.params.lighting;
        let eye = self.camera.eye();
        let view = self.camera.view_matrix();
        let projection = self.camera.projection(config, renderer.aspect_ratio());

        let base = UniformSet {
            light: DirectionalLight::from(lighting),
            camera_position: eye,
            base_color: Vec3::from_array(lighting.water_color),
            shininess: lighting.shininess,
            time: self.time,
            waves: Some(&self.field),
        };

        renderer.draw_mesh(
            MeshHandle::Ocean,
            &Transforms {
                model: Mat4::from_translation(self.ocean.anchor_for(eye)),
                view,
                projection,
            },
            &base,
        );

        let hull_uniforms = UniformSet {
            base_color: Vec3::from_array(lighting.hull_color),
            waves: None,
            ..base
        };
        let lift = self.params.vessel.capsized_lift_m;
        for vessel in std::iter::once(&self.player).chain(self.fleet.iter()) {
            renderer.draw_mesh(
                MeshHandle::Hull,
                &Transforms {
                    model: vessel.model_matrix(lift),
                    view,
                    projection,
                },
                &hull_uniforms,
            );
        }
    }

    pub fn fleet_summary(&self) -> FleetSummary {
        let mut summary = FleetSummary {
            followers: 0,
            wanderers: 0,
            capsized: 0,
            nearest_m: None,
        };
        for vessel in &self.fleet {
            match vessel.pilot {
                Pilot::Follower => summary.followers += 1,
                Pilot::Wanderer { .. } => summary.wanderers += 1,
                Pilot::Player => {}
            }
            if vessel.capsize.flipped {
                summary.capsized += 1;
            }
            let distance = crate::math::horizontal_distance(vessel.position, self.player.position);
            summary.nearest_m = Some(summary.nearest_m.map_or(distance, |d: f32| d.min(distance)));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::OceanMesh;
    use crate::rendering::RecordingRenderer;

    fn params() -> SimParams {
        SimParams {
            ocean_mesh: OceanMesh {
                grid_size: 8,
                grid_spacing_m: 1.0,
            },
            ..SimParams::default()
        }
    }

    fn game(mode: CameraMode) -> Game {
        match Game::new(params(), 2024, mode) {
            Ok(game) => game,
            Err(e) => panic!("Default params rejected: {}", e),
        }
    }

    fn forward_input() -> InputSnapshot {
        InputSnapshot {
            movement: Vec3::new(0.0, 0.0, 1.0),
            ..InputSnapshot::default()
        }
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let mut params = params();
        params.fleet.follower_count = 99;
        assert!(matches!(
            Game::new(params, 1, CameraMode::Chase),
            Err(ConfigError::FollowersExceedFleet { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = game(CameraMode::Chase);
        let mut b = game(CameraMode::Chase);
        for _ in 0..120 {
            a.update(&forward_input(), 1.0 / 60.0);
            b.update(&forward_input(), 1.0 / 60.0);
        }
        assert_eq!(a.player(), b.player());
        assert_eq!(a.fleet(), b.fleet());
    }

    #[test]
    fn test_update_accumulates_time() {
        let mut game = game(CameraMode::Chase);
        game.update(&InputSnapshot::default(), 0.25);
        game.update(&InputSnapshot::default(), 0.25);
        assert!((game.time() - 0.5).abs() < 1.0e-6);
    }

    #[test]
    fn test_chase_mode_steers_player() {
        let mut game = game(CameraMode::Chase);
        game.update(&forward_input(), 0.1);
        let player = game.player();
        assert!(player.speed > 0.0);
        assert!(player.speed <= game.params().vessel.player_cruise_speed_m_per_s);
    }

    #[test]
    fn test_free_mode_flies_camera_not_player() {
        let mut game = game(CameraMode::Free);
        game.camera.free.set_position(Vec3::new(0.0, 100.0, 0.0));
        let start = game.camera().free.position();
        let fast = InputSnapshot {
            movement: Vec3::new(0.0, 1.0, 0.0),
            fast: true,
            ..InputSnapshot::default()
        };
        game.update(&fast, 0.1);
        assert_eq!(game.player().speed, 0.0);
        assert!((game.camera().free.position().y - start.y - 5.0).abs() < 1.0e-3);
    }

    #[test]
    fn test_camera_never_below_waves() {
        let mut game = game(CameraMode::Free);
        let dive = InputSnapshot {
            movement: Vec3::new(0.0, -1.0, 0.0),
            fast: true,
            ..InputSnapshot::default()
        };
        for _ in 0..60 {
            game.update(&dive, 1.0 / 30.0);
            let eye = game.camera().active().position();
            let surface = game.wave_field().sample(eye.x, eye.z, game.time()).height;
            assert!(eye.y >= surface - 1.0e-4, "Camera at {} under surface {}", eye.y, surface);
        }
    }

    #[test]
    fn test_toggle_input_switches_mode_and_keeps_forward() {
        let mut game = game(CameraMode::Free);
        let look = InputSnapshot {
            mouse_delta: glam::Vec2::new(120.0, -40.0),
            ..InputSnapshot::default()
        };
        game.update(&look, 0.016);
        let forward = game.camera().free.forward();

        let toggle = InputSnapshot {
            toggle_camera: true,
            ..InputSnapshot::default()
        };
        game.update(&toggle, 0.016);
        assert_eq!(game.camera().mode(), CameraMode::Chase);
        assert!(game.camera().chase.forward().abs_diff_eq(forward, 1.0e-5));
    }

    #[test]
    fn test_render_submits_ocean_then_every_hull() {
        let game = game(CameraMode::Chase);
        let mut renderer = RecordingRenderer::default();
        game.render(&mut renderer, &RenderConfig::default());

        assert_eq!(renderer.draws.len(), 2 + game.fleet().len());
        let ocean = &renderer.draws[0];
        assert_eq!(ocean.mesh, MeshHandle::Ocean);
        assert_eq!(ocean.wave_terms, Some(36));
        assert_eq!(ocean.time, game.time());
        assert_eq!(ocean.camera_position, game.camera().eye());

        let anchor = ocean.transforms.model.transform_point3(Vec3::ZERO);
        assert_eq!(anchor.y, 0.0);
        assert!((anchor.x - game.camera().eye().x).abs() <= 0.5);

        for draw in &renderer.draws[1..] {
            assert_eq!(draw.mesh, MeshHandle::Hull);
            assert_eq!(draw.wave_terms, None);
        }
        let player_model = renderer.draws[1].transforms.model;
        assert!(player_model
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(game.player().position, 1.0e-5));
    }

    #[test]
    fn test_fleet_summary_counts_roles() {
        let game = game(CameraMode::Chase);
        let summary = game.fleet_summary();
        assert_eq!(summary.followers, 1);
        assert_eq!(summary.wanderers, 5);
        assert_eq!(summary.capsized, 0);
        assert!(summary.nearest_m.is_some_and(|d| d >= 50.0));
    }
}
