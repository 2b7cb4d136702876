//! Command-line argument parsing.

use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use crate::camera::CameraMode;
use crate::params::{RenderConfig, SimParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Seaborne")]
#[command(about = "Boating on a procedural ocean with an autonomous fleet", long_about = None)]
pub struct Args {
    /// Seed for wave directions and fleet spawns (default: derived from the clock)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Number of autonomous vessels
    #[arg(long, value_name = "COUNT", default_value = "6")]
    pub fleet: usize,

    /// How many fleet vessels follow the player
    #[arg(long, value_name = "COUNT", default_value = "1")]
    pub followers: usize,

    /// Initial camera: chase (default) or free
    #[arg(long, value_name = "MODE", default_value = "chase")]
    pub camera: String,

    /// Run without a window for this many simulated seconds
    #[arg(long, value_name = "SECONDS")]
    pub headless: Option<f32>,

    /// Target frame rate, also the headless step rate
    #[arg(long, value_name = "FPS", default_value = "144")]
    pub fps: u32,
}

impl Args {
    /// Parse the initial camera mode
    pub fn parse_camera_mode(&self) -> CameraMode {
        match self.camera.to_lowercase().as_str() {
            "chase" | "boat" => CameraMode::Chase,
            "free" => CameraMode::Free,
            other => {
                log::warn!("Unknown camera mode '{}', using chase", other);
                CameraMode::Chase
            }
        }
    }

    /// The explicit seed, or one derived from the system clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    /// Fold the overrides into the default parameter sets
    pub fn apply(&self, params: &mut SimParams, render_config: &mut RenderConfig) {
        params.fleet.vessel_count = self.fleet;
        params.fleet.follower_count = self.followers;
        render_config.target_fps = self.fps.max(1);
    }
}
