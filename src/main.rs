//! Seaborne - steer a boat across an animated ocean alongside an autonomous fleet.
//!
//! V toggles between the chase and free cameras. In chase mode WASD steers the
//! boat relative to the camera, the scroll wheel zooms and dragging with the
//! right mouse button raises or lowers the camera. In free mode WASDEQ flies
//! (Shift for speed).

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use seaborne::cli::Args;
use seaborne::clock::{Clock, FixedClock, FrameClock, FramePacer};
use seaborne::game::Game;
use seaborne::input::{InputCollector, InputSnapshot};
use seaborne::params::{RenderConfig, SimParams};
use seaborne::rendering::{GpuRenderer, RenderError};
use seaborne::vessel::hull::HullMesh;

/// Pixels of trackpad scroll that count as one wheel line
const PIXELS_PER_SCROLL_LINE: f64 = 40.0;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    renderer: Option<GpuRenderer>,

    // Simulation
    game: Game,
    input: InputCollector,
    clock: FrameClock,
    pacer: FramePacer,

    // Configuration
    render_config: RenderConfig,

    /// Set when the loop exits because of a failure
    error: Option<anyhow::Error>,
}

impl App {
    fn new(game: Game, render_config: RenderConfig) -> Self {
        Self {
            window: None,
            renderer: None,
            game,
            input: InputCollector::new(),
            clock: FrameClock::new(render_config.max_frame_dt_s),
            pacer: FramePacer::new(render_config.frame_step_s()),
            render_config,
            error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Seaborne")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let grab = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
        if let Err(e) = grab {
            log::warn!("Cursor grab unavailable: {}", e);
        }
        window.set_cursor_visible(false);

        let renderer = pollster::block_on(GpuRenderer::new(
            Arc::clone(&window),
            self.game.ocean_grid(),
            &HullMesh::new(),
            &self.game.params().lighting,
        ))
        .context("failed to initialise renderer")?;

        log::info!("Seaborne is running, press ESC to quit");
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    /// Advance the simulation and draw a single frame
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let now = Instant::now();
        if !self.pacer.is_due(now) {
            return;
        }
        self.pacer.mark(now);

        let dt = self.clock.delta_seconds();
        let snapshot = self.input.snapshot();
        self.game.update(&snapshot, dt);
        self.game.render(renderer, &self.render_config);

        match renderer.present() {
            Ok(()) => {}
            Err(RenderError::Surface(wgpu::SurfaceError::Timeout)) => {
                log::warn!("Frame acquisition timed out, skipping frame");
            }
            Err(e) => self.fail(event_loop, anyhow::Error::new(e).context("render failed")),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        match self.pacer.next_due() {
            Some(due) if due > Instant::now() => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(due));
            }
            _ => {
                event_loop.set_control_flow(ControlFlow::Poll);
                window.request_redraw();
            }
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }
        if let Err(e) = self.init_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => self.input.key(code, state),
            WindowEvent::MouseInput { state, button, .. } => self.input.mouse_button(button, state),
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, lines) => self.input.scroll(lines),
                MouseScrollDelta::PixelDelta(position) => {
                    self.input.scroll((position.y / PIXELS_PER_SCROLL_LINE) as f32)
                }
            },
            WindowEvent::Focused(false) => self.input.clear(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.input.mouse_motion(dx, dy);
        }
    }
}

/// Step the simulation at a fixed rate with no input, logging the fleet once per simulated second
fn run_headless(game: &mut Game, seconds: f32, render_config: &RenderConfig) {
    let mut clock = FixedClock::new(render_config.frame_step_s());
    let idle = InputSnapshot::default();
    let mut elapsed = 0.0;
    let mut next_report = 1.0;

    log::info!("Running headless for {:.1} s at {} Hz", seconds, render_config.target_fps);
    while elapsed < seconds {
        let dt = clock.delta_seconds();
        game.update(&idle, dt);
        elapsed += dt;

        if elapsed >= next_report {
            let summary = game.fleet_summary();
            log::info!(
                "t={:.1}s followers={} wanderers={} capsized={} nearest={}",
                game.time(),
                summary.followers,
                summary.wanderers,
                summary.capsized,
                summary
                    .nearest_m
                    .map_or_else(|| "-".to_string(), |d| format!("{:.1} m", d))
            );
            next_report += 1.0;
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut params = SimParams::default();
    let mut render_config = RenderConfig::default();
    args.apply(&mut params, &mut render_config);

    let seed = args.resolve_seed();
    log::info!("Seed {} (pass --seed {} to replay this sea)", seed, seed);

    let mut game = Game::new(params, seed, args.parse_camera_mode())
        .context("invalid simulation parameters")?;

    if let Some(seconds) = args.headless {
        run_headless(&mut game, seconds, &render_config);
        return Ok(());
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = App::new(game, render_config);
    event_loop.run_app(&mut app).context("event loop failed")?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
