//! Edge-detected input collected between frames.
//!
//! Window events feed an [`InputCollector`]; once per tick the game takes an
//! [`InputSnapshot`] from it. Held keys persist across snapshots, while mouse
//! deltas, scroll and key presses are consumed by the snapshot that reports them.

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Everything the simulation reads from the player in one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Camera mode toggle pressed since the last snapshot
    pub toggle_camera: bool,

    /// Held movement keys as (right, up, forward), each in [-1, 1]
    pub movement: Vec3,

    /// Boost modifier held
    pub fast: bool,

    /// Mouse motion since the last snapshot (counts, y up)
    pub mouse_delta: Vec2,

    /// Scroll since the last snapshot (lines, positive away from the user)
    pub scroll_delta: f32,

    /// Right mouse button held
    pub adjusting_height: bool,
}

/// Accumulates raw window events into snapshots
#[derive(Debug, Default)]
pub struct InputCollector {
    held: HashSet<KeyCode>,
    toggle_pressed: bool,
    mouse_delta: Vec2,
    scroll_delta: f32,
    right_button: bool,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press or release. OS key repeats are ignored.
    pub fn key(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                let newly_pressed = self.held.insert(code);
                if newly_pressed && code == KeyCode::KeyV {
                    self.toggle_pressed = true;
                }
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
    }

    /// Raw mouse motion in window coordinates (y down)
    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        self.mouse_delta += Vec2::new(dx as f32, -dy as f32);
    }

    pub fn scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    pub fn mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Right {
            self.right_button = state == ElementState::Pressed;
        }
    }

    /// Drop held state, e.g. when the window loses focus
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Take this tick's snapshot, consuming edges and deltas
    pub fn snapshot(&mut self) -> InputSnapshot {
        let axis = |positive: KeyCode, negative: KeyCode| -> f32 {
            let mut value = 0.0;
            if self.held.contains(&positive) {
                value += 1.0;
            }
            if self.held.contains(&negative) {
                value -= 1.0;
            }
            value
        };

        let movement = Vec3::new(
            axis(KeyCode::KeyD, KeyCode::KeyA),
            axis(KeyCode::KeyE, KeyCode::KeyQ),
            axis(KeyCode::KeyW, KeyCode::KeyS),
        );
        let fast = self.held.contains(&KeyCode::ShiftLeft) || self.held.contains(&KeyCode::ShiftRight);

        let snapshot = InputSnapshot {
            toggle_camera: self.toggle_pressed,
            movement,
            fast,
            mouse_delta: self.mouse_delta,
            scroll_delta: self.scroll_delta,
            adjusting_height: self.right_button,
        };

        self.toggle_pressed = false;
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
        snapshot
    }
}
