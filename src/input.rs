//! Input handling and debug controls.
//!
//! Keyboard presses are collected by the event loop and processed once per
//! tick into an [`InputResult`], which is then applied to the renderer and
//! the sandbox.

use std::collections::HashSet;

use glam::Vec2;
use winit::keyboard::KeyCode;

use crate::constants::*;
use crate::render::FrameRenderer;
use crate::sandbox::Sandbox;
use crate::world::WorldView;

/// World units the local player moves per tick while a direction is held
const PLAYER_SPEED: f32 = 1.5;
/// Intensity and duration (ticks) of the debug shake
const DEBUG_SHAKE: (f32, f32) = (6.0, 30.0);

/// Input state tracking
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys pressed since the last tick, consumed by [`process_keyboard`]
    pub keys_pressed: HashSet<KeyCode>,
    /// Keys currently held down
    pub keys_down: HashSet<KeyCode>,
    /// Accumulated wheel lines since the last tick
    pub scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    pub fn scroll(&mut self, lines: f32) {
        self.scroll += lines;
    }
}

/// Result of processing input
#[derive(Debug, Default, PartialEq)]
pub struct InputResult {
    pub toggle_bloom: bool,
    pub toggle_pixelate: bool,
    pub shake: bool,
    pub land: bool,
    pub toggle_state: bool,
    pub toggle_building: bool,
    pub toggle_lighting: bool,
    pub upgrade_capacity: bool,
    /// Camera zoom change in scale units
    pub zoom: f32,
    /// Player movement direction, not normalized
    pub movement: Vec2,
}

/// Process keyboard input and return actions to take
pub fn process_keyboard(input: &mut InputState) -> InputResult {
    let mut result = InputResult {
        toggle_bloom: input.keys_pressed.remove(&KeyCode::KeyB),
        toggle_pixelate: input.keys_pressed.remove(&KeyCode::KeyP),
        shake: input.keys_pressed.remove(&KeyCode::Space),
        land: input.keys_pressed.remove(&KeyCode::KeyL),
        toggle_state: input.keys_pressed.remove(&KeyCode::KeyM),
        toggle_building: input.keys_pressed.remove(&KeyCode::KeyG),
        toggle_lighting: input.keys_pressed.remove(&KeyCode::KeyN),
        upgrade_capacity: input.keys_pressed.remove(&KeyCode::KeyU),
        ..Default::default()
    };
    input.keys_pressed.clear();

    result.zoom = std::mem::take(&mut input.scroll) * CAMERA_SCROLL_STEP;

    let held = |keys: [KeyCode; 2]| keys.iter().any(|k| input.keys_down.contains(k));
    if held([KeyCode::KeyW, KeyCode::ArrowUp]) {
        result.movement.y += 1.0;
    }
    if held([KeyCode::KeyS, KeyCode::ArrowDown]) {
        result.movement.y -= 1.0;
    }
    if held([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        result.movement.x -= 1.0;
    }
    if held([KeyCode::KeyD, KeyCode::ArrowRight]) {
        result.movement.x += 1.0;
    }

    result
}

/// Apply one tick of processed input.
pub fn apply_input(result: &InputResult, renderer: &mut FrameRenderer, sandbox: &mut Sandbox, delta: f32) {
    if result.toggle_state {
        let state = sandbox.toggle_state();
        tracing::debug!(?state, "toggled game state");
    }

    if result.toggle_bloom {
        let ctx = renderer.context_mut();
        let enabled = !ctx.settings().bloom;
        ctx.settings.get_mut().bloom = enabled;
        if let Err(e) = ctx.settings.save() {
            tracing::warn!(error = %e, "could not persist bloom setting");
        }
        renderer.toggle_bloom(enabled);
    }

    if result.toggle_pixelate {
        let enabled = !renderer.is_pixelating();
        renderer.set_pixelate(enabled);
    }

    if result.shake {
        renderer.shake(DEBUG_SHAKE.0, DEBUG_SHAKE.1);
    }

    if result.land {
        renderer.zoom_in(CORE_LAND_LIFETIME);
    }

    if result.toggle_building {
        sandbox.set_building(!sandbox.is_building());
    }

    if result.toggle_lighting {
        sandbox.set_lighting(!sandbox.lighting());
    }

    if result.upgrade_capacity {
        sandbox.upgrade_capacity();
    }

    if result.zoom != 0.0 {
        renderer.scale_camera(result.zoom);
    }

    if result.movement != Vec2::ZERO {
        sandbox.move_player(result.movement.normalize() * PLAYER_SPEED * delta);
    }
}
