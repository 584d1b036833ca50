//! Camera scale: user zoom target, per-tick smoothing and the landing zoom.

use crate::constants::*;
use crate::math::{lerp_delta, Interp};

/// Scale state in pixels per world unit.
///
/// `target_scale` is what the user asked for and is always clamped to
/// `[1.5 * base, round(6 * base)]`. `camera_scale` follows it smoothly, except
/// while a landing sequence runs, when the landing curve overrides it.
#[derive(Debug, Clone)]
pub struct Zoom {
    base: f32,
    target_scale: f32,
    camera_scale: f32,
    land_scale: f32,
    land_time: f32,
    land_lifetime: f32,
    min_zoom: f32,
}

impl Zoom {
    /// `base` is the UI scale unit; `land_lifetime` is the landing length in ticks.
    pub fn new(base: f32, land_lifetime: f32) -> Self {
        let target_scale = base * CAMERA_DEFAULT_SCALE;
        Self {
            base,
            target_scale,
            camera_scale: target_scale,
            land_scale: 0.0,
            land_time: 0.0,
            land_lifetime,
            min_zoom: base * CAMERA_LANDING_MIN_SCALE,
        }
    }

    pub fn scale_camera(&mut self, amount: f32) {
        self.target_scale += amount;
        self.clamp_scale();
    }

    pub fn clamp_scale(&mut self) {
        let min = self.base * CAMERA_MIN_SCALE;
        let max = (self.base * CAMERA_MAX_SCALE).round();
        // Lower bound wins if a tiny base makes the bounds cross.
        self.target_scale = self.target_scale.min(max).max(min);
    }

    pub fn scale(&self) -> f32 {
        self.target_scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.target_scale = scale;
        self.clamp_scale();
    }

    /// Current (smoothed or landing) scale used for the viewport.
    pub fn camera_scale(&self) -> f32 {
        self.camera_scale
    }

    /// Start a landing sequence lasting `duration` ticks.
    pub fn zoom_in(&mut self, duration: f32) {
        self.land_scale = self.min_zoom;
        self.land_time = duration;
    }

    pub fn is_landing(&self) -> bool {
        self.land_time > 0.0
    }

    /// Landing scale while a landing runs, otherwise the neutral multiplier 1.
    pub fn land_scale(&self) -> f32 {
        if self.is_landing() {
            self.land_scale
        } else {
            1.0
        }
    }

    /// Remaining landing time as a fraction of the landing lifetime.
    pub fn landing_fraction(&self) -> f32 {
        self.land_time / self.land_lifetime
    }

    pub fn reset_landing(&mut self) {
        self.land_time = 0.0;
    }

    /// Scale the landing burst and icon are drawn at, relative to the camera.
    pub fn landing_draw_scale(&self) -> f32 {
        self.base * CAMERA_DEFAULT_SCALE / self.camera_scale
    }

    /// Advance by `delta` ticks.
    pub fn step(&mut self, delta: f32) {
        self.camera_scale = lerp_delta(self.camera_scale, self.target_scale, CAMERA_SCALE_SMOOTHING, delta);

        if self.land_time > 0.0 {
            self.land_time -= delta;
            let progress = (1.0 - self.land_time / self.land_lifetime).clamp(0.0, 1.0);
            self.land_scale = Interp::Pow5In.between(self.min_zoom, self.base * CAMERA_DEFAULT_SCALE, progress);
            self.camera_scale = self.land_scale;
        }
    }
}
