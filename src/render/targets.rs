//! Offscreen render targets the frame renderer owns.

use crate::draw::Draw;

/// A resizable offscreen color target.
pub trait FrameBuffer {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn resize(&mut self, width: u32, height: u32);
    /// Release GPU resources. Must be idempotent.
    fn dispose(&mut self);
}

/// Alternate frame path that renders the whole frame at low resolution.
pub trait Pixelator {
    fn enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
    /// Redirect drawing into the low-resolution target.
    fn begin(&mut self, draw: &mut dyn Draw);
    /// Upscale the low-resolution target onto the screen.
    fn end(&mut self, draw: &mut dyn Draw);
    fn resize(&mut self, width: u32, height: u32);
    fn dispose(&mut self);
}
