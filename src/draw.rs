//! The 2D drawing surface the renderer issues commands against.
//!
//! [`Draw`] is a batched immediate-mode API: commands accumulate until
//! [`Draw::flush`] (or a state change that forces one). The GL backend lives
//! in [`crate::gl`]; tests record the calls instead.

use glam::Mat4;

/// RGBA color, each channel 0.0..1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    /// Warm trail color used by the landing burst
    pub const LIGHT_TRAIL: Color = Color::rgba(1.0, 0.91, 0.66, 1.0);
    pub const ACCENT: Color = Color::rgba(1.0, 0.83, 0.5, 1.0);
    pub const SHADOW: Color = Color::rgba(0.0, 0.0, 0.0, 0.4);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn lerp(self, other: Color, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A named drawable region (sprite) with its natural size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub const WHITE: Region = Region::new("white", 1.0, 1.0);
    pub const CIRCLE_SHADOW: Region = Region::new("circle-shadow", 1.0, 1.0);

    pub const fn new(name: &'static str, width: f32, height: f32) -> Self {
        Self { name, width, height }
    }
}

/// Shader programs the batch can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Default,
    /// Animated outline shader for blocks under construction
    BlockBuild,
}

/// Batched 2D drawing commands.
pub trait Draw {
    /// Clear the whole target to `color`.
    fn clear(&mut self, color: Color);
    /// Install the world-to-clip projection.
    fn set_projection(&mut self, projection: Mat4);
    /// Tint for subsequent draws.
    fn color(&mut self, color: Color);
    /// Blend subsequent draws toward `color` by `amount` (0 = off).
    fn mix_color(&mut self, color: Color, amount: f32);
    /// Bind a shader; [`ShaderKind::Default`] unbinds any custom one.
    fn shader(&mut self, shader: ShaderKind);
    /// Line width for subsequent line draws.
    fn stroke(&mut self, width: f32);
    /// Draw `region` centered at `(x, y)`, rotated `rotation` degrees.
    fn rect(&mut self, region: &Region, x: f32, y: f32, width: f32, height: f32, rotation: f32);
    /// Line from `(x, y)` pointing at `angle` degrees.
    fn line_angle(&mut self, x: f32, y: f32, angle: f32, length: f32);
    /// Label centered at `(x, y)`.
    fn text(&mut self, text: &str, x: f32, y: f32);
    /// Submit pending commands.
    fn flush(&mut self);

    /// Reset tint, mix and stroke to defaults.
    fn reset(&mut self) {
        self.color(Color::WHITE);
        self.mix_color(Color::WHITE, 0.0);
        self.stroke(1.0);
    }

    /// Solid rectangle centered at `(x, y)`.
    fn fill(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.rect(&Region::WHITE, x, y, width, height, 0.0);
    }

    /// Release GPU objects held by the batch.
    fn dispose(&mut self) {}
}

/// Size and visibility of the window the frame is presented to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// True while minimized or otherwise not presented
    pub hidden: bool,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            hidden: false,
        }
    }
}
