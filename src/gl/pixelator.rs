use std::sync::Arc;

use glow::NativeProgram;

use crate::constants::PIXELATE_SCALE;
use crate::draw::Draw;
use crate::error::RenderError;
use crate::gl::bind_screen;
use crate::gl::framebuffer::GlFrameBuffer;
use crate::gl::shader::{compile_program, ScreenQuad, COPY_FRAGMENT_SHADER, QUAD_VERTEX_SHADER};
use crate::render::targets::{FrameBuffer, Pixelator};

/// Draws the frame into a target `PIXELATE_SCALE` times smaller and blits it
/// back with nearest filtering.
pub struct GlPixelator {
    gl: Arc<glow::Context>,
    enabled: bool,
    width: u32,
    height: u32,
    target: Option<GlFrameBuffer>,
    quad: ScreenQuad,
    copy: NativeProgram,
}

impl GlPixelator {
    pub fn new(gl: Arc<glow::Context>, width: u32, height: u32) -> Result<Self, RenderError> {
        let quad = ScreenQuad::new(gl.clone())?;
        let copy = compile_program(&gl, QUAD_VERTEX_SHADER, COPY_FRAGMENT_SHADER)?;
        Ok(Self {
            gl,
            enabled: false,
            width,
            height,
            target: None,
            quad,
            copy,
        })
    }

    fn target(&mut self) -> Option<&GlFrameBuffer> {
        if self.target.is_none() {
            let (w, h) = ((self.width / PIXELATE_SCALE).max(1), (self.height / PIXELATE_SCALE).max(1));
            match GlFrameBuffer::new(self.gl.clone(), w, h) {
                Ok(fb) => self.target = Some(fb.nearest()),
                Err(e) => {
                    tracing::warn!(error = %e, "pixelation target unavailable, disabling");
                    self.enabled = false;
                }
            }
        }
        self.target.as_ref()
    }
}

impl Pixelator for GlPixelator {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn begin(&mut self, draw: &mut dyn Draw) {
        draw.flush();
        if let Some(target) = self.target() {
            target.bind();
        }
    }

    fn end(&mut self, draw: &mut dyn Draw) {
        draw.flush();
        bind_screen(&self.gl, self.width, self.height);
        if let Some(texture) = self.target.as_ref().and_then(|t| t.texture()) {
            self.quad.draw(self.copy, texture);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if let Some(mut target) = self.target.take() {
            target.dispose();
        }
    }

    fn dispose(&mut self) {
        if let Some(mut target) = self.target.take() {
            target.dispose();
        }
        self.quad.dispose();
        unsafe {
            use glow::HasContext;
            self.gl.delete_program(self.copy);
        }
    }
}
