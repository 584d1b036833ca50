use std::sync::Arc;

use glow::*;

use crate::error::RenderError;
use crate::render::targets::FrameBuffer;

/// RGBA8 color target backed by a texture.
pub struct GlFrameBuffer {
    gl: Arc<glow::Context>,
    fbo: Option<NativeFramebuffer>,
    texture: Option<NativeTexture>,
    width: u32,
    height: u32,
    filter: u32,
}

impl GlFrameBuffer {
    /// An empty target; storage is allocated on the first `resize`.
    pub fn empty(gl: Arc<glow::Context>) -> Self {
        Self {
            gl,
            fbo: None,
            texture: None,
            width: 0,
            height: 0,
            filter: LINEAR,
        }
    }

    pub fn new(gl: Arc<glow::Context>, width: u32, height: u32) -> Result<Self, RenderError> {
        let mut fb = Self::empty(gl);
        fb.allocate(width, height)?;
        Ok(fb)
    }

    /// Sample with nearest filtering (for pixel-art upscaling).
    pub fn nearest(mut self) -> Self {
        self.filter = NEAREST;
        if let Some(texture) = self.texture {
            unsafe {
                self.gl.bind_texture(TEXTURE_2D, Some(texture));
                self.gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MIN_FILTER, NEAREST as i32);
                self.gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MAG_FILTER, NEAREST as i32);
                self.gl.bind_texture(TEXTURE_2D, None);
            }
        }
        self
    }

    pub fn texture(&self) -> Option<NativeTexture> {
        self.texture
    }

    /// Redirect drawing here and match the viewport to the target.
    pub fn bind(&self) {
        unsafe {
            self.gl.bind_framebuffer(FRAMEBUFFER, self.fbo);
            self.gl.viewport(0, 0, self.width as i32, self.height as i32);
        }
    }

    fn allocate(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.release();
        let (w, h) = (width.max(1), height.max(1));
        let gl = &self.gl;

        unsafe {
            let texture = gl.create_texture().map_err(RenderError::Gl)?;
            gl.bind_texture(TEXTURE_2D, Some(texture));
            gl.tex_image_2d(TEXTURE_2D, 0, RGBA8 as i32, w as i32, h as i32, 0, RGBA, UNSIGNED_BYTE, None);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MIN_FILTER, self.filter as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_MAG_FILTER, self.filter as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_WRAP_S, CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(TEXTURE_2D, TEXTURE_WRAP_T, CLAMP_TO_EDGE as i32);
            gl.bind_texture(TEXTURE_2D, None);

            let fbo = match gl.create_framebuffer() {
                Ok(fbo) => fbo,
                Err(e) => {
                    gl.delete_texture(texture);
                    return Err(RenderError::Gl(e));
                }
            };
            gl.bind_framebuffer(FRAMEBUFFER, Some(fbo));
            gl.framebuffer_texture_2d(FRAMEBUFFER, COLOR_ATTACHMENT0, TEXTURE_2D, Some(texture), 0);
            let status = gl.check_framebuffer_status(FRAMEBUFFER);
            gl.bind_framebuffer(FRAMEBUFFER, None);

            self.texture = Some(texture);
            self.fbo = Some(fbo);
            self.width = w;
            self.height = h;

            if status != FRAMEBUFFER_COMPLETE {
                self.release();
                return Err(RenderError::Framebuffer { width: w, height: h, status });
            }
        }
        Ok(())
    }

    fn release(&mut self) {
        unsafe {
            if let Some(fbo) = self.fbo.take() {
                self.gl.delete_framebuffer(fbo);
            }
            if let Some(texture) = self.texture.take() {
                self.gl.delete_texture(texture);
            }
        }
        self.width = 0;
        self.height = 0;
    }
}

impl FrameBuffer for GlFrameBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Err(e) = self.allocate(width, height) {
            tracing::warn!(error = %e, "framebuffer resize failed");
        }
    }

    fn dispose(&mut self) {
        self.release();
    }
}
