//! Bloom post-process: capture, bright pass, separable blur, additive composite.

use std::sync::Arc;

use glow::*;

use crate::constants::*;
use crate::draw::Color;
use crate::error::RenderError;
use crate::gl::bind_screen;
use crate::gl::framebuffer::GlFrameBuffer;
use crate::gl::shader::*;
use crate::render::bloom::{PostProcessor, PostProcessorFactory};
use crate::render::targets::FrameBuffer;

const THRESHOLD_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 vUv;
out vec4 FragColor;

uniform sampler2D uTexture;
uniform float uThreshold;

void main() {
    vec4 c = texture(uTexture, vUv);
    float luma = dot(c.rgb, vec3(0.299, 0.587, 0.114));
    FragColor = luma > uThreshold ? c : vec4(0.0);
}
"#;

const BLUR_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 vUv;
out vec4 FragColor;

uniform sampler2D uTexture;
uniform vec2 uDirection;

void main() {
    vec4 sum = texture(uTexture, vUv) * 0.2270270270;
    sum += texture(uTexture, vUv + uDirection * 1.3846153846) * 0.3162162162;
    sum += texture(uTexture, vUv - uDirection * 1.3846153846) * 0.3162162162;
    sum += texture(uTexture, vUv + uDirection * 3.2307692308) * 0.0702702703;
    sum += texture(uTexture, vUv - uDirection * 3.2307692308) * 0.0702702703;
    FragColor = sum;
}
"#;

pub struct GlBloom {
    gl: Arc<glow::Context>,
    width: u32,
    height: u32,
    clear_color: Color,
    scene: GlFrameBuffer,
    ping: GlFrameBuffer,
    pong: GlFrameBuffer,
    quad: ScreenQuad,
    copy: NativeProgram,
    threshold: NativeProgram,
    threshold_loc: NativeUniformLocation,
    blur: NativeProgram,
    direction_loc: NativeUniformLocation,
    disposed: bool,
}

impl GlBloom {
    pub fn new(gl: Arc<glow::Context>, width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::PostProcessUnsupported(format!(
                "cannot build bloom targets for a {width}x{height} surface"
            )));
        }
        let (small_w, small_h) = ((width / BLOOM_DOWNSCALE).max(1), (height / BLOOM_DOWNSCALE).max(1));

        let scene = GlFrameBuffer::new(gl.clone(), width, height)?;
        let ping = GlFrameBuffer::new(gl.clone(), small_w, small_h)?;
        let pong = GlFrameBuffer::new(gl.clone(), small_w, small_h)?;
        let quad = ScreenQuad::new(gl.clone())?;

        let copy = compile_program(&gl, QUAD_VERTEX_SHADER, COPY_FRAGMENT_SHADER)?;
        let threshold = compile_program(&gl, QUAD_VERTEX_SHADER, THRESHOLD_FRAGMENT_SHADER)?;
        let threshold_loc = uniform(&gl, threshold, "uThreshold")?;
        let blur = compile_program(&gl, QUAD_VERTEX_SHADER, BLUR_FRAGMENT_SHADER)?;
        let direction_loc = uniform(&gl, blur, "uDirection")?;

        Ok(Self {
            gl,
            width,
            height,
            clear_color: Color::CLEAR,
            scene,
            ping,
            pong,
            quad,
            copy,
            threshold,
            threshold_loc,
            blur,
            direction_loc,
            disposed: false,
        })
    }

    fn draw_into(&self, target: &GlFrameBuffer, source: &GlFrameBuffer, program: NativeProgram) {
        let Some(texture) = source.texture() else {
            return;
        };
        target.bind();
        unsafe {
            self.gl.clear_color(0.0, 0.0, 0.0, 0.0);
            self.gl.clear(COLOR_BUFFER_BIT);
        }
        self.quad.draw(program, texture);
    }
}

impl PostProcessor for GlBloom {
    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn capture(&mut self) {
        let c = self.clear_color;
        self.scene.bind();
        unsafe {
            self.gl.clear_color(c.r, c.g, c.b, c.a);
            self.gl.clear(COLOR_BUFFER_BIT);
        }
    }

    fn render(&mut self) {
        puffin::profile_function!();
        let gl = self.gl.clone();

        unsafe {
            gl.disable(BLEND);
            gl.use_program(Some(self.threshold));
            gl.uniform_1_f32(Some(&self.threshold_loc), BLOOM_THRESHOLD);
        }
        self.draw_into(&self.ping, &self.scene, self.threshold);

        let texel = (1.0 / self.ping.width() as f32, 1.0 / self.ping.height() as f32);
        for _ in 0..BLOOM_BLUR_PASSES {
            unsafe {
                gl.use_program(Some(self.blur));
                gl.uniform_2_f32(Some(&self.direction_loc), texel.0, 0.0);
            }
            self.draw_into(&self.pong, &self.ping, self.blur);
            unsafe {
                gl.use_program(Some(self.blur));
                gl.uniform_2_f32(Some(&self.direction_loc), 0.0, texel.1);
            }
            self.draw_into(&self.ping, &self.pong, self.blur);
        }

        bind_screen(&gl, self.width, self.height);
        unsafe {
            gl.enable(BLEND);
            gl.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);
        }
        if let Some(scene) = self.scene.texture() {
            self.quad.draw(self.copy, scene);
        }
        unsafe {
            gl.blend_func(ONE, ONE);
        }
        if let Some(bright) = self.ping.texture() {
            self.quad.draw(self.copy, bright);
        }
        unsafe {
            gl.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);
        }
    }

    fn resume(&mut self) {
        bind_screen(&self.gl, self.width, self.height);
        tracing::debug!("bloom resumed");
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.scene.dispose();
        self.ping.dispose();
        self.pong.dispose();
        self.quad.dispose();
        unsafe {
            self.gl.delete_program(self.copy);
            self.gl.delete_program(self.threshold);
            self.gl.delete_program(self.blur);
        }
    }
}

/// Builds [`GlBloom`] instances on the shared context.
pub struct GlBloomFactory {
    gl: Arc<glow::Context>,
}

impl GlBloomFactory {
    pub fn new(gl: Arc<glow::Context>) -> Self {
        Self { gl }
    }
}

impl PostProcessorFactory for GlBloomFactory {
    fn create(&mut self, width: u32, height: u32) -> Result<Box<dyn PostProcessor>, RenderError> {
        Ok(Box::new(GlBloom::new(self.gl.clone(), width, height)?))
    }
}
