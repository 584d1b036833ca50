//! Colored-triangle sprite batch implementing [`Draw`].

use std::sync::Arc;

use glam::{Mat4, Vec2};
use glow::*;

use crate::draw::{Color, Draw, Region, ShaderKind};
use crate::error::RenderError;
use crate::gl::as_u8_slice;
use crate::gl::shader::{compile_program, uniform};

const VERTEX_SHADER_SRC: &str = r#"#version 330 core
layout (location = 0) in vec2 aPos;
layout (location = 1) in vec4 aColor;

uniform mat4 uProjection;

out vec4 vColor;

void main() {
    gl_Position = uProjection * vec4(aPos, 0.0, 1.0);
    vColor = aColor;
}
"#;

const FRAGMENT_SHADER_SRC: &str = r#"#version 330 core
in vec4 vColor;
out vec4 FragColor;

void main() {
    FragColor = vColor;
}
"#;

/// Diagonal scan stripes over blocks under construction.
const BLOCK_BUILD_FRAGMENT_SRC: &str = r#"#version 330 core
in vec4 vColor;
out vec4 FragColor;

void main() {
    float stripe = step(0.5, fract((gl_FragCoord.x + gl_FragCoord.y) / 8.0));
    FragColor = vec4(vColor.rgb, vColor.a * mix(0.35, 1.0, stripe));
}
"#;

/// x, y, r, g, b, a
const FLOATS_PER_VERTEX: usize = 6;
const CIRCLE_SEGMENTS: usize = 16;
const MAX_VERTICES: usize = 60_000;

struct Program {
    program: NativeProgram,
    projection_loc: NativeUniformLocation,
}

pub struct GlDraw {
    gl: Arc<glow::Context>,
    default_program: Program,
    build_program: Program,
    vao: NativeVertexArray,
    vbo: NativeBuffer,
    vertices: Vec<f32>,
    projection: Mat4,
    shader: ShaderKind,
    color: Color,
    mix: Color,
    mix_amount: f32,
    stroke: f32,
}

impl GlDraw {
    pub fn new(gl: Arc<glow::Context>) -> Result<Self, RenderError> {
        let default_program = Self::program(&gl, FRAGMENT_SHADER_SRC)?;
        let build_program = Self::program(&gl, BLOCK_BUILD_FRAGMENT_SRC)?;

        unsafe {
            let vao = gl.create_vertex_array().map_err(RenderError::Gl)?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().map_err(RenderError::Gl)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(vbo));

            let stride = (FLOATS_PER_VERTEX * 4) as i32;
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 4, FLOAT, false, stride, 8);

            gl.bind_vertex_array(None);

            gl.enable(BLEND);
            gl.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);

            Ok(Self {
                gl,
                default_program,
                build_program,
                vao,
                vbo,
                vertices: Vec::with_capacity(MAX_VERTICES * FLOATS_PER_VERTEX),
                projection: Mat4::IDENTITY,
                shader: ShaderKind::Default,
                color: Color::WHITE,
                mix: Color::WHITE,
                mix_amount: 0.0,
                stroke: 1.0,
            })
        }
    }

    fn program(gl: &glow::Context, fragment: &str) -> Result<Program, RenderError> {
        let program = compile_program(gl, VERTEX_SHADER_SRC, fragment)?;
        let projection_loc = uniform(gl, program, "uProjection")?;
        Ok(Program { program, projection_loc })
    }

    fn current_color(&self) -> [f32; 4] {
        self.color.lerp(self.mix.with_alpha(self.color.a), self.mix_amount).to_array()
    }

    fn push_vertex(&mut self, p: Vec2, color: [f32; 4]) {
        self.vertices.extend_from_slice(&[p.x, p.y]);
        self.vertices.extend_from_slice(&color);
    }

    fn push_quad(&mut self, corners: [Vec2; 4], color: [f32; 4]) {
        if self.vertices.len() / FLOATS_PER_VERTEX + 6 > MAX_VERTICES {
            self.flush();
        }
        for i in [0, 1, 2, 0, 2, 3] {
            self.push_vertex(corners[i], color);
        }
    }

    /// Soft disc: opaque center fading to a transparent rim.
    fn push_circle(&mut self, center: Vec2, radius: Vec2, color: [f32; 4]) {
        if self.vertices.len() / FLOATS_PER_VERTEX + CIRCLE_SEGMENTS * 3 > MAX_VERTICES {
            self.flush();
        }
        let rim = [color[0], color[1], color[2], 0.0];
        for i in 0..CIRCLE_SEGMENTS {
            let a0 = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            let a1 = (i + 1) as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
            self.push_vertex(center, color);
            self.push_vertex(center + Vec2::new(a0.cos(), a0.sin()) * radius, rim);
            self.push_vertex(center + Vec2::new(a1.cos(), a1.sin()) * radius, rim);
        }
    }

    fn active_program(&self) -> &Program {
        match self.shader {
            ShaderKind::Default => &self.default_program,
            ShaderKind::BlockBuild => &self.build_program,
        }
    }
}

fn rotated_rect(x: f32, y: f32, w: f32, h: f32, rotation: f32) -> [Vec2; 4] {
    let (sin, cos) = rotation.to_radians().sin_cos();
    let (hw, hh) = (w / 2.0, h / 2.0);
    [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(dx, dy)| Vec2::new(x + dx * cos - dy * sin, y + dx * sin + dy * cos))
}

impl Draw for GlDraw {
    fn clear(&mut self, color: Color) {
        self.vertices.clear();
        unsafe {
            self.gl.clear_color(color.r, color.g, color.b, color.a);
            self.gl.clear(COLOR_BUFFER_BIT);
        }
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.flush();
        self.projection = projection;
    }

    fn color(&mut self, color: Color) {
        self.color = color;
    }

    fn mix_color(&mut self, color: Color, amount: f32) {
        self.mix = color;
        self.mix_amount = amount.clamp(0.0, 1.0);
    }

    fn shader(&mut self, shader: ShaderKind) {
        if self.shader != shader {
            self.flush();
            self.shader = shader;
        }
    }

    fn stroke(&mut self, width: f32) {
        self.stroke = width;
    }

    fn rect(&mut self, region: &Region, x: f32, y: f32, width: f32, height: f32, rotation: f32) {
        let color = self.current_color();
        if region.name == Region::CIRCLE_SHADOW.name {
            self.push_circle(Vec2::new(x, y), Vec2::new(width / 2.0, height / 2.0), color);
        } else {
            self.push_quad(rotated_rect(x, y, width, height, rotation), color);
        }
    }

    fn line_angle(&mut self, x: f32, y: f32, angle: f32, length: f32) {
        let dir = Vec2::from_angle(angle.to_radians());
        let center = Vec2::new(x, y) + dir * (length / 2.0);
        let color = self.current_color();
        self.push_quad(rotated_rect(center.x, center.y, length, self.stroke, angle), color);
    }

    fn text(&mut self, text: &str, x: f32, y: f32) {
        // No glyphs: a tag bar sized to the label marks where it sits.
        let width = text.chars().count() as f32 * 1.5;
        let color = self.color.with_alpha(0.6).to_array();
        self.push_quad(rotated_rect(x, y, width, 2.0, 0.0), color);
    }

    fn flush(&mut self) {
        if self.vertices.is_empty() {
            return;
        }
        puffin::profile_function!();
        let program = self.active_program();
        let (program, projection_loc) = (program.program, program.projection_loc);
        let count = (self.vertices.len() / FLOATS_PER_VERTEX) as i32;

        unsafe {
            self.gl.use_program(Some(program));
            self.gl
                .uniform_matrix_4_f32_slice(Some(&projection_loc), false, self.projection.as_ref());
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.bind_buffer(ARRAY_BUFFER, Some(self.vbo));
            self.gl
                .buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&self.vertices), DYNAMIC_DRAW);
            self.gl.draw_arrays(TRIANGLES, 0, count);
            self.gl.bind_vertex_array(None);
        }
        self.vertices.clear();
    }

    fn dispose(&mut self) {
        self.vertices.clear();
        unsafe {
            self.gl.delete_program(self.default_program.program);
            self.gl.delete_program(self.build_program.program);
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
        }
    }
}
