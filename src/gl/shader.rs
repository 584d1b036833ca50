//! Shader compilation and the fullscreen textured quad used by post passes.

use std::sync::Arc;

use glow::*;

use crate::error::RenderError;
use crate::gl::as_u8_slice;

pub const QUAD_VERTEX_SHADER: &str = r#"#version 330 core
layout (location = 0) in vec2 aPos;

out vec2 vUv;

void main() {
    vUv = aPos * 0.5 + 0.5;
    gl_Position = vec4(aPos, 0.0, 1.0);
}
"#;

/// Plain texture copy.
pub const COPY_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 vUv;
out vec4 FragColor;

uniform sampler2D uTexture;

void main() {
    FragColor = texture(uTexture, vUv);
}
"#;

unsafe fn compile_stage(gl: &glow::Context, kind: u32, source: &str) -> Result<NativeShader, RenderError> {
    let shader = gl
        .create_shader(kind)
        .map_err(|e| RenderError::Shader(format!("failed to create shader: {e}")))?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(RenderError::Shader(log));
    }
    Ok(shader)
}

/// Compile and link a vertex/fragment pair.
pub fn compile_program(gl: &glow::Context, vertex: &str, fragment: &str) -> Result<NativeProgram, RenderError> {
    unsafe {
        let vertex_shader = compile_stage(gl, VERTEX_SHADER, vertex)?;
        let fragment_shader = match compile_stage(gl, FRAGMENT_SHADER, fragment) {
            Ok(s) => s,
            Err(e) => {
                gl.delete_shader(vertex_shader);
                return Err(e);
            }
        };

        let program = gl
            .create_program()
            .map_err(|e| RenderError::Shader(format!("failed to create program: {e}")))?;
        gl.attach_shader(program, vertex_shader);
        gl.attach_shader(program, fragment_shader);
        gl.link_program(program);

        gl.delete_shader(vertex_shader);
        gl.delete_shader(fragment_shader);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(RenderError::Shader(log));
        }
        Ok(program)
    }
}

pub fn uniform(gl: &glow::Context, program: NativeProgram, name: &str) -> Result<NativeUniformLocation, RenderError> {
    unsafe { gl.get_uniform_location(program, name) }
        .ok_or_else(|| RenderError::Shader(format!("missing uniform {name}")))
}

/// A clip-space quad covering the whole target, drawn with a caller-chosen program.
pub struct ScreenQuad {
    gl: Arc<glow::Context>,
    vao: Option<NativeVertexArray>,
    vbo: Option<NativeBuffer>,
}

impl ScreenQuad {
    pub fn new(gl: Arc<glow::Context>) -> Result<Self, RenderError> {
        let vertices: [f32; 12] = [
            -1.0, -1.0, //
            1.0, -1.0, //
            1.0, 1.0, //
            -1.0, -1.0, //
            1.0, 1.0, //
            -1.0, 1.0,
        ];

        unsafe {
            let vao = gl.create_vertex_array().map_err(RenderError::Gl)?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().map_err(RenderError::Gl)?;
            gl.bind_buffer(ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&vertices), STATIC_DRAW);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, FLOAT, false, 8, 0);
            gl.bind_vertex_array(None);

            Ok(Self {
                gl,
                vao: Some(vao),
                vbo: Some(vbo),
            })
        }
    }

    /// Draw `texture` through `program`, whose sampler is bound to unit 0.
    pub fn draw(&self, program: NativeProgram, texture: NativeTexture) {
        let gl = &self.gl;
        unsafe {
            gl.use_program(Some(program));
            gl.active_texture(TEXTURE0);
            gl.bind_texture(TEXTURE_2D, Some(texture));
            gl.bind_vertex_array(self.vao);
            gl.draw_arrays(TRIANGLES, 0, 6);
            gl.bind_vertex_array(None);
            gl.bind_texture(TEXTURE_2D, None);
        }
    }

    pub fn dispose(&mut self) {
        unsafe {
            if let Some(vao) = self.vao.take() {
                self.gl.delete_vertex_array(vao);
            }
            if let Some(vbo) = self.vbo.take() {
                self.gl.delete_buffer(vbo);
            }
        }
    }
}
