//! OpenGL backend for the renderer, built on glow.

pub mod batch;
pub mod bloom;
pub mod framebuffer;
pub mod pixelator;
pub mod shader;

pub use batch::GlDraw;
pub use bloom::GlBloomFactory;
pub use framebuffer::GlFrameBuffer;
pub use pixelator::GlPixelator;

use std::mem;

fn as_u8_slice<T>(data: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, mem::size_of_val(data)) }
}

/// Bind the window's default framebuffer and set the full viewport.
pub fn bind_screen(gl: &glow::Context, width: u32, height: u32) {
    use glow::HasContext;
    unsafe {
        gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        gl.viewport(0, 0, width as i32, height as i32);
    }
}
