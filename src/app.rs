//! Application window and OpenGL context management.
//!
//! Window creation, GL context setup, and surface resizing. Platform and
//! graphics plumbing stays here so the event loop only deals with the game.

use std::ffi::CString;
use std::num::NonZeroU32;
use std::sync::Arc;

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::constants::*;
use crate::error::AppError;

const WINDOW_TITLE: &str = "Skirmish";

/// Result of window and GL context creation.
pub struct WindowContext {
    pub window: Window,
    pub gl_surface: glutin::surface::Surface<WindowSurface>,
    pub gl_context: glutin::context::PossiblyCurrentContext,
    pub gl: Arc<glow::Context>,
}

/// Create a window with a current OpenGL 3.3 context.
pub fn create_window(event_loop: &ActiveEventLoop) -> Result<WindowContext, AppError> {
    let window_attrs = WindowAttributes::default()
        .with_title(WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT))
        .with_resizable(true);

    let template = ConfigTemplateBuilder::new().with_alpha_size(8);
    let display_builder = DisplayBuilder::new().with_window_attributes(Some(window_attrs));

    let (window, gl_config) = display_builder
        .build(event_loop, template, |configs| {
            // Prefer the config with the most samples; the iterator is never empty
            configs
                .reduce(|accum, config| {
                    if config.num_samples() > accum.num_samples() {
                        config
                    } else {
                        accum
                    }
                })
                .unwrap_or_else(|| unreachable!("glutin yields at least one config"))
        })
        .map_err(|e| AppError::Window(e.to_string()))?;

    let window = window.ok_or_else(|| AppError::Window("display builder returned no window".into()))?;
    let window_handle = window.window_handle().map_err(|e| AppError::Window(e.to_string()))?;
    let gl_display = gl_config.display();

    let context_attrs = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(window_handle.as_raw()));

    let gl_context = unsafe {
        gl_display
            .create_context(&gl_config, &context_attrs)
            .map_err(|e| AppError::Context(e.to_string()))?
    };

    let size = window.inner_size();
    let (width, height) = non_zero_size(size.width, size.height)
        .ok_or_else(|| AppError::Window(format!("window has no area ({}x{})", size.width, size.height)))?;
    let surface_attrs =
        SurfaceAttributesBuilder::<WindowSurface>::new().build(window_handle.as_raw(), width, height);

    let gl_surface = unsafe {
        gl_display
            .create_window_surface(&gl_config, &surface_attrs)
            .map_err(|e| AppError::Context(e.to_string()))?
    };

    let gl_context = gl_context
        .make_current(&gl_surface)
        .map_err(|e| AppError::Context(e.to_string()))?;

    let gl = Arc::new(unsafe {
        glow::Context::from_loader_function(|s| match CString::new(s) {
            Ok(s) => gl_display.get_proc_address(&s) as *const _,
            Err(_) => std::ptr::null(),
        })
    });

    tracing::info!(width = size.width, height = size.height, "window created");

    Ok(WindowContext {
        window,
        gl_surface,
        gl_context,
        gl,
    })
}

/// Window title carrying a renderer error key, so the user sees it without a log.
pub fn error_title(key: &str) -> String {
    format!("{WINDOW_TITLE} - error: {key}")
}

fn non_zero_size(width: u32, height: u32) -> Option<(NonZeroU32, NonZeroU32)> {
    Some((NonZeroU32::new(width)?, NonZeroU32::new(height)?))
}

/// Resize the GL surface to match the window size. Zero-area sizes are ignored.
pub fn resize_surface(
    gl_surface: &glutin::surface::Surface<WindowSurface>,
    gl_context: &glutin::context::PossiblyCurrentContext,
    width: u32,
    height: u32,
) {
    if let Some((width, height)) = non_zero_size(width, height) {
        gl_surface.resize(gl_context, width, height);
    }
}
