//! Error types for the client.

use thiserror::Error;

/// Failures raised while creating or driving GPU-side resources.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("shader compilation failed: {0}")]
    Shader(String),
    #[error("framebuffer {width}x{height} is incomplete (status {status:#x})")]
    Framebuffer { width: u32, height: u32, status: u32 },
    #[error("post-processing is not supported: {0}")]
    PostProcessUnsupported(String),
    #[error("GL object creation failed: {0}")]
    Gl(String),
}

/// Failures reading or writing persisted settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while bringing up the window and GL context.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("window creation failed: {0}")]
    Window(String),
    #[error("GL context creation failed: {0}")]
    Context(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),
}
