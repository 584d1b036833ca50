mod app;
mod camera;
mod components;
mod constants;
mod context;
mod draw;
mod error;
mod events;
mod gl;
mod grid;
mod input;
mod items;
mod math;
mod render;
mod sandbox;
mod settings;
mod systems;
mod tile;
mod world;

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use glutin::prelude::*;
use glutin::surface::WindowSurface;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use constants::*;
use context::ClientContext;
use draw::{Color, Viewport};
use error::AppError;
use events::ClientEvent;
use render::blocks::GridBlockRenderer;
use render::overlays::{BlockLights, CoreOverlays, GridMinimap};
use render::{FrameRenderer, RenderBackend, RendererConfig, SubRenderers};
use sandbox::Sandbox;
use settings::SettingsStore;
use world::WorldView;

/// Set to any value to serve puffin profiles on the default port
const PROFILE_ENV: &str = "SKIRMISH_PROFILE";
/// Camera follow smoothing per tick
const CAMERA_FOLLOW: f32 = 0.1;
const BACKGROUND: Color = Color::rgb(0.08, 0.08, 0.1);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let _profiler = if std::env::var_os(PROFILE_ENV).is_some() {
        puffin::set_scopes_on(true);
        let addr = format!("0.0.0.0:{}", puffin_http::DEFAULT_PORT);
        let server = puffin_http::Server::new(&addr)?;
        tracing::info!(%addr, "puffin profiler serving");
        Some(server)
    } else {
        None
    };

    let settings = match SettingsStore::load(SETTINGS_FILE) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, file = SETTINGS_FILE, "settings unreadable, using defaults");
            SettingsStore::default()
        }
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings);
    event_loop.run_app(&mut app)?;
    if let Some(e) = app.error.take() {
        return Err(e.into());
    }
    Ok(())
}

struct App {
    /// Settings waiting for the renderer; taken on first resume
    settings: Option<SettingsStore>,
    state: Option<AppState>,
    error: Option<AppError>,
}

struct AppState {
    // Window and GL
    window: Window,
    gl_surface: glutin::surface::Surface<WindowSurface>,
    gl_context: glutin::context::PossiblyCurrentContext,

    renderer: FrameRenderer,
    sandbox: Sandbox,
    input: input::InputState,

    // Timing
    last_frame_time: Instant,
}

impl App {
    fn new(settings: SettingsStore) -> Self {
        Self {
            settings: Some(settings),
            state: None,
            error: None,
        }
    }
}

fn build_backend(gl: &Arc<glow::Context>, width: u32, height: u32) -> Result<RenderBackend, AppError> {
    Ok(RenderBackend {
        draw: Box::new(gl::GlDraw::new(gl.clone())?),
        renderers: SubRenderers {
            blocks: Box::new(GridBlockRenderer::new()),
            overlays: Box::new(CoreOverlays),
            lights: Box::new(BlockLights::default()),
            minimap: Box::new(GridMinimap::new()),
            pixelator: Box::new(gl::GlPixelator::new(gl.clone(), width, height)?),
        },
        bloom: Box::new(gl::GlBloomFactory::new(gl.clone())),
        effect_buffer: Box::new(gl::GlFrameBuffer::empty(gl.clone())),
    })
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_mut() {
            state.renderer.resume();
            return;
        }

        let app::WindowContext {
            window,
            gl_surface,
            gl_context,
            gl,
        } = match app::create_window(event_loop) {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::error!(error = %e, "could not create window");
                self.error = Some(e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let backend = match build_backend(&gl, size.width, size.height) {
            Ok(backend) => backend,
            Err(e) => {
                tracing::error!(error = %e, "could not build renderer");
                self.error = Some(e);
                event_loop.exit();
                return;
            }
        };

        let ctx = ClientContext::new(self.settings.take().unwrap_or_default());
        let config = RendererConfig {
            clear_color: BACKGROUND,
            ..RendererConfig::default()
        };
        let mut renderer = FrameRenderer::new(ctx, backend, Viewport::new(size.width, size.height), config);
        renderer.init();

        let sandbox = Sandbox::new(rand::random());
        renderer.camera_mut().position = sandbox.player_position();

        self.state = Some(AppState {
            window,
            gl_surface,
            gl_context,
            renderer,
            sandbox,
            input: input::InputState::new(),
            last_frame_time: Instant::now(),
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                state.renderer.dispose();
                state.drain_events();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app::resize_surface(&state.gl_surface, &state.gl_context, size.width, size.height);
                let hidden = size.width == 0 || size.height == 0;
                state.renderer.set_hidden(hidden);
                if !hidden {
                    state.renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::Occluded(occluded) => {
                state.renderer.set_hidden(occluded);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            if key == KeyCode::Escape {
                                state.renderer.dispose();
                                state.drain_events();
                                event_loop.exit();
                                return;
                            }
                            state.input.key_down(key);
                        }
                        ElementState::Released => state.input.key_up(key),
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.05,
                };
                state.input.scroll(lines);
            }
            WindowEvent::RedrawRequested => {
                state.update_and_render();
                state.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_mut() {
            state.renderer.dispose();
            state.drain_events();
        }
    }
}

impl AppState {
    fn update_and_render(&mut self) {
        puffin::GlobalProfiler::lock().new_frame();

        let current_time = Instant::now();
        let raw_dt = (current_time - self.last_frame_time).as_secs_f32();
        self.last_frame_time = current_time;

        // Frame time in ticks, capped so a stall doesn't fast-forward the world
        let delta = (raw_dt * TICKS_PER_SECOND).min(MAX_FRAME_DELTA);

        let result = input::process_keyboard(&mut self.input);
        input::apply_input(&result, &mut self.renderer, &mut self.sandbox, delta);

        self.sandbox.tick(delta);

        let target = self.sandbox.player_position();
        let camera = self.renderer.camera_mut();
        camera.position = Vec2::new(
            math::lerp_delta(camera.position.x, target.x, CAMERA_FOLLOW, delta),
            math::lerp_delta(camera.position.y, target.y, CAMERA_FOLLOW, delta),
        );

        self.renderer.update(&self.sandbox, delta);
        self.drain_events();

        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            tracing::warn!(error = %e, "swap_buffers failed");
        }
    }

    /// Handle renderer events raised during the frame.
    fn drain_events(&mut self) {
        for event in self.renderer.context_mut().events.drain() {
            match event {
                ClientEvent::ShowError { key } => {
                    tracing::error!(%key, "renderer reported an error");
                    self.window.set_title(&app::error_title(&key));
                }
                ClientEvent::BloomToggled { enabled } => tracing::info!(enabled, "bloom toggled"),
                ClientEvent::Dispose => tracing::info!("renderer released its resources"),
            }
        }
    }
}
