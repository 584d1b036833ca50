//! Frame renderer - owns rendering resources separate from game state.
//!
//! The game loop drives [`FrameRenderer`] through `init`, one `update` per
//! tick, `resize`/`resume` as the window changes, and finally `dispose`.
//! World state is read through [`WorldView`] and never mutated here.

pub mod blocks;
pub mod bloom;
pub mod landing;
pub mod overlays;
pub mod sequence;
pub mod shake;
pub mod targets;
#[cfg(test)]
pub mod testing;
pub mod zoom;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::constants::*;
use crate::context::ClientContext;
use crate::draw::{Color, Draw, Viewport};
use crate::events::ClientEvent;
use crate::world::{GameState, WorldView};

use blocks::BlockRenderer;
use bloom::{BloomSlot, PostProcessorFactory};
use overlays::{LightRenderer, MinimapRenderer, OverlayRenderer};
use sequence::{DrawSequence, Frame};
use shake::Shake;
use targets::{FrameBuffer, Pixelator};
use zoom::Zoom;

/// The sub-renderers a frame is composed from.
pub struct SubRenderers {
    pub blocks: Box<dyn BlockRenderer>,
    pub overlays: Box<dyn OverlayRenderer>,
    pub lights: Box<dyn LightRenderer>,
    pub minimap: Box<dyn MinimapRenderer>,
    pub pixelator: Box<dyn Pixelator>,
}

/// GPU-facing pieces handed to the renderer at construction.
pub struct RenderBackend {
    pub draw: Box<dyn Draw>,
    pub renderers: SubRenderers,
    pub bloom: Box<dyn PostProcessorFactory>,
    /// Shared buffer for animated water and shield effects
    pub effect_buffer: Box<dyn FrameBuffer>,
}

#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Background color the screen is cleared to while playing
    pub clear_color: Color,
    /// Landing sequence length in ticks
    pub land_lifetime: f32,
    /// Overrides the settings' UI scale as the camera base unit
    pub ui_scale: Option<f32>,
    /// Fixed shake seed; entropy when unset
    pub seed: Option<u64>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::BLACK,
            land_lifetime: CORE_LAND_LIFETIME,
            ui_scale: None,
            seed: None,
        }
    }
}

pub struct FrameRenderer {
    ctx: ClientContext,
    draw: Box<dyn Draw>,
    renderers: SubRenderers,
    bloom: BloomSlot,
    effect_buffer: Box<dyn FrameBuffer>,
    sequence: DrawSequence,
    camera: Camera,
    zoom: Zoom,
    shake: Shake,
    rng: StdRng,
    viewport: Viewport,
    clear_color: Color,
    state: GameState,
    disposed: bool,
}

impl FrameRenderer {
    pub fn new(ctx: ClientContext, backend: RenderBackend, viewport: Viewport, config: RendererConfig) -> Self {
        let base = config.ui_scale.unwrap_or_else(|| ctx.scl(1.0));
        let zoom = Zoom::new(base, config.land_lifetime);
        let scale = zoom.camera_scale();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            ctx,
            draw: backend.draw,
            renderers: backend.renderers,
            bloom: BloomSlot::new(backend.bloom),
            effect_buffer: backend.effect_buffer,
            sequence: DrawSequence::standard(),
            camera: Camera::new(viewport.width as f32 / scale, viewport.height as f32 / scale),
            zoom,
            shake: Shake::default(),
            rng,
            viewport,
            clear_color: config.clear_color,
            state: GameState::Menu,
            disposed: false,
        }
    }

    pub fn init(&mut self) {
        tracing::info!(width = self.viewport.width, height = self.viewport.height, "renderer initialized");
        if self.ctx.settings().bloom {
            self.bloom.setup(&mut self.ctx, self.viewport);
        }
    }

    /// Advance one tick of `delta` ticks and draw the frame for `world`.
    pub fn update(&mut self, world: &dyn WorldView, delta: f32) {
        puffin::profile_function!();
        self.draw.reset();

        self.zoom.step(delta);
        self.camera.resize(
            self.viewport.width as f32,
            self.viewport.height as f32,
            self.zoom.camera_scale(),
        );

        self.state = world.state();
        match self.state {
            GameState::Menu => {
                self.zoom.reset_landing();
                self.draw.clear(Color::BLACK);
            }
            GameState::Playing => {
                self.renderers.minimap.update(world.grid());

                let strength = self.ctx.settings().screen_shake;
                let offset = self.shake.step(&mut self.rng, strength, SHAKE_DAMPING, delta);
                self.camera.position += offset;

                if self.renderers.pixelator.enabled() {
                    self.renderers.pixelator.begin(&mut *self.draw);
                    self.draw(world);
                    self.renderers.pixelator.end(&mut *self.draw);
                } else {
                    self.draw(world);
                }
            }
        }
    }

    /// Run the full draw sequence once.
    pub fn draw(&mut self, world: &dyn WorldView) {
        let pixelating = self.renderers.pixelator.enabled();
        let Self {
            ctx,
            draw,
            renderers,
            bloom,
            effect_buffer,
            sequence,
            camera,
            zoom,
            viewport,
            clear_color,
            ..
        } = self;

        let mut frame = Frame {
            draw: &mut **draw,
            renderers,
            bloom,
            effect_buffer: &mut **effect_buffer,
            camera,
            zoom,
            world,
            settings: ctx.settings(),
            viewport: *viewport,
            clear_color: *clear_color,
            pixelating,
        };
        sequence.run(&mut frame);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "renderer resize");
        self.viewport.width = width;
        self.viewport.height = height;
        self.renderers.pixelator.resize(width, height);
        if self.ctx.settings().bloom {
            self.bloom.setup(&mut self.ctx, self.viewport);
        }
    }

    pub fn resume(&mut self) {
        if self.ctx.settings().bloom {
            self.bloom.resume();
        }
    }

    /// Release every owned resource and announce teardown. Safe to call twice.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.renderers.minimap.dispose();
        self.effect_buffer.dispose();
        self.renderers.blocks.dispose();
        self.bloom.dispose();
        self.renderers.pixelator.dispose();
        self.draw.dispose();
        self.ctx.events.push(ClientEvent::Dispose);
        tracing::info!("renderer disposed");
    }

    /// Minimized windows skip offscreen buffer work.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.viewport.hidden = hidden;
    }

    pub fn shake(&mut self, intensity: f32, duration: f32) {
        if self.state != GameState::Playing {
            return;
        }
        self.shake.shake(intensity, duration);
    }

    pub fn scale_camera(&mut self, amount: f32) {
        self.zoom.scale_camera(amount);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.zoom.set_scale(scale);
    }

    pub fn scale(&self) -> f32 {
        self.zoom.scale()
    }

    pub fn clamp_scale(&mut self) {
        self.zoom.clamp_scale();
    }

    pub fn zoom_in(&mut self, duration: f32) {
        self.zoom.zoom_in(duration);
    }

    pub fn land_scale(&self) -> f32 {
        self.zoom.land_scale()
    }

    pub fn toggle_bloom(&mut self, enabled: bool) {
        self.bloom.toggle(enabled, &mut self.ctx, self.viewport);
    }

    pub fn is_bloom_active(&self) -> bool {
        self.bloom.is_active()
    }

    pub fn set_pixelate(&mut self, enabled: bool) {
        self.renderers.pixelator.set_enabled(enabled);
    }

    pub fn is_pixelating(&self) -> bool {
        self.renderers.pixelator.enabled()
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_active()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut ClientContext {
        &mut self.ctx
    }

    pub fn sequence_mut(&mut self) -> &mut DrawSequence {
        &mut self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Settings, SettingsStore};
    use glam::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;
    use crate::render::testing::*;

    struct Rig {
        log: CallLog,
        counts: BloomCounts,
        pixelate: Rc<Cell<bool>>,
        world: MockWorld,
        renderer: FrameRenderer,
    }

    fn rig(settings: Settings) -> Rig {
        let log = CallLog::default();
        let factory = MockBloomFactory::new(log.clone());
        let counts = factory.counts();
        let pixelator = MockPixelator::new(log.clone());
        let pixelate = pixelator.enabled.clone();
        let mut renderers = mock_renderers(&log);
        renderers.pixelator = Box::new(pixelator);

        let backend = RenderBackend {
            draw: Box::new(RecordingDraw::new(log.clone())),
            renderers,
            bloom: Box::new(factory),
            effect_buffer: Box::new(MockFrameBuffer::new(log.clone())),
        };
        let config = RendererConfig {
            seed: Some(7),
            ..RendererConfig::default()
        };
        let ctx = ClientContext::new(SettingsStore::in_memory(settings));
        let renderer = FrameRenderer::new(ctx, backend, Viewport::new(640, 480), config);

        Rig {
            world: MockWorld::new(log.clone()),
            log,
            counts,
            pixelate,
            renderer,
        }
    }

    fn bloom_on() -> Settings {
        Settings {
            bloom: true,
            ..Settings::default()
        }
    }

    #[test]
    fn test_menu_clears_and_resets_landing() {
        let mut r = rig(Settings::default());
        r.world.state = GameState::Menu;
        r.renderer.zoom_in(CORE_LAND_LIFETIME);

        r.renderer.update(&r.world, 1.0);

        assert_eq!(r.renderer.land_scale(), 1.0);
        assert!(r.log.calls().contains(&"draw.clear".to_string()));
        assert!(r.log.matching("blocks.").is_empty());
    }

    #[test]
    fn test_playing_runs_full_sequence() {
        let mut r = rig(Settings::default());
        r.renderer.update(&r.world, 1.0);
        let calls = r.log.calls();
        assert!(calls.contains(&"blocks.floor".to_string()));
        assert_eq!(calls.last(), Some(&"draw.flush".to_string()));
    }

    #[test]
    fn test_shake_ignored_outside_playing() {
        let mut r = rig(Settings::default());
        r.world.state = GameState::Menu;
        r.renderer.update(&r.world, 1.0);
        r.renderer.shake(10.0, 10.0);
        assert!(!r.renderer.is_shaking());

        r.world.state = GameState::Playing;
        r.renderer.update(&r.world, 1.0);
        r.renderer.shake(10.0, 10.0);
        assert!(r.renderer.is_shaking());
    }

    #[test]
    fn test_shake_moves_camera() {
        let mut r = rig(Settings::default());
        r.renderer.update(&r.world, 1.0);
        r.renderer.camera_mut().position = Vec2::new(100.0, 100.0);
        r.renderer.shake(20.0, 30.0);
        r.renderer.update(&r.world, 1.0);
        assert_ne!(r.renderer.camera().position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_zero_shake_setting_keeps_camera_still() {
        let mut r = rig(Settings {
            screen_shake: 0,
            ..Settings::default()
        });
        r.renderer.update(&r.world, 1.0);
        r.renderer.camera_mut().position = Vec2::new(5.0, 5.0);
        r.renderer.shake(20.0, 30.0);
        r.renderer.update(&r.world, 1.0);
        assert_eq!(r.renderer.camera().position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_viewport_follows_smoothed_scale() {
        let mut r = rig(Settings::default());
        r.renderer.set_scale(6.0);
        r.renderer.update(&r.world, 1.0);
        let width = r.renderer.camera().width;
        assert!((width - 640.0 / 4.2).abs() < 1e-3, "{width}");
    }

    #[test]
    fn test_scale_controls_clamp() {
        let mut r = rig(Settings::default());
        r.renderer.scale_camera(100.0);
        assert_eq!(r.renderer.scale(), 6.0);
        r.renderer.set_scale(-3.0);
        assert_eq!(r.renderer.scale(), 1.5);
    }

    #[test]
    fn test_ui_scale_is_base_unit() {
        let mut r = rig(Settings {
            ui_scale: 2.0,
            ..Settings::default()
        });
        assert_eq!(r.renderer.scale(), 8.0);
        r.renderer.scale_camera(100.0);
        assert_eq!(r.renderer.scale(), 12.0);
    }

    #[test]
    fn test_landing_scale_during_update() {
        let mut r = rig(Settings::default());
        r.renderer.zoom_in(CORE_LAND_LIFETIME);
        for _ in 0..60 {
            r.renderer.update(&r.world, 1.0);
        }
        let scale = r.renderer.land_scale();
        assert!(scale > CAMERA_LANDING_MIN_SCALE && scale < CAMERA_DEFAULT_SCALE);
        for _ in 0..61 {
            r.renderer.update(&r.world, 1.0);
        }
        assert_eq!(r.renderer.land_scale(), 1.0);
    }

    #[test]
    fn test_pixelation_wraps_frame_and_skips_bloom() {
        let mut r = rig(bloom_on());
        r.renderer.init();
        r.pixelate.set(true);
        r.log.clear();

        r.renderer.update(&r.world, 1.0);

        let calls = r.log.calls();
        let begin = calls.iter().position(|c| c == "pixelator.begin").unwrap();
        let floor = calls.iter().position(|c| c == "blocks.floor").unwrap();
        let end = calls.iter().position(|c| c == "pixelator.end").unwrap();
        assert!(begin < floor && floor < end);
        assert!(r.log.matching("bloom.capture").is_empty());
        assert!(r.log.matching("bloom.render").is_empty());
    }

    #[test]
    fn test_bloom_runs_when_not_pixelating() {
        let mut r = rig(bloom_on());
        r.renderer.init();
        r.renderer.update(&r.world, 1.0);
        assert_eq!(r.log.matching("bloom.capture").len(), 1);
        assert_eq!(r.log.matching("bloom.render").len(), 1);
    }

    #[test]
    fn test_init_creates_bloom_only_when_enabled() {
        let mut off = rig(Settings::default());
        off.renderer.init();
        assert!(!off.renderer.is_bloom_active());

        let mut on = rig(bloom_on());
        on.renderer.init();
        assert!(on.renderer.is_bloom_active());
        assert_eq!(on.counts.created(), 1);
    }

    #[test]
    fn test_resize_rebuilds_bloom() {
        let mut r = rig(bloom_on());
        r.renderer.init();
        r.renderer.resize(800, 600);

        assert_eq!(r.counts.created(), 2);
        assert_eq!(r.counts.live(), 1);
        assert!(r.log.calls().contains(&"bloom.create(800,600)".to_string()));
        assert_eq!(r.renderer.viewport(), Viewport::new(800, 600));
    }

    #[test]
    fn test_resume_forwards_to_bloom() {
        let mut r = rig(bloom_on());
        r.renderer.init();
        r.renderer.resume();
        assert_eq!(r.log.matching("bloom.resume").len(), 1);
    }

    #[test]
    fn test_toggle_bloom_releases_resource() {
        let mut r = rig(Settings::default());
        r.renderer.toggle_bloom(true);
        assert!(r.renderer.is_bloom_active());
        r.renderer.toggle_bloom(false);
        assert!(!r.renderer.is_bloom_active());
        assert_eq!(r.counts.live(), 0);
    }

    #[test]
    fn test_dispose_order_and_event() {
        let mut r = rig(bloom_on());
        r.renderer.init();
        r.log.clear();

        r.renderer.dispose();

        assert_eq!(
            r.log.calls(),
            [
                "minimap.dispose",
                "effect.dispose",
                "blocks.dispose",
                "bloom.dispose",
                "pixelator.dispose"
            ]
        );
        assert_eq!(r.renderer.context().events.pending(), &[ClientEvent::Dispose]);
        assert_eq!(r.counts.live(), 0);

        r.renderer.dispose();
        assert_eq!(r.renderer.context().events.pending().len(), 1);
    }

    #[test]
    fn test_replaced_stage_runs_instead() {
        let mut r = rig(Settings::default());
        r.renderer
            .sequence_mut()
            .replace(sequence::DrawStage::Floor, |f| f.draw.text("custom floor", 0.0, 0.0));
        r.renderer.update(&r.world, 1.0);
        let calls = r.log.calls();
        assert!(calls.contains(&"draw.text(custom floor)".to_string()));
        assert!(!calls.contains(&"blocks.floor".to_string()));
    }
}
