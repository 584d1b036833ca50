//! Recording doubles for renderer tests. Every mock appends to one shared
//! [`CallLog`] so tests can assert cross-component call order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::{Mat4, Vec2};

use crate::camera::Camera;
use crate::draw::{Color, Draw, Region, ShaderKind};
use crate::error::RenderError;
use crate::grid::Grid;
use crate::render::blocks::BlockRenderer;
use crate::render::bloom::{PostProcessor, PostProcessorFactory};
use crate::render::overlays::{LightRenderer, MinimapRenderer, OverlayRenderer};
use crate::render::targets::{FrameBuffer, Pixelator};
use crate::render::SubRenderers;
use crate::tile::Layer;
use crate::world::{BuildPlan, CoreInfo, GameState, PlayerInfo, RenderLayer, WorldView};

#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.borrow_mut().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Calls starting with `prefix`, in order.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.0.borrow().iter().filter(|c| c.starts_with(prefix)).cloned().collect()
    }
}

pub struct RecordingDraw {
    log: CallLog,
    pub projection: Option<Mat4>,
}

impl RecordingDraw {
    pub fn new(log: CallLog) -> Self {
        Self { log, projection: None }
    }
}

impl Draw for RecordingDraw {
    fn clear(&mut self, _color: Color) {
        self.log.push("draw.clear");
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.projection = Some(projection);
        self.log.push("draw.projection");
    }

    fn color(&mut self, _color: Color) {
        self.log.push("draw.color");
    }

    fn mix_color(&mut self, _color: Color, _amount: f32) {
        self.log.push("draw.mix");
    }

    fn shader(&mut self, shader: ShaderKind) {
        self.log.push(format!("draw.shader({shader:?})"));
    }

    fn stroke(&mut self, _width: f32) {
        self.log.push("draw.stroke");
    }

    fn rect(&mut self, region: &Region, x: f32, y: f32, width: f32, height: f32, rotation: f32) {
        self.log
            .push(format!("draw.rect({},{x},{y},{width},{height},rot={rotation})", region.name));
    }

    fn line_angle(&mut self, _x: f32, _y: f32, _angle: f32, _length: f32) {
        self.log.push("draw.line");
    }

    fn text(&mut self, text: &str, _x: f32, _y: f32) {
        self.log.push(format!("draw.text({text})"));
    }

    fn flush(&mut self) {
        self.log.push("draw.flush");
    }
}

pub struct MockBlocks(pub CallLog);

impl BlockRenderer for MockBlocks {
    fn draw_floor(&mut self, _draw: &mut dyn Draw, _camera: &Camera, _grid: &Grid) {
        self.0.push("blocks.floor");
    }

    fn process_blocks(&mut self, _camera: &Camera, _grid: &Grid) {
        self.0.push("blocks.process");
    }

    fn draw_shadows(&mut self, _draw: &mut dyn Draw) {
        self.0.push("blocks.shadows");
    }

    fn draw_wall_layer(&mut self, _draw: &mut dyn Draw) {
        self.0.push("blocks.walls");
    }

    fn draw_blocks(&mut self, layer: Layer, _draw: &mut dyn Draw) {
        self.0.push(format!("blocks.layer({layer:?})"));
    }

    fn draw_fog(&mut self, _draw: &mut dyn Draw) {
        self.0.push("blocks.fog");
    }

    fn draw_destroyed(&mut self, _draw: &mut dyn Draw) {
        self.0.push("blocks.destroyed");
    }

    fn dispose(&mut self) {
        self.0.push("blocks.dispose");
    }
}

pub struct MockOverlays(pub CallLog);

impl OverlayRenderer for MockOverlays {
    fn draw_bottom(&mut self, _draw: &mut dyn Draw, _camera: &Camera, _world: &dyn WorldView) {
        self.0.push("overlays.bottom");
    }

    fn draw_top(&mut self, _draw: &mut dyn Draw, _camera: &Camera, _world: &dyn WorldView) {
        self.0.push("overlays.top");
    }
}

pub struct MockLights(pub CallLog);

impl LightRenderer for MockLights {
    fn draw(&mut self, _draw: &mut dyn Draw, _camera: &Camera, _world: &dyn WorldView) {
        self.0.push("lights.draw");
    }
}

pub struct MockMinimap(pub CallLog);

impl MinimapRenderer for MockMinimap {
    fn update(&mut self, _grid: &Grid) {
        self.0.push("minimap.update");
    }

    fn dispose(&mut self) {
        self.0.push("minimap.dispose");
    }
}

/// Pixelator whose enabled flag is shared with the test.
pub struct MockPixelator {
    log: CallLog,
    pub enabled: Rc<Cell<bool>>,
}

impl MockPixelator {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            enabled: Rc::new(Cell::new(false)),
        }
    }
}

impl Pixelator for MockPixelator {
    fn enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn begin(&mut self, _draw: &mut dyn Draw) {
        self.log.push("pixelator.begin");
    }

    fn end(&mut self, _draw: &mut dyn Draw) {
        self.log.push("pixelator.end");
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.push(format!("pixelator.resize({width},{height})"));
    }

    fn dispose(&mut self) {
        self.log.push("pixelator.dispose");
    }
}

pub struct MockFrameBuffer {
    log: CallLog,
    width: u32,
    height: u32,
}

impl MockFrameBuffer {
    pub fn new(log: CallLog) -> Self {
        Self { log, width: 0, height: 0 }
    }
}

impl FrameBuffer for MockFrameBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.log.push(format!("effect.resize({width},{height})"));
    }

    fn dispose(&mut self) {
        self.log.push("effect.dispose");
    }
}

/// Shared creation/disposal counters for [`MockBloomFactory`].
#[derive(Debug, Clone, Default)]
pub struct BloomCounts {
    created: Rc<Cell<usize>>,
    disposed: Rc<Cell<usize>>,
}

impl BloomCounts {
    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn disposed(&self) -> usize {
        self.disposed.get()
    }

    pub fn live(&self) -> usize {
        self.created() - self.disposed()
    }
}

pub struct MockBloom {
    log: CallLog,
    counts: BloomCounts,
    disposed: bool,
}

impl PostProcessor for MockBloom {
    fn set_clear_color(&mut self, color: Color) {
        self.log
            .push(format!("bloom.clear_color({},{},{},{})", color.r, color.g, color.b, color.a));
    }

    fn capture(&mut self) {
        self.log.push("bloom.capture");
    }

    fn render(&mut self) {
        self.log.push("bloom.render");
    }

    fn resume(&mut self) {
        self.log.push("bloom.resume");
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.counts.disposed.set(self.counts.disposed.get() + 1);
            self.log.push("bloom.dispose");
        }
    }
}

pub struct MockBloomFactory {
    log: CallLog,
    counts: BloomCounts,
    fail: bool,
}

impl MockBloomFactory {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            counts: BloomCounts::default(),
            fail: false,
        }
    }

    /// A factory whose every `create` fails as on hardware without post-processing.
    pub fn failing(log: CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(log)
        }
    }

    pub fn counts(&self) -> BloomCounts {
        self.counts.clone()
    }
}

impl PostProcessorFactory for MockBloomFactory {
    fn create(&mut self, width: u32, height: u32) -> Result<Box<dyn PostProcessor>, RenderError> {
        if self.fail {
            self.log.push("bloom.create_failed");
            return Err(RenderError::PostProcessUnsupported("no float framebuffers".into()));
        }
        self.counts.created.set(self.counts.created.get() + 1);
        self.log.push(format!("bloom.create({width},{height})"));
        Ok(Box::new(MockBloom {
            log: self.log.clone(),
            counts: self.counts.clone(),
            disposed: false,
        }))
    }
}

/// All five sub-renderers as recording mocks.
pub fn mock_renderers(log: &CallLog) -> SubRenderers {
    SubRenderers {
        blocks: Box::new(MockBlocks(log.clone())),
        overlays: Box::new(MockOverlays(log.clone())),
        lights: Box::new(MockLights(log.clone())),
        minimap: Box::new(MockMinimap(log.clone())),
        pixelator: Box::new(MockPixelator::new(log.clone())),
    }
}

/// Configurable world whose layer hooks record into the log.
pub struct MockWorld {
    log: CallLog,
    pub state: GameState,
    pub grid: Grid,
    pub player: Vec2,
    pub core: Option<CoreInfo>,
    pub players: Vec<PlayerInfo>,
    pub building: bool,
    pub plans: Vec<BuildPlan>,
    pub lighting: bool,
}

impl MockWorld {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            state: GameState::Playing,
            grid: Grid::new(8, 8),
            player: Vec2::ZERO,
            core: None,
            players: Vec::new(),
            building: false,
            plans: Vec::new(),
            lighting: false,
        }
    }
}

impl WorldView for MockWorld {
    fn state(&self) -> GameState {
        self.state
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn player_position(&self) -> Vec2 {
        self.player
    }

    fn closest_core(&self) -> Option<CoreInfo> {
        self.core
    }

    fn players(&self) -> &[PlayerInfo] {
        &self.players
    }

    fn is_building(&self) -> bool {
        self.building
    }

    fn build_plans(&self) -> &[BuildPlan] {
        &self.plans
    }

    fn lighting(&self) -> bool {
        self.lighting
    }

    fn render_layer(&self, layer: RenderLayer, _draw: &mut dyn Draw) {
        self.log.push(format!("hook({layer:?})"));
    }
}
