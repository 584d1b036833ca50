//! The per-frame draw order.
//!
//! A frame is a fixed list of stages run back to front in painter's order:
//! later stages occlude earlier ones. Stages are plain function pointers over
//! a borrowed [`Frame`], so a single stage can be swapped out (tests replace
//! stages to observe or stub them) without touching the rest of the order.

use crate::camera::Camera;
use crate::constants::TILE_SIZE;
use crate::draw::{Color, Draw, ShaderKind, Viewport};
use crate::grid::Grid;
use crate::render::bloom::BloomSlot;
use crate::render::landing::draw_landing;
use crate::render::targets::FrameBuffer;
use crate::render::zoom::Zoom;
use crate::render::SubRenderers;
use crate::settings::Settings;
use crate::tile::Layer;
use crate::world::{BuildPlan, RenderLayer, WorldView};

/// Everything a stage may touch while drawing one frame.
pub struct Frame<'a> {
    pub draw: &'a mut dyn Draw,
    pub renderers: &'a mut SubRenderers,
    pub bloom: &'a mut BloomSlot,
    pub effect_buffer: &'a mut dyn FrameBuffer,
    pub camera: &'a mut Camera,
    pub zoom: &'a Zoom,
    pub world: &'a dyn WorldView,
    pub settings: &'a Settings,
    pub viewport: Viewport,
    pub clear_color: Color,
    /// Bloom is bypassed while the pixelated path is active
    pub pixelating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawStage {
    Clear,
    Projection,
    Floor,
    FloorHook,
    ProcessBlocks,
    BlockShadows,
    Walls,
    Blocks,
    Fog,
    Destroyed,
    Placement,
    OverlayBlocks,
    GroundShadowsHook,
    GroundHook,
    Turrets,
    FlyingShadowsHook,
    PowerBlocks,
    LightBlocks,
    FlyingHook,
    BloomCapture,
    BulletsHook,
    EffectsHook,
    BloomRender,
    BottomOverlays,
    BuildPlans,
    TopOverlays,
    PlayerNames,
    Lighting,
    Landing,
    Finish,
}

impl DrawStage {
    pub fn name(self) -> &'static str {
        match self {
            DrawStage::Clear => "clear",
            DrawStage::Projection => "projection",
            DrawStage::Floor => "floor",
            DrawStage::FloorHook => "floor_hook",
            DrawStage::ProcessBlocks => "process_blocks",
            DrawStage::BlockShadows => "block_shadows",
            DrawStage::Walls => "walls",
            DrawStage::Blocks => "blocks",
            DrawStage::Fog => "fog",
            DrawStage::Destroyed => "destroyed",
            DrawStage::Placement => "placement",
            DrawStage::OverlayBlocks => "overlay_blocks",
            DrawStage::GroundShadowsHook => "ground_shadows_hook",
            DrawStage::GroundHook => "ground_hook",
            DrawStage::Turrets => "turrets",
            DrawStage::FlyingShadowsHook => "flying_shadows_hook",
            DrawStage::PowerBlocks => "power_blocks",
            DrawStage::LightBlocks => "light_blocks",
            DrawStage::FlyingHook => "flying_hook",
            DrawStage::BloomCapture => "bloom_capture",
            DrawStage::BulletsHook => "bullets_hook",
            DrawStage::EffectsHook => "effects_hook",
            DrawStage::BloomRender => "bloom_render",
            DrawStage::BottomOverlays => "bottom_overlays",
            DrawStage::BuildPlans => "build_plans",
            DrawStage::TopOverlays => "top_overlays",
            DrawStage::PlayerNames => "player_names",
            DrawStage::Lighting => "lighting",
            DrawStage::Landing => "landing",
            DrawStage::Finish => "finish",
        }
    }
}

pub type StageFn = fn(&mut Frame<'_>);

fn stage(stage: DrawStage, f: StageFn) -> (DrawStage, StageFn) {
    (stage, f)
}

pub struct DrawSequence {
    stages: Vec<(DrawStage, StageFn)>,
}

impl Default for DrawSequence {
    fn default() -> Self {
        Self::standard()
    }
}

impl DrawSequence {
    pub fn standard() -> Self {
        let stages = vec![
            stage(DrawStage::Clear, clear),
            stage(DrawStage::Projection, projection),
            stage(DrawStage::Floor, floor),
            stage(DrawStage::FloorHook, |f| hook(f, RenderLayer::Floor)),
            stage(DrawStage::ProcessBlocks, process_blocks),
            stage(DrawStage::BlockShadows, block_shadows),
            stage(DrawStage::Walls, walls),
            stage(DrawStage::Blocks, |f| blocks(f, Layer::Block)),
            stage(DrawStage::Fog, fog),
            stage(DrawStage::Destroyed, destroyed),
            stage(DrawStage::Placement, placement),
            stage(DrawStage::OverlayBlocks, |f| blocks(f, Layer::Overlay)),
            stage(DrawStage::GroundShadowsHook, |f| hook(f, RenderLayer::GroundShadows)),
            stage(DrawStage::GroundHook, |f| hook(f, RenderLayer::Ground)),
            stage(DrawStage::Turrets, |f| blocks(f, Layer::Turret)),
            stage(DrawStage::FlyingShadowsHook, |f| hook(f, RenderLayer::FlyingShadows)),
            stage(DrawStage::PowerBlocks, |f| blocks(f, Layer::Power)),
            stage(DrawStage::LightBlocks, |f| blocks(f, Layer::Lights)),
            stage(DrawStage::FlyingHook, |f| hook(f, RenderLayer::Flying)),
            stage(DrawStage::BloomCapture, bloom_capture),
            stage(DrawStage::BulletsHook, |f| hook(f, RenderLayer::Bullets)),
            stage(DrawStage::EffectsHook, |f| hook(f, RenderLayer::Effects)),
            stage(DrawStage::BloomRender, bloom_render),
            stage(DrawStage::BottomOverlays, bottom_overlays),
            stage(DrawStage::BuildPlans, build_plans),
            stage(DrawStage::TopOverlays, top_overlays),
            stage(DrawStage::PlayerNames, player_names),
            stage(DrawStage::Lighting, lighting),
            stage(DrawStage::Landing, landing),
            stage(DrawStage::Finish, finish),
        ];
        Self { stages }
    }

    /// Swap the function run for `stage`. Returns false if the stage is absent.
    pub fn replace(&mut self, stage: DrawStage, f: StageFn) -> bool {
        match self.stages.iter_mut().find(|(s, _)| *s == stage) {
            Some(entry) => {
                entry.1 = f;
                true
            }
            None => false,
        }
    }

    pub fn stages(&self) -> impl Iterator<Item = DrawStage> + '_ {
        self.stages.iter().map(|(stage, _)| *stage)
    }

    pub fn run(&self, frame: &mut Frame<'_>) {
        puffin::profile_function!();
        for (stage, f) in &self.stages {
            puffin::profile_scope!("draw_stage", stage.name());
            f(frame);
        }
    }
}

fn clear(f: &mut Frame<'_>) {
    if f.camera.has_nan_position() {
        tracing::warn!("camera position is NaN, snapping to player");
        f.camera.position = f.world.player_position();
    }

    f.draw.clear(f.clear_color);

    let animated = f.settings.animated_water || f.settings.animated_shields;
    let (w, h) = (f.viewport.width, f.viewport.height);
    if animated && !f.viewport.hidden && (f.effect_buffer.width() != w || f.effect_buffer.height() != h) {
        tracing::debug!(width = w, height = h, "resizing effect buffer");
        f.effect_buffer.resize(w, h);
    }
}

fn projection(f: &mut Frame<'_>) {
    f.draw.set_projection(f.camera.projection_matrix());
}

fn floor(f: &mut Frame<'_>) {
    f.renderers.blocks.draw_floor(f.draw, f.camera, f.world.grid());
}

fn hook(f: &mut Frame<'_>, layer: RenderLayer) {
    f.world.render_layer(layer, f.draw);
}

fn process_blocks(f: &mut Frame<'_>) {
    f.renderers.blocks.process_blocks(f.camera, f.world.grid());
}

fn block_shadows(f: &mut Frame<'_>) {
    f.renderers.blocks.draw_shadows(f.draw);
    f.draw.color(Color::WHITE);
}

fn walls(f: &mut Frame<'_>) {
    f.renderers.blocks.draw_wall_layer(f.draw);
}

fn blocks(f: &mut Frame<'_>, layer: Layer) {
    f.renderers.blocks.draw_blocks(layer, f.draw);
}

fn fog(f: &mut Frame<'_>) {
    f.renderers.blocks.draw_fog(f.draw);
}

fn destroyed(f: &mut Frame<'_>) {
    f.renderers.blocks.draw_destroyed(f.draw);
}

fn placement(f: &mut Frame<'_>) {
    f.draw.shader(ShaderKind::BlockBuild);
    f.renderers.blocks.draw_blocks(Layer::Placement, f.draw);
    f.draw.shader(ShaderKind::Default);
}

fn bloom_capture(f: &mut Frame<'_>) {
    f.draw.flush();
    if f.pixelating {
        return;
    }
    if let Some(bloom) = f.bloom.get_mut() {
        bloom.capture();
    }
}

fn bloom_render(f: &mut Frame<'_>) {
    f.draw.flush();
    if f.pixelating {
        return;
    }
    if let Some(bloom) = f.bloom.get_mut() {
        bloom.render();
    }
}

fn bottom_overlays(f: &mut Frame<'_>) {
    f.renderers.overlays.draw_bottom(f.draw, f.camera, f.world);
}

const PLAN_COLOR: Color = Color::ACCENT;
const BREAK_PLAN_COLOR: Color = Color::rgb(0.9, 0.3, 0.3);

fn build_plans(f: &mut Frame<'_>) {
    if !f.world.is_building() {
        return;
    }
    draw_build_plans(f.draw, f.world.build_plans());
}

fn draw_build_plans(draw: &mut dyn Draw, plans: &[BuildPlan]) {
    for plan in plans {
        let center = Grid::world_center(plan.x, plan.y);
        let color = if plan.breaking { BREAK_PLAN_COLOR } else { PLAN_COLOR };
        draw.color(color.with_alpha(0.35));
        draw.fill(center.x, center.y, TILE_SIZE, TILE_SIZE);
        draw.color(plan.kind.color().lerp(color, 0.5));
        draw.fill(center.x, center.y, TILE_SIZE * 0.5, TILE_SIZE * 0.5);
    }
    draw.reset();
}

fn top_overlays(f: &mut Frame<'_>) {
    f.renderers.overlays.draw_top(f.draw, f.camera, f.world);
}

fn player_names(f: &mut Frame<'_>) {
    for player in f.world.players().iter().filter(|p| !p.dead) {
        f.draw.text(&player.name, player.position.x, player.position.y + TILE_SIZE);
    }
}

fn lighting(f: &mut Frame<'_>) {
    if f.world.lighting() {
        f.renderers.lights.draw(f.draw, f.camera, f.world);
    }
}

fn landing(f: &mut Frame<'_>) {
    let core = f.world.closest_core();
    draw_landing(f.draw, f.zoom, core.as_ref());
}

fn finish(f: &mut Frame<'_>) {
    f.draw.reset();
    f.draw.shader(ShaderKind::Default);
    f.draw.flush();
}
