//! Overlay, lighting and minimap sub-renderers.

use crate::camera::Camera;
use crate::constants::TILE_SIZE;
use crate::draw::{Color, Draw, Region};
use crate::grid::Grid;
use crate::math::angle;
use crate::world::WorldView;

/// Indicators drawn above the world: under and over the entity layers.
pub trait OverlayRenderer {
    fn draw_bottom(&mut self, draw: &mut dyn Draw, camera: &Camera, world: &dyn WorldView);
    fn draw_top(&mut self, draw: &mut dyn Draw, camera: &Camera, world: &dyn WorldView);
}

/// The lighting pass, drawn only when the rules enable lighting.
pub trait LightRenderer {
    fn draw(&mut self, draw: &mut dyn Draw, camera: &Camera, world: &dyn WorldView);
}

pub trait MinimapRenderer {
    fn update(&mut self, grid: &Grid);
    fn dispose(&mut self);
}

const CORE_OUTLINE_SIZE: f32 = TILE_SIZE * 3.0;
const ARROW_MARGIN: f32 = TILE_SIZE * 2.0;
const ARROW_LENGTH: f32 = TILE_SIZE * 1.5;

/// Team outline under the nearest core and an off-screen arrow pointing at it.
#[derive(Debug, Default)]
pub struct CoreOverlays;

impl OverlayRenderer for CoreOverlays {
    fn draw_bottom(&mut self, draw: &mut dyn Draw, _camera: &Camera, world: &dyn WorldView) {
        let Some(core) = world.closest_core() else {
            return;
        };
        let half = CORE_OUTLINE_SIZE / 2.0;
        let p = core.position;
        draw.color(core.team.color());
        draw.stroke(1.0);
        draw.line_angle(p.x - half, p.y - half, 0.0, CORE_OUTLINE_SIZE);
        draw.line_angle(p.x + half, p.y - half, 90.0, CORE_OUTLINE_SIZE);
        draw.line_angle(p.x + half, p.y + half, 180.0, CORE_OUTLINE_SIZE);
        draw.line_angle(p.x - half, p.y + half, 270.0, CORE_OUTLINE_SIZE);
        draw.reset();
    }

    fn draw_top(&mut self, draw: &mut dyn Draw, camera: &Camera, world: &dyn WorldView) {
        let Some(core) = world.closest_core() else {
            return;
        };
        if camera.contains(core.position, 0.0) {
            return;
        }
        let dir = (core.position - camera.position).normalize_or_zero();
        if dir == glam::Vec2::ZERO {
            return;
        }
        let reach = (camera.width.min(camera.height) / 2.0 - ARROW_MARGIN).max(0.0);
        let tip = camera.position + dir * reach;
        let rotation = angle(dir.x, dir.y);

        draw.color(core.team.color());
        draw.stroke(2.0);
        draw.line_angle(tip.x, tip.y, rotation + 150.0, ARROW_LENGTH);
        draw.line_angle(tip.x, tip.y, rotation - 150.0, ARROW_LENGTH);
        draw.reset();
    }
}

/// Soft halos around light-emitting blocks.
#[derive(Debug)]
pub struct BlockLights {
    pub tint: Color,
}

impl Default for BlockLights {
    fn default() -> Self {
        Self {
            tint: Color::rgba(1.0, 0.9, 0.7, 0.25),
        }
    }
}

impl LightRenderer for BlockLights {
    fn draw(&mut self, draw: &mut dyn Draw, camera: &Camera, world: &dyn WorldView) {
        puffin::profile_function!();
        draw.color(self.tint);
        for (x, y, tile) in world.grid().iter_bounds(camera.visible_tile_bounds(TILE_SIZE)) {
            let Some(radius) = tile.block.and_then(|b| b.kind.light_radius()) else {
                continue;
            };
            let center = Grid::world_center(x, y);
            let size = radius * TILE_SIZE * 2.0;
            draw.rect(&Region::CIRCLE_SHADOW, center.x, center.y, size, size, 0.0);
        }
        draw.color(Color::WHITE);
    }
}

/// RGBA8 pixel cache of the grid, one pixel per tile.
///
/// The renderer only keeps the cache current; the client draws no minimap
/// widget itself. [`size`](Self::size) and [`pixel`](Self::pixel) are the
/// read side for whatever presents it (a UI layer or a texture upload).
#[derive(Debug, Default)]
pub struct GridMinimap {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
    revision: Option<u64>,
}

impl GridMinimap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Grid revision the cache was built from.
    pub fn revision(&self) -> Option<u64> {
        self.revision
    }
}

fn to_rgba8(color: Color) -> [u8; 4] {
    color.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

impl MinimapRenderer for GridMinimap {
    fn update(&mut self, grid: &Grid) {
        if self.revision == Some(grid.revision()) && self.width == grid.width && self.height == grid.height {
            return;
        }
        puffin::profile_function!();
        self.width = grid.width;
        self.height = grid.height;
        self.pixels = grid
            .tiles
            .iter()
            .map(|tile| if tile.explored { to_rgba8(tile.color()) } else { [0, 0, 0, 255] })
            .collect();
        self.revision = Some(grid.revision());
        tracing::debug!(width = self.width, height = self.height, "minimap rebuilt");
    }

    fn dispose(&mut self) {
        self.pixels = Vec::new();
        self.width = 0;
        self.height = 0;
        self.revision = None;
    }
}
