//! Terrain and static structure drawing.

use crate::camera::Camera;
use crate::constants::TILE_SIZE;
use crate::draw::{Color, Draw, Region};
use crate::grid::Grid;
use crate::tile::{Block, Layer};
use glam::Vec2;

/// Draws floor, walls, blocks by layer, fog and destroyed-structure overlays.
///
/// `process_blocks` gathers what is visible this frame; the other draw calls
/// only emit what was gathered.
pub trait BlockRenderer {
    fn draw_floor(&mut self, draw: &mut dyn Draw, camera: &Camera, grid: &Grid);
    fn process_blocks(&mut self, camera: &Camera, grid: &Grid);
    fn draw_shadows(&mut self, draw: &mut dyn Draw);
    /// Static terrain walls (the wall cache layer).
    fn draw_wall_layer(&mut self, draw: &mut dyn Draw);
    fn draw_blocks(&mut self, layer: Layer, draw: &mut dyn Draw);
    fn draw_fog(&mut self, draw: &mut dyn Draw);
    fn draw_destroyed(&mut self, draw: &mut dyn Draw);
    fn dispose(&mut self);
}

const WALL_COLOR: Color = Color::rgb(0.15, 0.15, 0.17);
const FOG_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.85);
const RUBBLE_COLOR: Color = Color::rgba(0.25, 0.22, 0.2, 0.8);
const BLOCK_SHADOW_OFFSET: f32 = 1.0;

#[derive(Debug, Clone, Copy)]
struct VisibleBlock {
    position: Vec2,
    block: Block,
}

/// Default block renderer over a [`Grid`].
#[derive(Debug, Default)]
pub struct GridBlockRenderer {
    layers: [Vec<VisibleBlock>; 6],
    shadows: Vec<Vec2>,
    walls: Vec<Vec2>,
    fog: Vec<Vec2>,
    rubble: Vec<Vec2>,
}

impl GridBlockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks gathered for `layer` by the last `process_blocks`.
    pub fn layer_len(&self, layer: Layer) -> usize {
        self.layers[layer.index()].len()
    }

    pub fn fog_len(&self) -> usize {
        self.fog.len()
    }

    fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
        self.shadows.clear();
        self.walls.clear();
        self.fog.clear();
        self.rubble.clear();
    }
}

impl BlockRenderer for GridBlockRenderer {
    fn draw_floor(&mut self, draw: &mut dyn Draw, camera: &Camera, grid: &Grid) {
        puffin::profile_function!();
        for (x, y, tile) in grid.iter_bounds(camera.visible_tile_bounds(TILE_SIZE)) {
            if tile.wall {
                continue;
            }
            let center = Grid::world_center(x, y);
            draw.color(tile.floor.color());
            draw.fill(center.x, center.y, TILE_SIZE, TILE_SIZE);
        }
        draw.color(Color::WHITE);
    }

    fn process_blocks(&mut self, camera: &Camera, grid: &Grid) {
        puffin::profile_function!();
        self.clear();

        for (x, y, tile) in grid.iter_bounds(camera.visible_tile_bounds(TILE_SIZE)) {
            let position = Grid::world_center(x, y);
            if !tile.explored {
                self.fog.push(position);
                continue;
            }
            if tile.wall {
                self.walls.push(position);
            }
            if tile.rubble {
                self.rubble.push(position);
            }
            if let Some(block) = tile.block {
                if block.build_progress.is_none() {
                    self.shadows.push(position);
                }
                for layer in block.layers() {
                    self.layers[layer.index()].push(VisibleBlock { position, block });
                }
            }
        }
    }

    fn draw_shadows(&mut self, draw: &mut dyn Draw) {
        draw.color(Color::SHADOW);
        for p in &self.shadows {
            draw.fill(p.x - BLOCK_SHADOW_OFFSET, p.y - BLOCK_SHADOW_OFFSET, TILE_SIZE, TILE_SIZE);
        }
    }

    fn draw_wall_layer(&mut self, draw: &mut dyn Draw) {
        draw.color(WALL_COLOR);
        for p in &self.walls {
            draw.fill(p.x, p.y, TILE_SIZE, TILE_SIZE);
        }
        draw.color(Color::WHITE);
    }

    fn draw_blocks(&mut self, layer: Layer, draw: &mut dyn Draw) {
        for VisibleBlock { position: p, block } in &self.layers[layer.index()] {
            match layer {
                Layer::Block => {
                    draw.color(block.kind.color());
                    draw.fill(p.x, p.y, TILE_SIZE * 0.9, TILE_SIZE * 0.9);
                }
                Layer::Placement => {
                    let progress = block.build_progress.unwrap_or(1.0);
                    draw.color(block.team.color().with_alpha(0.6));
                    draw.fill(p.x, p.y, TILE_SIZE * progress, TILE_SIZE * progress);
                }
                Layer::Overlay => {
                    draw.color(block.team.color());
                    draw.fill(p.x + TILE_SIZE * 0.3, p.y + TILE_SIZE * 0.3, TILE_SIZE * 0.2, TILE_SIZE * 0.2);
                }
                Layer::Turret => {
                    draw.color(block.kind.color().lerp(Color::BLACK, 0.3));
                    draw.stroke(2.0);
                    draw.line_angle(p.x, p.y, 90.0, TILE_SIZE * 0.6);
                }
                Layer::Power => {
                    draw.color(block.kind.color());
                    draw.fill(p.x, p.y, TILE_SIZE * 0.4, TILE_SIZE * 0.4);
                }
                Layer::Lights => {
                    draw.color(block.kind.color());
                    draw.rect(&Region::CIRCLE_SHADOW, p.x, p.y, TILE_SIZE * 0.5, TILE_SIZE * 0.5, 0.0);
                }
            }
        }
        draw.reset();
    }

    fn draw_fog(&mut self, draw: &mut dyn Draw) {
        draw.color(FOG_COLOR);
        for p in &self.fog {
            draw.fill(p.x, p.y, TILE_SIZE, TILE_SIZE);
        }
        draw.color(Color::WHITE);
    }

    fn draw_destroyed(&mut self, draw: &mut dyn Draw) {
        draw.color(RUBBLE_COLOR);
        for p in &self.rubble {
            draw.rect(&Region::WHITE, p.x, p.y, TILE_SIZE * 0.7, TILE_SIZE * 0.7, 45.0);
        }
        draw.color(Color::WHITE);
    }

    fn dispose(&mut self) {
        self.clear();
        self.layers = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{CallLog, RecordingDraw};
    use crate::tile::{BlockKind, Team};

    fn camera_over(grid: &Grid) -> Camera {
        let mut camera = Camera::new(grid.width as f32 * TILE_SIZE, grid.height as f32 * TILE_SIZE);
        camera.position = Vec2::new(camera.width / 2.0, camera.height / 2.0);
        camera
    }

    #[test]
    fn test_process_sorts_blocks_into_layers() {
        let mut grid = Grid::new(8, 8);
        grid.set_block(1, 1, Block::new(BlockKind::Turret, Team::Sharded));
        grid.set_block(2, 2, Block::new(BlockKind::Lamp, Team::Sharded));
        grid.set_block(3, 3, Block::under_construction(BlockKind::Conveyor, Team::Sharded, 0.3));

        let mut blocks = GridBlockRenderer::new();
        blocks.process_blocks(&camera_over(&grid), &grid);

        assert_eq!(blocks.layer_len(Layer::Block), 2);
        assert_eq!(blocks.layer_len(Layer::Turret), 1);
        assert_eq!(blocks.layer_len(Layer::Lights), 1);
        assert_eq!(blocks.layer_len(Layer::Placement), 1);
        assert_eq!(blocks.shadows.len(), 2);
    }

    #[test]
    fn test_unexplored_tiles_become_fog() {
        let mut grid = Grid::new(4, 4);
        grid.get_mut(0, 0).unwrap().explored = false;
        grid.set_block(0, 0, Block::new(BlockKind::Core, Team::Crux));

        let mut blocks = GridBlockRenderer::new();
        blocks.process_blocks(&camera_over(&grid), &grid);

        assert_eq!(blocks.fog_len(), 1);
        assert_eq!(blocks.layer_len(Layer::Block), 0);
    }

    #[test]
    fn test_offscreen_tiles_are_culled() {
        let grid = Grid::new(64, 64);
        let mut camera = Camera::new(TILE_SIZE * 2.0, TILE_SIZE * 2.0);
        camera.position = Vec2::new(TILE_SIZE * 10.0, TILE_SIZE * 10.0);

        let log = CallLog::default();
        let mut draw = RecordingDraw::new(log.clone());
        GridBlockRenderer::new().draw_floor(&mut draw, &camera, &grid);

        let fills = log.calls().iter().filter(|c| c.starts_with("draw.rect(white")).count();
        assert!(fills > 0 && fills < 64);
    }

    #[test]
    fn test_walls_skip_floor() {
        let mut grid = Grid::new(2, 1);
        grid.get_mut(0, 0).unwrap().wall = true;
        let log = CallLog::default();
        let mut draw = RecordingDraw::new(log.clone());
        let mut blocks = GridBlockRenderer::new();
        blocks.draw_floor(&mut draw, &camera_over(&grid), &grid);
        let floor = log.calls().iter().filter(|c| c.starts_with("draw.rect(white")).count();
        assert_eq!(floor, 1);

        log.clear();
        blocks.process_blocks(&camera_over(&grid), &grid);
        blocks.draw_wall_layer(&mut draw);
        let walls = log.calls().iter().filter(|c| c.starts_with("draw.rect(white")).count();
        assert_eq!(walls, 1);
    }

    #[test]
    fn test_dispose_clears_gathered_blocks() {
        let mut grid = Grid::new(4, 4);
        grid.set_block(1, 1, Block::new(BlockKind::Core, Team::Sharded));
        let mut blocks = GridBlockRenderer::new();
        blocks.process_blocks(&camera_over(&grid), &grid);
        blocks.dispose();
        assert_eq!(blocks.layer_len(Layer::Block), 0);
    }
}
