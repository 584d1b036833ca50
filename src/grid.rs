use crate::constants::TILE_SIZE;
use crate::tile::{Block, Floor, Tile};
use glam::Vec2;

pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Tile>,
    /// Bumped on every structural change, so caches know when to rebuild
    revision: u64,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Floor::Stone)
    }

    pub fn filled(width: usize, height: usize, floor: Floor) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::new(floor); width * height],
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    /// Mutable access; marks the grid as changed.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        let i = self.index(x, y)?;
        self.revision += 1;
        Some(&mut self.tiles[i])
    }

    /// Add `step` to the construction progress of the block on a tile.
    /// Progress alone is not a structural change; only completion bumps the
    /// revision. Returns true when the block finished.
    pub fn advance_construction(&mut self, x: i32, y: i32, step: f32) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        let Some(block) = self.tiles[i].block.as_mut() else {
            return false;
        };
        let Some(progress) = block.build_progress else {
            return false;
        };
        let progress = progress + step;
        if progress >= 1.0 {
            block.build_progress = None;
            self.revision += 1;
            true
        } else {
            block.build_progress = Some(progress);
            false
        }
    }

    pub fn set_block(&mut self, x: i32, y: i32, block: Block) {
        if let Some(tile) = self.get_mut(x, y) {
            tile.block = Some(block);
            tile.rubble = false;
        }
    }

    /// Remove the block on a tile, leaving rubble behind.
    pub fn destroy_block(&mut self, x: i32, y: i32) {
        if let Some(tile) = self.get_mut(x, y) {
            if tile.block.take().is_some() {
                tile.rubble = true;
            }
        }
    }

    /// World position of a tile's center.
    pub fn world_center(x: i32, y: i32) -> Vec2 {
        Vec2::new((x as f32 + 0.5) * TILE_SIZE, (y as f32 + 0.5) * TILE_SIZE)
    }

    /// Iterate `(x, y, tile)` over the inclusive bounds, clipped to the grid.
    pub fn iter_bounds(
        &self,
        (min_x, max_x, min_y, max_y): (i32, i32, i32, i32),
    ) -> impl Iterator<Item = (i32, i32, &Tile)> + '_ {
        let min_x = min_x.max(0);
        let min_y = min_y.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let max_y = max_y.min(self.height as i32 - 1);
        (min_y..=max_y).flat_map(move |y| {
            (min_x..=max_x).filter_map(move |x| self.get(x, y).map(|tile| (x, y, tile)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{BlockKind, Team};

    #[test]
    fn test_out_of_bounds_is_none() {
        let grid = Grid::new(4, 4);
        assert!(grid.get(-1, 0).is_none());
        assert!(grid.get(4, 0).is_none());
        assert!(grid.get(3, 3).is_some());
    }

    #[test]
    fn test_destroy_leaves_rubble() {
        let mut grid = Grid::new(4, 4);
        grid.set_block(1, 1, Block::new(BlockKind::Conveyor, Team::Sharded));
        grid.destroy_block(1, 1);
        let tile = grid.get(1, 1).unwrap();
        assert!(tile.block.is_none());
        assert!(tile.rubble);
    }

    #[test]
    fn test_destroy_empty_tile_leaves_no_rubble() {
        let mut grid = Grid::new(4, 4);
        grid.destroy_block(2, 2);
        assert!(!grid.get(2, 2).unwrap().rubble);
    }

    #[test]
    fn test_revision_bumps_on_change() {
        let mut grid = Grid::new(4, 4);
        let before = grid.revision();
        grid.set_block(0, 0, Block::new(BlockKind::Lamp, Team::Sharded));
        assert!(grid.revision() > before);
    }

    #[test]
    fn test_construction_progress_keeps_revision() {
        let mut grid = Grid::new(4, 4);
        grid.set_block(1, 2, Block::under_construction(BlockKind::Turret, Team::Sharded, 0.0));
        let before = grid.revision();

        assert!(!grid.advance_construction(1, 2, 0.5));
        assert_eq!(grid.revision(), before);
        assert_eq!(grid.get(1, 2).unwrap().block.unwrap().build_progress, Some(0.5));

        assert!(grid.advance_construction(1, 2, 0.5));
        assert!(grid.revision() > before);
        assert_eq!(grid.get(1, 2).unwrap().block.unwrap().build_progress, None);
    }

    #[test]
    fn test_construction_ignores_built_and_empty_tiles() {
        let mut grid = Grid::new(4, 4);
        grid.set_block(0, 0, Block::new(BlockKind::Lamp, Team::Sharded));
        let before = grid.revision();
        assert!(!grid.advance_construction(0, 0, 1.0));
        assert!(!grid.advance_construction(3, 3, 1.0));
        assert!(!grid.advance_construction(-1, 9, 1.0));
        assert_eq!(grid.revision(), before);
    }

    #[test]
    fn test_iter_bounds_clips() {
        let grid = Grid::new(4, 4);
        assert_eq!(grid.iter_bounds((-5, 1, -5, 0)).count(), 2);
        assert_eq!(grid.iter_bounds((0, 10, 0, 10)).count(), 16);
    }
}
