use glam::{Mat4, Vec2};

/// World-space camera: a center point and the visible extent in world units.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec2,
    /// Visible width in world units
    pub width: f32,
    /// Visible height in world units
    pub height: f32,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            width,
            height,
        }
    }

    /// Recompute the visible extent for a window size and a pixels-per-unit scale.
    pub fn resize(&mut self, screen_width: f32, screen_height: f32, scale: f32) {
        self.width = screen_width / scale;
        self.height = screen_height / scale;
    }

    pub fn has_nan_position(&self) -> bool {
        self.position.x.is_nan() || self.position.y.is_nan()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;

        let left = self.position.x - half_width;
        let right = self.position.x + half_width;
        let bottom = self.position.y - half_height;
        let top = self.position.y + half_height;

        Mat4::orthographic_rh(left, right, bottom, top, -1.0, 1.0)
    }

    /// Convert window pixel coordinates (origin top-left) to world coordinates.
    pub fn screen_to_world(&self, screen_x: f32, screen_y: f32, screen_width: f32, screen_height: f32) -> Vec2 {
        let ndc_x = (screen_x / screen_width) * 2.0 - 1.0;
        let ndc_y = 1.0 - (screen_y / screen_height) * 2.0;

        Vec2::new(
            self.position.x + ndc_x * self.width / 2.0,
            self.position.y + ndc_y * self.height / 2.0,
        )
    }

    /// True if `point` lies inside the view, shrunk by `margin` world units on each side.
    pub fn contains(&self, point: Vec2, margin: f32) -> bool {
        let half = Vec2::new(self.width / 2.0 - margin, self.height / 2.0 - margin);
        let d = (point - self.position).abs();
        d.x <= half.x && d.y <= half.y
    }

    /// Tile index bounds covering the view, padded by one tile.
    pub fn visible_tile_bounds(&self, tile_size: f32) -> (i32, i32, i32, i32) {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;

        let min_x = ((self.position.x - half_width) / tile_size).floor() as i32 - 1;
        let max_x = ((self.position.x + half_width) / tile_size).ceil() as i32 + 1;
        let min_y = ((self.position.y - half_height) / tile_size).floor() as i32 - 1;
        let max_y = ((self.position.y + half_height) / tile_size).ceil() as i32 + 1;

        (min_x, max_x, min_y, max_y)
    }
}
