//! Window and frame timing constants.

/// Default window width
pub const WINDOW_DEFAULT_WIDTH: u32 = 1280;
/// Default window height
pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;

/// Simulation ticks per second; frame deltas are expressed in ticks
pub const TICKS_PER_SECOND: f32 = 60.0;
/// Cap on a single frame's delta, in ticks, to avoid jumps after stalls
pub const MAX_FRAME_DELTA: f32 = 4.0;

/// Size of one world tile, in world units
pub const TILE_SIZE: f32 = 8.0;

/// Settings file read at startup
pub const SETTINGS_FILE: &str = "settings.json";
