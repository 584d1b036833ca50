//! Screen effect parameters.

/// Lifetime of the core landing effect, in ticks
pub const CORE_LAND_LIFETIME: f32 = 120.0;
/// Number of burst lines drawn around a landing core
pub const LANDING_BURST_LINES: usize = 100;
/// Seed for the landing burst pattern (stable across frames)
pub const LANDING_BURST_SEED: u64 = 1;
/// Final rotation of the landing core icon, in degrees
pub const LANDING_ICON_ROTATION: f32 = 135.0;

/// Damping applied to the shake offset relative to full intensity
pub const SHAKE_DAMPING: f32 = 0.75;
/// Intensity lost per tick while a shake is running
pub const SHAKE_DECAY: f32 = 0.25;
/// Upper bound on accumulated shake intensity
pub const SHAKE_MAX_INTENSITY: f32 = 100.0;
/// Screenshake setting value that maps to a 1.0 multiplier
pub const SHAKE_SETTING_UNIT: f32 = 4.0;

/// Fraction of the window size used for bloom blur targets
pub const BLOOM_DOWNSCALE: u32 = 4;
/// Luminance above which pixels contribute to bloom
pub const BLOOM_THRESHOLD: f32 = 0.6;
/// Blur passes per bloom render
pub const BLOOM_BLUR_PASSES: usize = 2;

/// Pixel size used by the pixelation path
pub const PIXELATE_SCALE: u32 = 4;
