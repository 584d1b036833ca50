//! Camera-related constants.

/// Default target scale, in base units (pixels per world unit)
pub const CAMERA_DEFAULT_SCALE: f32 = 4.0;
/// Lower scale bound, in base units
pub const CAMERA_MIN_SCALE: f32 = 1.5;
/// Upper scale bound, in base units (rounded after scaling)
pub const CAMERA_MAX_SCALE: f32 = 6.0;
/// Smallest scale reached at the start of a landing sequence, in base units
pub const CAMERA_LANDING_MIN_SCALE: f32 = 0.01;
/// Per-tick smoothing factor toward the target scale
pub const CAMERA_SCALE_SMOOTHING: f32 = 0.1;
/// Scale change per mouse wheel line
pub const CAMERA_SCROLL_STEP: f32 = 0.5;
