//! Client constants organized by domain.
//!
//! Constants are split into submodules by domain for easier navigation.

mod camera;
mod effects;
mod ui;

pub use camera::*;
pub use effects::*;
pub use ui::*;
