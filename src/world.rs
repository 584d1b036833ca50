//! Read-only view of game state consumed by the renderer each tick.

use crate::draw::{Draw, Region};
use crate::grid::Grid;
use crate::tile::{BlockKind, Team};
use glam::Vec2;

/// Top-level phase, owned by the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
}

/// Entity draw passes interleaved with block layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderLayer {
    Floor,
    GroundShadows,
    Ground,
    FlyingShadows,
    Flying,
    Bullets,
    Effects,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInfo {
    pub name: String,
    pub position: Vec2,
    pub dead: bool,
}

/// A queued placement or deconstruction by the local player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildPlan {
    pub x: i32,
    pub y: i32,
    pub kind: BlockKind,
    pub breaking: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreInfo {
    pub position: Vec2,
    pub icon: Region,
    pub team: Team,
}

/// Game state the renderer reads. Implemented by the entity/world system.
pub trait WorldView {
    fn state(&self) -> GameState;
    fn grid(&self) -> &Grid;
    /// Position of the local player
    fn player_position(&self) -> Vec2;
    /// Core nearest to the local player, if any
    fn closest_core(&self) -> Option<CoreInfo>;
    fn players(&self) -> &[PlayerInfo];
    /// True while the local player is in building mode
    fn is_building(&self) -> bool;
    fn build_plans(&self) -> &[BuildPlan];
    /// Whether the active rules enable the lighting pass
    fn lighting(&self) -> bool;

    /// Draw the entity group for `layer`. No-op unless an entity system hooks in.
    fn render_layer(&self, _layer: RenderLayer, _draw: &mut dyn Draw) {}
}
