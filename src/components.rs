use glam::Vec2;

use crate::tile::Team;

/// Position component - world coordinates
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Velocity component - world units per tick
#[derive(Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Unit component - a mobile body drawn in the ground or flying layers
#[derive(Debug, Clone, Copy)]
pub struct Unit {
    pub team: Team,
    pub flying: bool,
    /// Hitbox edge length in world units
    pub size: f32,
}

impl Unit {
    pub fn ground(team: Team, size: f32) -> Self {
        Self {
            team,
            flying: false,
            size,
        }
    }

    pub fn air(team: Team, size: f32) -> Self {
        Self {
            team,
            flying: true,
            size,
        }
    }
}

/// Player component - a named controller attached to a unit
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
}

/// Local player marker component
#[derive(Debug, Clone, Copy)]
pub struct LocalPlayer;

/// Dead marker component
#[derive(Debug, Clone, Copy)]
pub struct Dead;
