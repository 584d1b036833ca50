//! Sandbox simulation systems.

use glam::Vec2;
use hecs::World;
use rand::Rng;

use crate::components::{Dead, Player, Position, Unit, Velocity};
use crate::constants::TILE_SIZE;
use crate::grid::Grid;
use crate::items::{Cargo, CargoCarrier, Item};
use crate::world::PlayerInfo;

const ITEMS: [Item; 7] = [
    Item::Copper,
    Item::Lead,
    Item::Graphite,
    Item::Silicon,
    Item::Titanium,
    Item::Thorium,
    Item::Scrap,
];

/// Move units by their velocity, bouncing off the grid edges
pub fn move_units(world: &mut World, grid: &Grid, delta: f32) {
    puffin::profile_function!();
    let max = Vec2::new(grid.width as f32 * TILE_SIZE, grid.height as f32 * TILE_SIZE);
    for (_id, (pos, vel)) in world.query_mut::<(&mut Position, &mut Velocity)>().without::<&Dead>() {
        pos.0 += vel.0 * delta;
        if pos.0.x < 0.0 || pos.0.x > max.x {
            vel.0.x = -vel.0.x;
            pos.0.x = pos.0.x.clamp(0.0, max.x);
        }
        if pos.0.y < 0.0 || pos.0.y > max.y {
            vel.0.y = -vel.0.y;
            pos.0.y = pos.0.y.clamp(0.0, max.y);
        }
    }
}

/// Units occasionally pick up an item; a full stack is dropped instead
pub fn gather_cargo(world: &mut World, rng: &mut impl Rng, chance: f64) {
    for (_id, cargo) in world.query_mut::<&mut Cargo>().without::<&Dead>() {
        if !rng.gen_bool(chance) {
            continue;
        }
        let item = match cargo.item() {
            Some(held) if cargo.has_item() && !rng.gen_bool(0.1) => held,
            _ => ITEMS[rng.gen_range(0..ITEMS.len())],
        };
        if cargo.accepts_item(item) {
            cargo.add_item(item);
        } else {
            cargo.clear_item();
        }
    }
}

/// Advance construction on every block being built. Returns how many finished.
pub fn advance_construction(grid: &mut Grid, step: f32) -> usize {
    let building: Vec<(i32, i32)> = grid
        .iter_bounds((0, grid.width as i32 - 1, 0, grid.height as i32 - 1))
        .filter(|(_, _, tile)| tile.block.is_some_and(|b| b.build_progress.is_some()))
        .map(|(x, y, _)| (x, y))
        .collect();

    building
        .into_iter()
        .filter(|&(x, y)| grid.advance_construction(x, y, step))
        .count()
}

/// Snapshot named players for the renderer
pub fn collect_players(world: &World, out: &mut Vec<PlayerInfo>) {
    out.clear();
    for (id, (player, pos)) in world.query::<(&Player, &Position)>().iter() {
        out.push(PlayerInfo {
            name: player.name.clone(),
            position: pos.0,
            dead: world.satisfies::<&Dead>(id).unwrap_or(false),
        });
    }
}

/// Units in one draw layer, for the layer hooks
pub fn units_in_layer(world: &World, flying: bool) -> Vec<(Vec2, Unit, Option<Cargo>)> {
    world
        .query::<(&Position, &Unit, Option<&Cargo>)>()
        .without::<&Dead>()
        .iter()
        .filter(|(_, (_, unit, _))| unit.flying == flying)
        .map(|(_, (pos, unit, cargo))| (pos.0, *unit, cargo.copied()))
        .collect()
}
