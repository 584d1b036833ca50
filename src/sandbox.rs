//! Self-contained demo world for the desktop client.
//!
//! Owns a grid and a hecs world of units, and exposes them to the renderer
//! through [`WorldView`]. Nothing here is networked; it exists so every draw
//! stage has something to show.

use glam::Vec2;
use hecs::{Entity, EntityBuilder, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::{Dead, LocalPlayer, Player, Position, Unit, Velocity};
use crate::constants::TILE_SIZE;
use crate::draw::{Color, Draw, Region};
use crate::grid::Grid;
use crate::items::{update_carriers, Cargo, CargoCarrier};
use crate::systems;
use crate::tile::{Block, BlockKind, Floor, Team};
use crate::world::{BuildPlan, CoreInfo, GameState, PlayerInfo, RenderLayer, WorldView};

pub const SANDBOX_WIDTH: usize = 64;
pub const SANDBOX_HEIGHT: usize = 48;

/// Construction progress gained per tick
const BUILD_SPEED: f32 = 0.004;
/// Per-tick chance that a unit picks up an item
const GATHER_CHANCE: f64 = 0.02;
/// Capacities cycled by [`Sandbox::upgrade_capacity`]; the drop back to the
/// first entry exercises the per-tick re-clamp.
const CAPACITY_STEPS: [i32; 3] = [10, 20, 30];
const SHADOW_OFFSET: f32 = 1.5;

const CORE_ICON: Region = Region::new("core-shard", 24.0, 24.0);
const UNIT_REGION: Region = Region::new("unit", 8.0, 8.0);
const CARGO_REGION: Region = Region::new("item", 4.0, 4.0);

pub struct Sandbox {
    grid: Grid,
    world: World,
    state: GameState,
    local: Entity,
    players: Vec<PlayerInfo>,
    plans: Vec<BuildPlan>,
    cores: Vec<(Vec2, Team)>,
    building: bool,
    lighting: bool,
    capacity_step: usize,
    rng: StdRng,
    elapsed: f32,
}

impl Sandbox {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let (grid, cores) = generate_grid(&mut rng);
        let mut world = World::new();

        let spawn = cores.first().map(|(p, _)| *p + Vec2::new(3.0 * TILE_SIZE, 0.0)).unwrap_or(Vec2::ZERO);
        let local = world.spawn((
            Position(spawn),
            Unit::ground(Team::Sharded, 8.0),
            Cargo::new(CAPACITY_STEPS[0]),
            Player { name: "you".to_string() },
            LocalPlayer,
        ));

        let max = Vec2::new(SANDBOX_WIDTH as f32, SANDBOX_HEIGHT as f32) * TILE_SIZE;
        for i in 0..12 {
            let pos = Vec2::new(rng.gen_range(0.0..max.x), rng.gen_range(0.0..max.y));
            let vel = Vec2::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5));
            let team = if i % 3 == 0 { Team::Crux } else { Team::Sharded };
            let unit = if i % 4 == 0 {
                Unit::air(team, 6.0)
            } else {
                Unit::ground(team, 8.0)
            };
            let mut builder = EntityBuilder::new();
            builder.add_bundle((Position(pos), Velocity(vel), unit, Cargo::new(CAPACITY_STEPS[0])));
            if i < 3 {
                builder.add(Player { name: format!("ally-{i}") });
            }
            world.spawn(builder.build());
        }
        // A fallen player whose name tag is hidden
        world.spawn((
            Position(max / 2.0),
            Unit::ground(Team::Sharded, 8.0),
            Player { name: "fallen".to_string() },
            Dead,
        ));

        let plans = vec![
            BuildPlan { x: 20, y: 10, kind: BlockKind::Turret, breaking: false },
            BuildPlan { x: 21, y: 10, kind: BlockKind::PowerNode, breaking: false },
            BuildPlan { x: 12, y: 14, kind: BlockKind::Conveyor, breaking: true },
        ];

        let mut sandbox = Self {
            grid,
            world,
            state: GameState::Menu,
            local,
            players: Vec::new(),
            plans,
            cores,
            building: false,
            lighting: true,
            capacity_step: 0,
            rng,
            elapsed: 0.0,
        };
        systems::collect_players(&sandbox.world, &mut sandbox.players);
        tracing::info!(
            width = SANDBOX_WIDTH,
            height = SANDBOX_HEIGHT,
            units = sandbox.world.len(),
            "sandbox generated"
        );
        sandbox
    }

    /// Advance the simulation by `delta` ticks.
    pub fn tick(&mut self, delta: f32) {
        puffin::profile_function!();
        if self.state != GameState::Playing {
            return;
        }
        self.elapsed += delta;
        systems::move_units(&mut self.world, &self.grid, delta);
        systems::gather_cargo(&mut self.world, &mut self.rng, GATHER_CHANCE);
        systems::advance_construction(&mut self.grid, BUILD_SPEED * delta);
        update_carriers::<Cargo>(&mut self.world);
        systems::collect_players(&self.world, &mut self.players);
    }

    pub fn set_state(&mut self, state: GameState) {
        if self.state != state {
            tracing::info!(from = ?self.state, to = ?state, "game state changed");
            self.state = state;
        }
    }

    pub fn toggle_state(&mut self) -> GameState {
        let next = match self.state {
            GameState::Menu => GameState::Playing,
            GameState::Playing => GameState::Menu,
        };
        self.set_state(next);
        next
    }

    pub fn set_building(&mut self, building: bool) {
        self.building = building;
    }

    pub fn set_lighting(&mut self, lighting: bool) {
        self.lighting = lighting;
    }

    /// Move the local player by `offset` world units, clamped to the grid.
    pub fn move_player(&mut self, offset: Vec2) {
        let max = Vec2::new(self.grid.width as f32, self.grid.height as f32) * TILE_SIZE;
        if let Ok(mut pos) = self.world.get::<&mut Position>(self.local) {
            pos.0 = (pos.0 + offset).clamp(Vec2::ZERO, max);
        }
    }

    /// Cycle every carrier's capacity to the next step. Returns the new capacity.
    pub fn upgrade_capacity(&mut self) -> i32 {
        self.capacity_step = (self.capacity_step + 1) % CAPACITY_STEPS.len();
        let capacity = CAPACITY_STEPS[self.capacity_step];
        for (_id, cargo) in self.world.query_mut::<&mut Cargo>() {
            cargo.capacity = capacity;
        }
        tracing::debug!(capacity, "cargo capacity changed");
        capacity
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn draw_units(&self, draw: &mut dyn Draw, flying: bool, shadows: bool) {
        for (pos, unit, cargo) in systems::units_in_layer(&self.world, flying) {
            let size = unit.size * if flying { 1.0 } else { 0.9 };
            if shadows {
                let offset = if flying { SHADOW_OFFSET * 3.0 } else { SHADOW_OFFSET };
                draw.color(Color::SHADOW);
                draw.rect(&Region::CIRCLE_SHADOW, pos.x - offset, pos.y - offset, size * 1.4, size * 1.4, 0.0);
                continue;
            }
            draw.color(unit.team.color());
            draw.rect(&UNIT_REGION, pos.x, pos.y, size, size, if flying { 45.0 } else { 0.0 });
            if let Some(cargo) = cargo.filter(|c| c.has_item()) {
                let fill = cargo.slot.amount as f32 / cargo.capacity.max(1) as f32;
                draw.color(Color::ACCENT);
                draw.rect(&CARGO_REGION, pos.x, pos.y + size * 0.6, 4.0 * fill.max(0.25), 2.0, 0.0);
            }
        }
        draw.reset();
    }
}

/// Build the demo map. Returns the grid and the core positions.
fn generate_grid(rng: &mut StdRng) -> (Grid, Vec<(Vec2, Team)>) {
    puffin::profile_function!();
    let mut grid = Grid::new(SANDBOX_WIDTH, SANDBOX_HEIGHT);
    let (w, h) = (SANDBOX_WIDTH as i32, SANDBOX_HEIGHT as i32);

    for y in 0..h {
        for x in 0..w {
            let Some(tile) = grid.get_mut(x, y) else {
                continue;
            };
            tile.floor = match rng.gen_range(0..10) {
                0 => Floor::Sand,
                1 | 2 => Floor::Grass,
                3 if x > w / 2 => Floor::Water,
                _ => Floor::Stone,
            };
            tile.wall = x == 0 || y == 0 || x == w - 1 || y == h - 1 || rng.gen_bool(0.03);
            // Unexplored corner
            tile.explored = !(x > w - 12 && y > h - 10);
        }
    }

    let cores = vec![(8, 8, Team::Sharded), (w - 20, h - 16, Team::Crux)];
    for &(x, y, team) in &cores {
        for dy in -1..=1 {
            for dx in -1..=1 {
                if let Some(tile) = grid.get_mut(x + dx, y + dy) {
                    tile.wall = false;
                    tile.floor = Floor::Metal;
                }
            }
        }
        grid.set_block(x, y, Block::new(BlockKind::Core, team));
    }

    for x in 10..30 {
        if let Some(tile) = grid.get_mut(x, 12) {
            tile.wall = false;
        }
        grid.set_block(x, 12, Block::new(BlockKind::Conveyor, Team::Sharded));
    }
    for (x, y, kind) in [
        (14, 16, BlockKind::Turret),
        (22, 16, BlockKind::Turret),
        (18, 18, BlockKind::PowerNode),
        (26, 8, BlockKind::PowerNode),
        (16, 6, BlockKind::Lamp),
        (30, 20, BlockKind::Lamp),
        (w - 14, h - 20, BlockKind::Turret),
    ] {
        let team = if x > w / 2 { Team::Crux } else { Team::Sharded };
        if let Some(tile) = grid.get_mut(x, y) {
            tile.wall = false;
        }
        grid.set_block(x, y, Block::new(kind, team));
    }

    grid.set_block(20, 10, Block::under_construction(BlockKind::Turret, Team::Sharded, 0.0));
    grid.set_block(12, 14, Block::new(BlockKind::Conveyor, Team::Sharded));
    grid.set_block(34, 14, Block::new(BlockKind::Turret, Team::Crux));
    grid.destroy_block(34, 14);

    let cores = cores.into_iter().map(|(x, y, team)| (Grid::world_center(x, y), team)).collect();
    (grid, cores)
}

impl WorldView for Sandbox {
    fn state(&self) -> GameState {
        self.state
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn player_position(&self) -> Vec2 {
        self.world.get::<&Position>(self.local).map(|p| p.0).unwrap_or(Vec2::ZERO)
    }

    fn closest_core(&self) -> Option<CoreInfo> {
        let player = self.player_position();
        self.cores
            .iter()
            .filter(|(_, team)| *team == Team::Sharded)
            .min_by(|(a, _), (b, _)| a.distance_squared(player).total_cmp(&b.distance_squared(player)))
            .map(|&(position, team)| CoreInfo {
                position,
                icon: CORE_ICON,
                team,
            })
    }

    fn players(&self) -> &[PlayerInfo] {
        &self.players
    }

    fn is_building(&self) -> bool {
        self.building
    }

    fn build_plans(&self) -> &[BuildPlan] {
        &self.plans
    }

    fn lighting(&self) -> bool {
        self.lighting
    }

    fn render_layer(&self, layer: RenderLayer, draw: &mut dyn Draw) {
        match layer {
            RenderLayer::GroundShadows => self.draw_units(draw, false, true),
            RenderLayer::Ground => self.draw_units(draw, false, false),
            RenderLayer::FlyingShadows => self.draw_units(draw, true, true),
            RenderLayer::Flying => self.draw_units(draw, true, false),
            RenderLayer::Floor | RenderLayer::Bullets | RenderLayer::Effects => {}
        }
    }
}
