use crate::draw::Color;

/// Ground type of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Floor {
    Stone,
    Sand,
    Grass,
    Water,
    Metal,
}

impl Floor {
    pub fn color(&self) -> Color {
        match self {
            Floor::Stone => Color::rgb(0.33, 0.33, 0.36),
            Floor::Sand => Color::rgb(0.69, 0.6, 0.42),
            Floor::Grass => Color::rgb(0.3, 0.45, 0.25),
            Floor::Water => Color::rgb(0.2, 0.35, 0.6),
            Floor::Metal => Color::rgb(0.42, 0.44, 0.5),
        }
    }
}

/// Draw layer a block (or part of a block) renders on, in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Block,
    /// Blocks under construction, drawn with the build shader
    Placement,
    Overlay,
    Turret,
    Power,
    Lights,
}

impl Layer {
    pub const ALL: [Layer; 6] = [
        Layer::Block,
        Layer::Placement,
        Layer::Overlay,
        Layer::Turret,
        Layer::Power,
        Layer::Lights,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Team a block or unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Sharded,
    Crux,
}

impl Team {
    pub fn color(&self) -> Color {
        match self {
            Team::Sharded => Color::rgb(1.0, 0.83, 0.5),
            Team::Crux => Color::rgb(0.95, 0.33, 0.33),
        }
    }
}

/// Kinds of placeable blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Conveyor,
    Core,
    Turret,
    PowerNode,
    Lamp,
}

impl BlockKind {
    /// Layers this block draws on once built
    pub fn layers(&self) -> &'static [Layer] {
        match self {
            BlockKind::Conveyor => &[Layer::Block, Layer::Overlay],
            BlockKind::Core => &[Layer::Block, Layer::Overlay],
            BlockKind::Turret => &[Layer::Block, Layer::Turret],
            BlockKind::PowerNode => &[Layer::Block, Layer::Power],
            BlockKind::Lamp => &[Layer::Block, Layer::Lights],
        }
    }

    pub fn color(&self) -> Color {
        match self {
            BlockKind::Conveyor => Color::rgb(0.5, 0.5, 0.55),
            BlockKind::Core => Color::rgb(0.8, 0.7, 0.45),
            BlockKind::Turret => Color::rgb(0.6, 0.6, 0.65),
            BlockKind::PowerNode => Color::rgb(0.95, 0.85, 0.4),
            BlockKind::Lamp => Color::rgb(0.95, 0.95, 0.8),
        }
    }

    /// Light radius in tiles, for blocks that emit light
    pub fn light_radius(&self) -> Option<f32> {
        match self {
            BlockKind::Lamp => Some(6.0),
            BlockKind::Core => Some(4.0),
            _ => None,
        }
    }
}

/// A block placed on a tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub team: Team,
    /// Construction progress 0..1 while being built
    pub build_progress: Option<f32>,
}

impl Block {
    pub fn new(kind: BlockKind, team: Team) -> Self {
        Self {
            kind,
            team,
            build_progress: None,
        }
    }

    pub fn under_construction(kind: BlockKind, team: Team, progress: f32) -> Self {
        Self {
            kind,
            team,
            build_progress: Some(progress.clamp(0.0, 1.0)),
        }
    }

    pub fn layers(&self) -> &'static [Layer] {
        if self.build_progress.is_some() {
            &[Layer::Placement]
        } else {
            self.kind.layers()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tile {
    pub floor: Floor,
    /// Static terrain wall, drawn from the wall cache layer
    pub wall: bool,
    pub block: Option<Block>,
    pub explored: bool,
    /// Rubble left by a destroyed block
    pub rubble: bool,
}

impl Tile {
    pub fn new(floor: Floor) -> Self {
        Self {
            floor,
            wall: false,
            block: None,
            explored: true,
            rubble: false,
        }
    }

    /// Minimap color
    pub fn color(&self) -> Color {
        if self.wall {
            Color::rgb(0.15, 0.15, 0.17)
        } else if let Some(block) = self.block {
            block.team.color()
        } else {
            self.floor.color()
        }
    }
}
