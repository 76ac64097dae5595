//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Index of a player in the game roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerIndex(pub u32);

impl std::fmt::Display for PlayerIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Map position (column, row)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MapPos {
    pub x: i32,
    pub y: i32,
}

impl MapPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Number of map steps between two positions
    pub fn distance(&self, other: &Self) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }
}

impl std::fmt::Display for MapPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Mineable resources a geologist can discover
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mineral {
    Coal,
    Iron,
    Gold,
    Stone,
}

impl Mineral {
    pub const ALL: [Mineral; 4] = [Mineral::Coal, Mineral::Iron, Mineral::Gold, Mineral::Stone];

    /// The mine that extracts this mineral
    pub fn mine_type(self) -> BuildingType {
        match self {
            Mineral::Gold => BuildingType::GoldMine,
            Mineral::Iron => BuildingType::IronMine,
            Mineral::Coal => BuildingType::CoalMine,
            Mineral::Stone => BuildingType::StoneMine,
        }
    }
}

/// Building kinds known to the AI
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    Castle,
    Hut,
    Tower,
    Fortress,
    Stock,
    Fisher,
    Lumberjack,
    Boatbuilder,
    Stonecutter,
    StoneMine,
    CoalMine,
    IronMine,
    GoldMine,
    Forester,
    PigFarm,
    Farm,
    Butcher,
    Mill,
    Baker,
    Sawmill,
    SteelSmelter,
    ToolMaker,
    WeaponSmith,
    GoldSmelter,
}

impl BuildingType {
    /// Garrisoned buildings. The castle only counts when `include_castle` is set.
    pub fn is_military(self, include_castle: bool) -> bool {
        match self {
            BuildingType::Hut | BuildingType::Tower | BuildingType::Fortress => true,
            BuildingType::Castle => include_castle,
            _ => false,
        }
    }

    pub fn is_mine(self) -> bool {
        matches!(
            self,
            BuildingType::StoneMine
                | BuildingType::CoalMine
                | BuildingType::IronMine
                | BuildingType::GoldMine
        )
    }
}

/// Serf professions relevant to AI decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerfType {
    Generic,
    Transporter,
    Geologist,
    Knight,
    Other,
}

/// Coarse serf activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerfState {
    /// Waiting inside an inventory, free to take a job
    IdleInStock,
    /// Out in the world doing something
    Busy,
}

/// Terrain of one map triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Water0,
    Water1,
    Water2,
    Water3,
    Grass0,
    Grass1,
    Grass2,
    Grass3,
    Desert0,
    Desert1,
    Desert2,
    Tundra0,
    Tundra1,
    Tundra2,
    Snow0,
    Snow1,
}

impl Terrain {
    /// Mountain terrain where minerals may be found
    pub fn is_mountain(self) -> bool {
        (Terrain::Tundra0..=Terrain::Tundra2).contains(&self)
    }
}
