//! Game world facade consumed by the AI
//!
//! The AI never owns or mutates world entities directly. It reads
//! snapshots through [`GameWorld`] and changes the world only through the
//! command methods, which may refuse.

pub mod sandbox;
pub mod search;

pub use sandbox::SandboxWorld;
pub use search::{find_any, find_nearest};

use serde::{Deserialize, Serialize};

use crate::core::types::{BuildingType, MapPos, PlayerIndex, SerfState, SerfType, Terrain};

/// Per-player statistics visible to every AI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub index: PlayerIndex,
    pub is_ai: bool,
    /// Total military score (knights weighted by level)
    pub military_score: u32,
    /// Overall game score
    pub score: u32,
    pub total_knights: u32,
    /// Knight occupation setting per threat level.
    /// High nibble: maximum garrison, low nibble: minimum garrison.
    pub knight_occupation: [u8; 4],
}

impl PlayerStats {
    /// Maximum garrison bucket at the given threat level
    pub fn max_occupation(&self, threat_level: usize) -> u8 {
        (self.knight_occupation[threat_level] >> 4) & 0x7
    }

    /// Minimum garrison bucket at the given threat level
    pub fn min_occupation(&self, threat_level: usize) -> u8 {
        self.knight_occupation[threat_level] & 0x7
    }
}

/// Snapshot of a building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingInfo {
    pub owner: PlayerIndex,
    pub kind: BuildingType,
    pub position: MapPos,
    pub knight_count: u32,
    pub threat_level: u8,
    /// Military building is operational (garrisoned)
    pub active: bool,
    /// Construction finished
    pub done: bool,
    pub burning: bool,
    /// The building's worker or first knight has arrived
    pub has_serf: bool,
}

/// Snapshot of a serf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerfInfo {
    pub kind: SerfType,
    pub state: SerfState,
}

/// Read and command access to the running game
pub trait GameWorld {
    /// Number of player slots in the game
    fn player_count(&self) -> u32;

    /// Statistics for a player, None if the slot is empty
    fn player_stats(&self, player: PlayerIndex) -> Option<PlayerStats>;

    fn buildings_of(&self, player: PlayerIndex) -> Vec<BuildingInfo>;

    fn building_at(&self, pos: MapPos) -> Option<BuildingInfo>;

    fn serfs_of(&self, player: PlayerIndex) -> Vec<SerfInfo>;

    /// Knights `player` could commit against the building at `target`
    fn knights_available_for_attack(&self, player: PlayerIndex, target: MapPos) -> u32;

    /// Buildings of `kind` that `player` has started but not finished
    fn incomplete_building_count(&self, player: PlayerIndex, kind: BuildingType) -> u32;

    /// Terrain of the upward triangle at `pos`
    fn terrain_up(&self, pos: MapPos) -> Terrain;

    /// Terrain of the downward triangle at `pos`
    fn terrain_down(&self, pos: MapPos) -> Terrain;

    fn has_flag(&self, pos: MapPos) -> bool;

    /// Positions within `radius` steps of `center`, center first,
    /// then by growing distance
    fn spiral(&self, center: MapPos, radius: u32) -> Vec<MapPos>;

    /// Whether `player` may start a building of `kind` at `pos`
    fn can_build(&self, player: PlayerIndex, pos: MapPos, kind: BuildingType) -> bool;

    /// Elapsed game time in milliseconds
    fn game_time(&self) -> u64;

    /// Next value of the shared, seeded game random source
    fn random_int(&mut self) -> u32;

    // === COMMANDS ===

    /// Send up to `knights` knights against the building at `target`
    fn launch_attack(&mut self, player: PlayerIndex, target: MapPos, knights: u32) -> bool;

    fn build_flag(&mut self, player: PlayerIndex, pos: MapPos) -> bool;

    fn build_building(&mut self, player: PlayerIndex, pos: MapPos, kind: BuildingType) -> bool;

    /// Dispatch a geologist (training one if needed) to the flag at `flag_pos`
    fn send_geologist(&mut self, player: PlayerIndex, flag_pos: MapPos) -> bool;
}
