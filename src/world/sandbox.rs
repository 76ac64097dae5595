//! In-memory world for tests and the skirmish runner
//!
//! Models only what the AI looks at: ownership, garrisons, flags, terrain,
//! serfs and hidden mineral deposits. Construction finishes on the next
//! [`SandboxWorld::step`], geologists report deposits around the flag they
//! were sent to.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::core::types::{
    BuildingType, MapPos, Mineral, PlayerIndex, SerfState, SerfType, Terrain,
};
use crate::world::{BuildingInfo, GameWorld, PlayerStats, SerfInfo};

/// Steps around a military building that count as its owner's territory
pub const TERRITORY_RADIUS: u32 = 8;

/// Steps around a target from which defending knights can be drawn
pub const ATTACK_REACH: u32 = 15;

/// Steps around a flag a geologist surveys
pub const SURVEY_RADIUS: u32 = 4;

/// Commands the AI issued, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldCommand {
    Attack { player: PlayerIndex, target: MapPos, knights: u32 },
    Flag { player: PlayerIndex, pos: MapPos },
    Build { player: PlayerIndex, pos: MapPos, kind: BuildingType },
    Geologist { player: PlayerIndex, flag: MapPos },
}

/// A deposit found by a surveying geologist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineralReport {
    pub mineral: Mineral,
    pub position: MapPos,
    pub large: bool,
}

#[derive(Debug, Clone, Copy)]
struct Tile {
    up: Terrain,
    down: Terrain,
}

/// Simple rectangular world
pub struct SandboxWorld {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    flags: BTreeMap<MapPos, PlayerIndex>,
    players: Vec<Option<PlayerStats>>,
    buildings: Vec<BuildingInfo>,
    serfs: BTreeMap<PlayerIndex, Vec<SerfInfo>>,
    deposits: BTreeMap<MapPos, (Mineral, bool)>,
    attack_capacity: BTreeMap<(PlayerIndex, MapPos), u32>,
    blocked_sites: BTreeSet<MapPos>,
    reject_attacks: bool,
    rejected_attacks: u32,
    scripted_randoms: VecDeque<u32>,
    rng: ChaCha8Rng,
    game_time: u64,
    commands: Vec<WorldCommand>,
    pending_surveys: Vec<(PlayerIndex, MapPos)>,
}

impl SandboxWorld {
    /// Create a grass-covered world with a deterministic random source
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        let tile = Tile {
            up: Terrain::Grass1,
            down: Terrain::Grass1,
        };
        Self {
            width: width as i32,
            height: height as i32,
            tiles: vec![tile; (width * height) as usize],
            flags: BTreeMap::new(),
            players: Vec::new(),
            buildings: Vec::new(),
            serfs: BTreeMap::new(),
            deposits: BTreeMap::new(),
            attack_capacity: BTreeMap::new(),
            blocked_sites: BTreeSet::new(),
            reject_attacks: false,
            rejected_attacks: 0,
            scripted_randoms: VecDeque::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            game_time: 0,
            commands: Vec::new(),
            pending_surveys: Vec::new(),
        }
    }

    fn in_bounds(&self, pos: MapPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn tile(&self, pos: MapPos) -> Option<&Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.tiles.get((pos.y * self.width + pos.x) as usize)
    }

    // === SETUP ===

    /// Add a player slot with neutral statistics
    pub fn add_player(&mut self, is_ai: bool) -> PlayerIndex {
        let index = PlayerIndex(self.players.len() as u32);
        self.players.push(Some(PlayerStats {
            index,
            is_ai,
            military_score: 0,
            score: 0,
            total_knights: 0,
            knight_occupation: [0x11, 0x21, 0x32, 0x53],
        }));
        index
    }

    /// Empty a player slot, as when a player is defeated
    pub fn remove_player(&mut self, player: PlayerIndex) {
        if let Some(slot) = self.players.get_mut(player.0 as usize) {
            *slot = None;
        }
        self.buildings.retain(|b| b.owner != player);
        self.serfs.remove(&player);
    }

    pub fn player_stats_mut(&mut self, player: PlayerIndex) -> Option<&mut PlayerStats> {
        self.players.get_mut(player.0 as usize)?.as_mut()
    }

    /// Set both triangles at `pos`
    pub fn set_terrain(&mut self, pos: MapPos, terrain: Terrain) {
        if self.in_bounds(pos) {
            let index = (pos.y * self.width + pos.x) as usize;
            self.tiles[index] = Tile {
                up: terrain,
                down: terrain,
            };
        }
    }

    /// Add a finished building. Military buildings start garrisoned by one
    /// knight at the highest threat level.
    pub fn add_building(&mut self, owner: PlayerIndex, kind: BuildingType, pos: MapPos) {
        let military = kind.is_military(true);
        self.buildings.retain(|b| b.position != pos);
        self.buildings.push(BuildingInfo {
            owner,
            kind,
            position: pos,
            knight_count: if military { 1 } else { 0 },
            threat_level: if military { 3 } else { 0 },
            active: military,
            done: true,
            burning: false,
            has_serf: true,
        });
    }

    pub fn building_mut(&mut self, pos: MapPos) -> Option<&mut BuildingInfo> {
        self.buildings.iter_mut().find(|b| b.position == pos)
    }

    pub fn add_serf(&mut self, owner: PlayerIndex, kind: SerfType, state: SerfState) {
        self.serfs
            .entry(owner)
            .or_default()
            .push(SerfInfo { kind, state });
    }

    pub fn add_flag(&mut self, owner: PlayerIndex, pos: MapPos) {
        self.flags.insert(pos, owner);
    }

    /// Hide a deposit for geologists to find
    pub fn add_deposit(&mut self, pos: MapPos, mineral: Mineral, large: bool) {
        self.deposits.insert(pos, (mineral, large));
    }

    /// Override the computed attack capacity of `player` against `target`
    pub fn set_attack_capacity(&mut self, player: PlayerIndex, target: MapPos, knights: u32) {
        self.attack_capacity.insert((player, target), knights);
    }

    /// Make construction at `pos` fail regardless of terrain
    pub fn block_site(&mut self, pos: MapPos) {
        self.blocked_sites.insert(pos);
    }

    pub fn set_reject_attacks(&mut self, reject: bool) {
        self.reject_attacks = reject;
    }

    /// Queue values returned by the next `random_int` calls
    pub fn push_randoms(&mut self, values: impl IntoIterator<Item = u32>) {
        self.scripted_randoms.extend(values);
    }

    pub fn set_game_time(&mut self, millis: u64) {
        self.game_time = millis;
    }

    pub fn commands(&self) -> &[WorldCommand] {
        &self.commands
    }

    /// Attacks turned down because of `set_reject_attacks`
    pub fn rejected_attacks(&self) -> u32 {
        self.rejected_attacks
    }

    // === SIMULATION ===

    /// Advance game time, finish construction sites and collect survey
    /// results of geologists dispatched since the last step
    pub fn step(&mut self, millis: u64) -> Vec<MineralReport> {
        self.game_time += millis;

        for building in self.buildings.iter_mut().filter(|b| !b.done) {
            building.done = true;
            building.has_serf = true;
            if building.kind.is_military(true) {
                building.active = true;
                building.knight_count = 1;
                building.threat_level = 3;
            }
        }

        let mut reports = Vec::new();
        for (player, flag) in std::mem::take(&mut self.pending_surveys) {
            for pos in self.spiral(flag, SURVEY_RADIUS) {
                if let Some(&(mineral, large)) = self.deposits.get(&pos) {
                    reports.push(MineralReport {
                        mineral,
                        position: pos,
                        large,
                    });
                }
            }
            if let Some(serfs) = self.serfs.get_mut(&player) {
                if let Some(geologist) = serfs
                    .iter_mut()
                    .find(|s| s.kind == SerfType::Geologist && s.state == SerfState::Busy)
                {
                    geologist.state = SerfState::IdleInStock;
                }
            }
        }

        reports
    }

    fn in_territory(&self, player: PlayerIndex, pos: MapPos) -> bool {
        self.buildings.iter().any(|b| {
            b.owner == player
                && b.kind.is_military(true)
                && b.done
                && b.position.distance(&pos) <= TERRITORY_RADIUS
        })
    }
}

impl GameWorld for SandboxWorld {
    fn player_count(&self) -> u32 {
        self.players.len() as u32
    }

    fn player_stats(&self, player: PlayerIndex) -> Option<PlayerStats> {
        self.players.get(player.0 as usize)?.clone()
    }

    fn buildings_of(&self, player: PlayerIndex) -> Vec<BuildingInfo> {
        self.buildings
            .iter()
            .filter(|b| b.owner == player)
            .cloned()
            .collect()
    }

    fn building_at(&self, pos: MapPos) -> Option<BuildingInfo> {
        self.buildings.iter().find(|b| b.position == pos).cloned()
    }

    fn serfs_of(&self, player: PlayerIndex) -> Vec<SerfInfo> {
        self.serfs.get(&player).cloned().unwrap_or_default()
    }

    fn knights_available_for_attack(&self, player: PlayerIndex, target: MapPos) -> u32 {
        if let Some(&knights) = self.attack_capacity.get(&(player, target)) {
            return knights;
        }

        // Every garrison keeps one knight at home
        self.buildings
            .iter()
            .filter(|b| {
                b.owner == player
                    && b.kind.is_military(true)
                    && b.active
                    && b.position.distance(&target) <= ATTACK_REACH
            })
            .map(|b| b.knight_count.saturating_sub(1))
            .sum()
    }

    fn incomplete_building_count(&self, player: PlayerIndex, kind: BuildingType) -> u32 {
        self.buildings
            .iter()
            .filter(|b| b.owner == player && b.kind == kind && !b.done)
            .count() as u32
    }

    fn terrain_up(&self, pos: MapPos) -> Terrain {
        self.tile(pos).map(|t| t.up).unwrap_or(Terrain::Water0)
    }

    fn terrain_down(&self, pos: MapPos) -> Terrain {
        self.tile(pos).map(|t| t.down).unwrap_or(Terrain::Water0)
    }

    fn has_flag(&self, pos: MapPos) -> bool {
        self.flags.contains_key(&pos)
    }

    fn spiral(&self, center: MapPos, radius: u32) -> Vec<MapPos> {
        let mut positions = Vec::new();
        if self.in_bounds(center) {
            positions.push(center);
        }

        let radius = radius as i32;
        for ring in 1..=radius {
            for dy in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs() != ring && dy.abs() != ring {
                        continue;
                    }
                    let pos = MapPos::new(center.x + dx, center.y + dy);
                    if self.in_bounds(pos) {
                        positions.push(pos);
                    }
                }
            }
        }

        positions
    }

    fn can_build(&self, player: PlayerIndex, pos: MapPos, kind: BuildingType) -> bool {
        if !self.in_bounds(pos) || self.blocked_sites.contains(&pos) {
            return false;
        }
        if self.buildings.iter().any(|b| b.position == pos) {
            return false;
        }
        if let Some(&owner) = self.flags.get(&pos) {
            if owner != player {
                return false;
            }
        }
        if !self.in_territory(player, pos) {
            return false;
        }

        let terrain = self.terrain_up(pos);
        if kind.is_mine() {
            terrain.is_mountain()
        } else {
            (Terrain::Grass0..=Terrain::Grass3).contains(&terrain)
        }
    }

    fn game_time(&self) -> u64 {
        self.game_time
    }

    fn random_int(&mut self) -> u32 {
        match self.scripted_randoms.pop_front() {
            Some(value) => value,
            None => self.rng.next_u32(),
        }
    }

    fn launch_attack(&mut self, player: PlayerIndex, target: MapPos, knights: u32) -> bool {
        if self.reject_attacks {
            self.rejected_attacks += 1;
            return false;
        }

        let defended_by_enemy = self
            .building_at(target)
            .map(|b| b.owner != player)
            .unwrap_or(false);
        let available = self.knights_available_for_attack(player, target);

        if !defended_by_enemy || available == 0 {
            return false;
        }

        self.commands.push(WorldCommand::Attack {
            player,
            target,
            knights: knights.min(available),
        });
        true
    }

    fn build_flag(&mut self, player: PlayerIndex, pos: MapPos) -> bool {
        if !self.in_bounds(pos) || self.flags.contains_key(&pos) {
            return false;
        }
        if self.buildings.iter().any(|b| b.position == pos) {
            return false;
        }

        self.flags.insert(pos, player);
        self.commands.push(WorldCommand::Flag { player, pos });
        true
    }

    fn build_building(&mut self, player: PlayerIndex, pos: MapPos, kind: BuildingType) -> bool {
        if !self.can_build(player, pos, kind) {
            return false;
        }

        self.buildings.push(BuildingInfo {
            owner: player,
            kind,
            position: pos,
            knight_count: 0,
            threat_level: 0,
            active: false,
            done: false,
            burning: false,
            has_serf: false,
        });
        self.commands.push(WorldCommand::Build { player, pos, kind });
        true
    }

    fn send_geologist(&mut self, player: PlayerIndex, flag_pos: MapPos) -> bool {
        if self.flags.get(&flag_pos) != Some(&player) {
            return false;
        }

        let Some(serfs) = self.serfs.get_mut(&player) else {
            return false;
        };

        // Prefer a trained geologist, otherwise train a generic serf
        let candidate = serfs
            .iter()
            .position(|s| s.kind == SerfType::Geologist && s.state == SerfState::IdleInStock)
            .or_else(|| {
                serfs
                    .iter()
                    .position(|s| s.kind == SerfType::Generic && s.state == SerfState::IdleInStock)
            });

        let Some(index) = candidate else {
            return false;
        };

        serfs[index] = SerfInfo {
            kind: SerfType::Geologist,
            state: SerfState::Busy,
        };
        self.pending_surveys.push((player, flag_pos));
        self.commands.push(WorldCommand::Geologist {
            player,
            flag: flag_pos,
        });
        true
    }
}
