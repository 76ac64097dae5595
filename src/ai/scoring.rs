//! Target scoring for attacks
//!
//! The higher the score, the better the winning chance against a building.

use serde::{Deserialize, Serialize};

use crate::ai::context::AiContext;
use crate::core::types::{MapPos, PlayerIndex};
use crate::world::{BuildingInfo, GameWorld};

/// Score of a building no knight can reach
pub const IMPOSSIBLE_SCORE: i32 = i32::MIN;

/// A scored attack target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCandidate {
    pub position: MapPos,
    pub score: i32,
}

/// Whether a building can be attacked at all: a finished, active,
/// non-burning military building showing the given threat level
pub fn is_attackable(building: &BuildingInfo, threat_level: u8) -> bool {
    building.kind.is_military(true)
        && building.done
        && !building.burning
        && building.active
        && building.threat_level == threat_level
}

/// Knights the attacker can commit minus the knights defending
pub fn check_target<W: GameWorld + ?Sized>(
    world: &W,
    attacker: PlayerIndex,
    building: &BuildingInfo,
) -> i32 {
    let available = world.knights_available_for_attack(attacker, building.position);
    if available == 0 {
        return IMPOSSIBLE_SCORE;
    }

    available as i32 - building.knight_count as i32
}

/// Best score and every position reaching it. Impossible targets never count.
pub fn best_targets(candidates: &[TargetCandidate]) -> Option<(i32, Vec<MapPos>)> {
    let best = candidates
        .iter()
        .filter(|c| c.score != IMPOSSIBLE_SCORE)
        .map(|c| c.score)
        .max()?;

    let positions = candidates
        .iter()
        .filter(|c| c.score == best)
        .map(|c| c.position)
        .collect();

    Some((best, positions))
}

/// Smart AIs refuse fights they are unlikely to win
pub fn winning_chance_ok(context: &AiContext, best_score: i32) -> bool {
    let aggressivity = context.aggressivity as i32;
    let smartness = context.smartness as i32;

    if context.intelligence >= 15 && smartness > 0 {
        best_score >= smartness * (3 - aggressivity / 2)
    } else if context.intelligence >= 30 {
        best_score > 0
    } else {
        true
    }
}

/// Knights requested for an attack
pub fn attacker_count(context: &AiContext) -> u32 {
    let drive = context
        .aggressivity
        .max(context.expand_focus)
        .max(context.military_focus)
        .max(context.military_skill + 1);
    4 + 3 * drive
}
