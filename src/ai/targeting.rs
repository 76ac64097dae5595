//! Choosing which enemy player to attack

use crate::ai::context::{AiContext, PrimaryPlayerCriterion, SecondaryPlayerCriterion};
use crate::core::types::PlayerIndex;
use crate::world::{GameWorld, PlayerStats};

/// Threat level whose garrison settings decide how well a player is protected
const HIGHEST_THREAT_LEVEL: usize = 3;

/// Pick the enemy player to attack, None when the AI plays alone
pub fn select_target_player<W: GameWorld + ?Sized>(
    world: &mut W,
    attacker: PlayerIndex,
    context: &AiContext,
) -> Option<PlayerIndex> {
    if world.player_count() <= 1 {
        return None;
    }

    let others: Vec<PlayerStats> = (0..world.player_count())
        .map(PlayerIndex)
        .filter(|&p| p != attacker)
        .filter_map(|p| world.player_stats(p))
        .collect();

    let candidates = apply_primary(others, context.primary_player_criterion);

    match candidates.len() {
        0 => None,
        1 => Some(candidates[0].index),
        _ => apply_secondary(world, &candidates, context.secondary_player_criterion),
    }
}

/// Keep only human or only AI players; an empty result falls back to everyone
fn apply_primary(players: Vec<PlayerStats>, criterion: PrimaryPlayerCriterion) -> Vec<PlayerStats> {
    let wanted_ai = match criterion {
        PrimaryPlayerCriterion::Any => return players,
        PrimaryPlayerCriterion::Human => false,
        PrimaryPlayerCriterion::Ai => true,
    };

    let filtered: Vec<PlayerStats> = players
        .iter()
        .filter(|p| p.is_ai == wanted_ai)
        .cloned()
        .collect();

    if filtered.is_empty() {
        players
    } else {
        filtered
    }
}

fn apply_secondary<W: GameWorld + ?Sized>(
    world: &mut W,
    candidates: &[PlayerStats],
    criterion: SecondaryPlayerCriterion,
) -> Option<PlayerIndex> {
    match criterion {
        SecondaryPlayerCriterion::Random => {
            let index = world.random_int() as usize % candidates.len();
            Some(candidates[index].index)
        }
        SecondaryPlayerCriterion::Weakest => candidates
            .iter()
            .min_by_key(|p| p.military_score)
            .map(|p| p.index),
        SecondaryPlayerCriterion::Worst => candidates
            .iter()
            .min_by_key(|p| p.score)
            .map(|p| p.index),
        SecondaryPlayerCriterion::WorstProtected => worst_protected(candidates),
    }
}

/// Lowest maximum garrison bucket, then lowest minimum garrison bucket,
/// then fewest knights
pub fn worst_protected(candidates: &[PlayerStats]) -> Option<PlayerIndex> {
    let max_bucket = candidates
        .iter()
        .map(|p| p.max_occupation(HIGHEST_THREAT_LEVEL))
        .min()?;
    let by_max: Vec<&PlayerStats> = candidates
        .iter()
        .filter(|p| p.max_occupation(HIGHEST_THREAT_LEVEL) == max_bucket)
        .collect();

    let min_bucket = by_max
        .iter()
        .map(|p| p.min_occupation(HIGHEST_THREAT_LEVEL))
        .min()?;

    by_max
        .into_iter()
        .filter(|p| p.min_occupation(HIGHEST_THREAT_LEVEL) == min_bucket)
        .min_by_key(|p| p.total_knights)
        .map(|p| p.index)
}
