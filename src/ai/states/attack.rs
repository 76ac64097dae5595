//! Attack state
//!
//! Picks an enemy player, narrows the enemy's military buildings down to a
//! preferred category, and launches one attack against the building with
//! the best winning chance. Single-shot: the state always finishes after
//! one update, whether or not an attack was launched.

use crate::ai::context::AttackTarget;
use crate::ai::scoring::{
    attacker_count, best_targets, check_target, is_attackable, winning_chance_ok, TargetCandidate,
};
use crate::ai::state::StateCx;
use crate::ai::targeting::select_target_player;
use crate::core::config::AiConfig;
use crate::core::error::Result;
use crate::core::types::{BuildingType, MapPos, PlayerIndex};
use crate::world::{find_any, BuildingInfo, GameWorld};

const FOOD_PRODUCTION: &[BuildingType] = &[
    BuildingType::Fisher,
    BuildingType::Farm,
    BuildingType::Mill,
    BuildingType::Baker,
    BuildingType::PigFarm,
    BuildingType::Butcher,
];

const MATERIAL_PRODUCTION: &[BuildingType] = &[
    BuildingType::Lumberjack,
    BuildingType::Sawmill,
    BuildingType::Stonecutter,
    BuildingType::StoneMine,
];

const MINES: &[BuildingType] = &[
    BuildingType::CoalMine,
    BuildingType::IronMine,
    BuildingType::GoldMine,
    BuildingType::StoneMine,
];

const WEAPON_PRODUCTION: &[BuildingType] = &[BuildingType::WeaponSmith, BuildingType::SteelSmelter];

const STOCKS: &[BuildingType] = &[BuildingType::Stock];

pub fn update<W: GameWorld + ?Sized>(cx: &mut StateCx<'_, W>) -> Result<()> {
    if cx.context.can_attack {
        match select_target_player(&mut *cx.world, cx.player, cx.context) {
            Some(enemy) => {
                let attacked = attack_with_fallbacks(cx, enemy);
                tracing::debug!(
                    "{} attack against {}: {}",
                    cx.player,
                    enemy,
                    if attacked { "launched" } else { "no viable target" }
                );
            }
            None => tracing::debug!("{} has nobody to attack", cx.player),
        }
    }

    cx.pop();
    Ok(())
}

/// Primary category, then secondary, then any military building
fn attack_with_fallbacks<W: GameWorld + ?Sized>(
    cx: &mut StateCx<'_, W>,
    enemy: PlayerIndex,
) -> bool {
    let primary = cx.context.primary_target;
    if primary == AttackTarget::Random {
        return attack_category(cx, enemy, AttackTarget::Random);
    }
    if attack_category(cx, enemy, primary) {
        return true;
    }

    let secondary = cx.context.secondary_target;
    if attack_category(cx, enemy, secondary) {
        return true;
    }

    attack_category(cx, enemy, AttackTarget::Random)
}

fn attack_category<W: GameWorld + ?Sized>(
    cx: &mut StateCx<'_, W>,
    enemy: PlayerIndex,
    category: AttackTarget,
) -> bool {
    let candidates = category_targets(&*cx.world, cx.config, enemy, category);
    attack_best(cx, &candidates)
}

/// Enemy military buildings of interest for `category`
pub fn category_targets<W: GameWorld + ?Sized>(
    world: &W,
    config: &AiConfig,
    enemy: PlayerIndex,
    category: AttackTarget,
) -> Vec<BuildingInfo> {
    match category {
        AttackTarget::Random => military_buildings(world, enemy),
        AttackTarget::SmallMilitary => {
            small_military(world, enemy, config.small_military_max_knights)
        }
        AttackTarget::FoodProduction => {
            guarding(world, enemy, FOOD_PRODUCTION, config.food_search_radius)
        }
        AttackTarget::MaterialProduction => {
            guarding(world, enemy, MATERIAL_PRODUCTION, config.material_search_radius)
        }
        AttackTarget::Mines => guarding(world, enemy, MINES, config.mine_search_radius),
        AttackTarget::WeaponProduction => {
            guarding(world, enemy, WEAPON_PRODUCTION, config.weapon_search_radius)
        }
        AttackTarget::Stocks => guarding(world, enemy, STOCKS, config.stock_search_radius),
    }
}

fn military_buildings<W: GameWorld + ?Sized>(world: &W, enemy: PlayerIndex) -> Vec<BuildingInfo> {
    world
        .buildings_of(enemy)
        .into_iter()
        .filter(|b| b.kind.is_military(true))
        .collect()
}

/// Military buildings holding the fewest knights, below `max_knights`
fn small_military<W: GameWorld + ?Sized>(
    world: &W,
    enemy: PlayerIndex,
    max_knights: u32,
) -> Vec<BuildingInfo> {
    let small: Vec<BuildingInfo> = military_buildings(world, enemy)
        .into_iter()
        .filter(|b| b.knight_count < max_knights)
        .collect();

    let Some(fewest) = small.iter().map(|b| b.knight_count).min() else {
        return Vec::new();
    };

    small
        .into_iter()
        .filter(|b| b.knight_count == fewest)
        .collect()
}

/// Military buildings with an enemy building of `kinds` within `radius`
fn guarding<W: GameWorld + ?Sized>(
    world: &W,
    enemy: PlayerIndex,
    kinds: &[BuildingType],
    radius: u32,
) -> Vec<BuildingInfo> {
    let has_category = |world: &W, spot: MapPos| owns_one_of(world, spot, enemy, kinds);

    military_buildings(world, enemy)
        .into_iter()
        .filter(|b| find_any(world, b.position, radius, 1, has_category))
        .collect()
}

fn owns_one_of<W: GameWorld + ?Sized>(
    world: &W,
    spot: MapPos,
    owner: PlayerIndex,
    kinds: &[BuildingType],
) -> bool {
    world
        .building_at(spot)
        .map(|b| b.owner == owner && kinds.contains(&b.kind))
        .unwrap_or(false)
}

/// Score `buildings`, apply the winning-chance gate and attack one of the
/// best. False when nothing qualifies or the world refuses the attack.
pub fn attack_best<W: GameWorld + ?Sized>(
    cx: &mut StateCx<'_, W>,
    buildings: &[BuildingInfo],
) -> bool {
    let threat_level = cx.config.attack_threat_level;
    let scored: Vec<TargetCandidate> = buildings
        .iter()
        .filter(|b| is_attackable(b, threat_level))
        .map(|b| TargetCandidate {
            position: b.position,
            score: check_target(&*cx.world, cx.player, b),
        })
        .collect();

    let Some((best_score, best)) = best_targets(&scored) else {
        return false;
    };

    if !winning_chance_ok(cx.context, best_score) {
        tracing::debug!("{} skips attack, best score {} too low", cx.player, best_score);
        return false;
    }

    let target = best[cx.random_index(best.len())];
    let knights = attacker_count(cx.context);

    if cx.world.launch_attack(cx.player, target, knights) {
        tracing::info!(
            "{} attacks {} with up to {} knights (score {})",
            cx.player,
            target,
            knights,
            best_score
        );
        true
    } else {
        tracing::debug!("{} attack on {} rejected by the world", cx.player, target);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::context::AiContext;
    use crate::ai::memory::MineralMemory;
    use crate::world::sandbox::WorldCommand;
    use crate::world::SandboxWorld;

    fn two_player_world() -> (SandboxWorld, PlayerIndex, PlayerIndex) {
        let mut world = SandboxWorld::new(40, 40, 9);
        let me = world.add_player(true);
        let enemy = world.add_player(false);
        world.add_building(me, BuildingType::Castle, MapPos::new(5, 5));
        (world, me, enemy)
    }

    fn run(world: &mut SandboxWorld, me: PlayerIndex, context: &AiContext) -> bool {
        let config = AiConfig::default();
        let memory = MineralMemory::new();
        let mut cx = StateCx::new(world, me, context, &config, &memory, 0, &[]);
        update(&mut cx).unwrap();
        cx.transitions().popped
    }

    #[test]
    fn test_small_military_keeps_fewest_knights() {
        let (mut world, _, enemy) = two_player_world();
        world.add_building(enemy, BuildingType::Hut, MapPos::new(20, 20));
        world.add_building(enemy, BuildingType::Tower, MapPos::new(25, 20));
        world.add_building(enemy, BuildingType::Fortress, MapPos::new(30, 20));
        world.building_mut(MapPos::new(25, 20)).unwrap().knight_count = 3;
        world.building_mut(MapPos::new(30, 20)).unwrap().knight_count = 6;

        let config = AiConfig::default();
        let targets = category_targets(&world, &config, enemy, AttackTarget::SmallMilitary);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].position, MapPos::new(20, 20));
    }

    #[test]
    fn test_guarding_requires_enemy_building_nearby() {
        let (mut world, me, enemy) = two_player_world();
        world.add_building(enemy, BuildingType::Hut, MapPos::new(20, 20));
        world.add_building(enemy, BuildingType::Hut, MapPos::new(32, 32));
        world.add_building(enemy, BuildingType::Farm, MapPos::new(22, 21));
        // Our own farm next to the second hut does not count
        world.add_building(me, BuildingType::Farm, MapPos::new(33, 32));

        let config = AiConfig::default();
        let targets = category_targets(&world, &config, enemy, AttackTarget::FoodProduction);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].position, MapPos::new(20, 20));
    }

    #[test]
    fn test_weapon_radius_is_tighter() {
        let (mut world, _, enemy) = two_player_world();
        world.add_building(enemy, BuildingType::Hut, MapPos::new(20, 20));
        world.add_building(enemy, BuildingType::WeaponSmith, MapPos::new(24, 20));

        let config = AiConfig::default();
        let weapons = category_targets(&world, &config, enemy, AttackTarget::WeaponProduction);
        assert!(weapons.is_empty());
        assert_eq!(category_targets(&world, &config, enemy, AttackTarget::Mines).len(), 0);

        world.add_building(enemy, BuildingType::SteelSmelter, MapPos::new(22, 20));
        assert_eq!(
            category_targets(&world, &config, enemy, AttackTarget::WeaponProduction).len(),
            1
        );
    }

    #[test]
    fn test_pops_even_without_target() {
        let (mut world, me, _) = two_player_world();
        assert!(run(&mut world, me, &AiContext::default()));
        assert!(world.commands().is_empty());
    }

    #[test]
    fn test_cannot_attack_issues_nothing() {
        let (mut world, me, enemy) = two_player_world();
        world.add_building(enemy, BuildingType::Hut, MapPos::new(10, 5));
        world.set_attack_capacity(me, MapPos::new(10, 5), 5);

        let context = AiContext {
            can_attack: false,
            ..AiContext::default()
        };
        assert!(run(&mut world, me, &context));
        assert!(world.commands().is_empty());
    }

    #[test]
    fn test_unreachable_building_never_attacked() {
        let (mut world, me, enemy) = two_player_world();
        world.add_building(enemy, BuildingType::Hut, MapPos::new(10, 5));
        world.add_building(enemy, BuildingType::Fortress, MapPos::new(12, 5));
        world.building_mut(MapPos::new(12, 5)).unwrap().knight_count = 9;
        world.set_attack_capacity(me, MapPos::new(10, 5), 0);
        world.set_attack_capacity(me, MapPos::new(12, 5), 2);

        let context = AiContext {
            intelligence: 0,
            ..AiContext::default()
        };
        run(&mut world, me, &context);
        assert_eq!(
            world.commands(),
            &[WorldCommand::Attack {
                player: me,
                target: MapPos::new(12, 5),
                knights: 2
            }]
        );
    }

    #[test]
    fn test_rejected_primary_falls_back_to_random() {
        let (mut world, me, enemy) = two_player_world();
        // Small hut without capacity, strong tower the AI can beat
        world.add_building(enemy, BuildingType::Hut, MapPos::new(10, 5));
        world.add_building(enemy, BuildingType::Tower, MapPos::new(14, 5));
        world.building_mut(MapPos::new(14, 5)).unwrap().knight_count = 5;
        world.set_attack_capacity(me, MapPos::new(10, 5), 0);
        world.set_attack_capacity(me, MapPos::new(14, 5), 9);

        let context = AiContext {
            intelligence: 30,
            smartness: 0,
            primary_target: AttackTarget::SmallMilitary,
            secondary_target: AttackTarget::Stocks,
            ..AiContext::default()
        };
        run(&mut world, me, &context);
        assert!(matches!(
            world.commands(),
            [WorldCommand::Attack { target, .. }] if *target == MapPos::new(14, 5)
        ));
    }

    #[test]
    fn test_world_rejection_reported_as_failure() {
        let (mut world, me, enemy) = two_player_world();
        world.add_building(enemy, BuildingType::Hut, MapPos::new(10, 5));
        world.set_attack_capacity(me, MapPos::new(10, 5), 4);
        world.set_reject_attacks(true);

        let config = AiConfig::default();
        let memory = MineralMemory::new();
        let context = AiContext::default();
        let mut cx = StateCx::new(&mut world, me, &context, &config, &memory, 0, &[]);
        let buildings = category_targets(&*cx.world, &config, enemy, AttackTarget::Random);
        assert!(!attack_best(&mut cx, &buildings));
    }

    #[test]
    fn test_secondary_random_still_falls_back_to_random() {
        let (mut world, me, enemy) = two_player_world();
        world.add_building(enemy, BuildingType::Tower, MapPos::new(10, 5));
        world.set_attack_capacity(me, MapPos::new(10, 5), 5);
        world.set_reject_attacks(true);

        // No stocks: the secondary Random run and the final fallback both launch
        let context = AiContext {
            intelligence: 0,
            primary_target: AttackTarget::Stocks,
            secondary_target: AttackTarget::Random,
            ..AiContext::default()
        };
        assert!(run(&mut world, me, &context));
        assert_eq!(world.rejected_attacks(), 2);
        assert!(world.commands().is_empty());
    }

    #[test]
    fn test_burning_and_unfinished_skipped() {
        let (mut world, me, enemy) = two_player_world();
        world.add_building(enemy, BuildingType::Hut, MapPos::new(10, 5));
        world.add_building(enemy, BuildingType::Hut, MapPos::new(11, 5));
        world.building_mut(MapPos::new(10, 5)).unwrap().burning = true;
        world.building_mut(MapPos::new(11, 5)).unwrap().done = false;
        world.set_attack_capacity(me, MapPos::new(10, 5), 4);
        world.set_attack_capacity(me, MapPos::new(11, 5), 4);

        run(&mut world, me, &AiContext::default());
        assert!(world.commands().is_empty());
    }
}
