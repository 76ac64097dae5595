//! FindOre state
//!
//! Founds a mine on a remembered deposit of the wanted mineral. Without a
//! usable deposit it sends a geologist towards the nearest mountain, asks
//! for territory expansion, or retries later.

use crate::ai::state::{BehaviorState, StateCx};
use crate::core::error::Result;
use crate::core::types::{BuildingType, MapPos, Mineral, PlayerIndex, SerfState, SerfType};
use crate::world::{find_nearest, BuildingInfo, GameWorld};

pub fn update<W: GameWorld + ?Sized>(
    cx: &mut StateCx<'_, W>,
    mineral: Option<Mineral>,
) -> Result<()> {
    let Some(mineral) = mineral else {
        cx.pop();
        return Ok(());
    };

    let mine = mineral.mine_type();
    let mut large = cx.memory.large_spots(mineral);
    let mut small = cx.memory.small_spots(mineral);
    let threshold = cx.config.small_spot_threshold(cx.context.intelligence);
    let consider_small =
        cx.world.game_time() > threshold || cx.context.impulsive_decision(&mut *cx.world);

    if build_on_any(cx, &mut large, mine)
        || (consider_small && build_on_any(cx, &mut small, mine))
    {
        cx.pop();
        return Ok(());
    }

    let geologists: Vec<SerfState> = cx
        .world
        .serfs_of(cx.player)
        .into_iter()
        .filter(|s| s.kind == SerfType::Geologist)
        .map(|s| s.state)
        .collect();

    let retry = BehaviorState::FindOre {
        mineral: Some(mineral),
    };
    let jitter = cx.config.retry_jitter(cx.context.intelligence);

    if geologists.is_empty() {
        if !send_geologist(cx) {
            tracing::debug!(
                "{} cannot field a geologist for {:?}, retrying later",
                cx.player,
                mineral
            );
            cx.pop();
            cx.schedule_delayed(retry, cx.config.geologist_retry_delay, jitter);
            return Ok(());
        }
    } else if geologists.contains(&SerfState::IdleInStock) {
        if !send_geologist(cx) {
            tracing::debug!("{} found no mountain to survey for {:?}", cx.player, mineral);
        }
    } else {
        // Every geologist is already surveying
        cx.pop();
        cx.schedule_delayed(retry, cx.config.geologist_busy_retry_delay, jitter);
        return Ok(());
    }

    cx.pop();
    Ok(())
}

/// Try random spots until a mine gets founded; failed spots are dropped
fn build_on_any<W: GameWorld + ?Sized>(
    cx: &mut StateCx<'_, W>,
    spots: &mut Vec<MapPos>,
    mine: BuildingType,
) -> bool {
    while !spots.is_empty() {
        let index = cx.random_index(spots.len());
        let spot = spots[index];

        if cx.world.build_building(cx.player, spot, mine) {
            tracing::info!("{} founds {:?} at {}", cx.player, mine, spot);
            return true;
        }

        spots.remove(index);
    }

    false
}

fn is_mountain<W: GameWorld + ?Sized>(world: &W, pos: MapPos) -> bool {
    world.terrain_up(pos).is_mountain() || world.terrain_down(pos).is_mountain()
}

fn is_flagged_mountain<W: GameWorld + ?Sized>(world: &W, pos: MapPos) -> bool {
    world.has_flag(pos) && is_mountain(world, pos)
}

/// Nearest mountain around `center`, flagged ones first
fn find_mountain_near<W: GameWorld + ?Sized>(
    world: &W,
    center: MapPos,
    radius: u32,
) -> Option<MapPos> {
    find_nearest(world, center, radius, is_flagged_mountain::<W>)
        .or_else(|| find_nearest(world, center, radius, is_mountain::<W>))
}

/// A military building is under construction or still waiting for its knight
fn expansion_pending<W: GameWorld + ?Sized>(
    world: &W,
    player: PlayerIndex,
    buildings: &[BuildingInfo],
) -> bool {
    let under_construction = [BuildingType::Hut, BuildingType::Tower, BuildingType::Fortress]
        .into_iter()
        .any(|kind| world.incomplete_building_count(player, kind) > 0);

    under_construction
        || buildings
            .iter()
            .any(|b| b.kind.is_military(false) && !b.has_serf)
}

/// Send a geologist to a mountain near one of our military buildings.
/// Asks for a new hut when no mountain is in reach.
fn send_geologist<W: GameWorld + ?Sized>(cx: &mut StateCx<'_, W>) -> bool {
    let buildings = cx.world.buildings_of(cx.player);
    let radius = cx.config.mountain_search_radius;

    let spots: Vec<MapPos> = buildings
        .iter()
        .filter(|b| b.kind.is_military(true))
        .filter_map(|b| find_mountain_near(&*cx.world, b.position, radius))
        .collect();

    if spots.is_empty() {
        let hut = BehaviorState::BuildBuilding {
            kind: BuildingType::Hut,
        };
        if !expansion_pending(&*cx.world, cx.player, &buildings) && !cx.planned.contains(&hut) {
            tracing::debug!("{} has no mountains in reach, expanding", cx.player);
            cx.push(hut);
        }
        return false;
    }

    let flagged: Vec<MapPos> = spots
        .iter()
        .copied()
        .filter(|&spot| cx.world.has_flag(spot))
        .collect();
    let pool = if flagged.is_empty() { &spots } else { &flagged };
    let spot = pool[cx.random_index(pool.len())];

    if !cx.world.has_flag(spot) && !cx.world.build_flag(cx.player, spot) {
        return false;
    }

    cx.world.send_geologist(cx.player, spot)
}
