//! BuildBuilding state
//!
//! Places a construction site for one building kind somewhere around the
//! player's military buildings. Retries later when no site is free.

use crate::ai::state::{BehaviorState, StateCx};
use crate::core::error::{AiError, Result};
use crate::core::types::{BuildingType, MapPos};
use crate::world::GameWorld;

pub fn update<W: GameWorld + ?Sized>(cx: &mut StateCx<'_, W>, kind: BuildingType) -> Result<()> {
    if kind == BuildingType::Castle {
        return Err(AiError::InvalidState("a castle cannot be constructed".into()));
    }

    let mut sites = construction_sites(cx, kind);

    while !sites.is_empty() {
        let index = cx.random_index(sites.len());
        let site = sites[index];

        if cx.world.build_building(cx.player, site, kind) {
            tracing::info!("{} starts {:?} at {}", cx.player, kind, site);
            cx.pop();
            return Ok(());
        }

        sites.remove(index);
    }

    tracing::debug!("{} found no site for {:?}, retrying later", cx.player, kind);
    cx.pop();
    let jitter = cx.config.build_jitter(cx.context.intelligence);
    cx.schedule_delayed(BehaviorState::BuildBuilding { kind }, cx.config.build_retry_delay, jitter);
    Ok(())
}

/// Buildable positions around own military buildings, nearest rings first
fn construction_sites<W: GameWorld + ?Sized>(
    cx: &StateCx<'_, W>,
    kind: BuildingType,
) -> Vec<MapPos> {
    let radius = cx.config.build_search_radius;
    let mut sites: Vec<MapPos> = Vec::new();

    for building in cx.world.buildings_of(cx.player) {
        if !building.kind.is_military(true) {
            continue;
        }

        for pos in cx.world.spiral(building.position, radius) {
            if !sites.contains(&pos) && cx.world.can_build(cx.player, pos, kind) {
                sites.push(pos);
            }
        }
    }

    sites
}
