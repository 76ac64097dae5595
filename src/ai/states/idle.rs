//! Idle state, root of every stack
//!
//! Periodically reviews the economy and starts new goals. Never pops.

use crate::ai::state::{BehaviorState, StateCx};
use crate::core::error::Result;
use crate::core::types::{BuildingType, Mineral};
use crate::world::GameWorld;

pub fn update<W: GameWorld + ?Sized>(cx: &mut StateCx<'_, W>) -> Result<()> {
    if cx.tick % cx.config.idle_review_interval.max(1) != 0 {
        return Ok(());
    }

    if let Some(mineral) = missing_mine(cx) {
        tracing::debug!("{} has no {:?}, looking for ore", cx.player, mineral.mine_type());
        cx.push(BehaviorState::FindOre {
            mineral: Some(mineral),
        });
        return Ok(());
    }

    if cx.context.can_attack {
        let roll = cx.world.random_int() % cx.config.attack_roll_base.max(1);
        if roll < cx.context.aggressivity + 1 {
            tracing::debug!("{} rolled {} and goes to war", cx.player, roll);
            cx.push(BehaviorState::Attack);
        }
    }

    Ok(())
}

/// First mineral without a mine, a mine under construction or a planned search
fn missing_mine<W: GameWorld + ?Sized>(cx: &StateCx<'_, W>) -> Option<Mineral> {
    let owned: Vec<BuildingType> = cx
        .world
        .buildings_of(cx.player)
        .into_iter()
        .map(|b| b.kind)
        .collect();

    Mineral::ALL.into_iter().find(|&mineral| {
        let mine = mineral.mine_type();
        let planned = BehaviorState::FindOre {
            mineral: Some(mineral),
        };

        !owned.contains(&mine)
            && cx.world.incomplete_building_count(cx.player, mine) == 0
            && !cx.planned.contains(&planned)
    })
}
