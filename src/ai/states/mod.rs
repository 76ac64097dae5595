//! Update functions of the behavior states

pub mod attack;
pub mod build_building;
pub mod find_ore;
pub mod idle;

use crate::ai::state::{BehaviorState, StateCx};
use crate::core::error::Result;
use crate::world::GameWorld;

/// Run one update of `state`
pub fn update<W: GameWorld + ?Sized>(state: BehaviorState, cx: &mut StateCx<'_, W>) -> Result<()> {
    match state {
        BehaviorState::Idle => idle::update(cx),
        BehaviorState::Attack => attack::update(cx),
        BehaviorState::FindOre { mineral } => find_ore::update(cx, mineral),
        BehaviorState::BuildBuilding { kind } => build_building::update(cx, kind),
    }
}
