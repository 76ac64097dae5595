//! Behavior states and the context they run in
//!
//! A state never touches its stack directly. It records transitions on
//! its [`StateCx`] and the director applies them once the update returned
//! successfully, so a failing update cannot leave the stack half-edited.

use serde::{Deserialize, Serialize};

use crate::ai::context::AiContext;
use crate::ai::delayed::random_delay;
use crate::ai::memory::MineralMemory;
use crate::core::config::AiConfig;
use crate::core::types::{BuildingType, Mineral, PlayerIndex, Tick};
use crate::world::GameWorld;

/// One strategic goal and the parameters needed to resume it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Root of every stack, reviews the economy and starts new goals
    Idle,
    /// Pick an enemy and launch one attack
    Attack,
    /// Found a mine for the mineral or send out a geologist
    FindOre { mineral: Option<Mineral> },
    /// Start construction of a building somewhere in the territory
    BuildBuilding { kind: BuildingType },
}

impl BehaviorState {
    pub fn name(&self) -> &'static str {
        match self {
            BehaviorState::Idle => "idle",
            BehaviorState::Attack => "attack",
            BehaviorState::FindOre { .. } => "find_ore",
            BehaviorState::BuildBuilding { .. } => "build_building",
        }
    }
}

/// Stack edits requested by one state update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transitions {
    pub popped: bool,
    pub pushed: Vec<BehaviorState>,
    pub delayed: Vec<(Tick, BehaviorState)>,
}

/// Everything a state update may read or command
pub struct StateCx<'a, W: GameWorld + ?Sized> {
    pub world: &'a mut W,
    pub player: PlayerIndex,
    pub context: &'a AiContext,
    pub config: &'a AiConfig,
    pub memory: &'a MineralMemory,
    pub tick: Tick,
    /// Goals already on the stack or waiting in the delayed queue
    pub planned: &'a [BehaviorState],
    transitions: Transitions,
}

impl<'a, W: GameWorld + ?Sized> StateCx<'a, W> {
    pub fn new(
        world: &'a mut W,
        player: PlayerIndex,
        context: &'a AiContext,
        config: &'a AiConfig,
        memory: &'a MineralMemory,
        tick: Tick,
        planned: &'a [BehaviorState],
    ) -> Self {
        Self {
            world,
            player,
            context,
            config,
            memory,
            tick,
            planned,
            transitions: Transitions::default(),
        }
    }

    /// Add a sub-goal on top of the calling state
    pub fn push(&mut self, state: BehaviorState) {
        self.transitions.pushed.push(state);
    }

    /// Mark the calling state as finished
    pub fn pop(&mut self) {
        self.transitions.popped = true;
    }

    /// Re-attempt `state` after `min_delay` ticks plus a random share of
    /// `max_jitter`. Draws one random value now.
    pub fn schedule_delayed(&mut self, state: BehaviorState, min_delay: u64, max_jitter: u64) {
        let delay = random_delay(&mut *self.world, min_delay, max_jitter);
        self.transitions.delayed.push((self.tick + delay, state));
    }

    pub fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    pub fn into_transitions(self) -> Transitions {
        self.transitions
    }

    /// Uniform pick from a non-empty slice length using the game random source
    pub fn random_index(&mut self, len: usize) -> usize {
        self.world.random_int() as usize % len
    }
}
