//! AI Director - drives the state stacks of all computer players
//!
//! Owns one [`AiPlayer`] per computer player and the mineral memory shared
//! by all of them. The game loop calls [`AiDirector::advance_all`] once per
//! tick; each call runs exactly one state update per player.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ai::context::AiContext;
use crate::ai::delayed::DelayedQueue;
use crate::ai::memory::MineralMemory;
use crate::ai::stack::StateStack;
use crate::ai::state::{BehaviorState, StateCx};
use crate::ai::states;
use crate::core::config::AiConfig;
use crate::core::error::{AiError, Result};
use crate::core::types::{MapPos, Mineral, PlayerIndex, Tick};
use crate::world::GameWorld;

/// Decision state of one computer player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiPlayer {
    pub index: PlayerIndex,
    pub context: AiContext,
    pub stack: StateStack,
    pub delayed: DelayedQueue,
}

impl AiPlayer {
    /// Goals on the stack followed by goals waiting in the delayed queue
    pub fn planned(&self) -> Vec<BehaviorState> {
        self.stack.iter().chain(self.delayed.states()).collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiDirector {
    players: BTreeMap<PlayerIndex, AiPlayer>,
    memory: MineralMemory,
    config: AiConfig,
}

impl AiDirector {
    pub fn new(config: AiConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            players: BTreeMap::new(),
            memory: MineralMemory::new(),
            config,
        })
    }

    /// Take control of `player`, replacing any earlier plan.
    ///
    /// The stack starts as `[Idle, initial]` and the delayed queue is empty.
    pub fn create_initial_state(
        &mut self,
        player: PlayerIndex,
        context: AiContext,
        initial: BehaviorState,
    ) -> Result<()> {
        context.validate()?;

        tracing::debug!(
            "{} controlled by '{}' starting with {}",
            player,
            context.name,
            initial.name()
        );

        self.players.insert(
            player,
            AiPlayer {
                index: player,
                context,
                stack: StateStack::with_initial(initial),
                delayed: DelayedQueue::new(),
            },
        );
        Ok(())
    }

    /// Drop the stack and delayed goals of `player`
    pub fn remove_player(&mut self, player: PlayerIndex) -> Option<AiPlayer> {
        self.players.remove(&player)
    }

    pub fn player(&self, player: PlayerIndex) -> Option<&AiPlayer> {
        self.players.get(&player)
    }

    pub fn players(&self) -> impl Iterator<Item = &AiPlayer> {
        self.players.values()
    }

    pub fn memory(&self) -> &MineralMemory {
        &self.memory
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Record a deposit reported by exploration
    pub fn observe_mineral(&mut self, mineral: Mineral, pos: MapPos, large: bool) {
        self.memory.remember(mineral, pos, large);
    }

    /// Run one state update for `player`.
    ///
    /// Returns `Ok(false)` when the player is not AI controlled. A player
    /// that vanished from the world is dropped and reported as an error.
    pub fn advance<W: GameWorld + ?Sized>(
        &mut self,
        player: PlayerIndex,
        tick: Tick,
        world: &mut W,
    ) -> Result<bool> {
        if !self.players.contains_key(&player) {
            return Ok(false);
        }
        if world.player_stats(player).is_none() {
            self.players.remove(&player);
            return Err(AiError::PlayerNotFound(player));
        }

        let Some(ai) = self.players.get_mut(&player) else {
            return Ok(false);
        };

        for state in ai.delayed.take_due(tick) {
            ai.stack.push(state);
        }

        let state = ai.stack.top();
        let index = ai.stack.top_index();
        let planned = ai.planned();

        let mut cx = StateCx::new(
            world,
            player,
            &ai.context,
            &self.config,
            &self.memory,
            tick,
            &planned,
        );
        let outcome = states::update(state, &mut cx);
        let transitions = cx.into_transitions();

        match outcome {
            Ok(()) => {
                if transitions.popped {
                    ai.stack.remove_at(index);
                }
                for pushed in transitions.pushed {
                    ai.stack.push(pushed);
                }
                for (due, delayed) in transitions.delayed {
                    ai.delayed.schedule(due, delayed);
                }
            }
            Err(err) => {
                tracing::warn!("{} dropped {} state: {}", player, state.name(), err);
                ai.stack.remove_at(index);
            }
        }

        ai.stack.ensure_root();
        Ok(true)
    }

    /// Advance every AI player in index order, returns how many ran
    pub fn advance_all<W: GameWorld + ?Sized>(&mut self, tick: Tick, world: &mut W) -> usize {
        let players: Vec<PlayerIndex> = self.players.keys().copied().collect();
        let mut advanced = 0;

        for player in players {
            match self.advance(player, tick, &mut *world) {
                Ok(true) => advanced += 1,
                Ok(false) => {}
                Err(err) => tracing::warn!("AI stopped: {}", err),
            }
        }

        advanced
    }
}
