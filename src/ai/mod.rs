//! Computer player decision making
//!
//! Architecture: one state stack per AI player
//! - `AiDirector` advances the top state of each stack once per tick
//! - `BehaviorState` is a closed set of goals, dispatched in `states`
//! - `AiContext` holds the TOML-loaded personality of a player
//! - `MineralMemory` collects exploration reports shared by all players

pub mod context;
pub mod delayed;
pub mod director;
pub mod memory;
pub mod scoring;
pub mod stack;
pub mod state;
pub mod states;
pub mod targeting;

pub use context::{
    load_personality, load_personality_from, AiContext, AttackTarget, PrimaryPlayerCriterion,
    SecondaryPlayerCriterion,
};
pub use delayed::DelayedQueue;
pub use director::{AiDirector, AiPlayer};
pub use memory::MineralMemory;
pub use stack::StateStack;
pub use state::{BehaviorState, StateCx, Transitions};
