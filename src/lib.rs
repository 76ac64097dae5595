//! Settler AI - stack-based strategy for computer players
//!
//! Each computer player keeps a stack of goals (attack, find ore, build)
//! that the [`ai::AiDirector`] advances one update per tick against a
//! [`world::GameWorld`].

pub mod ai;
pub mod core;
pub mod world;
