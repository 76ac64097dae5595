//! Per-player stack of behavior states
//!
//! The last element is the active state. An `Idle` root is re-seeded
//! whenever the stack would run empty.

use serde::{Deserialize, Serialize};

use crate::ai::state::BehaviorState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateStack {
    states: Vec<BehaviorState>,
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStack {
    /// A stack holding only the idle root
    pub fn new() -> Self {
        Self {
            states: vec![BehaviorState::Idle],
        }
    }

    /// The idle root with `initial` on top
    pub fn with_initial(initial: BehaviorState) -> Self {
        let mut stack = Self::new();
        if initial != BehaviorState::Idle {
            stack.push(initial);
        }
        stack
    }

    pub fn top(&self) -> BehaviorState {
        self.states.last().copied().unwrap_or(BehaviorState::Idle)
    }

    pub fn top_index(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    pub fn push(&mut self, state: BehaviorState) {
        self.states.push(state);
    }

    /// Remove the active state
    pub fn pop(&mut self) -> Option<BehaviorState> {
        let popped = self.states.pop();
        self.ensure_root();
        popped
    }

    /// Remove the state at `index`; states above it move down one slot
    pub fn remove_at(&mut self, index: usize) -> Option<BehaviorState> {
        let removed = (index < self.states.len()).then(|| self.states.remove(index));
        self.ensure_root();
        removed
    }

    /// Re-seed the idle root if nothing is left
    pub fn ensure_root(&mut self) {
        if self.states.is_empty() {
            self.states.push(BehaviorState::Idle);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = BehaviorState> + '_ {
        self.states.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
