//! Goals scheduled to start at a later tick

use serde::{Deserialize, Serialize};

use crate::ai::state::BehaviorState;
use crate::core::types::Tick;
use crate::world::GameWorld;

/// Resolution of the random fraction applied to a delay jitter
const JITTER_STEPS: u64 = 1024;

/// A goal waiting for its tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedEntry {
    pub due: Tick,
    pub seq: u64,
    pub state: BehaviorState,
}

/// Delayed goals of one AI player, ordered by due tick, FIFO among equals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelayedQueue {
    entries: Vec<DelayedEntry>,
    next_seq: u64,
}

impl DelayedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Tick, state: BehaviorState) {
        let entry = DelayedEntry {
            due,
            seq: self.next_seq,
            state,
        };
        self.next_seq += 1;

        let at = self.entries.partition_point(|e| e.due <= due);
        self.entries.insert(at, entry);
    }

    /// Remove and return every goal due at or before `tick`, earliest first
    pub fn take_due(&mut self, tick: Tick) -> Vec<BehaviorState> {
        let count = self.entries.partition_point(|e| e.due <= tick);
        self.entries.drain(..count).map(|e| e.state).collect()
    }

    /// Tick of the earliest waiting goal
    pub fn next_due(&self) -> Option<Tick> {
        self.entries.first().map(|e| e.due)
    }

    pub fn states(&self) -> impl Iterator<Item = BehaviorState> + '_ {
        self.entries.iter().map(|e| e.state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Draw a delay of `min_delay` plus a random share of `max_jitter`
///
/// For a fixed draw the result grows monotonically with `max_jitter`.
pub fn random_delay<W: GameWorld + ?Sized>(world: &mut W, min_delay: u64, max_jitter: u64) -> u64 {
    let fraction = world.random_int() as u64 % JITTER_STEPS;
    min_delay + max_jitter * fraction / JITTER_STEPS
}
