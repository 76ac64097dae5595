//! Remembered mineral deposits
//!
//! Exploration reports are shared by all AI players of a game session.
//! Entries are never forgotten; a failed build attempt only skips a spot
//! for the current FindOre attempt.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::{MapPos, Mineral};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Deposits {
    all: BTreeSet<MapPos>,
    large: BTreeSet<MapPos>,
}

/// Mineral kind to observed deposit positions, graded large and small
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MineralMemory {
    deposits: BTreeMap<Mineral, Deposits>,
}

impl MineralMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observed deposit. A spot seen once as large stays large.
    pub fn remember(&mut self, mineral: Mineral, pos: MapPos, large: bool) {
        let deposits = self.deposits.entry(mineral).or_default();
        deposits.all.insert(pos);
        if large {
            deposits.large.insert(pos);
        }
    }

    /// Large deposits of `mineral`, in position order
    pub fn large_spots(&self, mineral: Mineral) -> Vec<MapPos> {
        self.deposits
            .get(&mineral)
            .map(|d| d.large.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Deposits of `mineral` that were never reported as large
    pub fn small_spots(&self, mineral: Mineral) -> Vec<MapPos> {
        self.deposits
            .get(&mineral)
            .map(|d| d.all.difference(&d.large).copied().collect())
            .unwrap_or_default()
    }

    /// Total number of remembered spots across all minerals
    pub fn len(&self) -> usize {
        self.deposits.values().map(|d| d.all.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
