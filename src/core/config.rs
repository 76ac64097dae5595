//! AI configuration with documented constants
//!
//! All magic numbers of the decision states are collected here with
//! explanations of their purpose and how they interact with each other.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{AiError, Result};

/// Highest intelligence an AI personality can have
pub const MAX_INTELLIGENCE: u32 = 50;

/// Configuration for the AI decision states
///
/// Delays and intervals are in simulation ticks, thresholds on game time
/// are in milliseconds of elapsed game time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    // === ATTACK ===
    /// Threat level a building must show to be considered attackable
    pub attack_threat_level: u8,

    /// Buildings with fewer knights than this count as "small military"
    pub small_military_max_knights: u32,

    /// Search radius around an enemy military building for food production
    pub food_search_radius: u32,

    /// Search radius for material production (wood and stone)
    pub material_search_radius: u32,

    /// Search radius for mines
    ///
    /// Larger than the others because mines sit on mountains, which are
    /// usually at the edge of a military building's territory.
    pub mine_search_radius: u32,

    /// Search radius for weapon production
    pub weapon_search_radius: u32,

    /// Search radius for stocks
    pub stock_search_radius: u32,

    // === FIND ORE ===
    /// Radius searched around each own military building for mountains
    pub mountain_search_radius: u32,

    /// Game time after which small deposits are acceptable for a genius
    ///
    /// The effective threshold is
    /// `small_spot_base_time + (MAX_INTELLIGENCE - intelligence) * small_spot_time_step`,
    /// so smarter AIs settle for small deposits sooner.
    pub small_spot_base_time: u64,

    /// Per missing intelligence point added to the small deposit threshold
    pub small_spot_time_step: u64,

    /// Minimum delay before retrying when no geologist could be sent at all
    pub geologist_retry_delay: u64,

    /// Minimum delay before retrying when all geologists are already out
    pub geologist_busy_retry_delay: u64,

    /// Retry jitter is `(retry_jitter_base - intelligence) * retry_jitter_step`
    ///
    /// Must exceed MAX_INTELLIGENCE so the jitter never collapses to zero.
    pub retry_jitter_base: u64,

    /// Multiplier for the FindOre retry jitter
    pub retry_jitter_step: u64,

    // === BUILD BUILDING ===
    /// Radius searched around own military buildings for construction sites
    pub build_search_radius: u32,

    /// Minimum delay before retrying a construction that found no site
    pub build_retry_delay: u64,

    /// Multiplier for the construction retry jitter
    pub build_jitter_step: u64,

    // === IDLE ===
    /// Ticks between two reviews of the idle root state
    pub idle_review_interval: u64,

    /// Attack roll modulus
    ///
    /// An attack is started when `random % attack_roll_base < aggressivity + 1`.
    pub attack_roll_base: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            // Attack
            attack_threat_level: 3,
            small_military_max_knights: 4,
            food_search_radius: 4,
            material_search_radius: 4,
            mine_search_radius: 5,
            weapon_search_radius: 3,
            stock_search_radius: 4,

            // Find ore
            mountain_search_radius: 17,
            small_spot_base_time: 120_000,
            small_spot_time_step: 30_000,
            geologist_retry_delay: 10_000,
            geologist_busy_retry_delay: 30_000,
            retry_jitter_base: 120,
            retry_jitter_step: 2_000,

            // Build building
            build_search_radius: 8,
            build_retry_delay: 10_000,
            build_jitter_step: 500,

            // Idle
            idle_review_interval: 500,
            attack_roll_base: 40,
        }
    }
}

impl AiConfig {
    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AiConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.idle_review_interval == 0 {
            return Err(AiError::InvalidContext(
                "idle_review_interval must be positive".into(),
            ));
        }

        if self.attack_roll_base == 0 {
            return Err(AiError::InvalidContext(
                "attack_roll_base must be positive".into(),
            ));
        }

        if self.retry_jitter_base <= MAX_INTELLIGENCE as u64 {
            return Err(AiError::InvalidContext(format!(
                "retry_jitter_base ({}) must exceed max intelligence ({})",
                self.retry_jitter_base, MAX_INTELLIGENCE
            )));
        }

        if self.geologist_retry_delay == 0 || self.geologist_busy_retry_delay == 0 {
            return Err(AiError::InvalidContext("Retry delays must be positive".into()));
        }

        Ok(())
    }

    /// Game time after which small deposits become acceptable
    pub fn small_spot_threshold(&self, intelligence: u32) -> u64 {
        let missing = MAX_INTELLIGENCE.saturating_sub(intelligence) as u64;
        self.small_spot_base_time + missing * self.small_spot_time_step
    }

    /// Upper bound of the random part of a FindOre retry delay
    pub fn retry_jitter(&self, intelligence: u32) -> u64 {
        self.retry_jitter_base.saturating_sub(intelligence as u64) * self.retry_jitter_step
    }

    /// Upper bound of the random part of a construction retry delay
    pub fn build_jitter(&self, intelligence: u32) -> u64 {
        self.retry_jitter_base.saturating_sub(intelligence as u64) * self.build_jitter_step
    }
}
