//! AI personality loaded from TOML
//!
//! A personality fixes how clever, aggressive and expansive an AI player
//! is, and which players and buildings it prefers to attack.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::MAX_INTELLIGENCE;
use crate::core::error::{AiError, Result};
use crate::world::GameWorld;

/// Highest value of the aggressivity/focus/skill/smartness traits
pub const MAX_TRAIT_LEVEL: u32 = 2;

/// First filter applied to the list of possible victims
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryPlayerCriterion {
    #[default]
    Any,
    Human,
    Ai,
}

/// Tie-break between the victims left by the primary criterion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryPlayerCriterion {
    #[default]
    Random,
    /// Lowest total military score
    Weakest,
    /// Lowest overall score
    Worst,
    /// Lowest garrison settings, then fewest knights
    WorstProtected,
}

/// Category of enemy building an attack aims for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackTarget {
    #[default]
    Random,
    SmallMilitary,
    FoodProduction,
    MaterialProduction,
    Mines,
    WeaponProduction,
    Stocks,
}

/// Per-player AI parameters, immutable during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiContext {
    /// Name of this personality (set from filename)
    pub name: String,
    /// 0 (erratic) to 50 (genius)
    pub intelligence: u32,
    pub aggressivity: u32,
    pub expand_focus: u32,
    pub military_focus: u32,
    pub military_skill: u32,
    pub smartness: u32,
    /// Whether the game currently allows this player to attack
    pub can_attack: bool,
    pub primary_player_criterion: PrimaryPlayerCriterion,
    pub secondary_player_criterion: SecondaryPlayerCriterion,
    pub primary_target: AttackTarget,
    pub secondary_target: AttackTarget,
}

impl Default for AiContext {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            intelligence: 25,
            aggressivity: 1,
            expand_focus: 1,
            military_focus: 1,
            military_skill: 1,
            smartness: 1,
            can_attack: true,
            primary_player_criterion: PrimaryPlayerCriterion::Any,
            secondary_player_criterion: SecondaryPlayerCriterion::Random,
            primary_target: AttackTarget::Random,
            secondary_target: AttackTarget::Random,
        }
    }
}

impl AiContext {
    /// Check that every trait lies in its documented range
    pub fn validate(&self) -> Result<()> {
        if self.intelligence > MAX_INTELLIGENCE {
            return Err(AiError::InvalidContext(format!(
                "intelligence {} exceeds {}",
                self.intelligence, MAX_INTELLIGENCE
            )));
        }

        let traits = [
            ("aggressivity", self.aggressivity),
            ("expand_focus", self.expand_focus),
            ("military_focus", self.military_focus),
            ("military_skill", self.military_skill),
            ("smartness", self.smartness),
        ];
        for (name, value) in traits {
            if value > MAX_TRAIT_LEVEL {
                return Err(AiError::InvalidContext(format!(
                    "{} {} exceeds {}",
                    name, value, MAX_TRAIT_LEVEL
                )));
            }
        }

        Ok(())
    }

    /// Random override letting a less intelligent AI act against its plan
    pub fn impulsive_decision<W: GameWorld + ?Sized>(&self, world: &mut W) -> bool {
        world.random_int() % (self.intelligence + 2) == 0
    }
}

/// Load personality from TOML file
///
/// Loads from `data/personalities/{name}.toml`
pub fn load_personality(name: &str) -> Result<AiContext> {
    load_personality_from(Path::new("data/personalities"), name)
}

/// Load personality `name` from a custom directory
pub fn load_personality_from(dir: &Path, name: &str) -> Result<AiContext> {
    let path = personality_path(dir, name);
    let contents = fs::read_to_string(&path)?;

    let mut context: AiContext = toml::from_str(&contents)?;
    context.name = name.to_string();
    context.validate()?;
    Ok(context)
}

fn personality_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.toml", name))
}
