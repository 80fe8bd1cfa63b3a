//! Dragon day: four chained rune tracks scored in one pass.
//!
//! Each gated tier reads the *entered* level of the tier below it from the same
//! input, never the level that tier would reach after its own simulation.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::input::{normalize_count, normalize_level};
use crate::progression::{SimulationResult, Tier, TierConfig, TierConfigError, simulate};

/// Balance configuration for the four dragon tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragonConfig {
    pub bronze: TierConfig,
    pub silver: TierConfig,
    pub gold: TierConfig,
    pub legendary: TierConfig,
}

impl Default for DragonConfig {
    fn default() -> Self {
        Self {
            bronze: TierConfig::bronze(),
            silver: TierConfig::silver(),
            gold: TierConfig::gold(),
            legendary: TierConfig::legendary(),
        }
    }
}

impl DragonConfig {
    #[must_use]
    pub const fn tier(&self, tier: Tier) -> &TierConfig {
        match tier {
            Tier::Bronze => &self.bronze,
            Tier::Silver => &self.silver,
            Tier::Gold => &self.gold,
            Tier::Legendary => &self.legendary,
        }
    }

    /// Validate every tier and that each slot holds its own tier.
    ///
    /// # Errors
    ///
    /// Returns the first `TierConfigError` found.
    pub fn validate(&self) -> Result<(), TierConfigError> {
        for slot in Tier::ALL {
            let config = self.tier(slot);
            if config.tier != slot {
                return Err(TierConfigError::MisplacedTier {
                    slot,
                    found: config.tier,
                });
            }
            config.validate()?;
        }
        Ok(())
    }
}

/// Entered level and rune count for one track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierInput {
    #[serde(default)]
    pub current_level: u32,
    #[serde(default)]
    pub resources_owned: u64,
}

impl TierInput {
    #[must_use]
    pub const fn new(current_level: u32, resources_owned: u64) -> Self {
        Self {
            current_level,
            resources_owned,
        }
    }

    /// Build from raw form text, normalizing anything non-numeric to 0.
    #[must_use]
    pub fn from_raw(level: &str, resources: &str) -> Self {
        Self::new(normalize_level(level), normalize_count(resources))
    }
}

/// Inputs for all four dragon tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragonInput {
    #[serde(default)]
    pub bronze: TierInput,
    #[serde(default)]
    pub silver: TierInput,
    #[serde(default)]
    pub gold: TierInput,
    #[serde(default)]
    pub legendary: TierInput,
}

impl DragonInput {
    #[must_use]
    pub const fn tier(&self, tier: Tier) -> TierInput {
        match tier {
            Tier::Bronze => self.bronze,
            Tier::Silver => self.silver,
            Tier::Gold => self.gold,
            Tier::Legendary => self.legendary,
        }
    }
}

/// Simulation result for one named tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierOutcome {
    pub tier: Tier,
    pub result: SimulationResult,
}

/// Per-tier breakdown for a dragon day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragonBreakdown {
    pub tiers: SmallVec<[TierOutcome; 4]>,
}

impl DragonBreakdown {
    #[must_use]
    pub fn get(&self, tier: Tier) -> Option<&SimulationResult> {
        self.tiers
            .iter()
            .find(|outcome| outcome.tier == tier)
            .map(|outcome| &outcome.result)
    }

    /// Sum of points across all tiers.
    #[must_use]
    pub fn points(&self) -> u64 {
        self.tiers
            .iter()
            .map(|outcome| outcome.result.points_earned)
            .fold(0, u64::saturating_add)
    }
}

/// Simulate every dragon tier from its entered level and rune count.
#[must_use]
pub fn evaluate_dragons(config: &DragonConfig, input: &DragonInput) -> DragonBreakdown {
    let tiers = Tier::ALL
        .into_iter()
        .map(|tier| {
            let tier_config = config.tier(tier);
            let entry = input.tier(tier);
            let lower_level = tier_config
                .prerequisite()
                .map(|rule| input.tier(rule.lower_tier).current_level);
            TierOutcome {
                tier,
                result: simulate(
                    tier_config,
                    entry.current_level,
                    entry.resources_owned,
                    lower_level,
                ),
            }
        })
        .collect();
    DragonBreakdown { tiers }
}
