//! Tiered progression scoring.
//!
//! A track converts upgrade runes into levels by paying a per-level cost drawn
//! from a [`CostTable`]. Each level-up awards `cost * points_per_unit`. Tracks
//! above the base tier are gated on the level of the tier directly below, and
//! the top tier has no level structure at all: runes convert at a flat rate.
//!
//! [`simulate`] is pure. The lower tier's level is passed in by the caller and
//! stays fixed for the whole call; levelling the lower tier in the same session
//! does not unblock this one until the caller simulates again with the new
//! level.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BRONZE_COST_STEP, BRONZE_FALLBACK_COST, BRONZE_POINTS_PER_RUNE, BRONZE_TABLE_LEVELS,
    GOLD_FALLBACK_COST, GOLD_GATE_MULTIPLIER, GOLD_POINTS_PER_RUNE, GOLD_RUNE_COSTS,
    LEGENDARY_POINTS_PER_RUNE, SILVER_FALLBACK_COST, SILVER_GATE_MULTIPLIER,
    SILVER_POINTS_PER_RUNE, SILVER_RUNE_COSTS,
};
use crate::numbers::saturating_u64_to_u32;

/// Dragon progression tracks, ordered from the base of the chain upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Legendary,
}

impl Tier {
    pub const ALL: [Self; 4] = [Self::Bronze, Self::Silver, Self::Gold, Self::Legendary];

    /// The tier directly below this one in the chain.
    #[must_use]
    pub const fn lower(self) -> Option<Self> {
        match self {
            Self::Bronze => None,
            Self::Silver => Some(Self::Bronze),
            Self::Gold => Some(Self::Silver),
            Self::Legendary => Some(Self::Gold),
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Legendary => "legendary",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bronze => write!(f, "Bronze"),
            Self::Silver => write!(f, "Silver"),
            Self::Gold => write!(f, "Gold"),
            Self::Legendary => write!(f, "Legendary"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tier: {s}"))
    }
}

/// Per-level rune costs with a constant fallback past the explicit entries.
///
/// `costs[0]` is the cost of reaching level 1, `costs[1]` of reaching level 2,
/// and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTable {
    pub costs: Vec<u64>,
    pub fallback: u64,
}

impl CostTable {
    #[must_use]
    pub const fn new(costs: Vec<u64>, fallback: u64) -> Self {
        Self { costs, fallback }
    }

    /// Cost of advancing from `level - 1` to `level`.
    #[must_use]
    pub fn cost_for(&self, level: u32) -> u64 {
        level
            .checked_sub(1)
            .and_then(|idx| self.costs.get(usize::try_from(idx).ok()?))
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Highest level with an explicit entry; later levels use the fallback.
    #[must_use]
    pub fn explicit_levels(&self) -> usize {
        self.costs.len()
    }

    fn validate(&self, tier: Tier) -> Result<(), TierConfigError> {
        if self.fallback == 0 {
            return Err(TierConfigError::ZeroFallback { tier });
        }
        if let Some(pos) = self.costs.iter().position(|&cost| cost == 0) {
            return Err(TierConfigError::ZeroCost {
                tier,
                level: pos + 1,
            });
        }
        Ok(())
    }
}

/// Gate requiring the lower tier to reach `next_level * level_multiplier`
/// before this tier can advance to `next_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteRule {
    pub lower_tier: Tier,
    pub level_multiplier: u32,
}

impl PrerequisiteRule {
    #[must_use]
    pub const fn required_lower_level(&self, next_level: u32) -> u32 {
        next_level.saturating_mul(self.level_multiplier)
    }

    /// Highest level the gate permits while the lower tier sits at
    /// `lower_level`.
    #[must_use]
    pub const fn max_level(&self, lower_level: u32) -> u32 {
        if self.required_lower_level(u32::MAX) <= lower_level {
            return u32::MAX;
        }
        lower_level / self.level_multiplier
    }
}

/// How a tier turns runes into points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progression {
    /// Sequential level-ups against a cost table, optionally gated.
    Leveled {
        costs: CostTable,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prerequisite: Option<PrerequisiteRule>,
    },
    /// Every rune converts at `points_per_unit`; no levels.
    FlatRate,
}

/// Balance configuration for one progression tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    pub tier: Tier,
    pub points_per_unit: u64,
    pub progression: Progression,
}

impl TierConfig {
    #[must_use]
    pub fn bronze() -> Self {
        let costs = (1..=u64::from(BRONZE_TABLE_LEVELS))
            .map(|level| level * BRONZE_COST_STEP)
            .collect();
        Self {
            tier: Tier::Bronze,
            points_per_unit: BRONZE_POINTS_PER_RUNE,
            progression: Progression::Leveled {
                costs: CostTable::new(costs, BRONZE_FALLBACK_COST),
                prerequisite: None,
            },
        }
    }

    #[must_use]
    pub fn silver() -> Self {
        Self {
            tier: Tier::Silver,
            points_per_unit: SILVER_POINTS_PER_RUNE,
            progression: Progression::Leveled {
                costs: CostTable::new(SILVER_RUNE_COSTS.to_vec(), SILVER_FALLBACK_COST),
                prerequisite: Some(PrerequisiteRule {
                    lower_tier: Tier::Bronze,
                    level_multiplier: SILVER_GATE_MULTIPLIER,
                }),
            },
        }
    }

    #[must_use]
    pub fn gold() -> Self {
        Self {
            tier: Tier::Gold,
            points_per_unit: GOLD_POINTS_PER_RUNE,
            progression: Progression::Leveled {
                costs: CostTable::new(GOLD_RUNE_COSTS.to_vec(), GOLD_FALLBACK_COST),
                prerequisite: Some(PrerequisiteRule {
                    lower_tier: Tier::Silver,
                    level_multiplier: GOLD_GATE_MULTIPLIER,
                }),
            },
        }
    }

    #[must_use]
    pub const fn legendary() -> Self {
        Self {
            tier: Tier::Legendary,
            points_per_unit: LEGENDARY_POINTS_PER_RUNE,
            progression: Progression::FlatRate,
        }
    }

    /// Default balance for `tier`.
    #[must_use]
    pub fn default_for(tier: Tier) -> Self {
        match tier {
            Tier::Bronze => Self::bronze(),
            Tier::Silver => Self::silver(),
            Tier::Gold => Self::gold(),
            Tier::Legendary => Self::legendary(),
        }
    }

    #[must_use]
    pub const fn prerequisite(&self) -> Option<PrerequisiteRule> {
        match &self.progression {
            Progression::Leveled { prerequisite, .. } => *prerequisite,
            Progression::FlatRate => None,
        }
    }

    /// Rune cost of reaching `level`, or `None` for flat-rate tiers.
    #[must_use]
    pub fn cost_for(&self, level: u32) -> Option<u64> {
        match &self.progression {
            Progression::Leveled { costs, .. } => Some(costs.cost_for(level)),
            Progression::FlatRate => None,
        }
    }

    /// Validate balance invariants.
    ///
    /// # Errors
    ///
    /// Returns `TierConfigError` when a cost is zero (a zero-cost level would
    /// never drain the pool) or when the gate does not point at the tier
    /// directly below.
    pub fn validate(&self) -> Result<(), TierConfigError> {
        let Progression::Leveled {
            costs,
            prerequisite,
        } = &self.progression
        else {
            return Ok(());
        };
        costs.validate(self.tier)?;
        if let Some(rule) = prerequisite {
            if Some(rule.lower_tier) != self.tier.lower() {
                return Err(TierConfigError::GateNotAdjacent {
                    tier: self.tier,
                    lower: rule.lower_tier,
                });
            }
        }
        Ok(())
    }
}

/// Errors raised when tier balance configuration is inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TierConfigError {
    #[error("{tier} cost for level {level} must be at least 1")]
    ZeroCost { tier: Tier, level: usize },
    #[error("{tier} fallback cost must be at least 1")]
    ZeroFallback { tier: Tier },
    #[error("{tier} may only be gated by the tier directly below it (got {lower})")]
    GateNotAdjacent { tier: Tier, lower: Tier },
    #[error("{slot} slot holds the {found} tier configuration")]
    MisplacedTier { slot: Tier, found: Tier },
}

/// Why a simulation gained no levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockedReason {
    /// The track has never been initialized (level 0).
    LevelNotSet,
    /// The lower tier must reach `required_level` first.
    PrerequisiteUnmet { lower_tier: Tier, required_level: u32 },
}

impl std::fmt::Display for BlockedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LevelNotSet => write!(f, "level not set"),
            Self::PrerequisiteUnmet {
                lower_tier,
                required_level,
            } => write!(f, "Need {lower_tier} level {required_level}"),
        }
    }
}

/// Outcome of running one tier's rune pool through its level costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub levels_gained: u32,
    pub new_level: u32,
    pub total_resources_consumed: u64,
    pub remaining_resources: u64,
    pub points_earned: u64,
    /// Cost of the level after `new_level`; 0 for flat-rate or unset tracks.
    pub next_level_cost: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<BlockedReason>,
}

impl SimulationResult {
    #[must_use]
    pub const fn can_level_up(&self) -> bool {
        self.levels_gained > 0
    }

    /// Runes still missing for the next single level.
    #[must_use]
    pub const fn shortfall(&self) -> u64 {
        self.next_level_cost.saturating_sub(self.remaining_resources)
    }

    const fn unset(level: u32, resources_owned: u64) -> Self {
        Self {
            levels_gained: 0,
            new_level: level,
            total_resources_consumed: 0,
            remaining_resources: resources_owned,
            points_earned: 0,
            next_level_cost: 0,
            blocked_reason: Some(BlockedReason::LevelNotSet),
        }
    }
}

/// Simulate sequential level-ups for one tier.
///
/// `lower_tier_level` is the stored level of the tier named by the gate; it is
/// ignored for ungated tiers and treated as 0 when absent for gated ones.
#[must_use]
pub fn simulate(
    config: &TierConfig,
    current_level: u32,
    resources_owned: u64,
    lower_tier_level: Option<u32>,
) -> SimulationResult {
    let (costs, prerequisite) = match &config.progression {
        Progression::FlatRate => {
            return SimulationResult {
                levels_gained: 0,
                new_level: current_level,
                total_resources_consumed: resources_owned,
                remaining_resources: 0,
                points_earned: resources_owned.saturating_mul(config.points_per_unit),
                next_level_cost: 0,
                blocked_reason: None,
            };
        }
        Progression::Leveled {
            costs,
            prerequisite,
        } => (costs, *prerequisite),
    };

    if current_level == 0 {
        log::debug!("{} track not initialized; skipping", config.tier);
        return SimulationResult::unset(current_level, resources_owned);
    }

    let lower_level = lower_tier_level.unwrap_or(0);
    let level_cap = prerequisite.map_or(u32::MAX, |rule| rule.max_level(lower_level));
    let gate_for = |next: u32| {
        prerequisite
            .filter(|_| next > level_cap)
            .map(|rule| (rule, rule.required_lower_level(next)))
    };

    let mut level = current_level;
    let mut pool = resources_owned;
    let mut consumed: u64 = 0;
    let mut points: u64 = 0;
    let mut gains: u32 = 0;

    while pool > 0 {
        let next = level.saturating_add(1);
        if gate_for(next).is_some() {
            break;
        }
        let cost = costs.cost_for(next);
        if cost == 0 || pool < cost || next == level {
            break;
        }
        if usize::try_from(next).is_ok_and(|next| next > costs.explicit_levels()) {
            // Past the table every level costs the fallback.
            let steps =
                saturating_u64_to_u32(pool / cost).min(level_cap.saturating_sub(level));
            let spent = u64::from(steps) * cost;
            pool -= spent;
            consumed += spent;
            points = points.saturating_add(spent.saturating_mul(config.points_per_unit));
            level += steps;
            gains += steps;
            log::trace!("{} reached level {level} at fallback cost {cost}", config.tier);
            break;
        }
        pool -= cost;
        consumed += cost;
        points = points.saturating_add(cost.saturating_mul(config.points_per_unit));
        level = next;
        gains += 1;
        log::trace!("{} reached level {level} for {cost} runes", config.tier);
    }

    let blocked_reason = if gains == 0 {
        gate_for(current_level.saturating_add(1)).map(|(rule, required_level)| {
            BlockedReason::PrerequisiteUnmet {
                lower_tier: rule.lower_tier,
                required_level,
            }
        })
    } else {
        None
    };

    let result = SimulationResult {
        levels_gained: gains,
        new_level: level,
        total_resources_consumed: consumed,
        remaining_resources: pool,
        points_earned: points,
        next_level_cost: costs.cost_for(level.saturating_add(1)),
        blocked_reason,
    };
    log::debug!(
        "{} simulated: +{} levels to {}, {} runes used, {} left, {} points",
        config.tier,
        result.levels_gained,
        result.new_level,
        result.total_resources_consumed,
        result.remaining_resources,
        result.points_earned
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_5_10() -> TierConfig {
        TierConfig {
            tier: Tier::Bronze,
            points_per_unit: 1,
            progression: Progression::Leveled {
                costs: CostTable::new(vec![5, 10, 15], 20),
                prerequisite: None,
            },
        }
    }

    fn assert_conserved(result: &SimulationResult, owned: u64, start: u32) {
        assert_eq!(
            result.remaining_resources + result.total_resources_consumed,
            owned
        );
        assert_eq!(result.new_level, start + result.levels_gained);
    }

    #[test]
    fn cost_lookup_uses_fallback_past_table() {
        let table = CostTable::new(vec![5, 10], 99);
        assert_eq!(table.cost_for(1), 5);
        assert_eq!(table.cost_for(2), 10);
        assert_eq!(table.cost_for(3), 99);
        assert_eq!(table.cost_for(0), 99);
        assert_eq!(table.explicit_levels(), 2);
    }

    #[test]
    fn cost_lookup_does_not_assume_monotonic_costs() {
        let table = CostTable::new(vec![30, 5, 40], 1);
        assert_eq!(table.cost_for(2), 5);
        let config = TierConfig {
            tier: Tier::Bronze,
            points_per_unit: 2,
            progression: Progression::Leveled {
                costs: table,
                prerequisite: None,
            },
        };
        let result = simulate(&config, 1, 10, None);
        assert_eq!(result.levels_gained, 1);
        assert_eq!(result.remaining_resources, 5);
        assert_eq!(result.next_level_cost, 40);
        assert_eq!(result.points_earned, 10);
    }

    #[test]
    fn per_step_costs_are_not_pre_summed() {
        let result = simulate(&table_5_10(), 1, 15, None);
        assert_eq!(result.levels_gained, 1);
        assert_eq!(result.total_resources_consumed, 10);
        assert_eq!(result.remaining_resources, 5);
        assert_eq!(result.new_level, 2);
        assert_conserved(&result, 15, 1);
    }

    #[test]
    fn multiple_level_ups_continue_into_fallback() {
        // 10 + 15 + 20 + 20 = 65
        let result = simulate(&table_5_10(), 1, 70, None);
        assert_eq!(result.levels_gained, 4);
        assert_eq!(result.new_level, 5);
        assert_eq!(result.total_resources_consumed, 65);
        assert_eq!(result.remaining_resources, 5);
        assert_eq!(result.points_earned, 65);
        assert_eq!(result.next_level_cost, 20);
        assert_eq!(result.shortfall(), 15);
        assert!(result.blocked_reason.is_none());
    }

    #[test]
    fn zero_level_short_circuits() {
        let result = simulate(&table_5_10(), 0, 1_000_000, None);
        assert_eq!(result.levels_gained, 0);
        assert_eq!(result.remaining_resources, 1_000_000);
        assert_eq!(result.points_earned, 0);
        assert_eq!(result.blocked_reason, Some(BlockedReason::LevelNotSet));
        assert_eq!(
            result.blocked_reason.map(|r| r.to_string()).as_deref(),
            Some("level not set")
        );
    }

    #[test]
    fn resource_shortfall_has_no_reason() {
        let result = simulate(&table_5_10(), 1, 9, None);
        assert_eq!(result.levels_gained, 0);
        assert!(result.blocked_reason.is_none());
        assert_eq!(result.shortfall(), 1);
        assert!(!result.can_level_up());
    }

    #[test]
    fn gate_blocks_even_with_plenty_of_runes() {
        let silver = TierConfig::silver();
        // Silver 1 -> 2 needs Bronze 10.
        let result = simulate(&silver, 1, 10_000, Some(9));
        assert_eq!(result.levels_gained, 0);
        assert_eq!(result.remaining_resources, 10_000);
        assert_eq!(
            result.blocked_reason,
            Some(BlockedReason::PrerequisiteUnmet {
                lower_tier: Tier::Bronze,
                required_level: 10,
            })
        );
        assert_eq!(
            result.blocked_reason.map(|r| r.to_string()).as_deref(),
            Some("Need Bronze level 10")
        );
    }

    #[test]
    fn gate_reported_with_empty_pool() {
        let result = simulate(&TierConfig::gold(), 3, 0, Some(100));
        assert_eq!(
            result.blocked_reason,
            Some(BlockedReason::PrerequisiteUnmet {
                lower_tier: Tier::Silver,
                required_level: 400,
            })
        );
    }

    #[test]
    fn missing_lower_level_counts_as_zero() {
        let result = simulate(&TierConfig::silver(), 1, 500, None);
        assert_eq!(result.levels_gained, 0);
        assert!(matches!(
            result.blocked_reason,
            Some(BlockedReason::PrerequisiteUnmet { .. })
        ));
    }

    #[test]
    fn gate_can_start_blocking_mid_loop() {
        // Bronze 15 allows Silver levels 2 and 3 but not 4.
        let result = simulate(&TierConfig::silver(), 1, 1_000, Some(15));
        assert_eq!(result.levels_gained, 2);
        assert_eq!(result.new_level, 3);
        // Silver costs for levels 2 and 3 are 5 and 7.
        assert_eq!(result.total_resources_consumed, 12);
        assert_eq!(result.points_earned, 12 * 700);
        assert!(result.blocked_reason.is_none());
        assert_conserved(&result, 1_000, 1);
    }

    #[test]
    fn flat_rate_ignores_level() {
        let legendary = TierConfig::legendary();
        for level in [0, 1, 57] {
            let result = simulate(&legendary, level, 3, None);
            assert_eq!(result.points_earned, 42_000);
            assert_eq!(result.remaining_resources, 0);
            assert_eq!(result.total_resources_consumed, 3);
            assert_eq!(result.levels_gained, 0);
            assert_eq!(result.new_level, level);
        }
    }

    #[test]
    fn simulation_is_deterministic() {
        let gold = TierConfig::gold();
        let first = simulate(&gold, 2, 777, Some(2_400));
        let second = simulate(&gold, 2, 777, Some(2_400));
        assert_eq!(first, second);
    }

    #[test]
    fn default_tables_keep_balance_cutoffs() {
        let bronze = TierConfig::bronze();
        assert_eq!(bronze.cost_for(1), Some(5));
        assert_eq!(bronze.cost_for(50), Some(250));
        assert_eq!(bronze.cost_for(51), Some(250));
        let silver = TierConfig::silver();
        assert_eq!(silver.cost_for(1), Some(2));
        assert_eq!(silver.cost_for(50), Some(125));
        assert_eq!(silver.cost_for(51), Some(125));
        let gold = TierConfig::gold();
        assert_eq!(gold.cost_for(24), Some(240));
        assert_eq!(gold.cost_for(25), Some(66));
        assert_eq!(TierConfig::legendary().cost_for(3), None);
    }

    #[test]
    fn validate_rejects_zero_costs_and_skipped_gates() {
        let mut config = table_5_10();
        if let Progression::Leveled { costs, .. } = &mut config.progression {
            costs.costs[1] = 0;
        }
        assert_eq!(
            config.validate(),
            Err(TierConfigError::ZeroCost {
                tier: Tier::Bronze,
                level: 2,
            })
        );

        let mut gold = TierConfig::gold();
        if let Progression::Leveled { prerequisite, .. } = &mut gold.progression {
            *prerequisite = Some(PrerequisiteRule {
                lower_tier: Tier::Bronze,
                level_multiplier: 1,
            });
        }
        assert!(matches!(
            gold.validate(),
            Err(TierConfigError::GateNotAdjacent { .. })
        ));
        for tier in Tier::ALL {
            assert!(TierConfig::default_for(tier).validate().is_ok());
        }
    }

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!("Gold".parse::<Tier>(), Ok(Tier::Gold));
        assert!("platinum".parse::<Tier>().is_err());
    }

    #[test]
    fn fallback_levels_respect_gate_cap() {
        // Bronze 400 lets Silver reach 80; 20 fallback levels at 125 each.
        let result = simulate(&TierConfig::silver(), 60, 1_000_000_000, Some(400));
        assert_eq!(result.new_level, 80);
        assert_eq!(result.total_resources_consumed, 2_500);
        assert_eq!(result.points_earned, 2_500 * 700);
    }

    #[test]
    fn huge_pools_stop_at_the_level_ceiling() {
        let result = simulate(&TierConfig::bronze(), 50, u64::MAX, None);
        assert_eq!(result.new_level, u32::MAX);
        assert_eq!(result.levels_gained, u32::MAX - 50);
        assert_eq!(
            result.remaining_resources + result.total_resources_consumed,
            u64::MAX
        );
    }

    #[test]
    fn gate_cap_agrees_with_required_level() {
        let rule = PrerequisiteRule {
            lower_tier: Tier::Bronze,
            level_multiplier: SILVER_GATE_MULTIPLIER,
        };
        for lower in [0, 9, 10, 399, 400, u32::MAX - 1, u32::MAX] {
            let cap = rule.max_level(lower);
            assert!(rule.required_lower_level(cap) <= lower);
            if cap < u32::MAX {
                assert!(rule.required_lower_level(cap + 1) > lower);
            }
        }
        assert_eq!(rule.max_level(u32::MAX), u32::MAX);
    }

    #[test]
    fn maxed_lower_tier_never_caps_fallback_levels() {
        let result = simulate(&TierConfig::silver(), 60, u64::MAX, Some(u32::MAX));
        assert_eq!(result.new_level, u32::MAX);
        assert_eq!(result.blocked_reason, None);
    }
}
