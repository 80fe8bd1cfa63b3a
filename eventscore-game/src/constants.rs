//! Centralized balance constants for event-day scoring.
//!
//! These values mirror the in-game point tables. They are game-balance data,
//! so the exact cutoffs and fallbacks matter: changing one shifts every
//! computed total for the affected track.

// Dragon tracks ------------------------------------------------------------
/// Bronze level *n* costs `n * BRONZE_COST_STEP` runes up to the table cutoff.
pub(crate) const BRONZE_COST_STEP: u64 = 5;
pub(crate) const BRONZE_TABLE_LEVELS: u32 = 50;
pub(crate) const BRONZE_FALLBACK_COST: u64 = 250;
pub(crate) const BRONZE_POINTS_PER_RUNE: u64 = 70;

pub(crate) const SILVER_RUNE_COSTS: [u64; 50] = [
    2, 5, 7, 10, 12, 15, 17, 20, 22, 25, 27, 30, 32, 35, 37, 40, 42, 45, 47, 50, 52, 55, 57, 60, 62,
    65, 67, 70, 72, 75, 77, 80, 82, 85, 87, 90, 92, 95, 97, 100, 102, 105, 107, 110, 112, 115, 117,
    120, 122, 125,
];
pub(crate) const SILVER_FALLBACK_COST: u64 = 125;
pub(crate) const SILVER_POINTS_PER_RUNE: u64 = 700;
/// Silver level *n* requires Bronze level `n * SILVER_GATE_MULTIPLIER`.
pub(crate) const SILVER_GATE_MULTIPLIER: u32 = 5;

pub(crate) const GOLD_RUNE_COSTS: [u64; 24] = [
    20, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120, 130, 140, 150, 160, 170, 180, 190, 200, 210,
    220, 230, 240,
];
pub(crate) const GOLD_FALLBACK_COST: u64 = 66;
pub(crate) const GOLD_POINTS_PER_RUNE: u64 = 7_000;
/// Gold level *n* requires Silver level `n * GOLD_GATE_MULTIPLIER`.
pub(crate) const GOLD_GATE_MULTIPLIER: u32 = 100;

pub(crate) const LEGENDARY_POINTS_PER_RUNE: u64 = 14_000;

// Shared resources ---------------------------------------------------------
pub(crate) const GALLERY_SHARD_POINTS: u64 = 1_000;

// Ultimate hunting -----------------------------------------------------------
pub(crate) const DAILY_VIDEO_AP: u64 = 250;
pub(crate) const HUNTING_HERO_BONUS_PCT: u64 = 10;
pub(crate) const HUNTING_MIKU_BONUS_PCT: u64 = 20;

// Schedule -------------------------------------------------------------------
/// Local hour at which the active event day rolls over.
pub const ROLLOVER_HOUR: u32 = 20;
pub(crate) const WEEK_MILLIS: i64 = 7 * 24 * 60 * 60 * 1_000;
pub(crate) const STORAGE_KEY_PREFIX: &str = "scores_week_";
