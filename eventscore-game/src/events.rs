//! Event-day catalog and per-day score sheets.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::batch::BatchResource;
use crate::constants::GALLERY_SHARD_POINTS;
use crate::dragon::{DragonBreakdown, DragonConfig, DragonInput, evaluate_dragons};
use crate::hunting::{HuntingConfig, HuntingConfigError};
use crate::progression::TierConfigError;
use crate::total::total;

/// The six scheduled event days, Monday through Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventDay {
    Unit,
    Summon,
    Witch,
    Gear,
    Dragon,
    Hero,
}

impl EventDay {
    pub const ALL: [Self; 6] = [
        Self::Unit,
        Self::Summon,
        Self::Witch,
        Self::Gear,
        Self::Dragon,
        Self::Hero,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Summon => "summon",
            Self::Witch => "witch",
            Self::Gear => "gear",
            Self::Dragon => "dragon",
            Self::Hero => "hero",
        }
    }

    /// Weekly record field holding the saved total.
    #[must_use]
    pub const fn score_field(self) -> &'static str {
        match self {
            Self::Unit => "unit_day_score",
            Self::Summon => "summon_day_score",
            Self::Witch => "witch_day_score",
            Self::Gear => "gear_day_score",
            Self::Dragon => "dragon_day_score",
            Self::Hero => "hero_day_score",
        }
    }

    /// Weekly record field holding the manually entered starting score.
    #[must_use]
    pub const fn starting_field(self) -> &'static str {
        match self {
            Self::Unit => "unit_day_starting_score",
            Self::Summon => "summon_day_starting_score",
            Self::Witch => "witch_day_starting_score",
            Self::Gear => "gear_day_starting_score",
            Self::Dragon => "dragon_day_starting_score",
            Self::Hero => "hero_day_starting_score",
        }
    }

    /// Older records spelled some score fields differently.
    #[must_use]
    pub const fn legacy_score_field(self) -> Option<&'static str> {
        match self {
            Self::Gear => Some("ger_day_score"),
            Self::Hero => Some("heroes_day_score"),
            Self::Unit | Self::Summon | Self::Witch | Self::Dragon => None,
        }
    }

    /// Day index with Monday = 0, the weekday this event runs on.
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Self::Unit => 0,
            Self::Summon => 1,
            Self::Witch => 2,
            Self::Gear => 3,
            Self::Dragon => 4,
            Self::Hero => 5,
        }
    }

    #[must_use]
    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Unit),
            1 => Some(Self::Summon),
            2 => Some(Self::Witch),
            3 => Some(Self::Gear),
            4 => Some(Self::Dragon),
            5 => Some(Self::Hero),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit => write!(f, "Unit Day"),
            Self::Summon => write!(f, "Summon Day"),
            Self::Witch => write!(f, "Witch Day"),
            Self::Gear => write!(f, "Gear Day"),
            Self::Dragon => write!(f, "Dragon Day"),
            Self::Hero => write!(f, "Hero Day"),
        }
    }
}

impl std::str::FromStr for EventDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let needle = lowered.trim_end_matches("-day").trim_end_matches("_day");
        Self::ALL
            .into_iter()
            .find(|day| day.key() == needle)
            .ok_or_else(|| format!("unknown event day: {s}"))
    }
}

/// Errors raised when catalog data is malformed.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is invalid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{board} resource {id} has a batch size of 0")]
    ZeroBatchSize { board: String, id: String },
    #[error("{board} lists resource {id} more than once")]
    DuplicateResource { board: String, id: String },
    #[error("Ultimate Hunting table is invalid: {0}")]
    Hunting(#[from] HuntingConfigError),
    #[error(transparent)]
    Tier(#[from] TierConfigError),
}

/// Errors raised when scoring a filled-in sheet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("{board} has no resource named {id}")]
    UnknownResource { board: String, id: String },
    #[error("dragon tracks can only be scored on Dragon Day, not {day}")]
    DragonsOutsideDragonDay { day: EventDay },
    #[error("no hero named {name} grants an ultimate hunting bonus")]
    UnknownHero { name: String },
}

/// What a user enters for one day's form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    #[serde(default)]
    pub starting_score: u64,
    #[serde(default)]
    pub resources: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dragons: Option<DragonInput>,
}

/// Points for one batch resource line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLine {
    pub id: String,
    pub amount: u64,
    pub points: u64,
}

/// Fully scored form: resource lines, dragon breakdown and the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub starting_score: u64,
    pub lines: Vec<ResourceLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dragons: Option<DragonBreakdown>,
    pub total: u64,
}

impl ScoreSheet {
    /// Points earned on top of the starting score.
    #[must_use]
    pub const fn earned(&self) -> u64 {
        self.total.saturating_sub(self.starting_score)
    }
}

/// Every point table the calculator knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub days: BTreeMap<EventDay, Vec<BatchResource>>,
    #[serde(default = "Catalog::default_ultimate_power")]
    pub ultimate_power: Vec<BatchResource>,
    #[serde(default)]
    pub dragon: DragonConfig,
    #[serde(default)]
    pub hunting: HuntingConfig,
}

impl Default for Catalog {
    fn default() -> Self {
        let shards = || BatchResource::per_unit("gallery_shards", GALLERY_SHARD_POINTS);
        let days = BTreeMap::from([
            (
                EventDay::Unit,
                vec![
                    BatchResource::per_unit("tier1_tome", 800),
                    BatchResource::per_unit("tier2_tome", 4_000),
                    BatchResource::per_unit("tier3_tome", 20_000),
                    BatchResource::per_unit("tier4_tome", 100_000),
                    BatchResource::new("crowns", 140, 5),
                    BatchResource::new("talent_books", 70, 25),
                    shards(),
                ],
            ),
            (
                EventDay::Summon,
                vec![
                    BatchResource::per_unit("summon_scroll", 500),
                    BatchResource::per_unit("epic_summon", 2_000),
                    BatchResource::per_unit("legendary_summon", 5_000),
                ],
            ),
            (
                EventDay::Witch,
                vec![
                    BatchResource::per_unit("light_reagent", 70),
                    BatchResource::new("strengthening_potions", 70, 10),
                    BatchResource::per_unit("fortune_potions", 140),
                    shards(),
                ],
            ),
            (
                EventDay::Gear,
                vec![BatchResource::per_unit("forge_hammer", 100), shards()],
            ),
            (EventDay::Dragon, vec![shards()]),
            (
                EventDay::Hero,
                vec![
                    BatchResource::per_unit("n_hero_card", 100),
                    BatchResource::per_unit("r_hero_card", 700),
                    BatchResource::per_unit("sr_hero_card", 3_500),
                    BatchResource::per_unit("ssr_hero_card", 14_000),
                    shards(),
                ],
            ),
        ]);
        Self {
            days,
            ultimate_power: Self::default_ultimate_power(),
            dragon: DragonConfig::default(),
            hunting: HuntingConfig::default(),
        }
    }
}

impl Catalog {
    fn default_ultimate_power() -> Vec<BatchResource> {
        [
            ("n_hero_card", 100),
            ("r_hero_card", 700),
            ("sr_hero_card", 3_500),
            ("ssr_hero_card", 14_000),
            ("tier1_unit_tome", 800),
            ("tier2_unit_tome", 4_000),
            ("tier3_unit_tome", 20_000),
            ("tier4_unit_tome", 100_000),
            ("rare_dragon_rune", 70),
            ("fine_dragon_rune", 700),
            ("perfect_dragon_rune", 7_000),
            ("epic_dragon_rune", 14_000),
            ("stone", 100),
            ("wood", 500),
            ("steel", 2_000),
            ("light_reagent", 70),
            ("strengthening_potion", 3),
            ("fortune_potion", 28),
            ("forge_hammer", 100),
        ]
        .into_iter()
        .map(|(id, points)| BatchResource::per_unit(id, points))
        .collect()
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate batch sizes, resource uniqueness and the dragon tiers.
    ///
    /// # Errors
    ///
    /// Returns the first `CatalogError` found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (day, resources) in &self.days {
            validate_resources(&day.to_string(), resources)?;
        }
        validate_resources("Ultimate Power", &self.ultimate_power)?;
        self.dragon.validate()?;
        self.hunting.validate()?;
        Ok(())
    }

    /// Batch resources scored on `day`; empty for days without a table.
    #[must_use]
    pub fn resources(&self, day: EventDay) -> &[BatchResource] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Score one day's entry.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError` for resources the day does not list, or for dragon
    /// input on any day other than Dragon Day.
    pub fn score_day(&self, day: EventDay, entry: &DayEntry) -> Result<ScoreSheet, ScoreError> {
        let dragons = match (&entry.dragons, day) {
            (Some(input), EventDay::Dragon) => Some(evaluate_dragons(&self.dragon, input)),
            (Some(_), other) => return Err(ScoreError::DragonsOutsideDragonDay { day: other }),
            (None, _) => None,
        };
        let sheet = score_resources(
            &day.to_string(),
            self.resources(day),
            entry.starting_score,
            &entry.resources,
            dragons,
        )?;
        log::debug!("{day} scored {} ({} earned)", sheet.total, sheet.earned());
        Ok(sheet)
    }

    /// Score the Ultimate Power calculator. Nothing here is saved.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::UnknownResource` for unlisted resources.
    pub fn score_ultimate_power(
        &self,
        starting_score: u64,
        amounts: &BTreeMap<String, u64>,
    ) -> Result<ScoreSheet, ScoreError> {
        score_resources(
            "Ultimate Power",
            &self.ultimate_power,
            starting_score,
            amounts,
            None,
        )
    }
}

fn validate_resources(board: &str, resources: &[BatchResource]) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for resource in resources {
        if resource.batch_size == 0 {
            return Err(CatalogError::ZeroBatchSize {
                board: board.to_string(),
                id: resource.id.clone(),
            });
        }
        if !seen.insert(resource.id.as_str()) {
            return Err(CatalogError::DuplicateResource {
                board: board.to_string(),
                id: resource.id.clone(),
            });
        }
    }
    Ok(())
}

fn score_resources(
    board: &str,
    table: &[BatchResource],
    starting_score: u64,
    amounts: &BTreeMap<String, u64>,
    dragons: Option<DragonBreakdown>,
) -> Result<ScoreSheet, ScoreError> {
    if let Some(id) = amounts
        .keys()
        .find(|id| !table.iter().any(|resource| &resource.id == *id))
    {
        log::warn!("{board} rejected unknown resource {id}");
        return Err(ScoreError::UnknownResource {
            board: board.to_string(),
            id: id.clone(),
        });
    }

    let lines: Vec<ResourceLine> = table
        .iter()
        .map(|resource| {
            let amount = amounts.get(&resource.id).copied().unwrap_or(0);
            ResourceLine {
                id: resource.id.clone(),
                amount,
                points: resource.score(amount),
            }
        })
        .collect();

    let dragon_points = dragons.as_ref().map(DragonBreakdown::points);
    let total = total(
        starting_score,
        lines.iter().map(|line| line.points).chain(dragon_points),
    );
    Ok(ScoreSheet {
        starting_score,
        lines,
        dragons,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dragon::TierInput;

    fn amounts(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs
            .iter()
            .map(|&(id, amount)| (id.to_string(), amount))
            .collect()
    }

    #[test]
    fn unit_day_applies_batches() {
        let catalog = Catalog::default();
        let entry = DayEntry {
            starting_score: 1_000,
            resources: amounts(&[("crowns", 24), ("talent_books", 60), ("tier2_tome", 2)]),
            dragons: None,
        };
        let sheet = catalog.score_day(EventDay::Unit, &entry).unwrap();
        // 4 * 140 + 2 * 70 + 2 * 4000
        assert_eq!(sheet.total, 1_000 + 560 + 140 + 8_000);
        assert_eq!(sheet.earned(), 8_700);
        assert_eq!(sheet.lines.len(), 7);
    }

    #[test]
    fn dragon_day_includes_tracks_and_shards() {
        let catalog = Catalog::default();
        let entry = DayEntry {
            starting_score: 1_000,
            resources: amounts(&[("gallery_shards", 2)]),
            dragons: Some(DragonInput {
                legendary: TierInput::new(1, 3),
                ..DragonInput::default()
            }),
        };
        let sheet = catalog.score_day(EventDay::Dragon, &entry).unwrap();
        assert_eq!(sheet.total, 1_000 + 2_000 + 42_000);
        assert!(sheet.dragons.is_some());
    }

    #[test]
    fn dragons_rejected_on_other_days() {
        let entry = DayEntry {
            dragons: Some(DragonInput::default()),
            ..DayEntry::default()
        };
        assert_eq!(
            Catalog::default().score_day(EventDay::Gear, &entry),
            Err(ScoreError::DragonsOutsideDragonDay {
                day: EventDay::Gear
            })
        );
    }

    #[test]
    fn unknown_resource_is_an_error() {
        let entry = DayEntry {
            resources: amounts(&[("forge_hammer", 1), ("crowns", 5)]),
            ..DayEntry::default()
        };
        let err = Catalog::default()
            .score_day(EventDay::Gear, &entry)
            .unwrap_err();
        assert_eq!(err.to_string(), "Gear Day has no resource named crowns");
    }

    #[test]
    fn ultimate_power_multiplies_each_item() {
        let sheet = Catalog::default()
            .score_ultimate_power(10, &amounts(&[("steel", 3), ("strengthening_potion", 7)]))
            .unwrap();
        assert_eq!(sheet.total, 10 + 6_000 + 21);
    }

    #[test]
    fn catalog_round_trips_through_json_and_validates() {
        let json = serde_json::to_string(&Catalog::default()).unwrap();
        let parsed = Catalog::from_json(&json).unwrap();
        assert_eq!(parsed, Catalog::default());
    }

    #[test]
    fn catalog_rejects_zero_batch_and_duplicates() {
        let mut catalog = Catalog::default();
        catalog
            .days
            .insert(EventDay::Gear, vec![BatchResource::new("forge_hammer", 100, 0)]);
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::ZeroBatchSize { .. })
        ));

        catalog.days.insert(
            EventDay::Gear,
            vec![
                BatchResource::per_unit("forge_hammer", 100),
                BatchResource::per_unit("forge_hammer", 200),
            ],
        );
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateResource { .. })
        ));
    }

    #[test]
    fn partial_catalog_json_fills_defaults() {
        let catalog =
            Catalog::from_json(r#"{"days":{"gear":[{"id":"forge_hammer","points_per_batch":150}]}}"#)
                .unwrap();
        assert_eq!(catalog.resources(EventDay::Gear)[0].score(2), 300);
        assert!(catalog.resources(EventDay::Unit).is_empty());
        assert_eq!(catalog.dragon, DragonConfig::default());
    }

    #[test]
    fn event_day_parses_common_spellings() {
        assert_eq!("dragon".parse::<EventDay>(), Ok(EventDay::Dragon));
        assert_eq!("Hero-Day".parse::<EventDay>(), Ok(EventDay::Hero));
        assert_eq!("unit_day".parse::<EventDay>(), Ok(EventDay::Unit));
        assert!("sunday".parse::<EventDay>().is_err());
    }

    #[test]
    fn day_indices_round_trip() {
        for day in EventDay::ALL {
            assert_eq!(EventDay::from_index(day.index()), Some(day));
        }
        assert_eq!(EventDay::from_index(6), None);
    }
}
