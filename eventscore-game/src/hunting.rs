//! Ultimate hunting calculator: action points, hero bonuses and VIP generation.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::batch::BatchResource;
use crate::constants::{DAILY_VIDEO_AP, HUNTING_HERO_BONUS_PCT, HUNTING_MIKU_BONUS_PCT};
use crate::events::ScoreError;
use crate::total::total;

/// A hero whose presence boosts passive AP generation by `bonus_pct` percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntingHero {
    pub name: String,
    pub bonus_pct: u64,
}

/// AP generated for VIP levels `min_level..=max_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VipBand {
    pub min_level: u32,
    pub max_level: u32,
    pub ap: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntingConfig {
    pub action_points: Vec<BatchResource>,
    pub heroes: Vec<HuntingHero>,
    pub vip_bands: Vec<VipBand>,
    #[serde(default = "HuntingConfig::default_daily_video_ap")]
    pub daily_video_ap: u64,
}

impl Default for HuntingConfig {
    fn default() -> Self {
        let action_points = [5, 10, 20, 50, 100, 200]
            .into_iter()
            .map(|ap| BatchResource::per_unit(&format!("ap_{ap}"), ap))
            .collect();
        let heroes = [
            "Ryan", "Pandaria", "Fatima", "Harold", "Miku", "Giselle", "Jessica", "Pedra", "Hana",
            "Pythia", "Luvia",
        ]
        .into_iter()
        .map(|name| HuntingHero {
            name: name.to_string(),
            bonus_pct: if name == "Miku" {
                HUNTING_MIKU_BONUS_PCT
            } else {
                HUNTING_HERO_BONUS_PCT
            },
        })
        .collect();
        let band = |min_level, max_level, ap| VipBand {
            min_level,
            max_level,
            ap,
        };
        Self {
            action_points,
            heroes,
            vip_bands: vec![
                band(1, 7, 2_000),
                band(8, 8, 2_400),
                band(9, 9, 2_600),
                band(10, 10, 2_800),
                band(11, 12, 3_000),
                band(13, 20, 3_200),
            ],
            daily_video_ap: DAILY_VIDEO_AP,
        }
    }
}

impl HuntingConfig {
    const fn default_daily_video_ap() -> u64 {
        DAILY_VIDEO_AP
    }

    /// Passive AP generated at `vip_level`; 0 outside every band.
    #[must_use]
    pub fn ap_generation(&self, vip_level: u32) -> u64 {
        self.vip_bands
            .iter()
            .find(|band| (band.min_level..=band.max_level).contains(&vip_level))
            .map_or(0, |band| band.ap)
    }

    fn hero(&self, name: &str) -> Option<&HuntingHero> {
        self.heroes
            .iter()
            .find(|hero| hero.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Check that bands are well-formed and do not overlap.
    ///
    /// # Errors
    ///
    /// Returns the first `HuntingConfigError` found.
    pub fn validate(&self) -> Result<(), HuntingConfigError> {
        let mut bands = self.vip_bands.clone();
        bands.sort_by_key(|band| band.min_level);
        if let Some(band) = bands.iter().find(|band| band.min_level > band.max_level) {
            return Err(HuntingConfigError::InvertedBand {
                min_level: band.min_level,
                max_level: band.max_level,
            });
        }
        for pair in bands.windows(2) {
            if pair[1].min_level <= pair[0].max_level {
                return Err(HuntingConfigError::OverlappingBands {
                    first: pair[0].min_level,
                    second: pair[1].min_level,
                });
            }
        }
        let mut names = BTreeSet::new();
        for hero in &self.heroes {
            if !names.insert(hero.name.to_ascii_lowercase()) {
                return Err(HuntingConfigError::DuplicateHero {
                    name: hero.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Score one hunting session.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError` for unknown AP items or hero names.
    pub fn evaluate(&self, input: &HuntingInput) -> Result<HuntingReport, ScoreError> {
        let mut action_points: u64 = 0;
        for (id, &count) in &input.action_points {
            let item = self
                .action_points
                .iter()
                .find(|item| &item.id == id)
                .ok_or_else(|| ScoreError::UnknownResource {
                    board: "Ultimate Hunting".to_string(),
                    id: id.clone(),
                })?;
            action_points = action_points.saturating_add(item.score(count));
        }

        let mut enabled = BTreeSet::new();
        let mut hero_bonus_pct: u64 = 0;
        for name in &input.heroes {
            let hero = self.hero(name).ok_or_else(|| ScoreError::UnknownHero {
                name: name.clone(),
            })?;
            // Toggling the same hero twice still counts once.
            if enabled.insert(hero.name.as_str()) {
                hero_bonus_pct = hero_bonus_pct.saturating_add(hero.bonus_pct);
            }
        }

        let ap_generation = self.ap_generation(input.vip_level);
        let generated = ap_generation.saturating_mul(hero_bonus_pct.saturating_add(100)) / 100;
        let hunting_total = total(action_points, [self.daily_video_ap, generated]);
        Ok(HuntingReport {
            action_points,
            hero_bonus_pct,
            ap_generation,
            generated,
            daily_video_ap: self.daily_video_ap,
            hunting_total,
            total: total(input.starting_score, [hunting_total]),
        })
    }
}

/// Errors raised when the hunting table is inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuntingConfigError {
    #[error("VIP band {min_level}..={max_level} is inverted")]
    InvertedBand { min_level: u32, max_level: u32 },
    #[error("VIP bands starting at {first} and {second} overlap")]
    OverlappingBands { first: u32, second: u32 },
    #[error("hero {name} is listed twice")]
    DuplicateHero { name: String },
}

/// A filled-in hunting form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntingInput {
    #[serde(default)]
    pub starting_score: u64,
    #[serde(default)]
    pub action_points: BTreeMap<String, u64>,
    #[serde(default)]
    pub heroes: Vec<String>,
    #[serde(default)]
    pub vip_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntingReport {
    pub action_points: u64,
    pub hero_bonus_pct: u64,
    pub ap_generation: u64,
    pub generated: u64,
    pub daily_video_ap: u64,
    pub hunting_total: u64,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vip_generation_matches_bands() {
        let config = HuntingConfig::default();
        assert_eq!(config.ap_generation(0), 0);
        assert_eq!(config.ap_generation(1), 2_000);
        assert_eq!(config.ap_generation(7), 2_000);
        assert_eq!(config.ap_generation(8), 2_400);
        assert_eq!(config.ap_generation(9), 2_600);
        assert_eq!(config.ap_generation(10), 2_800);
        assert_eq!(config.ap_generation(12), 3_000);
        assert_eq!(config.ap_generation(20), 3_200);
        assert_eq!(config.ap_generation(21), 0);
    }

    #[test]
    fn hunting_total_adds_video_and_boosted_generation() {
        let config = HuntingConfig::default();
        let input = HuntingInput {
            starting_score: 100,
            action_points: BTreeMap::from([("ap_50".to_string(), 3), ("ap_5".to_string(), 2)]),
            heroes: vec!["miku".to_string(), "Ryan".to_string(), "Ryan".to_string()],
            vip_level: 10,
        };
        let report = config.evaluate(&input).unwrap();
        assert_eq!(report.action_points, 160);
        assert_eq!(report.hero_bonus_pct, 30);
        // 2800 * 1.3
        assert_eq!(report.generated, 3_640);
        assert_eq!(report.hunting_total, 160 + 250 + 3_640);
        assert_eq!(report.total, 100 + 4_050);
    }

    #[test]
    fn unknown_hero_is_rejected() {
        let input = HuntingInput {
            heroes: vec!["Nobody".to_string()],
            ..HuntingInput::default()
        };
        assert_eq!(
            HuntingConfig::default().evaluate(&input),
            Err(ScoreError::UnknownHero {
                name: "Nobody".to_string()
            })
        );
    }

    #[test]
    fn empty_form_still_counts_daily_video() {
        let report = HuntingConfig::default()
            .evaluate(&HuntingInput::default())
            .unwrap();
        assert_eq!(report.total, 250);
    }

    #[test]
    fn overlapping_bands_fail_validation() {
        let mut config = HuntingConfig::default();
        assert!(config.validate().is_ok());
        config.vip_bands.push(VipBand {
            min_level: 5,
            max_level: 9,
            ap: 1,
        });
        assert_eq!(
            config.validate(),
            Err(HuntingConfigError::OverlappingBands {
                first: 1,
                second: 5
            })
        );
    }

    #[test]
    fn inverted_bands_and_repeated_heroes_fail_validation() {
        let mut config = HuntingConfig::default();
        config.vip_bands[5].max_level = 12;
        assert_eq!(
            config.validate(),
            Err(HuntingConfigError::InvertedBand {
                min_level: 13,
                max_level: 12
            })
        );

        let mut config = HuntingConfig::default();
        config.heroes.push(HuntingHero {
            name: "MIKU".to_string(),
            bonus_pct: 1,
        });
        assert_eq!(
            config.validate(),
            Err(HuntingConfigError::DuplicateHero {
                name: "MIKU".to_string()
            })
        );
    }

    #[test]
    fn huge_hero_bonus_saturates() {
        let mut config = HuntingConfig::default();
        config.heroes.push(HuntingHero {
            name: "Huge".to_string(),
            bonus_pct: u64::MAX,
        });
        assert!(config.validate().is_ok());
        let input = HuntingInput {
            heroes: vec!["Huge".to_string(), "Miku".to_string()],
            vip_level: 10,
            ..HuntingInput::default()
        };
        let report = config.evaluate(&input).unwrap();
        assert_eq!(report.hero_bonus_pct, u64::MAX);
        assert_eq!(report.generated, u64::MAX / 100);
        assert_eq!(report.total, u64::MAX / 100 + 250);
    }
}
