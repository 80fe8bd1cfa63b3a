//! Weekly score records and target comparisons.
//!
//! A week's record is a flat JSON object shared by every event day. Each save
//! writes one day's fields and leaves its siblings (and any fields this crate
//! does not know about) untouched.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::events::{EventDay, ScoreSheet};
use crate::numbers::saturating_u64_to_i64;
use crate::total::total;

/// One event day's saved result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySubmission {
    pub day: EventDay,
    pub total: u64,
    pub starting_score: u64,
    pub saved_at: DateTime<Utc>,
}

impl DaySubmission {
    #[must_use]
    pub const fn from_sheet(day: EventDay, sheet: &ScoreSheet, saved_at: DateTime<Utc>) -> Self {
        Self {
            day,
            total: sheet.total,
            starting_score: sheet.starting_score,
            saved_at,
        }
    }
}

/// Persisted per-week record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl WeeklyRecord {
    /// Merge one day's result into the record.
    pub fn apply(&mut self, submission: &DaySubmission) {
        let day = submission.day;
        self.fields
            .insert(day.score_field().to_string(), Value::from(submission.total));
        self.fields.insert(
            day.starting_field().to_string(),
            Value::from(submission.starting_score),
        );
        if let Some(legacy) = day.legacy_score_field() {
            self.fields.remove(legacy);
        }
        self.last_updated = Some(submission.saved_at);
    }

    /// Saved total for `day`, falling back to its legacy field name.
    #[must_use]
    pub fn day_score(&self, day: EventDay) -> Option<u64> {
        let read = |field: &str| self.fields.get(field).and_then(Value::as_u64);
        read(day.score_field()).or_else(|| day.legacy_score_field().and_then(read))
    }

    #[must_use]
    pub fn starting_score(&self, day: EventDay) -> Option<u64> {
        self.fields
            .get(day.starting_field())
            .and_then(Value::as_u64)
    }

    /// Sum of every saved day total.
    #[must_use]
    pub fn weekly_total(&self) -> u64 {
        total(0, EventDay::ALL.into_iter().filter_map(|day| self.day_score(day)))
    }

    /// Days with a positive saved total.
    #[must_use]
    pub fn completed_days(&self) -> usize {
        EventDay::ALL
            .into_iter()
            .filter(|&day| self.day_score(day).is_some_and(|score| score > 0))
            .count()
    }

    #[must_use]
    pub fn summary(&self, key: &str) -> WeekSummary {
        let days = EventDay::ALL
            .into_iter()
            .map(|day| {
                let score = self.day_score(day);
                DayStatus {
                    day,
                    score,
                    completed: score.is_some_and(|score| score > 0),
                }
            })
            .collect();
        WeekSummary {
            key: key.to_string(),
            days,
            total: self.weekly_total(),
            completed_days: self.completed_days(),
            last_updated: self.last_updated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    pub day: EventDay,
    pub score: Option<u64>,
    pub completed: bool,
}

/// Weekly overview used by the tracker screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSummary {
    pub key: String,
    pub days: Vec<DayStatus>,
    pub total: u64,
    pub completed_days: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Gap between a saved score and a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub current: u64,
    pub target: u64,
    /// `target - current`; negative once the target is beaten.
    pub difference: i64,
    pub points_needed: u64,
}

impl Comparison {
    #[must_use]
    pub const fn reached(&self) -> bool {
        self.points_needed == 0
    }
}

#[must_use]
pub fn compare(current: u64, target: u64) -> Comparison {
    let difference = if target >= current {
        saturating_u64_to_i64(target - current)
    } else {
        -saturating_u64_to_i64(current - target)
    };
    Comparison {
        current,
        target,
        difference,
        points_needed: target.saturating_sub(current),
    }
}
