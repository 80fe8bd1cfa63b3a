//! Calendar arithmetic for weekly periods and the event-day rotation.
//!
//! Events run Monday (Unit) through Saturday (Hero) and roll over at
//! [`ROLLOVER_HOUR`] local time, so the evening before a day already belongs to
//! it. Sunday is the "hold your castles" rest window.
use chrono::{
    DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike, Utc,
    Weekday,
};
use serde::{Deserialize, Serialize};

use crate::constants::{ROLLOVER_HOUR, STORAGE_KEY_PREFIX, WEEK_MILLIS};
use crate::events::EventDay;
use crate::numbers::{clamp_i64_to_u32, div_ceil_i64};

fn start_of_year(year: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1).map(|date| date.and_time(NaiveTime::MIN))
}

/// Week of the year: whole or partial 7-day spans since local midnight on
/// January 1. Midnight on January 1 itself is week 0.
#[must_use]
pub fn week_number(local: NaiveDateTime) -> u32 {
    let Some(jan1) = start_of_year(local.year()) else {
        return 0;
    };
    let elapsed = (local - jan1).num_milliseconds();
    clamp_i64_to_u32(div_ceil_i64(elapsed, WEEK_MILLIS))
}

/// Storage key for a week's record.
#[must_use]
pub fn storage_key(week: u32) -> String {
    format!("{STORAGE_KEY_PREFIX}{week}")
}

/// First and last calendar day of `week` in `year`. Week 0 (the midnight
/// instant opening the year) shares week 1's range.
#[must_use]
pub fn week_range(year: i32, week: u32) -> Option<(NaiveDate, NaiveDate)> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let start = jan1.checked_add_signed(TimeDelta::weeks(i64::from(week.max(1)) - 1))?;
    let end = start.checked_add_signed(TimeDelta::days(6))?;
    Some((start, end))
}

/// A weekly scoring period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub week: u32,
    pub key: String,
}

impl Period {
    #[must_use]
    pub fn containing(local: NaiveDateTime) -> Self {
        let week = week_number(local);
        Self {
            year: local.year(),
            week,
            key: storage_key(week),
        }
    }

    #[must_use]
    pub fn for_week(year: i32, week: u32) -> Self {
        Self {
            year,
            week,
            key: storage_key(week),
        }
    }

    /// Human-readable span, e.g. `Mar 3 - Mar 9`.
    #[must_use]
    pub fn label(&self) -> String {
        week_range(self.year, self.week).map_or_else(
            || format!("Week {}", self.week),
            |(start, end)| format!("{} - {}", start.format("%b %-d"), end.format("%b %-d")),
        )
    }
}

/// What the rotation shows at a given moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "day", rename_all = "snake_case")]
pub enum ActiveEvent {
    Day(EventDay),
    HoldYourCastles,
}

impl std::fmt::Display for ActiveEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day(day) => write!(f, "{day}"),
            Self::HoldYourCastles => write!(f, "Hold Your Castles"),
        }
    }
}

fn event_for_weekday(weekday: Weekday) -> ActiveEvent {
    match EventDay::from_index(weekday.num_days_from_monday()) {
        Some(day) => ActiveEvent::Day(day),
        None => ActiveEvent::HoldYourCastles,
    }
}

/// The event running at `local`, given the UTC weekday at the same instant.
///
/// While it is already Sunday in UTC, the rest window holds until the local
/// rollover even if the local calendar still shows Saturday.
#[must_use]
pub fn active_event_at(local: NaiveDateTime, utc_weekday: Weekday) -> ActiveEvent {
    let after_rollover = local.hour() >= ROLLOVER_HOUR;
    if utc_weekday == Weekday::Sun && !after_rollover {
        return ActiveEvent::HoldYourCastles;
    }
    let weekday = if after_rollover {
        local.weekday().succ()
    } else {
        local.weekday()
    };
    event_for_weekday(weekday)
}

/// The event running at `now` in its own time zone.
#[must_use]
pub fn active_event<Tz: TimeZone>(now: &DateTime<Tz>) -> ActiveEvent {
    let utc_weekday = now.with_timezone(&Utc).weekday();
    active_event_at(now.naive_local(), utc_weekday)
}

/// Time left until the next local rollover.
#[must_use]
pub fn time_until_rollover(local: NaiveDateTime) -> TimeDelta {
    let rollover = NaiveTime::from_hms_opt(ROLLOVER_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    let today = local.date().and_time(rollover);
    let next = if local >= today {
        today + TimeDelta::days(1)
    } else {
        today
    };
    next - local
}

/// Format a countdown as `HH:MM:SS`.
#[must_use]
pub fn format_countdown(remaining: TimeDelta) -> String {
    let secs = remaining.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3_600,
        (secs % 3_600) / 60,
        secs % 60
    )
}
