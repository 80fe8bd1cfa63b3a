//! Event Score Engine
//!
//! Platform-agnostic scoring for the weekly event-day rotation: tiered dragon
//! rune progression, batch resource conversion, ultimate hunting and the
//! weekly tracker. Persistence is abstracted behind [`ScoreStorage`].

pub mod batch;
pub mod constants;
pub mod dragon;
pub mod events;
pub mod hunting;
pub mod input;
pub mod numbers;
pub mod progression;
pub mod record;
pub mod schedule;
pub mod storage;
pub mod total;

// Re-export commonly used types
pub use batch::{BatchResource, batch_score};
pub use dragon::{
    DragonBreakdown, DragonConfig, DragonInput, TierInput, TierOutcome, evaluate_dragons,
};
pub use events::{Catalog, CatalogError, DayEntry, EventDay, ResourceLine, ScoreError, ScoreSheet};
pub use hunting::{
    HuntingConfig, HuntingConfigError, HuntingHero, HuntingInput, HuntingReport, VipBand,
};
pub use input::{normalize_count, normalize_level};
pub use progression::{
    BlockedReason, CostTable, PrerequisiteRule, Progression, SimulationResult, Tier, TierConfig,
    TierConfigError, simulate,
};
pub use record::{Comparison, DayStatus, DaySubmission, WeekSummary, WeeklyRecord, compare};
pub use schedule::{
    ActiveEvent, Period, active_event, active_event_at, format_countdown, storage_key,
    time_until_rollover, week_number,
};
pub use storage::{MemoryStorage, ScoreStorage};
pub use total::total;

use chrono::{DateTime, Utc};

/// Scores event days against a catalog and keeps the weekly tracker current.
pub struct ScoreKeeper<S>
where
    S: ScoreStorage,
{
    catalog: Catalog,
    storage: S,
}

impl<S> ScoreKeeper<S>
where
    S: ScoreStorage,
{
    /// Create a new keeper with the provided catalog and storage
    pub const fn new(catalog: Catalog, storage: S) -> Self {
        Self { catalog, storage }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Score one day's entry without saving it.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError` if the entry does not fit the day's tables.
    pub fn score_day(&self, day: EventDay, entry: &DayEntry) -> Result<ScoreSheet, ScoreError> {
        self.catalog.score_day(day, entry)
    }

    /// Load the record for `key`, or an empty one if nothing is saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn week(&self, key: &str) -> Result<WeeklyRecord, S::Error> {
        Ok(self.storage.load_week(key)?.unwrap_or_default())
    }

    /// Merge a scored day into the week's record and persist it.
    ///
    /// Other days already saved under `key` are kept as they were.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be loaded or saved.
    pub fn submit_day(
        &self,
        key: &str,
        day: EventDay,
        sheet: &ScoreSheet,
        saved_at: DateTime<Utc>,
    ) -> Result<WeeklyRecord, S::Error> {
        let mut record = self.week(key)?;
        record.apply(&DaySubmission::from_sheet(day, sheet, saved_at));
        self.storage.save_week(key, &record)?;
        log::info!("saved {day} total {} under {key}", sheet.total);
        Ok(record)
    }

    /// Forget everything saved under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    pub fn clear_week(&self, key: &str) -> Result<(), S::Error> {
        self.storage.delete_week(key)?;
        log::info!("cleared {key}");
        Ok(())
    }

    /// Compare a day's saved total with a target.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn compare_day(
        &self,
        key: &str,
        day: EventDay,
        target: u64,
    ) -> Result<Comparison, S::Error> {
        let current = self.week(key)?.day_score(day).unwrap_or(0);
        Ok(compare(current, target))
    }

    /// Compare the week's total with a target.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn compare_week(&self, key: &str, target: u64) -> Result<Comparison, S::Error> {
        Ok(compare(self.week(key)?.weekly_total(), target))
    }

    /// Weekly overview for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub fn week_summary(&self, key: &str) -> Result<WeekSummary, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let record = self.storage.load_week(key).map_err(Into::into)?;
        if record.is_none() {
            log::debug!("no record saved under {key}");
        }
        Ok(record.unwrap_or_default().summary(key))
    }
}
