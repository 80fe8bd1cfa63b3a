//! Persistence seam for weekly records.
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::record::WeeklyRecord;

/// Trait for abstracting weekly record persistence.
/// Platform-specific implementations should provide this
pub trait ScoreStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the record stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read.
    fn load_week(&self, key: &str) -> Result<Option<WeeklyRecord>, Self::Error>;

    /// Persist `record` under `key`, replacing what was there
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save_week(&self, key: &str, record: &WeeklyRecord) -> Result<(), Self::Error>;

    /// Remove the record stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    fn delete_week(&self, key: &str) -> Result<(), Self::Error>;
}

/// In-process storage; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    weeks: Rc<RefCell<HashMap<String, WeeklyRecord>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn len(&self) -> usize {
        self.weeks.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weeks.borrow().is_empty()
    }
}

impl ScoreStorage for MemoryStorage {
    type Error = Infallible;

    fn load_week(&self, key: &str) -> Result<Option<WeeklyRecord>, Self::Error> {
        Ok(self.weeks.borrow().get(key).cloned())
    }

    fn save_week(&self, key: &str, record: &WeeklyRecord) -> Result<(), Self::Error> {
        self.weeks
            .borrow_mut()
            .insert(key.to_string(), record.clone());
        Ok(())
    }

    fn delete_week(&self, key: &str) -> Result<(), Self::Error> {
        self.weeks.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_saved_weeks() {
        let storage = MemoryStorage::default();
        let handle = storage.clone();
        storage
            .save_week("scores_week_3", &WeeklyRecord::default())
            .unwrap();
        assert_eq!(handle.len(), 1);
        assert!(handle.load_week("scores_week_3").unwrap().is_some());
        assert!(handle.load_week("scores_week_4").unwrap().is_none());

        handle.delete_week("scores_week_3").unwrap();
        assert!(storage.is_empty());
    }
}
