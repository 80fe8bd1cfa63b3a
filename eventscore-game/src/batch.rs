//! Flat exchange-rate resources scored in whole batches.
use serde::{Deserialize, Serialize};

/// Points for `amount_owned` units at `points_per_batch` per full batch.
///
/// Partial batches earn nothing and are not tracked. A zero batch size is
/// treated as 1.
#[must_use]
pub const fn batch_score(amount_owned: u64, batch_size: u64, points_per_batch: u64) -> u64 {
    let batch_size = if batch_size == 0 { 1 } else { batch_size };
    (amount_owned / batch_size).saturating_mul(points_per_batch)
}

/// A resource that converts to points at a fixed batch rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResource {
    pub id: String,
    pub points_per_batch: u64,
    #[serde(default = "BatchResource::default_batch_size")]
    pub batch_size: u64,
}

impl BatchResource {
    const fn default_batch_size() -> u64 {
        1
    }

    #[must_use]
    pub fn new(id: &str, points_per_batch: u64, batch_size: u64) -> Self {
        Self {
            id: id.to_string(),
            points_per_batch,
            batch_size,
        }
    }

    /// One point value per unit.
    #[must_use]
    pub fn per_unit(id: &str, points: u64) -> Self {
        Self::new(id, points, 1)
    }

    #[must_use]
    pub const fn score(&self, amount_owned: u64) -> u64 {
        batch_score(amount_owned, self.batch_size, self.points_per_batch)
    }
}
