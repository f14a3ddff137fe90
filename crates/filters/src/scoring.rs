//! Per-record score lookup and dataset aggregation

use crate::{Classification, Error, Result};
use serde::{Deserialize, Serialize};

/// Score awarded to each classification bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub good: f64,
    pub long: f64,
    pub short: f64,
    pub null: f64,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            good: 90.0,
            long: 85.0,
            short: 30.0,
            null: 0.0,
        }
    }
}

impl ScoreTable {
    /// Look up the score for a bucket
    pub fn score(&self, classification: Classification) -> f64 {
        match classification {
            Classification::Good => self.good,
            Classification::Long => self.long,
            Classification::Short => self.short,
            Classification::Null => self.null,
        }
    }

    /// Every entry must be a finite value in [0, 100]
    pub fn validate(&self) -> Result<()> {
        for classification in Classification::ALL {
            let value = self.score(classification);
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "score for {} must be within [0, 100], got {}",
                    classification, value
                )));
            }
        }
        Ok(())
    }
}

/// Score with the default table
pub fn score(classification: Classification) -> f64 {
    ScoreTable::default().score(classification)
}

/// Dataset-level score: arithmetic mean of per-record scores.
///
/// An empty batch yields `0.0`.
pub fn aggregate(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Percentage of records that are neither `Null` nor `Short`.
///
/// Reported alongside the aggregate; an empty batch yields `0.0`.
pub fn valid_ratio(classifications: &[Classification]) -> f64 {
    if classifications.is_empty() {
        return 0.0;
    }
    let valid = classifications.iter().filter(|c| c.is_valid()).count();
    valid as f64 / classifications.len() as f64 * 100.0
}
