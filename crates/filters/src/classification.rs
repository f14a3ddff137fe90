//! Length-based description classification

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality bucket assigned to a record from its description alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Good,
    Short,
    Long,
    Null,
}

impl Classification {
    /// Every bucket, in report order
    pub const ALL: [Classification; 4] = [
        Classification::Good,
        Classification::Short,
        Classification::Long,
        Classification::Null,
    ];

    /// Stable upper-case label
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Good => "GOOD",
            Classification::Short => "SHORT",
            Classification::Long => "LONG",
            Classification::Null => "NULL",
        }
    }

    /// Whether the record counts as usable content (neither null nor short)
    pub fn is_valid(&self) -> bool {
        matches!(self, Classification::Good | Classification::Long)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Length boundaries between the buckets, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthThresholds {
    /// Descriptions strictly shorter than this are `Short`
    pub short_below: usize,
    /// Descriptions strictly longer than this are `Long`
    pub long_above: usize,
}

impl Default for LengthThresholds {
    fn default() -> Self {
        Self {
            short_below: 10,
            long_above: 200,
        }
    }
}

impl LengthThresholds {
    /// Reject boundaries that would leave no room for `Good`
    pub fn validate(&self) -> Result<()> {
        if self.short_below > self.long_above {
            return Err(Error::InvalidConfig(format!(
                "short_below ({}) must not exceed long_above ({})",
                self.short_below, self.long_above
            )));
        }
        Ok(())
    }

    /// Classify a description. Total: every input lands in exactly one bucket.
    pub fn classify(&self, description: Option<&str>) -> Classification {
        match description {
            None => Classification::Null,
            Some(text) if text.is_empty() => Classification::Null,
            Some(text) => {
                let length = description_length(text);
                if length < self.short_below {
                    Classification::Short
                } else if length > self.long_above {
                    Classification::Long
                } else {
                    Classification::Good
                }
            }
        }
    }
}

/// Description length in characters, not bytes
pub fn description_length(text: &str) -> usize {
    text.chars().count()
}

/// Classify with the default 10/200 boundaries
pub fn classify(description: Option<&str>) -> Classification {
    LengthThresholds::default().classify(description)
}
