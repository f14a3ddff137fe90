//! Threshold check on the aggregate quality score

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health of a dataset relative to its configured minimum score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertState {
    Ok,
    Degraded,
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertState::Ok => f.write_str("OK"),
            AlertState::Degraded => f.write_str("DEGRADED"),
        }
    }
}

/// `Degraded` when the score is strictly below the threshold
pub fn check_alert(aggregate_score: f64, threshold: f64) -> AlertState {
    if aggregate_score < threshold {
        AlertState::Degraded
    } else {
        AlertState::Ok
    }
}

/// Alerting configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Minimum acceptable aggregate score
    pub threshold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self { threshold: 80.0 }
    }
}

impl AlertConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=100.0).contains(&self.threshold) {
            return Err(Error::InvalidConfig(format!(
                "alert threshold must be within [0, 100], got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    pub fn check(&self, aggregate_score: f64) -> AlertState {
        check_alert(aggregate_score, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_alert() {
        assert_eq!(check_alert(50.0, 60.0), AlertState::Degraded);
        assert_eq!(check_alert(60.0, 60.0), AlertState::Ok);
        assert_eq!(check_alert(90.0, 60.0), AlertState::Ok);
        assert_eq!(check_alert(0.0, 0.0), AlertState::Ok);
    }

    #[test]
    fn test_config_check() {
        let config = AlertConfig { threshold: 40.0 };
        assert_eq!(config.check(38.33), AlertState::Degraded);
        assert_eq!(AlertConfig::default().check(85.0), AlertState::Ok);
    }

    #[test]
    fn test_config_validation() {
        assert!(AlertConfig::default().validate().is_ok());
        assert!(AlertConfig { threshold: -1.0 }.validate().is_err());
        assert!(AlertConfig { threshold: 101.0 }.validate().is_err());
    }
}
