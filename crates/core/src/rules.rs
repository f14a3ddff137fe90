//! Batch-level data quality rules
//!
//! Each rule measures a rate over the whole batch and passes when the rate
//! reaches its threshold. The rule-set score is the share of rules that
//! passed, independent of the per-record aggregate score.
//!
//! An empty batch fails every rule: there is nothing to vouch for.

use crate::{Error, Result};
use descwatch_filters::{Classification, LengthThresholds};
use descwatch_formats::Record;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// What a rule measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Completeness,
    Uniqueness,
    Validity,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Completeness => f.write_str("completeness"),
            RuleKind::Uniqueness => f.write_str("uniqueness"),
            RuleKind::Validity => f.write_str("validity"),
        }
    }
}

/// How much a failing rule matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Minimum rates, each a fraction in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Share of records with a non-blank title
    pub title_completeness: f64,
    /// Share of records with a non-empty description
    pub description_completeness: f64,
    /// Distinct ids over records
    pub id_uniqueness: f64,
    /// Share of present descriptions inside the length bounds
    pub description_validity: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            title_completeness: 0.95,
            description_completeness: 0.95,
            id_uniqueness: 1.0,
            description_validity: 0.95,
        }
    }
}

impl RulesConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("title_completeness", self.title_completeness),
            ("description_completeness", self.description_completeness),
            ("id_uniqueness", self.id_uniqueness),
            ("description_validity", self.description_validity),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "rule threshold {} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Result of one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub name: String,
    pub kind: RuleKind,
    pub severity: Severity,
    /// Measured rate in [0, 1]
    pub rate: f64,
    pub threshold: f64,
    pub matched: usize,
    pub total: usize,
    pub passed: bool,
}

impl RuleOutcome {
    fn measure(
        name: &str,
        kind: RuleKind,
        severity: Severity,
        matched: usize,
        total: usize,
        threshold: f64,
    ) -> Self {
        let rate = if total == 0 {
            0.0
        } else {
            matched as f64 / total as f64
        };

        Self {
            name: name.to_string(),
            kind,
            severity,
            rate,
            threshold,
            matched,
            total,
            passed: total > 0 && rate >= threshold,
        }
    }

    /// One-line description for logs and reports
    pub fn message(&self) -> String {
        format!(
            "{} {}: {:.1}% ({}/{}), threshold {:.1}%",
            self.name,
            self.kind,
            self.rate * 100.0,
            self.matched,
            self.total,
            self.threshold * 100.0
        )
    }
}

/// Roll-up of a rule set over one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetReport {
    pub total_rules: usize,
    pub passed_rules: usize,
    pub failed_rules: usize,
    /// `passed_rules / total_rules * 100`; 100 when no rule ran
    pub overall_score: f64,
    pub outcomes: Vec<RuleOutcome>,
}

impl RuleSetReport {
    pub fn from_outcomes(outcomes: Vec<RuleOutcome>) -> Self {
        let total_rules = outcomes.len();
        let passed_rules = outcomes.iter().filter(|o| o.passed).count();
        let overall_score = if total_rules == 0 {
            100.0
        } else {
            passed_rules as f64 / total_rules as f64 * 100.0
        };

        Self {
            total_rules,
            passed_rules,
            failed_rules: total_rules - passed_rules,
            overall_score,
            outcomes,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

impl Default for RuleSetReport {
    fn default() -> Self {
        Self::from_outcomes(Vec::new())
    }
}

/// Run the completeness, uniqueness and validity rules over a batch
pub fn evaluate_rules(
    records: &[Record],
    thresholds: &LengthThresholds,
    config: &RulesConfig,
) -> RuleSetReport {
    let total = records.len();

    let titled = records.iter().filter(|r| !r.title.trim().is_empty()).count();

    let described = records
        .iter()
        .filter(|r| r.description().map_or(false, |d| !d.is_empty()))
        .count();

    let distinct_ids = records.iter().map(|r| r.id).collect::<HashSet<_>>().len();

    // Validity is judged over present descriptions only
    let within_bounds = records
        .iter()
        .filter(|r| thresholds.classify(r.description()) == Classification::Good)
        .count();

    RuleSetReport::from_outcomes(vec![
        RuleOutcome::measure(
            "title",
            RuleKind::Completeness,
            Severity::High,
            titled,
            total,
            config.title_completeness,
        ),
        RuleOutcome::measure(
            "description",
            RuleKind::Completeness,
            Severity::High,
            described,
            total,
            config.description_completeness,
        ),
        RuleOutcome::measure(
            "id",
            RuleKind::Uniqueness,
            Severity::Critical,
            distinct_ids,
            total,
            config.id_uniqueness,
        ),
        RuleOutcome::measure(
            "description length",
            RuleKind::Validity,
            Severity::Medium,
            within_bounds,
            described,
            config.description_validity,
        ),
    ])
}

/// Mean overall score across several batches; 0.0 when there are none
pub fn average_overall_score<'a, I>(reports: I) -> f64
where
    I: IntoIterator<Item = &'a RuleSetReport>,
{
    let (sum, count) = reports
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), r| (sum + r.overall_score, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(report: &RuleSetReport, kind: RuleKind, name: &str) -> RuleOutcome {
        report
            .outcomes
            .iter()
            .find(|o| o.kind == kind && o.name == name)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_clean_batch_passes_everything() {
        let records: Vec<Record> = (1..=4)
            .map(|i| Record::new(i, format!("Item {}", i), Some("A fine description".to_string())))
            .collect();

        let report = evaluate_rules(&records, &LengthThresholds::default(), &RulesConfig::default());
        assert_eq!(report.total_rules, 4);
        assert_eq!(report.passed_rules, 4);
        assert_eq!(report.overall_score, 100.0);
        assert_eq!(report.failures().count(), 0);
    }

    #[test]
    fn test_validity_ignores_missing_descriptions() {
        let records = vec![
            Record::new(1, "a", Some("A fine description".to_string())),
            Record::new(2, "b", None),
            Record::new(3, "c", Some("tiny".to_string())),
        ];

        let report = evaluate_rules(&records, &LengthThresholds::default(), &RulesConfig::default());
        let validity = outcome(&report, RuleKind::Validity, "description length");
        assert_eq!((validity.matched, validity.total), (1, 2));
        assert_eq!(validity.rate, 0.5);
        assert!(!validity.passed);

        let completeness = outcome(&report, RuleKind::Completeness, "description");
        assert_eq!((completeness.matched, completeness.total), (2, 3));
    }

    #[test]
    fn test_empty_batch_fails_all_rules() {
        let report = evaluate_rules(&[], &LengthThresholds::default(), &RulesConfig::default());
        assert_eq!(report.passed_rules, 0);
        assert_eq!(report.overall_score, 0.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut records: Vec<Record> = (1..=19)
            .map(|i| Record::new(i, "t", Some("A fine description".to_string())))
            .collect();
        records.push(Record::new(20, "   ", Some("A fine description".to_string())));

        let report = evaluate_rules(&records, &LengthThresholds::default(), &RulesConfig::default());
        let title = outcome(&report, RuleKind::Completeness, "title");
        assert_eq!(title.rate, 0.95);
        assert!(title.passed);
    }

    #[test]
    fn test_config_validation() {
        assert!(RulesConfig::default().validate().is_ok());

        let bad = RulesConfig {
            id_uniqueness: 1.5,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(Error::InvalidConfig(_))));

        let nan = RulesConfig {
            title_completeness: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_no_rules_scores_full() {
        let report = RuleSetReport::default();
        assert_eq!(report.overall_score, 100.0);
        assert_eq!(report.total_rules, 0);
    }

    #[test]
    fn test_average_overall_score() {
        let full = RuleSetReport::default();
        let none = evaluate_rules(&[], &LengthThresholds::default(), &RulesConfig::default());
        assert_eq!(average_overall_score([&full, &none]), 50.0);
        assert_eq!(average_overall_score(Vec::<&RuleSetReport>::new()), 0.0);
    }

    #[test]
    fn test_message() {
        let outcome = RuleOutcome::measure("id", RuleKind::Uniqueness, Severity::Critical, 3, 4, 1.0);
        assert_eq!(outcome.message(), "id uniqueness: 75.0% (3/4), threshold 100.0%");
    }
}
