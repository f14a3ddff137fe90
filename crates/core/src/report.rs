//! Dataset-level quality report

use crate::rules::RuleSetReport;
use descwatch_filters::{aggregate, check_alert, valid_ratio, AlertState, Classification};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Evaluation of a single record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordQuality {
    pub id: i64,
    pub title: String,
    pub classification: Classification,
    pub score: f64,
    /// Description length in characters (0 when missing)
    pub description_length: usize,
}

/// The struct handed to presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub classification_counts: BTreeMap<Classification, usize>,
    pub aggregate_score: f64,
    pub alert_state: AlertState,
}

/// Full result of evaluating one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_records: usize,
    /// Every classification is present, zero when unused
    pub classification_counts: BTreeMap<Classification, usize>,
    /// Mean of per-record scores
    pub aggregate_score: f64,
    /// Percentage of records neither `NULL` nor `SHORT`
    pub valid_ratio: f64,
    pub alert_state: AlertState,
    pub threshold: f64,
    /// Batch-level rule outcomes; empty until rules are attached
    #[serde(default)]
    pub rules: RuleSetReport,
    /// Per-record results in input order
    pub records: Vec<RecordQuality>,
}

impl QualityReport {
    /// Aggregate already-evaluated records against an alert threshold
    pub fn from_records(records: Vec<RecordQuality>, threshold: f64) -> Self {
        let mut classification_counts: BTreeMap<Classification, usize> =
            Classification::ALL.iter().map(|c| (*c, 0)).collect();
        for record in &records {
            *classification_counts.entry(record.classification).or_insert(0) += 1;
        }

        let scores: Vec<f64> = records.iter().map(|r| r.score).collect();
        let classifications: Vec<Classification> =
            records.iter().map(|r| r.classification).collect();

        let aggregate_score = aggregate(&scores);

        Self {
            total_records: records.len(),
            classification_counts,
            aggregate_score,
            valid_ratio: valid_ratio(&classifications),
            alert_state: check_alert(aggregate_score, threshold),
            threshold,
            rules: RuleSetReport::default(),
            records,
        }
    }

    /// Attach batch-level rule outcomes
    pub fn with_rules(mut self, rules: RuleSetReport) -> Self {
        self.rules = rules;
        self
    }

    /// Number of records in a bucket
    pub fn count(&self, classification: Classification) -> usize {
        self.classification_counts
            .get(&classification)
            .copied()
            .unwrap_or(0)
    }

    /// Share of records in a bucket, as a percentage
    pub fn percentage(&self, classification: Classification) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        self.count(classification) as f64 / self.total_records as f64 * 100.0
    }

    /// Records that are not `GOOD`, in input order
    pub fn issues(&self) -> impl Iterator<Item = &RecordQuality> {
        self.records
            .iter()
            .filter(|r| r.classification != Classification::Good)
    }

    /// The `limit` most recent records, taken as the highest ids first
    pub fn recent(&self, limit: usize) -> Vec<&RecordQuality> {
        let mut sorted: Vec<&RecordQuality> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.id.cmp(&a.id));
        sorted.truncate(limit);
        sorted
    }

    pub fn summary(&self) -> QualitySummary {
        QualitySummary {
            classification_counts: self.classification_counts.clone(),
            aggregate_score: self.aggregate_score,
            alert_state: self.alert_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, classification: Classification, score: f64) -> RecordQuality {
        RecordQuality {
            id,
            title: format!("record {}", id),
            classification,
            score,
            description_length: 0,
        }
    }

    #[test]
    fn test_empty_report() {
        let report = QualityReport::from_records(Vec::new(), 60.0);
        assert_eq!(report.total_records, 0);
        assert_eq!(report.aggregate_score, 0.0);
        assert_eq!(report.valid_ratio, 0.0);
        assert_eq!(report.alert_state, AlertState::Degraded);
        assert_eq!(report.classification_counts.len(), 4);
        assert_eq!(report.percentage(Classification::Null), 0.0);

        let lenient = QualityReport::from_records(Vec::new(), 0.0);
        assert_eq!(lenient.alert_state, AlertState::Ok);
    }

    #[test]
    fn test_counts_and_percentages() {
        let report = QualityReport::from_records(
            vec![
                record(1, Classification::Good, 90.0),
                record(2, Classification::Good, 90.0),
                record(3, Classification::Short, 30.0),
                record(4, Classification::Null, 0.0),
            ],
            50.0,
        );

        assert_eq!(report.count(Classification::Good), 2);
        assert_eq!(report.count(Classification::Long), 0);
        assert_eq!(report.percentage(Classification::Short), 25.0);
        assert_eq!(report.aggregate_score, 52.5);
        assert_eq!(report.valid_ratio, 50.0);
        assert_eq!(report.alert_state, AlertState::Ok);
        assert_eq!(report.issues().map(|r| r.id).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_recent_orders_by_id_desc() {
        let report = QualityReport::from_records(
            vec![
                record(5, Classification::Good, 90.0),
                record(12, Classification::Good, 90.0),
                record(7, Classification::Good, 90.0),
            ],
            0.0,
        );

        let ids: Vec<i64> = report.recent(2).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![12, 7]);
        assert_eq!(report.recent(10).len(), 3);
    }

    #[test]
    fn test_summary_shape() {
        let report = QualityReport::from_records(vec![record(1, Classification::Long, 85.0)], 90.0);
        let summary = report.summary();
        assert_eq!(summary.aggregate_score, 85.0);
        assert_eq!(summary.alert_state, AlertState::Degraded);
        assert_eq!(summary.classification_counts[&Classification::Long], 1);
    }
}
