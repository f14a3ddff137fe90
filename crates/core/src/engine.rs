//! Parallel batch evaluation
//!
//! Records are classified and scored independently with Rayon; the aggregate
//! is computed only after every per-record result has been collected.

use crate::report::{QualityReport, RecordQuality};
use crate::rules::{evaluate_rules, RulesConfig};
use crate::{Error, Result};
use descwatch_filters::classification::description_length;
use descwatch_filters::{AlertConfig, LengthThresholds, ScoreTable};
use descwatch_formats::Record;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the engine needs to evaluate a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub thresholds: LengthThresholds,
    pub scores: ScoreTable,
    pub alert: AlertConfig,
    pub rules: RulesConfig,
    /// Worker threads for a dedicated pool (None = Rayon's global pool)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.scores.validate()?;
        self.alert.validate()?;
        self.rules.validate()?;
        Ok(())
    }
}

/// Batch quality evaluator
pub struct QualityEngine {
    config: EngineConfig,
    pool: Option<rayon::ThreadPool>,
}

impl QualityEngine {
    /// Create an engine, rejecting invalid configuration up front
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let pool = match config.num_threads {
            Some(num_threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .map_err(|e| Error::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify and score one record
    pub fn evaluate_record(&self, record: &Record) -> RecordQuality {
        let classification = self.config.thresholds.classify(record.description());

        RecordQuality {
            id: record.id,
            title: record.title.clone(),
            classification,
            score: self.config.scores.score(classification),
            description_length: record.description().map(description_length).unwrap_or(0),
        }
    }

    /// Evaluate a whole batch; result order follows input order
    pub fn evaluate(&self, records: &[Record]) -> QualityReport {
        let evaluate_all = || -> Vec<RecordQuality> {
            records
                .par_iter()
                .map(|record| self.evaluate_record(record))
                .collect()
        };

        let evaluated = match &self.pool {
            Some(pool) => pool.install(evaluate_all),
            None => evaluate_all(),
        };

        let rules = evaluate_rules(records, &self.config.thresholds, &self.config.rules);
        let report =
            QualityReport::from_records(evaluated, self.config.alert.threshold).with_rules(rules);

        debug!(
            "Evaluated {} records: aggregate {:.2}, state {}, rules {}/{}",
            report.total_records,
            report.aggregate_score,
            report.alert_state,
            report.rules.passed_rules,
            report.rules.total_rules
        );

        report
    }
}

/// Builder for engine configuration
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn thresholds(mut self, thresholds: LengthThresholds) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    pub fn scores(mut self, scores: ScoreTable) -> Self {
        self.config.scores = scores;
        self
    }

    pub fn alert_threshold(mut self, threshold: f64) -> Self {
        self.config.alert.threshold = threshold;
        self
    }

    pub fn rules(mut self, rules: RulesConfig) -> Self {
        self.config.rules = rules;
        self
    }

    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = Some(threads);
        self
    }

    pub fn build(self) -> Result<QualityEngine> {
        QualityEngine::new(self.config)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot evaluation with an explicit configuration
pub fn evaluate_batch(records: &[Record], config: EngineConfig) -> Result<QualityReport> {
    Ok(QualityEngine::new(config)?.evaluate(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use descwatch_filters::{AlertState, Classification};

    fn records() -> Vec<Record> {
        vec![
            Record::new(1, "Corrupted Record", None),
            Record::new(2, "Tiny", Some("ok".to_string())),
            Record::new(3, "Verbose", Some("A".repeat(250))),
        ]
    }

    #[test]
    fn test_evaluate_record() {
        let engine = QualityEngine::new(EngineConfig::default()).unwrap();
        let result = engine.evaluate_record(&Record::new(
            9,
            "Bottle",
            Some("Keeps drinks cold for 24 hours".to_string()),
        ));

        assert_eq!(result.classification, Classification::Good);
        assert_eq!(result.score, 90.0);
        assert_eq!(result.description_length, 30);
    }

    #[test]
    fn test_evaluate_preserves_order() {
        let engine = EngineBuilder::new().num_threads(2).build().unwrap();
        let many: Vec<Record> = (0..500)
            .map(|i| Record::new(i, "", Some("x".repeat((i % 300) as usize))))
            .collect();

        let report = engine.evaluate(&many);
        let ids: Vec<i64> = report.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn test_builder_threshold() {
        let engine = EngineBuilder::new().alert_threshold(30.0).build().unwrap();
        let report = engine.evaluate(&records());
        assert_eq!(report.alert_state, AlertState::Ok);

        let strict = EngineBuilder::new().alert_threshold(40.0).build().unwrap();
        assert_eq!(strict.evaluate(&records()).alert_state, AlertState::Degraded);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = EngineBuilder::new()
            .scores(ScoreTable {
                good: 150.0,
                ..Default::default()
            })
            .build();
        assert!(matches!(result, Err(Error::Filter(_))));

        let result = EngineBuilder::new().alert_threshold(f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_evaluate_batch_empty() {
        let report = evaluate_batch(&[], EngineConfig::default()).unwrap();
        assert_eq!(report.aggregate_score, 0.0);
        assert_eq!(report.total_records, 0);
    }
}
