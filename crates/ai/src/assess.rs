//! Per-record AI assessment
//!
//! Each record moves through a small state machine:
//!
//! - no description (absent, empty or whitespace) -> `ERROR`, service not called
//! - service call fails or exceeds the timeout -> `ERROR`, reason from the failure
//! - service answers -> heuristics decide `WARNING` or `OK`
//!
//! Calls are made once; there is no retry.

use crate::{Result, ServiceError, Summarizer};
use descwatch_filters::heuristics::NO_DATA_REASON;
use descwatch_filters::{HeuristicsConfig, SummaryHeuristics, Verdict};
use descwatch_formats::Record;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Result of assessing one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAssessment {
    pub record_id: i64,
    /// Summary returned by the service, when a call succeeded
    pub summary_text: Option<String>,
    pub verdict: Verdict,
    pub reason: String,
}

/// Assessor settings
#[derive(Debug, Clone)]
pub struct AssessorConfig {
    /// Upper bound on a single service call
    pub timeout: Duration,
    /// Calls in flight at once; 1 means strictly sequential
    pub concurrency: usize,
    pub heuristics: HeuristicsConfig,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            concurrency: 1,
            heuristics: HeuristicsConfig::default(),
        }
    }
}

/// Runs records through a summarizer and judges the output
pub struct Assessor<S: Summarizer> {
    summarizer: S,
    heuristics: SummaryHeuristics,
    timeout: Duration,
    concurrency: usize,
}

impl<S: Summarizer> Assessor<S> {
    pub fn new(summarizer: S, config: AssessorConfig) -> Result<Self> {
        Ok(Self {
            summarizer,
            heuristics: SummaryHeuristics::new(config.heuristics)?,
            timeout: config.timeout,
            concurrency: config.concurrency.max(1),
        })
    }

    /// Assess one description on behalf of `record_id`
    pub async fn assess_text(&self, record_id: i64, description: Option<&str>) -> AiAssessment {
        let text = match description.map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => {
                debug!("Record {}: no description, skipping service call", record_id);
                return AiAssessment {
                    record_id,
                    summary_text: None,
                    verdict: Verdict::Error,
                    reason: NO_DATA_REASON.to_string(),
                };
            }
        };

        let outcome = match tokio::time::timeout(self.timeout, self.summarizer.summarize(text)).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(summary) => {
                let inspection = self.heuristics.inspect(&summary);
                if inspection.verdict != Verdict::Ok {
                    debug!("Record {}: {}", record_id, inspection.reason);
                }
                AiAssessment {
                    record_id,
                    summary_text: Some(summary),
                    verdict: inspection.verdict,
                    reason: inspection.reason,
                }
            }
            Err(e) => {
                warn!(
                    "Record {}: summary generation failed via {}: {}",
                    record_id,
                    self.summarizer.name(),
                    e
                );
                AiAssessment {
                    record_id,
                    summary_text: None,
                    verdict: Verdict::Error,
                    reason: format!("summary generation failed: {}", e),
                }
            }
        }
    }

    pub async fn assess(&self, record: &Record) -> AiAssessment {
        self.assess_text(record.id, record.description()).await
    }

    /// Assess a batch; output order follows input order
    pub async fn assess_batch(&self, records: &[Record]) -> Vec<AiAssessment> {
        stream::iter(records)
            .map(|record| self.assess(record))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

/// Roll-up of a batch of assessments for alerting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub total: usize,
    pub ok: usize,
    pub warnings: usize,
    pub errors: usize,
    /// Every assessment that was not `OK`, in input order
    pub flagged: Vec<AiAssessment>,
}

impl AssessmentSummary {
    pub fn from_assessments(assessments: &[AiAssessment]) -> Self {
        let mut summary = Self {
            total: assessments.len(),
            ..Default::default()
        };

        for assessment in assessments {
            match assessment.verdict {
                Verdict::Ok => summary.ok += 1,
                Verdict::Warning => summary.warnings += 1,
                Verdict::Error => summary.errors += 1,
            }
            if assessment.verdict != Verdict::Ok {
                summary.flagged.push(assessment.clone());
            }
        }

        summary
    }

    pub fn is_clean(&self) -> bool {
        self.flagged.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(record_id: i64, verdict: Verdict) -> AiAssessment {
        AiAssessment {
            record_id,
            summary_text: None,
            verdict,
            reason: String::new(),
        }
    }

    #[test]
    fn test_summary_rollup() {
        let summary = AssessmentSummary::from_assessments(&[
            assessment(1, Verdict::Ok),
            assessment(2, Verdict::Warning),
            assessment(3, Verdict::Error),
            assessment(4, Verdict::Ok),
        ]);

        assert_eq!(summary.total, 4);
        assert_eq!((summary.ok, summary.warnings, summary.errors), (2, 1, 1));
        assert_eq!(
            summary.flagged.iter().map(|a| a.record_id).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_empty_rollup_is_clean() {
        let summary = AssessmentSummary::from_assessments(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.is_clean());
    }
}
