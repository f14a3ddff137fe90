//! Alert state tracking across successive reports
//!
//! A monitor remembers the last observed [`AlertState`] and tells its sink
//! only when the state changes. Before the first observation the state is
//! taken to be `Ok`, so a healthy first report is silent and a degraded one
//! is announced.

use crate::report::QualityReport;
use descwatch_filters::{check_alert, AlertState, Classification};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A change of alert state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertTransition {
    pub from: AlertState,
    pub to: AlertState,
    pub aggregate_score: f64,
    pub threshold: f64,
    /// NULL + SHORT records in the report that caused the transition
    pub flagged_records: usize,
}

/// Receiver of alert transitions
pub trait AlertSink {
    fn notify(&self, transition: &AlertTransition);
}

impl<F> AlertSink for F
where
    F: Fn(&AlertTransition),
{
    fn notify(&self, transition: &AlertTransition) {
        self(transition)
    }
}

/// Sink that writes transitions to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AlertSink for TracingSink {
    fn notify(&self, transition: &AlertTransition) {
        match transition.to {
            AlertState::Degraded => warn!(
                "ALERT: quality score {:.1} fell below threshold {:.1} ({} flagged records)",
                transition.aggregate_score, transition.threshold, transition.flagged_records
            ),
            AlertState::Ok => info!(
                "Recovered: quality score {:.1} is back above threshold {:.1}",
                transition.aggregate_score, transition.threshold
            ),
        }
    }
}

/// Tracks alert state and notifies a sink on transitions
pub struct AlertMonitor<S: AlertSink> {
    sink: S,
    last: Option<AlertState>,
}

impl<S: AlertSink> AlertMonitor<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, last: None }
    }

    /// Last observed state, if any
    pub fn state(&self) -> Option<AlertState> {
        self.last
    }

    /// Feed a report; returns the transition if one was emitted
    pub fn observe(&mut self, report: &QualityReport) -> Option<AlertTransition> {
        let flagged = report.count(Classification::Null) + report.count(Classification::Short);
        self.record(report.alert_state, report.aggregate_score, report.threshold, flagged)
    }

    /// Feed a bare score, for callers that aggregate elsewhere
    pub fn observe_score(&mut self, aggregate_score: f64, threshold: f64) -> Option<AlertTransition> {
        let state = check_alert(aggregate_score, threshold);
        self.record(state, aggregate_score, threshold, 0)
    }

    fn record(
        &mut self,
        state: AlertState,
        aggregate_score: f64,
        threshold: f64,
        flagged_records: usize,
    ) -> Option<AlertTransition> {
        let previous = self.last.replace(state).unwrap_or(AlertState::Ok);
        if previous == state {
            return None;
        }

        let transition = AlertTransition {
            from: previous,
            to: state,
            aggregate_score,
            threshold,
            flagged_records,
        };
        self.sink.notify(&transition);
        Some(transition)
    }
}
