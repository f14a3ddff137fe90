//! Batch quality evaluation
//!
//! Runs the per-record filters over a batch in parallel, gathers the results
//! into a [`QualityReport`] for presentation, checks batch-level rules
//! (completeness, id uniqueness, description validity), and tracks alert
//! state changes for notification sinks.

pub mod engine;
pub mod error;
pub mod monitor;
pub mod report;
pub mod rules;

pub use engine::{evaluate_batch, EngineBuilder, EngineConfig, QualityEngine};
pub use error::{Error, Result};
pub use monitor::{AlertMonitor, AlertSink, AlertTransition, TracingSink};
pub use report::{QualityReport, QualitySummary, RecordQuality};
pub use rules::{
    average_overall_score, evaluate_rules, RuleKind, RuleOutcome, RuleSetReport, RulesConfig,
    Severity,
};
