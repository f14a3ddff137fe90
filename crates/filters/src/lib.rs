//! Record quality filters
//!
//! Pure, per-record building blocks for description quality monitoring:
//! length classification, score lookup and aggregation, alert threshold
//! checks, and the string predicates used to judge AI-generated summaries.
//! Nothing here touches the environment or performs I/O.

pub mod alert;
pub mod classification;
pub mod error;
pub mod heuristics;
pub mod scoring;

pub use alert::{check_alert, AlertConfig, AlertState};
pub use classification::{classify, Classification, LengthThresholds};
pub use error::{Error, Result};
pub use heuristics::{HeuristicsConfig, Inspection, SummaryHeuristics, Verdict};
pub use scoring::{aggregate, score, valid_ratio, ScoreTable};
