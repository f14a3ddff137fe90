//! AI summary quality assessment
//!
//! Sends record descriptions to a chat-completions service and judges the
//! returned summaries with the string heuristics from `descwatch-filters`.
//! Every record yields an [`AiAssessment`]; service failures become `ERROR`
//! verdicts instead of propagating, so one bad call never aborts a batch.

pub mod assess;
pub mod error;
pub mod openai;
pub mod summarizer;

pub use assess::{AiAssessment, AssessmentSummary, Assessor, AssessorConfig};
pub use error::{Error, Result, ServiceError};
pub use openai::{OpenAiConfig, OpenAiSummarizer};
pub use summarizer::Summarizer;
