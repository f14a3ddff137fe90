//! Seam to the external text-generation service

use crate::ServiceError;
use async_trait::async_trait;

/// Produces a summary of arbitrary text
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// One attempt; failures are returned, never retried here
    async fn summarize(&self, text: &str) -> Result<String, ServiceError>;

    /// Short name for logs
    fn name(&self) -> &str {
        "summarizer"
    }
}
