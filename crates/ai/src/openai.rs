//! OpenAI-compatible chat-completions client

use crate::{Error, Result, ServiceError, Summarizer};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Connection and prompt settings for the chat-completions endpoint
#[derive(Clone)]
pub struct OpenAiConfig {
    /// Base URL without the `/v1/...` path
    pub base_url: String,
    pub api_key: String,
    pub organization: Option<String>,
    pub project: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
}

impl OpenAiConfig {
    /// Defaults for everything but the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: api_key.into(),
            organization: None,
            project: None,
            model: "gpt-4o".to_string(),
            temperature: 0.5,
            max_tokens: 100,
            system_prompt: "You are a helpful assistant that summarizes content.".to_string(),
        }
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Summarizer backed by `/v1/chat/completions`
pub struct OpenAiSummarizer {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiSummarizer {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::InvalidConfig("API key must not be empty".to_string()));
        }
        if config.model.trim().is_empty() {
            return Err(Error::InvalidConfig("model must not be empty".to_string()));
        }

        let client = reqwest::Client::builder().build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Request payload for one summary
    pub fn request_body(&self, text: &str) -> Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": self.config.system_prompt},
                {"role": "user", "content": format!("Summarize this:\n\n{}", text)}
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        })
    }
}

/// Pull the first choice's message text; absent content reads as empty
pub fn extract_content(response: &Value) -> String {
    response["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Map a non-success status and body to a service error
pub fn error_for_status(status: u16, body: &str) -> ServiceError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        401 | 403 => ServiceError::Auth(message),
        429 => ServiceError::RateLimited(message),
        _ => ServiceError::Http { status, message },
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> std::result::Result<String, ServiceError> {
        let mut request = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(text));

        if let Some(organization) = &self.config.organization {
            request = request.header("OpenAI-Organization", organization.as_str());
        }
        if let Some(project) = &self.config.project {
            request = request.header("OpenAI-Project", project.as_str());
        }

        debug!("Requesting summary from {} ({})", self.endpoint(), self.config.model);

        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), &body));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        Ok(extract_content(&json))
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body() {
        let summarizer = OpenAiSummarizer::new(OpenAiConfig::new("sk-test")).unwrap();
        let body = summarizer.request_body("A steel bottle");

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Summarize this:\n\nA steel bottle");
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let mut config = OpenAiConfig::new("sk-test");
        config.base_url = "http://localhost:1234/".to_string();
        let summarizer = OpenAiSummarizer::new(config).unwrap();
        assert_eq!(summarizer.endpoint(), "http://localhost:1234/v1/chat/completions");
    }

    #[test]
    fn test_rejects_empty_key() {
        assert!(matches!(
            OpenAiSummarizer::new(OpenAiConfig::new("  ")),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_extract_content() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "  A short summary. "}}]
        });
        assert_eq!(extract_content(&response), "A short summary.");

        let no_choices = json!({"choices": []});
        assert_eq!(extract_content(&no_choices), "");

        let null_content = json!({"choices": [{"message": {"content": null}}]});
        assert_eq!(extract_content(&null_content), "");
    }

    #[test]
    fn test_error_for_status() {
        let body = r#"{"error": {"message": "Incorrect API key provided"}}"#;
        assert_eq!(
            error_for_status(401, body),
            ServiceError::Auth("Incorrect API key provided".to_string())
        );
        assert!(matches!(error_for_status(429, "slow down"), ServiceError::RateLimited(m) if m == "slow down"));
        assert!(matches!(
            error_for_status(500, ""),
            ServiceError::Http { status: 500, .. }
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", OpenAiConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
    }
}
