//! LLM-backed review generation.
//!
//! Calls an OpenAI-compatible chat-completions endpoint to produce the
//! estado-del-arte text. Failures surface as typed errors rather than
//! error prose embedded in the generated content, so downstream sinks
//! never mistake an error message for a review.

use crate::error::{OptionExt, Result, SotagenError};
use crate::prompts::estado_arte;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Sampling temperature for review generation
const TEMPERATURE: f64 = 0.7;

/// Completion budget for one review
const MAX_TOKENS: u32 = 1500;

/// Review generator configuration
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// API base URL (e.g. `https://api.openai.com/v1`)
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Client for generating estado-del-arte reviews
pub struct ReviewClient {
    client: reqwest::Client,
    config: ReviewConfig,
}

/// OpenAI-compatible API response structures
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl ReviewClient {
    /// Create a new ReviewClient
    pub fn new(config: ReviewConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SotagenError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Generate an estado-del-arte review from raw article text.
    pub async fn generate(&self, article_text: &str) -> Result<String> {
        let prompt = estado_arte::build_prompt(article_text);

        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS
        });

        let api_url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        debug!(model = %self.config.model, "Sending review generation request");

        let response = self
            .client
            .post(&api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(SotagenError::Network)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SotagenError::Api {
                code: status.as_u16() as i32,
                message: format!("LLM API error: {} - {}", status, error_text),
            });
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SotagenError::Parse(format!("Failed to parse LLM response: {}", e)))?;

        let content = api_response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_parse("LLM response contained no choices")?;

        if content.is_empty() {
            return Err(SotagenError::Parse("LLM returned empty content".to_string()));
        }

        info!(chars = content.len(), "Review generated");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_chat_response() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "**Antecedentes del problema** ..."}}
            ],
            "usage": {"prompt_tokens": 100, "completion_tokens": 200, "total_tokens": 300}
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).expect("deserialize");
        assert_eq!(response.choices.len(), 1);
        assert!(response.choices[0]
            .message
            .content
            .contains("Antecedentes del problema"));
    }

    #[test]
    fn test_deserialize_empty_choices() {
        let body = r#"{"choices": []}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).expect("deserialize");
        assert!(response.choices.is_empty());
    }
}
