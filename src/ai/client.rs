//! LLM (`OpenAI`) API client module
//!
//! Encapsulates the chat-completion call used to summarize diffs.

use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

use super::prompt::estimate_tokens;
use crate::core::config::AppConfig;
use crate::errors::{RelayError, SummaryError};

pub const SUMMARY_TEMPERATURE: f64 = 0.3;
pub const SUMMARY_MAX_TOKENS: u32 = 800;

/// LLM API client for generating summaries
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    api_base: String,
}

impl LlmClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, RelayError> {
        let http = Client::builder().timeout(config.openai_timeout).build()?;
        Ok(Self {
            http,
            api_key: config.openai_api_key.clone(),
            org_id: config.openai_org_id.clone(),
            model_name: config.openai_model.clone(),
            api_base: config.openai_api_base.clone(),
        })
    }

    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    /// Builds the JSON body for `/chat/completions`.
    #[must_use]
    pub fn request_body(&self, prompt: &[ChatCompletionMessage]) -> Value {
        let messages: Vec<Value> = prompt
            .iter()
            .map(|msg| {
                let role_str = match msg.role {
                    MessageRole::system => "system",
                    MessageRole::user => "user",
                    MessageRole::assistant => "assistant",
                    MessageRole::function => "function",
                    MessageRole::tool => "tool",
                };
                let content_val = match &msg.content {
                    Content::Text(text) => json!(text),
                    Content::ImageUrl(_) => json!(""),
                };
                json!({ "role": role_str, "content": content_val })
            })
            .collect();

        json!({
            "model": self.model_name,
            "messages": messages,
            "temperature": SUMMARY_TEMPERATURE,
            "max_tokens": SUMMARY_MAX_TOKENS,
        })
    }

    /// Sends one chat-completion request and returns the trimmed text of the
    /// first choice.
    ///
    /// # Errors
    ///
    /// Returns a `SummaryError` for transport failures, timeouts, non-success
    /// statuses and responses without a first choice.
    pub async fn complete(&self, prompt: &[ChatCompletionMessage]) -> Result<String, SummaryError> {
        #[cfg(feature = "debug-logs")]
        info!("Using ChatGPT prompt:\n{:?}", prompt);

        let estimated_input_tokens = prompt
            .iter()
            .map(|msg| match &msg.content {
                Content::Text(text) => estimate_tokens(text),
                Content::ImageUrl(_) => 0,
            })
            .sum::<usize>();
        info!(
            model = %self.model_name,
            estimated_input_tokens, "Requesting diff summary"
        );

        let mut request = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt));
        if let Some(org) = &self.org_id {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SummaryError::Status { status, body });
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| SummaryError::MalformedResponse(e.to_string()))?;

        extract_first_choice(&response_json)
    }
}

/// Pulls `choices[0].message.content` out of a chat-completion response.
///
/// # Errors
///
/// Returns `SummaryError::MalformedResponse` if the path is missing.
pub fn extract_first_choice(response: &Value) -> Result<String, SummaryError> {
    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| SummaryError::MalformedResponse("no content in first choice".to_string()))
}
