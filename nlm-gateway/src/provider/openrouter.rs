//! OpenRouter completion provider.
//!
//! Speaks the OpenAI-compatible `/api/v1/chat/completions` format. One
//! synchronous call per turn with a bounded timeout; outcomes are
//! classified into the `CompletionError` taxonomy and never retried.

use super::{CompletionError, CompletionProvider, CompletionRequest, Message};
use async_trait::async_trait;
use nlm_common::config::ProviderConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Total timeout for one completion call, including connect and body.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider implementation over the OpenRouter chat completions endpoint.
pub struct OpenRouterProvider {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    referer: String,
    title: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    content: String,
}

impl OpenRouterProvider {
    /// Create a provider from configuration. The API key must already be
    /// validated as present at startup.
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone().unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            referer: config.referer.clone(),
            title: config.title.clone(),
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Ordered message list: system turn first, stored history in original
    /// order, the new user turn last.
    fn build_messages(request: &CompletionRequest) -> Vec<Message> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(Message::system(request.system_prompt.clone()));
        messages.extend(request.history.iter().cloned());
        messages.push(Message::user(request.user_message.clone()));
        messages
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: Self::build_messages(&request),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        };

        let response = self
            .client
            .post(format!("{}/api/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = %status, "Completion response received");

        if !status.is_success() {
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Parse("response contained no choices".to_string()))?;

        Ok(choice.message.content.trim().to_string())
    }
}
