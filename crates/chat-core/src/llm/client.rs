//! Completion API HTTP client
//!
//! Talks to an OpenAI-compatible chat completions endpoint (Groq, OpenAI,
//! or anything speaking the same wire format).

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};

use super::types::*;

/// Fixed sampling temperature. Slightly higher than the API default for
/// more creative responses; not user-configurable.
const TEMPERATURE: f32 = 0.85;

/// Token cap for the startup connectivity probe
const PROBE_MAX_TOKENS: u32 = 5;

/// Completion API client
///
/// Holds connection configuration only. The system prompt is an explicit
/// argument of every call, so the client can be shared across concurrent
/// requests without any per-session state.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl CompletionClient {
    /// Create a new completion client
    ///
    /// Fails if no credential is configured. Does not touch the network;
    /// use [`CompletionClient::connect`] to also verify connectivity.
    pub fn new(config: &Config) -> Result<Self> {
        if config.llm.api_key.is_empty() {
            return Err(Error::Config("API key is required".to_string()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
            base_url: config.llm.base_url.clone(),
        })
    }

    /// Create with custom base URL (for testing or custom endpoints)
    pub fn with_base_url(config: &Config, base_url: String) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.base_url = base_url;
        Ok(client)
    }

    /// Create a client and verify connectivity to the completion API
    ///
    /// Sends one trivial fixed exchange and discards the result. Any
    /// failure (auth, network, quota) propagates and the client is never
    /// handed out.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = Self::new(config)?;
        client.probe().await?;
        Ok(client)
    }

    /// Connectivity probe: a minimal completion request whose result is
    /// discarded.
    async fn probe(&self) -> Result<()> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system("Hello"), ChatMessage::user("test")],
            temperature: TEMPERATURE,
            max_tokens: Some(PROBE_MAX_TOKENS),
        };

        self.send(request).await.map_err(|e| {
            Error::Completion(format!("Failed to connect to completion API: {}", e))
        })?;

        info!("Completion API connection verified (model: {})", self.model);
        Ok(())
    }

    /// Run one completion exchange
    ///
    /// The ordered message list is: the system prompt, the prior history
    /// (user/assistant per entry), then `message` as the final user entry.
    /// A trimmed-empty `message` is rejected before any outbound call.
    pub async fn get_response(
        &self,
        system_prompt: &str,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<String> {
        if message.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(message));

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: TEMPERATURE,
            max_tokens: None,
        };

        let response = self.send(request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Completion("No choices in response".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }

    /// Send a request to the completions endpoint
    async fn send(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!("Sending request to completion API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("Completion API error: {} - {}", status, body);
            return Err(Error::Completion(format!("{}: {}", status, body)));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            Error::Completion(format!("Failed to parse response: {} - {}", e, body))
        })?;

        info!(
            "Completion API response: finish_reason={:?}, tokens={}",
            parsed.choices.first().and_then(|c| c.finish_reason.clone()),
            parsed
                .usage
                .as_ref()
                .map(|u| u.completion_tokens)
                .unwrap_or(0)
        );

        Ok(parsed)
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }
}
