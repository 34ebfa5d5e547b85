//! Anthropic messages backend
//!
//! Typed request/response envelopes for the v1/messages API. Parsing fails
//! closed: a 200 with an unexpected shape is MalformedResponse, a
//! well-formed error envelope is ProviderError, and a missing credential
//! skips the backend without any network attempt.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use lal_common::prompt::build_system_prompt;
use lal_common::{BackendId, CommandRequest, CommandResult, FailureReason};

use super::{screen_cloud_response, BackendClient};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";
const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.1;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: Option<String>,
    url: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl AnthropicClient {
    /// Credential comes from `ANTHROPIC_API_KEY`; an empty value counts as
    /// absent.
    pub fn new() -> Self {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::with_url(api_key, API_URL.to_string())
    }

    pub fn with_url(api_key: Option<String>, url: String) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
            url,
        }
    }

    fn failed(reason: FailureReason) -> CommandResult {
        CommandResult::Failed {
            backend: BackendId::Anthropic,
            reason,
        }
    }

    /// Interpret the raw response body. Success envelope first, then the
    /// error envelope, then fail closed.
    fn interpret_body(body: &str) -> CommandResult {
        if let Ok(ok) = serde_json::from_str::<MessagesResponse>(body) {
            let Some(block) = ok.content.first() else {
                return Self::failed(FailureReason::MalformedResponse);
            };
            return match screen_cloud_response(&block.text) {
                Some(text) => CommandResult::Command { text },
                None => CommandResult::NotACommand,
            };
        }
        if let Ok(err) = serde_json::from_str::<ErrorEnvelope>(body) {
            warn!("Anthropic provider error: {}", err.error.message);
            return Self::failed(FailureReason::ProviderError(err.error.message));
        }
        Self::failed(FailureReason::MalformedResponse)
    }
}

impl Default for AnthropicClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendClient for AnthropicClient {
    fn id(&self) -> BackendId {
        BackendId::Anthropic
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, request: &CommandRequest) -> CommandResult {
        let Some(api_key) = &self.api_key else {
            return Self::failed(FailureReason::AuthMissing);
        };

        let body = MessagesRequest {
            model: DEFAULT_MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: build_system_prompt(request.target_os),
            messages: vec![Message {
                role: "user",
                content: format!("Command: {}", request.text),
            }],
        };

        info!("[>] anthropic [{}] messages", DEFAULT_MODEL);

        let response = match self
            .http
            .post(&self.url)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return Self::failed(FailureReason::Timeout),
            Err(e) => {
                warn!("Anthropic request failed: {}", e);
                return Self::failed(FailureReason::Unreachable);
            }
        };

        let text = match response.text().await {
            Ok(t) => t,
            Err(_) => return Self::failed(FailureReason::MalformedResponse),
        };

        Self::interpret_body(&text)
    }
}
