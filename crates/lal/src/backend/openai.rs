//! OpenAI chat completions backend
//!
//! Same contract as the Anthropic client, different wire shapes: the
//! system prompt travels as the first chat message and the completion text
//! sits at choices[0].message.content.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use lal_common::prompt::build_system_prompt;
use lal_common::{BackendId, CommandRequest, CommandResult, FailureReason};

use super::{screen_cloud_response, BackendClient};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.1;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiClient {
    /// Credential comes from `OPENAI_API_KEY`; an empty value counts as
    /// absent.
    pub fn new() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
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
            backend: BackendId::OpenAi,
            reason,
        }
    }

    fn interpret_body(body: &str) -> CommandResult {
        if let Ok(ok) = serde_json::from_str::<ChatResponse>(body) {
            let Some(choice) = ok.choices.first() else {
                return Self::failed(FailureReason::MalformedResponse);
            };
            return match screen_cloud_response(&choice.message.content) {
                Some(text) => CommandResult::Command { text },
                None => CommandResult::NotACommand,
            };
        }
        if let Ok(err) = serde_json::from_str::<ErrorEnvelope>(body) {
            warn!("OpenAI provider error: {}", err.error.message);
            return Self::failed(FailureReason::ProviderError(err.error.message));
        }
        Self::failed(FailureReason::MalformedResponse)
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendClient for OpenAiClient {
    fn id(&self) -> BackendId {
        BackendId::OpenAi
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, request: &CommandRequest) -> CommandResult {
        let Some(api_key) = &self.api_key else {
            return Self::failed(FailureReason::AuthMissing);
        };

        let body = ChatRequest {
            model: DEFAULT_MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: build_system_prompt(request.target_os).to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("Command: {}", request.text),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        info!("[>] openai [{}] chat completion", DEFAULT_MODEL);

        let response = match self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return Self::failed(FailureReason::Timeout),
            Err(e) => {
                warn!("OpenAI request failed: {}", e);
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
