//! Local Ollama backend
//!
//! POST /api/generate with `{model, prompt, stream: false}` and a typed
//! response envelope. A 5s reachability probe against /api/tags runs
//! before the 15s generation call, so a stopped daemon fails fast instead
//! of eating the whole generation timeout.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use lal_common::prompt::build_system_prompt;
use lal_common::{BackendId, CommandRequest, CommandResult, FailureReason};

use super::{screen_local_response, BackendClient};

const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
const GENERATE_TIMEOUT: Duration = Duration::from_secs(15);
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Endpoint comes from `OLLAMA_URL` when set, the local default
    /// otherwise.
    pub fn new(model: &str) -> Self {
        let endpoint =
            std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        Self::with_endpoint(model, endpoint)
    }

    pub fn with_endpoint(model: &str, endpoint: String) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(GENERATE_TIMEOUT)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Cheap reachability check before committing to a generation call.
    async fn is_reachable(&self) -> bool {
        let url = format!("{}/api/tags", self.endpoint);
        self.http
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn failed(reason: FailureReason) -> CommandResult {
        CommandResult::Failed {
            backend: BackendId::Ollama,
            reason,
        }
    }
}

impl BackendClient for OllamaClient {
    fn id(&self) -> BackendId {
        BackendId::Ollama
    }

    /// The local endpoint always has a usable default, so Ollama is never
    /// skipped; an absent daemon surfaces as Unreachable instead.
    fn is_configured(&self) -> bool {
        true
    }

    async fn generate(&self, request: &CommandRequest) -> CommandResult {
        if !self.is_reachable().await {
            debug!("Ollama not reachable at {}", self.endpoint);
            return Self::failed(FailureReason::Unreachable);
        }

        let system = build_system_prompt(request.target_os);
        let body = GenerateRequest {
            model: &self.model,
            prompt: format!("{}\n\nCommand: {}", system, request.text),
            stream: false,
        };

        let url = format!("{}/api/generate", self.endpoint);
        info!("[>] ollama [{}] generate", self.model);

        let response = match self.http.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return Self::failed(FailureReason::Timeout),
            Err(e) => {
                warn!("Ollama request failed: {}", e);
                return Self::failed(FailureReason::Unreachable);
            }
        };

        if !response.status().is_success() {
            warn!("Ollama returned status {}", response.status());
            return Self::failed(FailureReason::Unreachable);
        }

        let payload: GenerateResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!("Ollama response did not match expected shape: {}", e);
                return Self::failed(FailureReason::MalformedResponse);
            }
        };

        match screen_local_response(&payload.response) {
            Some(text) => {
                info!("[<] ollama produced: {}", text);
                CommandResult::Command { text }
            }
            None => CommandResult::NotACommand,
        }
    }
}
