//! Core data model for command generation
//!
//! One `CommandRequest` is processed per invocation. Backends answer with a
//! `CommandResult`, which is either a command, an explicit "this is not a
//! command request" signal, or a normalized failure. Raw transport errors
//! never cross this boundary.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one AI backend. Declaration order is fallback priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    /// Local Ollama daemon (free, tried first)
    Ollama,
    /// Anthropic messages API
    Anthropic,
    /// OpenAI chat completions API
    OpenAi,
}

impl BackendId {
    /// Fixed fallback priority: local first, then cloud.
    pub fn priority_order() -> &'static [BackendId] {
        &[BackendId::Ollama, BackendId::Anthropic, BackendId::OpenAi]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Ollama => "ollama",
            BackendId::Anthropic => "anthropic",
            BackendId::OpenAi => "openai",
        }
    }

    /// Local backends get a second chance after a refusal; cloud refusals
    /// are final.
    pub fn is_local(&self) -> bool {
        matches!(self, BackendId::Ollama)
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating system the generated command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    MacOs,
    Linux,
    Windows,
}

impl Default for TargetOs {
    fn default() -> Self {
        Self::MacOs
    }
}

impl TargetOs {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOs::MacOs => "macos",
            TargetOs::Linux => "linux",
            TargetOs::Windows => "windows",
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetOs {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "macos" | "mac" | "darwin" | "osx" => Ok(TargetOs::MacOs),
            "linux" => Ok(TargetOs::Linux),
            "windows" | "win" => Ok(TargetOs::Windows),
            other => bail!("Unknown OS '{}'. Valid values: macos, linux, windows", other),
        }
    }
}

/// One natural-language request, read-only for the whole invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub text: String,
    pub target_os: TargetOs,
}

impl CommandRequest {
    /// Trims the request text and rejects empty input.
    pub fn new(text: &str, target_os: TargetOs) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            bail!("Empty request");
        }
        Ok(Self {
            text: text.to_string(),
            target_os,
        })
    }
}

/// Why a backend call failed. `NotACommand` is deliberately not in here:
/// it is a valid negative answer, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    #[error("backend unreachable")]
    Unreachable,
    #[error("request timed out")]
    Timeout,
    #[error("malformed response")]
    MalformedResponse,
    #[error("provider error: {0}")]
    ProviderError(String),
    #[error("credential not configured")]
    AuthMissing,
}

/// Outcome of one backend call, normalized across providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// A shell command. Non-empty and never the literal sentinel "null".
    Command { text: String },
    /// The backend decided the input was a question or non-actionable.
    NotACommand,
    /// The call failed; the orchestrator may try the next backend.
    Failed {
        backend: BackendId,
        reason: FailureReason,
    },
}

/// What happened when the orchestrator considered one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Backend was not configured; no network call was made.
    Skipped(&'static str),
    Failed(FailureReason),
    NotACommand,
    Succeeded,
}

/// One entry in the orchestrator's diagnostics log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub backend: BackendId,
    pub outcome: AttemptOutcome,
}

/// Full record of one fallback pass, in call order.
#[derive(Debug, Clone, Default)]
pub struct AttemptLog {
    pub attempts: Vec<Attempt>,
}

impl AttemptLog {
    pub fn record(&mut self, backend: BackendId, outcome: AttemptOutcome) {
        self.attempts.push(Attempt { backend, outcome });
    }

    /// True if no backend was actually called.
    pub fn all_skipped(&self) -> bool {
        self.attempts
            .iter()
            .all(|a| matches!(a.outcome, AttemptOutcome::Skipped(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_is_local_first() {
        assert_eq!(
            BackendId::priority_order(),
            &[BackendId::Ollama, BackendId::Anthropic, BackendId::OpenAi]
        );
    }

    #[test]
    fn test_request_rejects_empty_text() {
        assert!(CommandRequest::new("   ", TargetOs::MacOs).is_err());
        let req = CommandRequest::new("  list files  ", TargetOs::Linux).unwrap();
        assert_eq!(req.text, "list files");
    }

    #[test]
    fn test_target_os_parsing() {
        assert_eq!("mac".parse::<TargetOs>().unwrap(), TargetOs::MacOs);
        assert_eq!("Linux".parse::<TargetOs>().unwrap(), TargetOs::Linux);
        assert_eq!("win".parse::<TargetOs>().unwrap(), TargetOs::Windows);
        assert!("beos".parse::<TargetOs>().is_err());
    }

    #[test]
    fn test_only_ollama_is_local() {
        assert!(BackendId::Ollama.is_local());
        assert!(!BackendId::Anthropic.is_local());
        assert!(!BackendId::OpenAi.is_local());
    }

    #[test]
    fn test_attempt_log_all_skipped() {
        let mut log = AttemptLog::default();
        log.record(BackendId::Anthropic, AttemptOutcome::Skipped("no key"));
        assert!(log.all_skipped());
        log.record(BackendId::OpenAi, AttemptOutcome::Failed(FailureReason::Timeout));
        assert!(!log.all_skipped());
    }
}
