//! Backend clients
//!
//! One client per backend behind a uniform call contract. Every client
//! normalizes its provider's response shape and error conditions into
//! `CommandResult` before returning; raw transport errors never escape
//! this module. All calls carry hard timeouts, so a client always returns.

pub mod anthropic;
pub mod ollama;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use lal_common::prompt::NULL_SENTINEL;
use lal_common::{BackendId, CommandRequest, CommandResult, UserConfig};

/// Uniform call contract over a single AI backend.
///
/// Implemented by the production clients and by test fakes; the
/// orchestrator is generic over it, so no boxing is involved.
#[allow(async_fn_in_trait)]
pub trait BackendClient {
    fn id(&self) -> BackendId;

    /// False means the orchestrator must skip this backend entirely,
    /// without a network attempt.
    fn is_configured(&self) -> bool;

    /// Issue one generation call. Never panics, never hangs past its
    /// timeout, never returns a raw transport error.
    async fn generate(&self, request: &CommandRequest) -> CommandResult;
}

/// The production backend stack, in fallback priority order.
pub enum Backend {
    Ollama(OllamaClient),
    Anthropic(AnthropicClient),
    OpenAi(OpenAiClient),
}

impl Backend {
    /// Build all three backends from user config and environment.
    pub fn default_stack(config: &UserConfig) -> Vec<Backend> {
        vec![
            Backend::Ollama(OllamaClient::new(&config.ollama_model)),
            Backend::Anthropic(AnthropicClient::new()),
            Backend::OpenAi(OpenAiClient::new()),
        ]
    }
}

impl BackendClient for Backend {
    fn id(&self) -> BackendId {
        match self {
            Backend::Ollama(c) => c.id(),
            Backend::Anthropic(c) => c.id(),
            Backend::OpenAi(c) => c.id(),
        }
    }

    fn is_configured(&self) -> bool {
        match self {
            Backend::Ollama(c) => c.is_configured(),
            Backend::Anthropic(c) => c.is_configured(),
            Backend::OpenAi(c) => c.is_configured(),
        }
    }

    async fn generate(&self, request: &CommandRequest) -> CommandResult {
        match self {
            Backend::Ollama(c) => c.generate(request).await,
            Backend::Anthropic(c) => c.generate(request).await,
            Backend::OpenAi(c) => c.generate(request).await,
        }
    }
}

/// Strip Markdown code-fence delimiters possibly wrapping a command.
pub fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the language tag line if present.
        text = match rest.split_once('\n') {
            Some((_lang, body)) => body,
            None => rest,
        };
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim().to_string()
}

/// Refusal and uncertainty markers local models emit instead of the
/// sentinel. Heuristic, checked case-insensitively.
const REFUSAL_MARKERS: &[&str] = &["cannot", "sorry", "not able", "what is", "question"];

fn looks_like_refusal(text: &str) -> bool {
    let lower = text.to_lowercase();
    REFUSAL_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Interpret a local-model response. `None` means "not a command".
///
/// Local models are sloppy about the sentinel contract, so this screens
/// harder than the cloud path: fence stripping, case-insensitive sentinel,
/// a leading `null` token, and refusal phrasing all count as NotACommand.
pub fn screen_local_response(raw: &str) -> Option<String> {
    let cleaned = strip_code_fences(raw);

    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case(NULL_SENTINEL) {
        return None;
    }
    if let Some(first) = cleaned.split_whitespace().next() {
        if first.eq_ignore_ascii_case(NULL_SENTINEL) {
            return None;
        }
    }
    if looks_like_refusal(&cleaned) {
        return None;
    }

    Some(cleaned)
}

/// Interpret a cloud-provider response. `None` means "not a command".
///
/// Cloud models follow the sentinel contract reliably; only an empty body
/// or the exact sentinel counts.
pub fn screen_cloud_response(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() || text == NULL_SENTINEL {
        return None;
    }
    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_fences() {
        assert_eq!(strip_code_fences("```\nls -la\n```"), "ls -la");
    }

    #[test]
    fn test_strip_fences_with_language_tag() {
        assert_eq!(strip_code_fences("```bash\nlsof -i :8000\n```"), "lsof -i :8000");
    }

    #[test]
    fn test_unfenced_text_passes_through() {
        assert_eq!(strip_code_fences("  git push  "), "git push");
    }

    #[test]
    fn test_local_null_sentinel_is_not_a_command() {
        assert_eq!(screen_local_response("null"), None);
        assert_eq!(screen_local_response("NULL"), None);
        assert_eq!(screen_local_response(""), None);
        assert_eq!(screen_local_response("null - this is a question"), None);
    }

    #[test]
    fn test_local_refusals_are_not_commands() {
        assert_eq!(screen_local_response("I cannot help with that"), None);
        assert_eq!(screen_local_response("Sorry, that is a question"), None);
        assert_eq!(screen_local_response("I'm not able to do this"), None);
    }

    #[test]
    fn test_local_command_survives_screening() {
        assert_eq!(
            screen_local_response("```bash\nlsof -i :8000\n```"),
            Some("lsof -i :8000".to_string())
        );
    }

    #[test]
    fn test_cloud_screening_is_exact() {
        assert_eq!(screen_cloud_response("null"), None);
        assert_eq!(screen_cloud_response("  "), None);
        // Cloud path trusts the provider: only the exact sentinel refuses.
        assert_eq!(
            screen_cloud_response("nullify.sh"),
            Some("nullify.sh".to_string())
        );
        assert_eq!(screen_cloud_response("ls -la"), Some("ls -la".to_string()));
    }
}
