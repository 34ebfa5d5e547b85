//! Fallback orchestrator
//!
//! Tries backends in fixed priority order (local first, then cloud) and
//! stops at the first usable outcome. Two asymmetries are deliberate:
//!
//! - Unconfigured backends are skipped, never called.
//! - A local "not a command" answer is retried on the next backend,
//!   because small local models refuse unreliably. A cloud "not a
//!   command" answer is final.
//!
//! No retries anywhere: a failed backend is simply passed over.

use tracing::{debug, info, warn};

use lal_common::{
    AttemptLog, AttemptOutcome, BackendId, CommandRequest, CommandResult, FailureReason,
};

use crate::backend::BackendClient;

/// Run the fallback pass over `backends` for one request.
///
/// Returns the final result plus the full attempt log for diagnostics.
/// Backends must be supplied in priority order; at most one call is
/// outstanding at a time.
pub async fn resolve<B: BackendClient>(
    backends: &[B],
    request: &CommandRequest,
) -> (CommandResult, AttemptLog) {
    let mut log = AttemptLog::default();
    let mut last_terminal: Option<CommandResult> = None;

    for backend in backends {
        let id = backend.id();

        if !backend.is_configured() {
            debug!("[{}] skipped: credential not configured", id);
            log.record(id, AttemptOutcome::Skipped("credential not configured"));
            continue;
        }

        info!("[>] trying backend [{}]", id);
        match backend.generate(request).await {
            CommandResult::Command { text } => {
                info!("[<] [{}] produced a command", id);
                log.record(id, AttemptOutcome::Succeeded);
                return (CommandResult::Command { text }, log);
            }
            CommandResult::NotACommand => {
                log.record(id, AttemptOutcome::NotACommand);
                if !id.is_local() {
                    return (CommandResult::NotACommand, log);
                }
                // Local refusal heuristic is weak; give the next backend
                // a chance to disagree.
                info!("[{}] says not a command, trying next backend", id);
                last_terminal = Some(CommandResult::NotACommand);
            }
            CommandResult::Failed { backend, reason } => {
                warn!("[{}] failed: {}", id, reason);
                log.record(id, AttemptOutcome::Failed(reason.clone()));
                last_terminal = Some(CommandResult::Failed { backend, reason });
            }
        }
    }

    // Exhausted: surface the last terminal state. If nothing was even
    // attempted, report the highest-priority backend as unreachable so
    // the presenter can point at Ollama setup.
    let result = last_terminal.unwrap_or(CommandResult::Failed {
        backend: BackendId::Ollama,
        reason: FailureReason::Unreachable,
    });
    (result, log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lal_common::TargetOs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeBackend {
        id: BackendId,
        configured: bool,
        result: CommandResult,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new(id: BackendId, result: CommandResult) -> Self {
            Self {
                id,
                configured: true,
                result,
                calls: AtomicUsize::new(0),
            }
        }

        fn unconfigured(id: BackendId) -> Self {
            Self {
                id,
                configured: false,
                result: CommandResult::NotACommand,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl BackendClient for FakeBackend {
        fn id(&self) -> BackendId {
            self.id
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate(&self, _request: &CommandRequest) -> CommandResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn request() -> CommandRequest {
        CommandRequest::new("what's running on port 8000", TargetOs::MacOs).unwrap()
    }

    fn command(text: &str) -> CommandResult {
        CommandResult::Command {
            text: text.to_string(),
        }
    }

    fn failed(backend: BackendId, reason: FailureReason) -> CommandResult {
        CommandResult::Failed { backend, reason }
    }

    #[tokio::test]
    async fn test_local_success_short_circuits_cloud() {
        let backends = vec![
            FakeBackend::new(BackendId::Ollama, command("lsof -i :8000")),
            FakeBackend::new(BackendId::Anthropic, command("wrong")),
            FakeBackend::new(BackendId::OpenAi, command("wrong")),
        ];

        let (result, log) = resolve(&backends, &request()).await;

        assert_eq!(result, command("lsof -i :8000"));
        assert_eq!(backends[0].calls(), 1);
        assert_eq!(backends[1].calls(), 0);
        assert_eq!(backends[2].calls(), 0);
        assert_eq!(log.attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_local_failure_falls_back_to_next() {
        let backends = vec![
            FakeBackend::new(
                BackendId::Ollama,
                failed(BackendId::Ollama, FailureReason::Unreachable),
            ),
            FakeBackend::new(BackendId::Anthropic, command("lsof -i :8000")),
            FakeBackend::new(BackendId::OpenAi, command("wrong")),
        ];

        let (result, _log) = resolve(&backends, &request()).await;

        assert_eq!(result, command("lsof -i :8000"));
        assert_eq!(backends[0].calls(), 1);
        assert_eq!(backends[1].calls(), 1);
        assert_eq!(backends[2].calls(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_backend_is_never_called() {
        let backends = vec![
            FakeBackend::new(
                BackendId::Ollama,
                failed(BackendId::Ollama, FailureReason::Unreachable),
            ),
            FakeBackend::unconfigured(BackendId::Anthropic),
            FakeBackend::new(BackendId::OpenAi, command("df -h")),
        ];

        let (result, log) = resolve(&backends, &request()).await;

        assert_eq!(result, command("df -h"));
        assert_eq!(backends[1].calls(), 0);
        assert_eq!(
            log.attempts[1].outcome,
            AttemptOutcome::Skipped("credential not configured")
        );
    }

    #[tokio::test]
    async fn test_local_not_a_command_continues() {
        let backends = vec![
            FakeBackend::new(BackendId::Ollama, CommandResult::NotACommand),
            FakeBackend::new(BackendId::Anthropic, command("uname -a")),
        ];

        let (result, _log) = resolve(&backends, &request()).await;

        assert_eq!(result, command("uname -a"));
        assert_eq!(backends[1].calls(), 1);
    }

    #[tokio::test]
    async fn test_cloud_not_a_command_is_final() {
        let backends = vec![
            FakeBackend::new(BackendId::Ollama, CommandResult::NotACommand),
            FakeBackend::new(BackendId::Anthropic, CommandResult::NotACommand),
            FakeBackend::new(BackendId::OpenAi, command("should not be reached")),
        ];

        let (result, _log) = resolve(&backends, &request()).await;

        assert_eq!(result, CommandResult::NotACommand);
        assert_eq!(backends[2].calls(), 0);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_failure() {
        let backends = vec![
            FakeBackend::new(
                BackendId::Ollama,
                failed(BackendId::Ollama, FailureReason::Unreachable),
            ),
            FakeBackend::new(
                BackendId::Anthropic,
                failed(
                    BackendId::Anthropic,
                    FailureReason::ProviderError("overloaded".into()),
                ),
            ),
        ];

        let (result, log) = resolve(&backends, &request()).await;

        assert_eq!(
            result,
            failed(
                BackendId::Anthropic,
                FailureReason::ProviderError("overloaded".into())
            )
        );
        assert_eq!(log.attempts.len(), 2);
    }

    #[tokio::test]
    async fn test_nothing_configured_reports_local_unreachable() {
        let backends = vec![
            FakeBackend::unconfigured(BackendId::Anthropic),
            FakeBackend::unconfigured(BackendId::OpenAi),
        ];

        let (result, log) = resolve(&backends, &request()).await;

        assert_eq!(
            result,
            failed(BackendId::Ollama, FailureReason::Unreachable)
        );
        assert!(log.all_skipped());
    }

    #[tokio::test]
    async fn test_local_not_a_command_stands_when_cloud_fails() {
        // NotACommand was the last terminal state; exhaustion surfaces the
        // last recorded state, which here is the Anthropic failure.
        let backends = vec![
            FakeBackend::new(BackendId::Ollama, CommandResult::NotACommand),
            FakeBackend::new(
                BackendId::Anthropic,
                failed(BackendId::Anthropic, FailureReason::Timeout),
            ),
        ];

        let (result, _log) = resolve(&backends, &request()).await;

        assert_eq!(result, failed(BackendId::Anthropic, FailureReason::Timeout));
    }
}
