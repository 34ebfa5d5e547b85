//! Execution gate
//!
//! State machine between a generated command and the host shell:
//!
//! ```text
//! Generated -> { Blocked, AwaitingConfirmation } -> { Executed, Declined }
//! ```
//!
//! A dangerous verdict blocks execution unconditionally; no confirmation
//! input can override it. The danger check runs again immediately before
//! the spawn, so the decision cannot go stale between display and
//! execution. Handing the command to the shell is the one intentional
//! side effect of the whole tool.

use anyhow::{Context, Result};
use tracing::{info, warn};

use lal_common::{classify, DangerVerdict, TargetOs};

/// Where a generated command stands before any user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Dangerous: display and copy only.
    Blocked,
    /// Safe and execution was requested: ask the user.
    AwaitingConfirmation,
    /// Safe but execution was not requested: display only.
    Declined,
}

/// Final disposition of one generated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Blocked { rule: Option<&'static str> },
    Declined,
    Executed { exit_code: i32 },
}

pub struct ExecutionGate {
    command: String,
    target_os: TargetOs,
}

impl ExecutionGate {
    pub fn new(command: &str, target_os: TargetOs) -> Self {
        Self {
            command: command.to_string(),
            target_os,
        }
    }

    /// Transition out of `Generated` given the verdict and the caller's
    /// execute flag.
    pub fn initial_state(verdict: &DangerVerdict, execute_requested: bool) -> GateState {
        if verdict.dangerous {
            GateState::Blocked
        } else if execute_requested {
            GateState::AwaitingConfirmation
        } else {
            GateState::Declined
        }
    }

    /// Confirm and execute. Re-classifies before spawning; `confirm` is
    /// only consulted for commands that pass the second danger check.
    pub fn confirm_and_execute(&self, confirm: impl FnOnce() -> bool) -> Result<GateOutcome> {
        // Mandatory second check right before the spawn.
        let verdict = classify(&self.command, self.target_os);
        if verdict.dangerous {
            warn!(
                "Refusing to execute: matched rule {:?}",
                verdict.matched_rule
            );
            return Ok(GateOutcome::Blocked {
                rule: verdict.matched_rule,
            });
        }

        if !confirm() {
            return Ok(GateOutcome::Declined);
        }

        info!("Executing: {}", self.command);
        let status = if cfg!(windows) {
            std::process::Command::new("cmd")
                .arg("/C")
                .arg(&self.command)
                .status()
        } else {
            std::process::Command::new("sh")
                .arg("-c")
                .arg(&self.command)
                .status()
        }
        .context("Failed to launch shell")?;

        Ok(GateOutcome::Executed {
            exit_code: status.code().unwrap_or(-1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn safe_verdict() -> DangerVerdict {
        classify("ls -la", TargetOs::MacOs)
    }

    fn dangerous_verdict() -> DangerVerdict {
        classify("rm -rf /tmp/x", TargetOs::MacOs)
    }

    #[test]
    fn test_dangerous_command_is_blocked() {
        assert_eq!(
            ExecutionGate::initial_state(&dangerous_verdict(), true),
            GateState::Blocked
        );
        assert_eq!(
            ExecutionGate::initial_state(&dangerous_verdict(), false),
            GateState::Blocked
        );
    }

    #[test]
    fn test_safe_command_awaits_confirmation_when_requested() {
        assert_eq!(
            ExecutionGate::initial_state(&safe_verdict(), true),
            GateState::AwaitingConfirmation
        );
        assert_eq!(
            ExecutionGate::initial_state(&safe_verdict(), false),
            GateState::Declined
        );
    }

    #[test]
    fn test_dangerous_command_never_executes_even_when_confirmed() {
        let gate = ExecutionGate::new("rm -rf /tmp/x", TargetOs::MacOs);
        let outcome = gate.confirm_and_execute(|| true).unwrap();
        assert_eq!(
            outcome,
            GateOutcome::Blocked {
                rule: Some("rm ")
            }
        );
    }

    #[test]
    fn test_declined_when_not_confirmed() {
        let gate = ExecutionGate::new("true", TargetOs::Linux);
        let mut asked = false;
        let outcome = gate
            .confirm_and_execute(|| {
                asked = true;
                false
            })
            .unwrap();
        assert!(asked);
        assert_eq!(outcome, GateOutcome::Declined);
    }

    #[test]
    #[cfg(unix)]
    fn test_confirmed_safe_command_executes() {
        let gate = ExecutionGate::new("true", TargetOs::Linux);
        let outcome = gate.confirm_and_execute(|| true).unwrap();
        assert_eq!(outcome, GateOutcome::Executed { exit_code: 0 });
    }

    #[test]
    #[cfg(unix)]
    fn test_exit_code_is_reported_verbatim() {
        let gate = ExecutionGate::new("exit 3", TargetOs::Linux);
        let outcome = gate.confirm_and_execute(|| true).unwrap();
        assert_eq!(outcome, GateOutcome::Executed { exit_code: 3 });
    }
}
