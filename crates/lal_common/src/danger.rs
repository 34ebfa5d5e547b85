//! Destructive-command classifier
//!
//! Deterministic lexical screening of generated commands before they are
//! offered for execution. This is a conservative substring blocklist, not a
//! shell parser: `chmod +x script.sh` flags just like `chmod 000 /`, and a
//! creatively quoted `rm` can slip through. That tradeoff is intended —
//! the filter errs toward blocking.

use crate::types::TargetOs;

/// Result of classifying one command string. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DangerVerdict {
    pub dangerous: bool,
    /// The first rule that matched, for display to the user.
    pub matched_rule: Option<&'static str>,
}

impl DangerVerdict {
    fn safe() -> Self {
        Self {
            dangerous: false,
            matched_rule: None,
        }
    }

    fn flagged(rule: &'static str) -> Self {
        Self {
            dangerous: true,
            matched_rule: Some(rule),
        }
    }
}

/// Destructive verbs piped into another command (e.g. `sudo rm x | tee`).
const PIPED_VERB_RULES: &[&str] = &["rm |", "rm|", "dd |", "dd|", "sudo |", "sudo|"];

/// Unix rules, checked in order on every target OS. First match wins.
const UNIX_RULES: &[&str] = &[
    "rm ",
    "sudo ",
    "kill ",
    "killall ",
    "pkill ",
    "dd ",
    "mkfs",
    "fdisk",
    "chmod ",
    "chown ",
    "rmdir ",
    "mv / ",
    "> /etc/",
    "> /dev/",
    "> /sys/",
    "> /proc/",
    "format",
    "wipe",
    "delete",
    "destroy",
];

/// Additional rules applied only when the command targets Windows shells.
const WINDOWS_RULES: &[&str] = &["del ", "rd ", "format ", "taskkill ", "Remove-Item"];

/// Classify a command as safe or dangerous.
///
/// Pure function: same (text, OS) input always yields the same verdict.
/// Case-sensitive, first matching rule reported.
pub fn classify(command: &str, target_os: TargetOs) -> DangerVerdict {
    let command = command.trim();

    for rule in PIPED_VERB_RULES {
        if command.contains(rule) {
            return DangerVerdict::flagged(rule);
        }
    }

    // A bare `rm` with no arguments still counts.
    if command == "rm" {
        return DangerVerdict::flagged("rm");
    }

    for rule in UNIX_RULES {
        if command.contains(rule) {
            return DangerVerdict::flagged(rule);
        }
    }

    if target_os == TargetOs::Windows {
        for rule in WINDOWS_RULES {
            if command.contains(rule) {
                return DangerVerdict::flagged(rule);
            }
        }
    }

    DangerVerdict::safe()
}
