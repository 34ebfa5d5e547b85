//! LAL Common - Shared types for the lal command generator
//!
//! Data model, user configuration, prompt construction and the
//! destructive-command classifier. No network I/O lives here.

pub mod config;
pub mod danger;
pub mod prompt;
pub mod types;

pub use config::UserConfig;
pub use danger::{classify, DangerVerdict};
pub use types::{
    Attempt, AttemptLog, AttemptOutcome, BackendId, CommandRequest, CommandResult, FailureReason,
    TargetOs,
};
