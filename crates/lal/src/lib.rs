//! LAL - Natural language to shell commands
//!
//! Library side of the `lal` binary: backend clients, the fallback
//! orchestrator, the execution gate and presentation helpers.

pub mod backend;
pub mod cheat;
pub mod clipboard;
pub mod gate;
pub mod orchestrator;
pub mod output;
