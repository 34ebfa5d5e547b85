//! Clipboard integration
//!
//! Thin wrapper over the platform clipboard tool: pbcopy on macOS, clip
//! on Windows, wl-copy with an xclip fallback elsewhere. Failures are
//! reported to the caller but are never fatal to the invocation.

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

fn candidate_tools() -> &'static [(&'static str, &'static [&'static str])] {
    if cfg!(target_os = "macos") {
        &[("pbcopy", &[])]
    } else if cfg!(windows) {
        &[("clip", &[])]
    } else {
        &[("wl-copy", &[]), ("xclip", &["-selection", "clipboard"])]
    }
}

/// Copy `text` to the system clipboard via the first available tool.
pub fn copy(text: &str) -> Result<()> {
    for (tool, args) in candidate_tools() {
        let child = Command::new(tool)
            .args(*args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match child {
            Ok(c) => c,
            Err(_) => {
                debug!("Clipboard tool {} not available", tool);
                continue;
            }
        };

        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(text.as_bytes())
                .with_context(|| format!("Failed to write to {}", tool))?;
        }

        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for {}", tool))?;
        if status.success() {
            debug!("Copied {} bytes via {}", text.len(), tool);
            return Ok(());
        }
    }

    let names: Vec<&str> = candidate_tools().iter().map(|(t, _)| *t).collect();
    bail!("No clipboard tool available (tried: {})", names.join(", "));
}
