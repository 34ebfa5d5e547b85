//! System prompt construction
//!
//! One instruction block per target OS, shared by every backend. The
//! contract the prompts enforce:
//! - return only a shell command, never prose
//! - return the literal sentinel `null` for questions and non-actionable
//!   requests
//! - for content-generation requests, emit a heredoc with an opaque
//!   placeholder (`content...` / `code...`) instead of real generated text,
//!   which bounds response size
//!
//! Output is deterministic given the target OS; no side effects.

use crate::types::TargetOs;

/// The literal text a backend returns to signal "not a command request".
pub const NULL_SENTINEL: &str = "null";

const UNIX_SYSTEM_PROMPT: &str = r#"You are a command-line expert. Convert natural language requests into shell commands.

Rules:
- Return ONLY the command, no explanations, no markdown, no additional text.
- If the input is a question or not an actionable command request, return exactly: null
- When asked to generate content (essays, scripts, text files), you MUST use ONLY the placeholder text 'content...' or 'code...' inside a here-document. NEVER include actual content or implementation.

Examples:
- "git push" -> git push
- "what's running on port 8000" -> lsof -i :8000
- "find large files" -> find . -size +100M -type f
- "write an essay about rice" -> cat > essay.txt << EOF
content...
EOF
- "create a bash script" -> cat > script.sh << EOF
#!/bin/bash
code...
EOF
- "tell me about linux" -> null"#;

const WINDOWS_SYSTEM_PROMPT: &str = r#"You are a Windows command-line expert. Convert natural language requests into Windows shell (cmd) commands.

Rules:
- Return ONLY the command, no explanations, no markdown, no additional text.
- Use Windows commands: dir, mkdir, findstr, copy, move, type, tasklist.
- If the input is a question or not an actionable command request, return exactly: null
- When asked to generate content (essays, scripts, text files), write the placeholder text 'content...' or 'code...' into the file. NEVER include actual content or implementation.

Examples:
- "list all files" -> dir
- "make a folder called projects" -> mkdir projects
- "search for error in log.txt" -> findstr "error" log.txt
- "write an essay about rice" -> echo content... > essay.txt
- "tell me about windows" -> null"#;

/// Build the system instruction for a target OS.
///
/// Windows gets a fully separate instruction block; the Unix prompt is
/// shared by macOS and Linux.
pub fn build_system_prompt(target_os: TargetOs) -> &'static str {
    match target_os {
        TargetOs::MacOs | TargetOs::Linux => UNIX_SYSTEM_PROMPT,
        TargetOs::Windows => WINDOWS_SYSTEM_PROMPT,
    }
}
