//! Terminal presentation
//!
//! Renders the generated command in a bordered panel and turns attempt
//! logs into human-readable failure summaries with an actionable hint per
//! failure class. Logging goes to stderr via tracing; everything here is
//! the user-facing output on stdout.

use console::{measure_text_width, style};

use lal_common::{AttemptLog, AttemptOutcome, BackendId, FailureReason, TargetOs, UserConfig};

const PANEL_TITLE: &str = " Generated Command ";
const MIN_PANEL_WIDTH: usize = 40;

/// Print the generated command in a bordered panel.
pub fn print_command(command: &str) {
    let content_width = command
        .lines()
        .map(measure_text_width)
        .max()
        .unwrap_or(0)
        .max(MIN_PANEL_WIDTH)
        .max(PANEL_TITLE.len());

    let dash_total = content_width + 2 - PANEL_TITLE.len();
    let left = dash_total / 2;
    let right = dash_total - left;

    println!(
        "╭{}{}{}╮",
        "─".repeat(left),
        style(PANEL_TITLE).dim(),
        "─".repeat(right)
    );
    for line in command.lines() {
        let pad = content_width - measure_text_width(line);
        println!("│ {}{} │", style(line).green().bold(), " ".repeat(pad));
    }
    println!("╰{}╯", "─".repeat(content_width + 2));
}

/// Dangerous command: explain the block, leave display/copy available.
pub fn print_blocked(rule: Option<&str>) {
    match rule {
        Some(rule) => println!(
            "\n{} {} (matched rule: {})",
            style("⚠").yellow(),
            style("This command looks destructive and will not be executed.").yellow(),
            style(rule.trim()).bold()
        ),
        None => println!(
            "\n{} {}",
            style("⚠").yellow(),
            style("This command looks destructive and will not be executed.").yellow()
        ),
    }
    println!("{}", style("You can still copy it and review it yourself.").dim());
}

pub fn print_execute_hint() {
    println!(
        "\n{}",
        style("Use -e to execute, -c to copy to clipboard").dim()
    );
}

pub fn print_executed(exit_code: i32) {
    if exit_code == 0 {
        println!("\n{}", style("Done.").green());
    } else {
        println!(
            "\n{}",
            style(format!("Command exited with code {}", exit_code)).yellow()
        );
    }
}

pub fn print_declined() {
    println!("\n{}", style("Not executed.").dim());
}

pub fn print_copied() {
    println!("{}", style("Copied to clipboard.").dim());
}

/// The request was a question, not a command.
pub fn print_not_a_command() {
    println!(
        "{} {}",
        style("✗").red(),
        "That looks like a question, not a command request."
    );
    println!(
        "{}",
        style("lal only turns actionable requests into shell commands.").dim()
    );
}

/// All backends exhausted: summary plus a hint per failure class.
pub fn print_failure(log: &AttemptLog) {
    println!(
        "{} {}",
        style("✗").red(),
        style("Could not generate a command: no backend available.").red()
    );

    for attempt in &log.attempts {
        let line = match &attempt.outcome {
            AttemptOutcome::Skipped(reason) => format!("skipped ({})", reason),
            AttemptOutcome::Failed(reason) => format!("failed ({})", reason),
            AttemptOutcome::NotACommand => "answered: not a command".to_string(),
            AttemptOutcome::Succeeded => "succeeded".to_string(),
        };
        println!("  {} {}", style(format!("{:10}", attempt.backend)).bold(), line);

        if let Some(hint) = hint_for(attempt.backend, &attempt.outcome) {
            println!("  {}", style(format!("           ↳ {}", hint)).dim());
        }
    }

    if log.all_skipped() {
        println!(
            "\n{}",
            style("Start Ollama (`ollama serve`) or set ANTHROPIC_API_KEY / OPENAI_API_KEY.")
                .dim()
        );
    }
}

fn hint_for(backend: BackendId, outcome: &AttemptOutcome) -> Option<String> {
    let reason = match outcome {
        AttemptOutcome::Failed(reason) => reason,
        AttemptOutcome::Skipped(_) => {
            return Some(match backend {
                BackendId::Anthropic => "set ANTHROPIC_API_KEY to enable this backend".to_string(),
                BackendId::OpenAi => "set OPENAI_API_KEY to enable this backend".to_string(),
                BackendId::Ollama => "configure a local Ollama endpoint".to_string(),
            })
        }
        _ => return None,
    };

    Some(match (backend, reason) {
        (BackendId::Ollama, FailureReason::Unreachable) => {
            "is Ollama running? try `ollama serve`".to_string()
        }
        (_, FailureReason::Unreachable) => "check your network connection".to_string(),
        (_, FailureReason::Timeout) => "backend took too long; try again".to_string(),
        (_, FailureReason::MalformedResponse) => {
            "unexpected response shape; the provider API may have changed".to_string()
        }
        (_, FailureReason::ProviderError(msg)) => format!("provider said: {}", msg),
        (BackendId::Anthropic, FailureReason::AuthMissing) => {
            "set ANTHROPIC_API_KEY".to_string()
        }
        (BackendId::OpenAi, FailureReason::AuthMissing) => "set OPENAI_API_KEY".to_string(),
        (BackendId::Ollama, FailureReason::AuthMissing) => {
            "local backend needs no credential".to_string()
        }
    })
}

/// `--config`: current settings and credential presence.
pub fn print_config(config: &UserConfig, anthropic_set: bool, openai_set: bool) {
    println!("{}", style("lal configuration").bold());
    println!("  Target OS:      {}", config.target_os);
    println!("  Ollama model:   {}", config.ollama_model);
    println!(
        "  Anthropic key:  {}",
        if anthropic_set {
            style("set").green()
        } else {
            style("not set").red()
        }
    );
    println!(
        "  OpenAI key:     {}",
        if openai_set {
            style("set").green()
        } else {
            style("not set").red()
        }
    );
    if config.target_os == TargetOs::Windows {
        println!(
            "\n{}",
            style("Commands will be generated for Windows shells.").dim()
        );
    }
}

/// Empty prompt: show usage examples instead of an error trace.
pub fn print_usage() {
    println!("{} lal \"your command description\"", style("Usage:").bold());
    println!("\n{}", style("Examples:").dim());
    println!("  lal \"git push\"");
    println!("  lal \"what's running on port 8000\"");
    println!("  lal \"find large files\" -e");
    println!("\n{}", style("Configuration:").dim());
    println!("  lal --config");
    println!("  lal --os linux");
    println!("  lal --model llama3.2");
}
