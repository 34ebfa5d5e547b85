//! lal - turn natural language into a shell command
//!
//! One request per invocation: build the prompt, ask the backends in
//! priority order, screen the result for destructive patterns, then
//! display / copy / execute as requested.

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use lal::backend::Backend;
use lal::gate::{ExecutionGate, GateOutcome, GateState};
use lal::{cheat, clipboard, orchestrator, output};
use lal_common::{classify, CommandRequest, CommandResult, TargetOs, UserConfig};

#[derive(Parser)]
#[command(name = "lal")]
#[command(about = "Convert natural language into shell commands", long_about = None)]
#[command(version)]
struct Cli {
    /// Natural language description of the command you want
    prompt: Option<String>,

    /// Execute the command after confirmation
    #[arg(short = 'e', long)]
    execute: bool,

    /// Copy the command to the clipboard
    #[arg(short = 'c', long)]
    copy: bool,

    /// Show current configuration
    #[arg(long)]
    config: bool,

    /// Set and persist the target OS (macos, linux, windows)
    #[arg(long, value_name = "OS")]
    os: Option<String>,

    /// Set and persist the preferred Ollama model
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Show an offline cheat sheet for a topic
    #[arg(long, value_name = "TOPIC", num_args = 0..=1, default_missing_value = "")]
    cheat: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = UserConfig::load();

    // Configuration sub-commands short-circuit command generation.
    if let Some(topic) = &cli.cheat {
        return Ok(run_cheat(topic));
    }
    if cli.config {
        output::print_config(
            &config,
            env_key_set("ANTHROPIC_API_KEY"),
            env_key_set("OPENAI_API_KEY"),
        );
        return Ok(ExitCode::SUCCESS);
    }
    if let Some(os) = &cli.os {
        config.target_os = os.parse::<TargetOs>()?;
        config.save()?;
        println!("Target OS set to {}", config.target_os);
        return Ok(ExitCode::SUCCESS);
    }
    if let Some(model) = &cli.model {
        config.ollama_model = model.trim().to_string();
        config.save()?;
        println!("Ollama model set to {}", config.ollama_model);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(prompt) = cli.prompt.as_deref().map(str::trim).filter(|p| !p.is_empty()) else {
        output::print_usage();
        return Ok(ExitCode::FAILURE);
    };

    let request = CommandRequest::new(prompt, config.target_os)?;
    let backends = Backend::default_stack(&config);
    let (result, log) = orchestrator::resolve(&backends, &request).await;

    let command = match result {
        CommandResult::Command { text } => text,
        CommandResult::NotACommand => {
            output::print_not_a_command();
            return Ok(ExitCode::FAILURE);
        }
        CommandResult::Failed { .. } => {
            output::print_failure(&log);
            return Ok(ExitCode::FAILURE);
        }
    };

    output::print_command(&command);

    if cli.copy {
        match clipboard::copy(&command) {
            Ok(()) => output::print_copied(),
            Err(e) => eprintln!("{} {:#}", style("Clipboard:").yellow(), e),
        }
    }

    let verdict = classify(&command, config.target_os);
    match ExecutionGate::initial_state(&verdict, cli.execute) {
        GateState::Blocked => {
            output::print_blocked(verdict.matched_rule);
            Ok(ExitCode::SUCCESS)
        }
        GateState::Declined => {
            output::print_execute_hint();
            Ok(ExitCode::SUCCESS)
        }
        GateState::AwaitingConfirmation => {
            let gate = ExecutionGate::new(&command, config.target_os);
            match gate.confirm_and_execute(ask_confirmation)? {
                GateOutcome::Blocked { rule } => {
                    output::print_blocked(rule);
                    Ok(ExitCode::SUCCESS)
                }
                GateOutcome::Declined => {
                    output::print_declined();
                    Ok(ExitCode::SUCCESS)
                }
                GateOutcome::Executed { exit_code } => {
                    output::print_executed(exit_code);
                    Ok(ExitCode::SUCCESS)
                }
            }
        }
    }
}

fn run_cheat(topic: &str) -> ExitCode {
    let topic = topic.trim();
    if topic.is_empty() {
        eprintln!(
            "{} --cheat needs a topic. Available: {}",
            style("Error:").red().bold(),
            cheat::topics().join(", ")
        );
        return ExitCode::FAILURE;
    }
    match cheat::lookup(topic) {
        Some(sheet) => {
            println!("{}", style(format!("# {}", topic.to_lowercase())).bold());
            println!("{}", sheet);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!(
                "{} No cheat sheet for '{}'. Available: {}",
                style("Error:").red().bold(),
                topic,
                cheat::topics().join(", ")
            );
            ExitCode::FAILURE
        }
    }
}

fn env_key_set(name: &str) -> bool {
    std::env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Interactive confirmation. Non-TTY stdin declines, so scripts never
/// trigger execution by accident.
fn ask_confirmation() -> bool {
    if !io::stdin().is_terminal() {
        return false;
    }

    print!("Execute this command? [y/N]: ");
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
