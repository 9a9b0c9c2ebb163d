//! gatecheck - fail-fast quality-gate runner
//!
//! Runs a configured sequence of external verification commands
//! (formatter, test suite, lints, type checks) in order and stops at
//! the first failure. The overall run passes only if every gate
//! passes.
//!
//! ## Commands
//!
//! - `run`: execute the gate sequence (the default when no command is given)
//! - `list`: print the configured gate order without running anything
//!
//! ## Exit codes
//!
//! - `0`: every gate passed
//! - the failing gate's own exit code when a gate ran and failed
//! - `127`: a gate's executable could not be started
//! - `2`: the gate configuration itself is invalid

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gatecheck_core::{init_tracing, GateRegistry, GateStatus, Pipeline, PipelineOutcome};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

/// Exit code for configuration errors: distinct from every gate's own
/// exit status, emitted before any gate runs.
const CONFIG_FAILURE_CODE: i32 = 2;

#[derive(Parser)]
#[command(name = "gatecheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fail-fast quality-gate runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gate sequence in order, stopping at the first failure
    Run {
        /// Gate config file (TOML); defaults to the builtin cargo gates
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the configured gate order without running anything
    List {
        /// Gate config file (TOML); defaults to the builtin cargo gates
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    // A bare `gatecheck` invocation runs the full configured sequence.
    let command = cli.command.unwrap_or(Commands::Run { config: None });

    let code = match command {
        Commands::Run { config } => match cmd_run(config.as_deref()).await {
            Ok(code) => code,
            Err(err) => {
                eprintln!("gatecheck: {err:#}");
                CONFIG_FAILURE_CODE
            }
        },
        Commands::List { config } => match cmd_list(config.as_deref()) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("gatecheck: {err:#}");
                CONFIG_FAILURE_CODE
            }
        },
    };

    std::process::exit(code);
}

/// Load the registry from a config file, or fall back to the builtin
/// cargo gate chain.
fn load_registry(config: Option<&Path>) -> Result<GateRegistry> {
    match config {
        Some(path) => {
            info!(config = %path.display(), "loading gate config");
            GateRegistry::from_path(path)
                .with_context(|| format!("failed to load gate config {}", path.display()))
        }
        None => {
            info!("using builtin cargo gates");
            Ok(GateRegistry::builtin())
        }
    }
}

/// Run every configured gate in order, stopping at the first failure.
async fn cmd_run(config: Option<&Path>) -> Result<i32> {
    let registry = load_registry(config)?;

    println!("gatecheck: running {} gate(s)", registry.len());

    let outcome = Pipeline::new().run(&registry).await;

    match &outcome {
        PipelineOutcome::AllPassed { results } => {
            for result in results {
                println!("  ✓ {} ({}ms)", result.gate_name, result.duration_ms);
            }
            println!("gatecheck: all {} gate(s) passed", results.len());
        }
        PipelineOutcome::FailedAt {
            index,
            failed,
            completed,
        } => {
            for result in completed {
                println!("  ✓ {} ({}ms)", result.gate_name, result.duration_ms);
            }
            // The tool's own diagnostics are the primary explanation;
            // replay its captured output before the framing line.
            print!("{}", failed.stdout);
            eprint!("{}", failed.stderr);
            match &failed.status {
                GateStatus::LaunchFailed { error } => {
                    eprintln!(
                        "  ✗ gate '{}' (#{}) could not be started: {}",
                        failed.gate_name, index, error
                    );
                }
                _ => {
                    eprintln!(
                        "  ✗ gate '{}' (#{}) failed with exit code {}",
                        failed.gate_name,
                        index,
                        failed.exit_code()
                    );
                }
            }
            eprintln!("gatecheck: remaining gates were not attempted");
        }
    }

    Ok(outcome.exit_code())
}

/// Print the configured gate order without running anything.
fn cmd_list(config: Option<&Path>) -> Result<()> {
    let registry = load_registry(config)?;

    if registry.is_empty() {
        println!("No gates configured.");
        return Ok(());
    }

    for (index, gate) in registry.gates().iter().enumerate() {
        let mut line = format!("{:>2}. {} -> {}", index, gate.name, gate.command);
        if !gate.args.is_empty() {
            line.push(' ');
            line.push_str(&gate.args.join(" "));
        }
        if let Some(dir) = &gate.working_dir {
            line.push_str(&format!(" (in {})", dir.display()));
        }
        println!("{line}");
    }

    Ok(())
}
