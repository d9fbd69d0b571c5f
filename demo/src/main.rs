//! CUSTOS Audit Trail Engine — Demo CLI
//!
//! Runs one or all of the three demo scenarios.  Each scenario wires the
//! real CUSTOS services (append, verify, query) over the in-memory chain
//! store and walks through a realistic usage of the trail.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- lifecycle
//!   cargo run -p demo -- contention
//!   cargo run -p demo -- tamper

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod scenarios;

// ── CLI definition ────────────────────────────────────────────────────────────

/// CUSTOS — tamper-evident audit trail demo.
///
/// Each subcommand runs one or all of the three scenarios, demonstrating
/// hash-chained appends, concurrent writers, and tamper detection.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "CUSTOS audit trail engine demo",
    long_about = "Runs CUSTOS demo scenarios showing hash-chained appends,\n\
                  concurrent writer contention, and chain tamper detection."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Scenario 1: Entity Lifecycle (append, query, verify, spot-check).
    Lifecycle,
    /// Scenario 2: Concurrent Writers (optimistic retry under contention).
    Contention,
    /// Scenario 3: Tamper Detection (mutate a committed entry, catch it).
    Tamper,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Lifecycle => scenarios::lifecycle::run_scenario(),
        Command::Contention => scenarios::contention::run_scenario(),
        Command::Tamper => scenarios::tamper::run_scenario(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> custos_contracts::AuditResult<()> {
    scenarios::lifecycle::run_scenario()?;
    scenarios::contention::run_scenario()?;
    scenarios::tamper::run_scenario()?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("CUSTOS — Tamper-Evident Audit Trail Engine");
    println!("==========================================");
    println!();
    println!("Pipeline per appended event:");
    println!("  [1] Validate payload (non-empty fields, canonicalizable JSON)");
    println!("  [2] Link to the tenant's current head (prev_hash, sequence + 1)");
    println!("  [3] SHA-256 over the canonical encoding — stored as the entry hash");
    println!("  [4] Commit atomically; lost races retry against the fresh head");
    println!("  [5] Verification replays the chain and pinpoints any divergence");
    println!();
}
