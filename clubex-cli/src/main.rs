//! Clubex CLI — replay exchange scenarios from TOML files.
//!
//! Commands:
//! - `run` — replay a scenario file and print per-step outcomes + summary
//! - `demo` — replay the built-in demonstration scenario

mod scenario;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use scenario::{replay, ReplayReport, Scenario};

/// The built-in demonstration scenario: two clubs, one future, a position
/// opened and settled into stock.
const DEMO_SCENARIO: &str = include_str!("../demo/settlement.toml");

#[derive(Parser)]
#[command(
    name = "clubex",
    about = "Clubex CLI — club-stock futures exchange scenario runner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a TOML scenario file against a fresh exchange.
    Run {
        /// Path to the scenario file.
        scenario: PathBuf,

        /// Emit the full report as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Replay the built-in demonstration scenario.
    Demo {
        /// Emit the full report as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { scenario, json } => {
            let scenario = Scenario::load(&scenario)?;
            let report = replay(&scenario)?;
            print_report(&report, json)
        }
        Commands::Demo { json } => {
            let scenario = Scenario::parse(DEMO_SCENARIO)?;
            let report = replay(&scenario)?;
            print_report(&report, json)
        }
    }
}

fn print_report(report: &ReplayReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("steps:");
    for step in &report.steps {
        let when = Utc
            .timestamp_opt(step.at, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| step.at.to_string());
        match &step.outcome {
            Ok(detail) => println!("  #{:<3} {when}  {:<12} {}  -> {detail}", step.index, step.caller, step.action),
            Err(error) => println!("  #{:<3} {when}  {:<12} {}  !! {error}", step.index, step.caller, step.action),
        }
    }

    println!("\nsummary:");
    println!("  clubs:");
    for club in &report.summary.clubs {
        println!("    [{}] {} ({}) @ {}", club.id, club.name, club.symbol, club.price);
    }
    println!("  open positions: {}", report.summary.open_positions);
    println!("  locked margin:  {}", report.summary.locked_margin);
    println!("  pooled tokens:  {}", report.summary.pooled);
    println!("  balances:");
    for (address, balance) in &report.summary.balances {
        println!("    {address:<12} {balance}");
    }
    Ok(())
}
