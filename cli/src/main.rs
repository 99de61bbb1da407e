//! Telecom Billing Simulator - CLI
//!
//! Replays a command script and writes the end-of-run report.
//!
//! ```sh
//! # Text report (default)
//! telecom-billing input.txt output.txt
//!
//! # JSON report, discount for callers or callees under 18
//! telecom-billing input.txt report.json --format json --age-discount either-party-minor
//!
//! # Also dump every simulation event
//! telecom-billing input.txt output.txt --event-log events.json
//! ```
//!
//! Diagnostics go to stderr; the level comes from `--log-level` or `RUST_LOG`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use telecom_billing_core::{parse_script, AgeDiscountRule, Orchestrator, SimulationConfig};

/// Which callers get the operator's talking discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgeDiscount {
    /// Caller younger than 18 or older than 65
    MinorOrSenior,
    /// Caller or callee younger than 18
    EitherPartyMinor,
}

impl From<AgeDiscount> for AgeDiscountRule {
    fn from(value: AgeDiscount) -> Self {
        match value {
            AgeDiscount::MinorOrSenior => AgeDiscountRule::MinorOrSenior,
            AgeDiscount::EitherPartyMinor => AgeDiscountRule::EitherPartyMinor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Telecom billing simulator: replays customer and operator commands.
#[derive(Parser, Debug)]
#[command(name = "telecom-billing", version)]
struct Cli {
    /// Input script (`C O N` header followed by N command records)
    input: PathBuf,

    /// Destination of the report
    output: PathBuf,

    /// Talking discount rule
    #[arg(long, value_enum, default_value_t = AgeDiscount::MinorOrSenior)]
    age_discount: AgeDiscount,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Write the simulation event log as JSON to this file
    #[arg(long, value_name = "FILE")]
    event_log: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TELECOM_BILLING_LOG")]
    log_level: Option<String>,
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let input = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read input {}", cli.input.display()))?;
    let script = parse_script(&input)
        .with_context(|| format!("Failed to parse {}", cli.input.display()))?;

    let config = SimulationConfig {
        age_discount: cli.age_discount.into(),
    };
    info!(?config, commands = script.commands.len(), "Starting simulation");
    let orchestrator = Orchestrator::replay(config, &script).context("Simulation aborted")?;

    let report = orchestrator.report();
    let rendered = match cli.format {
        ReportFormat::Text => report.to_string(),
        ReportFormat::Json => {
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        }
    };
    fs::write(&cli.output, rendered)
        .with_context(|| format!("Failed to write report {}", cli.output.display()))?;
    info!(output = %cli.output.display(), "Report written");

    if let Some(path) = &cli.event_log {
        let events = serde_json::to_string_pretty(orchestrator.event_log())
            .context("Failed to serialize event log")?;
        fs::write(path, events)
            .with_context(|| format!("Failed to write event log {}", path.display()))?;
        info!(
            events = orchestrator.event_log().len(),
            path = %path.display(),
            "Event log written"
        );
    }

    Ok(())
}
