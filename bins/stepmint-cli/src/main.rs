//! stepmint — command-line front end for the stepmint sale engine.
//!
//! Previews the decay curve of a configured sale and replays purchase
//! requests through an in-memory engine, printing every outcome as JSON.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::json;
use stepmint_core::traits::PriceCurve;
use stepmint_core::types::{Address, Amount, Timestamp};
use stepmint_pricing::PriceClock;
use stepmint_sale::{de_amount, MemoryLedger, MemoryTreasury, SaleConfig, SaleEngine};
use tracing::{debug, info};

/// Upper bound on rows printed by `curve`.
const MAX_CURVE_ROWS: u64 = 100_000;

/// Default horizon for `curve` when the price never reaches the floor.
const DEFAULT_HORIZON_SECS: u64 = 86_400;

#[derive(Parser, Debug)]
#[command(
    name = "stepmint",
    version,
    about = "Descending-price sale with per-sale repricing"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the price curve from the configured start anchor.
    Curve {
        /// Sale config file (TOML)
        #[arg(long)]
        config: PathBuf,
        /// First timestamp (defaults to the sale start)
        #[arg(long)]
        from: Option<Timestamp>,
        /// Last timestamp (defaults to when the floor is reached)
        #[arg(long)]
        to: Option<Timestamp>,
        /// Seconds between rows
        #[arg(long, default_value_t = 3_600)]
        step: u64,
    },
    /// Replay purchase requests against a fresh in-memory sale.
    Simulate {
        /// Sale config file (TOML)
        #[arg(long)]
        config: PathBuf,
        /// JSON array of `{ "buyer": "0x..", "payment": .., "at": .. }`
        #[arg(long)]
        purchases: PathBuf,
    },
}

/// One line of the purchases file.
#[derive(Deserialize, Debug)]
struct PurchaseRequest {
    buyer: Address,
    #[serde(deserialize_with = "de_amount")]
    payment: Amount,
    at: Timestamp,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    match cli.command {
        Command::Curve { config, from, to, step } => curve(&config, from, to, step),
        Command::Simulate { config, purchases } => simulate(&config, &purchases),
    }
}

fn load_config(path: &Path) -> Result<SaleConfig> {
    let cfg = SaleConfig::load(path)
        .with_context(|| format!("failed to load sale config {}", path.display()))?;
    info!(
        name = %cfg.name,
        supply_cap = cfg.supply_cap,
        start_time = cfg.start_time,
        "loaded sale config"
    );
    Ok(cfg)
}

fn curve(config: &Path, from: Option<Timestamp>, to: Option<Timestamp>, step: u64) -> Result<()> {
    if step == 0 {
        bail!("--step must be positive");
    }
    let cfg = load_config(config)?;
    let clock = PriceClock::from_params(&cfg.parameters());
    let anchor = cfg.start_anchor();

    let from = from.unwrap_or(anchor.time).max(anchor.time);
    let to = to.unwrap_or_else(|| {
        clock
            .floor_reached_at(anchor)
            .unwrap_or_else(|| anchor.time.saturating_add(DEFAULT_HORIZON_SECS))
    });
    if to < from {
        bail!("--to ({to}) precedes --from ({from})");
    }
    let Some(rows) = ((to - from) / step).checked_add(1) else {
        bail!("curve from {from} to {to} has too many rows; raise --step");
    };
    if rows > MAX_CURVE_ROWS {
        bail!("{rows} rows requested; raise --step (max {MAX_CURVE_ROWS} rows)");
    }
    debug!(from, to, step, rows, "printing curve");

    println!("{:>20}  {:>40}", "time", "price");
    let mut t = from;
    loop {
        println!("{:>20}  {:>40}", t, clock.price_at(anchor, t));
        match t.checked_add(step) {
            Some(next) if next <= to => t = next,
            _ => break,
        }
    }
    Ok(())
}

fn simulate(config: &Path, purchases: &Path) -> Result<()> {
    let cfg = load_config(config)?;
    let raw = std::fs::read_to_string(purchases)
        .with_context(|| format!("failed to read {}", purchases.display()))?;
    let requests: Vec<PurchaseRequest> =
        serde_json::from_str(&raw).context("purchases file must be a JSON array of requests")?;

    let engine = SaleEngine::new(&cfg, MemoryLedger::new(), MemoryTreasury::new())
        .context("invalid sale config")?;
    info!(requests = requests.len(), "replaying purchases");

    for req in &requests {
        let line = match engine.settle(req.buyer, req.payment, req.at) {
            Ok(p) => json!({
                "at": req.at,
                "buyer": req.buyer,
                "ok": true,
                "item": p.item,
                "price": p.price.to_string(),
                "refund": p.refund.to_string(),
                "next_price": p.next_anchor.price.to_string(),
            }),
            Err(e) => json!({
                "at": req.at,
                "buyer": req.buyer,
                "ok": false,
                "error": e.to_string(),
            }),
        };
        println!("{line}");
    }

    let snapshot = serde_json::to_string_pretty(&engine.snapshot())?;
    println!("{snapshot}");
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init();
    }
}
