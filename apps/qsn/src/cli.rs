//! # CLI
//!
//! Command definitions and implementations for the `qsn` binary.
//!
//! Each `cmd_*` function writes to the given writer so it can be tested
//! without capturing stdout.

use crate::api;
use crate::config::{ServeArgs, ServerConfig};
use crate::ticker::seeded_jitter;
use clap::{Parser, Subcommand};
use qsn_core::{MetricsBoard, QsnError, SecurityTier, TierResolver, catalog, comparison_table};
use std::io::Write;
use thiserror::Error;
use tracing::{debug, info};

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] QsnError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult = Result<(), CliError>;

// =============================================================================
// ARGUMENTS
// =============================================================================

/// QSN tier resolver, catalog and preview server.
#[derive(Parser, Debug)]
#[command(name = "qsn", version, about)]
pub struct Cli {
    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every tier with its presentation constants.
    Tiers,

    /// Resolve a security level to its feature set.
    Resolve {
        #[arg(allow_negative_numbers = true)]
        level: i64,

        /// Fail instead of clamping undefined levels.
        #[arg(long)]
        strict: bool,
    },

    /// Print the feature comparison table.
    Compare,

    /// Show where a plan's call-to-action leads.
    Checkout {
        #[arg(allow_negative_numbers = true)]
        level: i64,
    },

    /// Step the display panels offline and print the snapshot.
    Metrics {
        #[arg(long, default_value_t = 65, allow_negative_numbers = true)]
        level: i64,

        #[arg(long, default_value_t = 10)]
        steps: u32,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run the JSON preview server.
    Serve(ServeArgs),
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> CliResult {
    let json = cli.json;
    match cli.command {
        Commands::Tiers => cmd_tiers(json, &mut std::io::stdout().lock()),
        Commands::Resolve { level, strict } => {
            cmd_resolve(level, strict, json, &mut std::io::stdout().lock())
        }
        Commands::Compare => cmd_compare(json, &mut std::io::stdout().lock()),
        Commands::Checkout { level } => cmd_checkout(level, json, &mut std::io::stdout().lock()),
        Commands::Metrics { level, steps, seed } => {
            cmd_metrics(level, steps, seed, json, &mut std::io::stdout().lock())
        }
        Commands::Serve(args) => cmd_serve(&args).await,
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// `qsn tiers`
pub fn cmd_tiers(json: bool, out: &mut impl Write) -> CliResult {
    if json {
        let views: Vec<api::TierView> =
            SecurityTier::ALL.into_iter().map(api::TierView::new).collect();
        serde_json::to_writer_pretty(&mut *out, &views)?;
        writeln!(out)?;
        return Ok(());
    }

    for profile in catalog() {
        writeln!(
            out,
            "Level {:<5} {:<12} {:<11} {:>3}-bit {:<17} {}",
            profile.tier.level(),
            profile.name,
            profile.price.label(),
            profile.encryption.bits,
            profile.encryption.name,
            profile.rate_limit.label(),
        )?;
    }
    Ok(())
}

/// `qsn resolve <LEVEL>`
pub fn cmd_resolve(level: i64, strict: bool, json: bool, out: &mut impl Write) -> CliResult {
    if strict {
        TierResolver::try_resolve(level).map_err(QsnError::from)?;
    }

    let resolution = TierResolver::resolve_detailed(level);
    if resolution.clamped {
        debug!(
            requested = level,
            level = resolution.tier.level(),
            "level clamped to nearest lower tier"
        );
    }

    if json {
        serde_json::to_writer_pretty(&mut *out, &resolution)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{}", resolution.tier)?;
    if resolution.clamped {
        writeln!(out, "(requested level {level})")?;
    }
    for flag in resolution.features.iter() {
        writeln!(out, "  + {flag}")?;
    }
    Ok(())
}

/// `qsn compare`
pub fn cmd_compare(json: bool, out: &mut impl Write) -> CliResult {
    let table = comparison_table();

    if json {
        serde_json::to_writer_pretty(&mut *out, &table)?;
        writeln!(out)?;
        return Ok(());
    }

    write!(out, "{:<27}", "Feature")?;
    for tier in SecurityTier::ALL {
        write!(out, " {:>6}", tier.level())?;
    }
    writeln!(out)?;

    for row in &table {
        write!(out, "{:<27}", row.label)?;
        for available in row.availability {
            write!(out, " {:>6}", if available { "yes" } else { "-" })?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// `qsn checkout <LEVEL>`
pub fn cmd_checkout(level: i64, json: bool, out: &mut impl Write) -> CliResult {
    let tier = SecurityTier::clamp(level);
    let profile = tier.profile();
    let target = profile.price.checkout_target();

    if json {
        let view = api::CheckoutView::from(&target);
        serde_json::to_writer_pretty(&mut *out, &view)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "{} ({}): {} -> {}",
        profile.name,
        profile.price.label(),
        profile.call_to_action,
        target
    )?;
    Ok(())
}

/// `qsn metrics`
pub fn cmd_metrics(
    level: i64,
    steps: u32,
    seed: Option<u64>,
    json: bool,
    out: &mut impl Write,
) -> CliResult {
    let tier = SecurityTier::clamp(level);
    let mut board = MetricsBoard::new();
    let mut jitter = seeded_jitter(seed);
    for _ in 0..steps {
        board.step(&mut jitter);
    }
    let snapshot = board.snapshot(tier);

    if json {
        serde_json::to_writer_pretty(&mut *out, &snapshot)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{} after {} ticks", snapshot.level, snapshot.tick)?;
    writeln!(
        out,
        "  packets analyzed {}  threats blocked {}  api requests {}",
        snapshot.dashboard.packets_analyzed,
        snapshot.dashboard.threats_blocked,
        snapshot.dashboard.api_requests
    )?;
    writeln!(
        out,
        "  encryption {}-bit  keys generated {}",
        snapshot.encryption_bits, snapshot.encryption.keys_generated
    )?;
    writeln!(
        out,
        "  risk score {}  active threats {}  recent alerts {}",
        tenths(snapshot.threat.risk_score_tenths),
        snapshot.threat.active,
        snapshot.threat.recent_alerts.len()
    )?;
    writeln!(
        out,
        "  connections {}  ports {}  bandwidth {}%",
        snapshot.network.connections,
        snapshot.network.active_ports,
        tenths(snapshot.network.bandwidth_tenths)
    )?;
    if let Some(temporal) = &snapshot.temporal {
        writeln!(
            out,
            "  timeline {}  anomalies {}  causality {}",
            temporal.stability, temporal.anomalies, temporal.causality
        )?;
    }
    if let Some(layers) = &snapshot.strata {
        let active = layers.iter().filter(|layer| layer.active).count();
        writeln!(out, "  strata layers {active}/{}", layers.len())?;
    }
    if let Some(noir) = &snapshot.noir {
        writeln!(
            out,
            "  noir integrity {}%  scans {}",
            tenths(noir.system_integrity_tenths),
            noir.scans_completed
        )?;
    }
    for locked in &snapshot.locked {
        writeln!(
            out,
            "  {}: locked (requires level {})",
            locked.panel, locked.requires_level
        )?;
    }
    Ok(())
}

/// `qsn serve`
pub async fn cmd_serve(args: &ServeArgs) -> CliResult {
    let config = ServerConfig::from_args(args);
    info!(level = config.tier.level(), "starting preview server");
    api::serve(config).await?;
    Ok(())
}

/// Render a tenths value as a decimal ("947" -> "94.7").
fn tenths(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    format!("{sign}{}.{}", abs / 10, abs % 10)
}
