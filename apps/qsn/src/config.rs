//! # Configuration
//!
//! Server settings from CLI flags with environment fallbacks, plus the
//! tracing subscriber setup shared by every command.

use clap::Args;
use qsn_core::SecurityTier;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "qsn=info,tower_http=info";

/// Shortest allowed metric tick.
pub const MIN_TICK: Duration = Duration::from_millis(100);

/// Flags for `qsn serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, env = "QSN_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Initially selected security level (clamped to a defined tier).
    #[arg(long, env = "QSN_LEVEL", default_value_t = 65, allow_negative_numbers = true)]
    pub level: i64,

    /// Metric tick period in milliseconds.
    #[arg(long, env = "QSN_TICK_MS", default_value_t = 2000)]
    pub tick_ms: u64,

    /// Seed for the metric jitter (random when absent).
    #[arg(long, env = "QSN_SEED")]
    pub seed: Option<u64>,
}

/// Validated server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub tier: SecurityTier,
    pub tick: Duration,
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            tier: SecurityTier::LOWEST,
            tick: Duration::from_millis(2000),
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Build from flags. Undefined levels and too-short ticks are
    /// corrected with a warning rather than rejected.
    pub fn from_args(args: &ServeArgs) -> Self {
        let tier = SecurityTier::from_level(args.level).unwrap_or_else(|err| {
            let fallback = err.fallback();
            warn!(
                requested = err.level,
                level = fallback.level(),
                "undefined security level, using nearest lower tier"
            );
            fallback
        });

        let mut tick = Duration::from_millis(args.tick_ms);
        if tick < MIN_TICK {
            warn!(requested_ms = args.tick_ms, "tick too short, using minimum");
            tick = MIN_TICK;
        }

        Self {
            addr: args.addr,
            tier,
            tick,
            seed: args.seed,
        }
    }
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
