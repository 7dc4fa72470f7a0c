use anyhow::{Context, Result};
use clap::Parser;
use stonks_types::{StonksConfig, GAME_TITLE};
use tokio::io::BufReader;
use tracing::{info, warn, Level};

mod host;
mod wire;

use host::Host;

#[derive(Parser, Debug)]
#[command(author, version, about = "Stonks or Bronks round host", long_about = None)]
struct Args {
    /// Log level written to stderr (error, warn, info, debug, trace).
    #[arg(long, env = "STONKS_LOG_LEVEL", default_value = "info")]
    log_level: Level,

    #[arg(long)]
    total_rounds: Option<u32>,

    /// Crash check and republish period in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    #[arg(long)]
    baseline_value: Option<f64>,

    #[arg(long)]
    pump_increment: Option<f64>,

    #[arg(long)]
    crash_increment: Option<f64>,

    #[arg(long)]
    crash_bonus: Option<u64>,

    #[arg(long)]
    prep_ms: Option<u64>,

    #[arg(long)]
    resolution_display_ms: Option<u64>,

    #[arg(long)]
    results_display_ms: Option<u64>,

    #[arg(long)]
    game_over_ms: Option<u64>,
}

fn config_from_env() -> StonksConfig {
    let defaults = StonksConfig::default();
    StonksConfig {
        total_rounds: read_u32("STONKS_TOTAL_ROUNDS", defaults.total_rounds),
        tick_ms: read_ms("STONKS_TICK_MS", defaults.tick_ms),
        baseline_value: read_f64("STONKS_BASELINE_VALUE", defaults.baseline_value),
        pump_increment: read_f64("STONKS_PUMP_INCREMENT", defaults.pump_increment),
        crash_increment: read_f64("STONKS_CRASH_INCREMENT", defaults.crash_increment),
        crash_bonus: read_u64("STONKS_CRASH_BONUS", defaults.crash_bonus),
        prep_ms: read_ms("STONKS_PREP_MS", defaults.prep_ms),
        resolution_display_ms: read_ms(
            "STONKS_RESOLUTION_DISPLAY_MS",
            defaults.resolution_display_ms,
        ),
        results_display_ms: read_ms("STONKS_RESULTS_DISPLAY_MS", defaults.results_display_ms),
        game_over_ms: read_ms("STONKS_GAME_OVER_MS", defaults.game_over_ms),
    }
}

fn read_ms(key: &str, fallback: u64) -> u64 {
    read_u64(key, fallback)
}

fn read_u64(key: &str, fallback: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(fallback)
}

fn read_u32(key: &str, fallback: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(fallback)
}

fn read_f64(key: &str, fallback: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<f64>().ok())
        .unwrap_or(fallback)
}

/// Environment first, then command-line overrides.
fn build_config(args: &Args) -> Result<StonksConfig> {
    apply_overrides(config_from_env(), args)
}

fn apply_overrides(mut config: StonksConfig, args: &Args) -> Result<StonksConfig> {
    if let Some(total_rounds) = args.total_rounds {
        config.total_rounds = total_rounds;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.tick_ms = tick_ms;
    }
    if let Some(baseline_value) = args.baseline_value {
        config.baseline_value = baseline_value;
    }
    if let Some(pump_increment) = args.pump_increment {
        config.pump_increment = pump_increment;
    }
    if let Some(crash_increment) = args.crash_increment {
        config.crash_increment = crash_increment;
    }
    if let Some(crash_bonus) = args.crash_bonus {
        config.crash_bonus = crash_bonus;
    }
    if let Some(prep_ms) = args.prep_ms {
        config.prep_ms = prep_ms;
    }
    if let Some(resolution_display_ms) = args.resolution_display_ms {
        config.resolution_display_ms = resolution_display_ms;
    }
    if let Some(results_display_ms) = args.results_display_ms {
        config.results_display_ms = results_display_ms;
    }
    if let Some(game_over_ms) = args.game_over_ms {
        config.game_over_ms = game_over_ms;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn init_tracing(level: Level) {
    // stdout carries the event stream.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level);

    let config = build_config(&args)?;
    info!(
        title = GAME_TITLE,
        total_rounds = config.total_rounds,
        tick_ms = config.tick_ms,
        "stonks table starting"
    );
    let mut host = Host::new(config)?;

    let input = BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();
    tokio::select! {
        result = host::run(&mut host, input, output) => result,
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            warn!("interrupted");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "stonks-table",
            "--total-rounds",
            "3",
            "--tick-ms",
            "50",
            "--pump-increment",
            "6.5",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.log_level, Level::DEBUG);

        let config = apply_overrides(StonksConfig::default(), &args).unwrap();
        assert_eq!(config.total_rounds, 3);
        assert_eq!(config.tick_ms, 50);
        assert_eq!(config.pump_increment, 6.5);
        assert_eq!(config.crash_increment, 2.5);
        assert_eq!(config.prep_ms, 4_000);
    }

    #[test]
    fn rejects_zero_tick() {
        let args = Args::parse_from(["stonks-table", "--tick-ms", "0"]);
        let err = apply_overrides(StonksConfig::default(), &args).unwrap_err();
        assert!(
            format!("{err:#}").contains("tick_ms"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn rejects_non_positive_increment() {
        let args = Args::parse_from(["stonks-table", "--crash-increment", "0"]);
        assert!(apply_overrides(StonksConfig::default(), &args).is_err());
    }

    #[test]
    fn missing_env_falls_back() {
        assert_eq!(read_ms("STONKS_TEST_UNSET_MS", 4_000), 4_000);
        assert_eq!(read_f64("STONKS_TEST_UNSET_VALUE", 2.5), 2.5);
    }
}
