//! # Gauntlet Headless
//!
//! Batch runner that plays seeded matches with a scripted autopilot and
//! prints JSON summaries.
//!
//! ```text
//! gauntlet-headless --variant shooter --seeds 16 --json
//! gauntlet-headless --config tuned.json --duration 60
//! gauntlet-headless --variant arena --dump-config > arena.json
//! ```
//!
//! Logging goes to stderr and honors `RUST_LOG`.

mod autopilot;
mod runner;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gauntlet_core::config::{MatchConfig, Variant};

use crate::runner::{run_match, BatchSummary, MatchSummary, RunOptions};

const DEFAULT_FILTER: &str = "gauntlet_core=info,gauntlet_headless=info";

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Preset to play when no config file is given (arena, shooter or throw).
    #[arg(short, long, default_value = "shooter")]
    variant: Variant,
    /// JSON match configuration, replacing the preset.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of matches to play.
    #[arg(short = 'n', long, default_value_t = 4, value_parser = clap::value_parser!(u64).range(1..=10_000))]
    seeds: u64,
    /// Seed of the first match; later matches count up from it.
    #[arg(long, default_value_t = 0)]
    first_seed: u64,
    /// Match length in seconds.
    #[arg(short, long, default_value_t = 120.0)]
    duration: f32,
    /// Host frame rate driving the fixed-step accumulator.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1_000))]
    fps: u32,
    /// Print one JSON object per match instead of a text table.
    #[arg(long)]
    json: bool,
    /// Print the selected configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

fn load_config(cli: &Cli) -> Result<MatchConfig> {
    let Some(path) = &cli.config else {
        return Ok(MatchConfig::preset(cli.variant));
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    MatchConfig::from_json(&text).with_context(|| format!("loading config {}", path.display()))
}

fn print_text(results: &[MatchSummary], batch: &BatchSummary) {
    println!(
        "{:>8} {:>8} {:>7} {:>6} {:>7} {:>7} {:>6}",
        "seed", "variant", "score", "kills", "deaths", "ledger", "ticks"
    );
    for r in results {
        println!(
            "{:>8} {:>8} {:>7} {:>6} {:>7} {:>7} {:>6}",
            r.seed,
            r.variant,
            r.score,
            r.kills,
            r.deaths,
            r.ledger.total(),
            r.ticks
        );
    }
    println!(
        "{} matches, mean score {:.1}, best {}, kills {}, deaths {}",
        batch.matches, batch.mean_score, batch.best_score, batch.total_kills, batch.total_deaths
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !cli.duration.is_finite() || cli.duration <= 0.0 {
        bail!("--duration must be a positive number of seconds");
    }

    let config = load_config(&cli)?;
    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let options = RunOptions {
        duration_secs: cli.duration,
        frame_secs: 1.0 / cli.fps as f32,
    };
    let seeds: Vec<u64> = (0..cli.seeds).map(|i| cli.first_seed.wrapping_add(i)).collect();
    info!(variant = %config.variant, matches = seeds.len(), duration = cli.duration, "running batch");

    let results: Vec<MatchSummary> = seeds
        .par_iter()
        .map(|&seed| run_match(&config, seed, options))
        .collect();
    let batch = BatchSummary::from_results(&results);

    if cli.json {
        for result in &results {
            println!("{}", serde_json::to_string(result)?);
        }
        println!("{}", serde_json::to_string(&batch)?);
    } else {
        print_text(&results, &batch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_variant_and_defaults() {
        let cli = Cli::try_parse_from(["gauntlet-headless", "--variant", "throw", "--json"]).unwrap();
        assert_eq!(cli.variant, Variant::Throw);
        assert!(cli.json);
        assert_eq!(cli.seeds, 4);
        assert_eq!(cli.fps, 60);
    }

    #[test]
    fn cli_rejects_unknown_variant_and_zero_seeds() {
        assert!(Cli::try_parse_from(["gauntlet-headless", "--variant", "golf"]).is_err());
        assert!(Cli::try_parse_from(["gauntlet-headless", "--seeds", "0"]).is_err());
    }

    #[test]
    fn preset_is_used_without_config_file() {
        let cli = Cli::try_parse_from(["gauntlet-headless", "--variant", "arena"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.variant, Variant::Arena);
    }

    #[test]
    fn missing_config_file_reports_path() {
        let cli = Cli::try_parse_from(["gauntlet-headless", "--config", "/nonexistent/gauntlet.json"])
            .unwrap();
        let err = load_config(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/gauntlet.json"));
    }
}
