//! Weighted dice simulator
//!
//! Usage:
//!   mcsim --config dice.yaml                 - Play the configured game and print a report
//!   mcsim --d6 3 --rolls 10000 --seed 7      - Play fair six-sided dice
//!   mcsim --config dice.json --show-table    - Also print the outcome table

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use mc_sim::{Analyzer, SimulationConfig, SimulationReport, TableFormat};

#[derive(Parser)]
#[command(name = "mcsim", about = "Roll weighted dice and analyze the outcomes")]
struct Cli {
    /// Simulation config (JSON or YAML)
    #[arg(short, long, conflicts_with = "d6")]
    config: Option<PathBuf>,

    /// Use this many fair six-sided dice instead of a config file
    #[arg(long)]
    d6: Option<usize>,

    /// Override the number of rolls
    #[arg(short, long)]
    rolls: Option<usize>,

    /// Override the random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Outcome table layout ("wide" or "narrow")
    #[arg(short, long, value_parser = TableFormat::from_str)]
    format: Option<TableFormat>,

    /// Print the outcome table before the report
    #[arg(long)]
    show_table: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match (&cli.config, cli.d6) {
        (Some(path), _) => SimulationConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        (None, Some(count)) => SimulationConfig::fair_d6(count),
        (None, None) => bail!("Either --config or --d6 is required"),
    };

    if let Some(rolls) = cli.rolls {
        config = config.with_rolls(rolls);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(format) = cli.format {
        config = config.with_format(format);
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let mut game = config.build().context("Invalid simulation config")?;
    log::info!(
        "Playing {} rolls of {} dice (seed: {:?})",
        config.rolls,
        game.dice_count(),
        config.seed
    );
    game.play(config.rolls)?;

    if cli.show_table {
        print!("{}", game.show_game_as(config.format)?);
        println!();
    }

    let analyzer = Analyzer::new(&game);
    let report = SimulationReport::from_analyzer("Dice Simulation", &analyzer)?;
    log::info!("{} jackpots in {} rolls", report.jackpots, report.rolls);

    match cli.output {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Markdown => print!("{}", report.to_markdown()),
        OutputFormat::Json => println!("{}", report.to_json()),
    }
    Ok(())
}
