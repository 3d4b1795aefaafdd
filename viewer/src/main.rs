use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use log::info;
use viewer::config::load_scenario;

#[derive(Parser, Debug)]
#[command(about = "Colored pixels bouncing under gravity")]
struct Args {
    /// Scenario file (YAML); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Start in step mode (Space resumes)
    #[arg(long)]
    paused: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let scenario = load_scenario(args.config.as_deref())?;

    let seed = args
        .seed
        .or(scenario.simulation.seed)
        .unwrap_or_else(rand::random);
    info!("seed {}", seed);

    let settings = scenario.simulation.into_settings(seed);
    viewer::run_window(settings, scenario.view, args.paused).map_err(|e| anyhow!("{}", e))
}
