//! Emergent Firms Simulation
//!
//! Agents embedded in a fixed social network periodically re-evaluate how
//! to spend their effort: stay self-employed, work for a friend's firm,
//! or strike out on their own. Firms, wages, and debt all emerge from
//! those local choices.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use firm_core::output::{write_agent_history, write_census_history, write_firm_history, write_gml};
use firm_core::{SimConfig, SimError, Simulation};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "emergent_firms")]
#[command(about = "An emergent firms economic simulation")]
struct Args {
    /// TOML configuration file (defaults apply for anything omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of agents
    #[arg(long)]
    agents: Option<u32>,

    /// Number of steps to simulate
    #[arg(long)]
    steps: Option<u64>,

    /// Experiment name (names the output subdirectory)
    #[arg(long)]
    experiment: Option<String>,

    /// Output root directory
    #[arg(long)]
    out: Option<PathBuf>,

    /// Approve loans without checking repayment capacity
    #[arg(long)]
    naive_lending: bool,
}

fn load_config(args: &Args) -> Result<SimConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(n) = args.agents {
        config.n = n;
    }
    if let Some(tmax) = args.steps {
        config.tmax = tmax;
    }
    if let Some(experiment) = &args.experiment {
        config.experiment = experiment.clone();
    }
    if let Some(out) = &args.out {
        config.path = out.clone();
    }
    if args.naive_lending {
        config.debt_awareness = false;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = load_config(args)?;
    let out_dir = config.output_dir();
    fs::create_dir_all(&out_dir)?;
    fs::write(out_dir.join("config.toml"), config.to_toml()?)?;

    println!("Emergent Firms Simulation");
    println!("=========================");
    println!("Agents: {}", config.n);
    println!("Steps: {}", config.tmax);
    println!("Seed: {}", config.seed);
    println!(
        "Lending: {}",
        match (config.lending, config.debt_awareness) {
            (false, _) => "off",
            (true, true) => "debt-aware",
            (true, false) => "naive",
        }
    );
    println!("Output: {}", out_dir.display());
    println!();

    let mut sim = Simulation::new(config)?.with_event_log(out_dir.join("events.jsonl"))?;
    let summary = sim.run()?;

    write_agent_history(out_dir.join("agents.csv"), sim.agent_history())?;
    write_firm_history(out_dir.join("firms.csv"), sim.firm_history())?;
    write_census_history(out_dir.join("census.csv"), sim.census_history())?;
    write_gml(out_dir.join("network.gml"), &sim.network_export())?;

    println!(
        "Simulation complete. Ran {} steps, {} agent reviews, {} employment edges at the end.",
        summary.steps, summary.reviews, summary.final_edges
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
