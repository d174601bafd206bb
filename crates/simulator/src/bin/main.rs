//! Timeboost Dashboard Simulator CLI
//!
//! Runs the express lane auction dashboard headless and prints a summary.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use timeboost_clock::RolloverPolicy;
use timeboost_simulator::{Simulator, SimulatorConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timeboost-sim")]
#[command(about = "Headless simulator for the Timeboost express lane auction dashboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard and print a summary report
    Run {
        /// Random seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Simulated time to run for (e.g., "90s", "10m", "1h")
        #[arg(short, long)]
        duration: Option<humantime::Duration>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// What a pending rollover does while paused (fire, hold)
        #[arg(long)]
        rollover_policy: Option<RolloverPolicy>,

        /// Pause the dashboard at this time
        #[arg(long)]
        pause_at: Option<humantime::Duration>,

        /// Resume the dashboard at this time
        #[arg(long, requires = "pause_at")]
        resume_at: Option<humantime::Duration>,

        /// Drive the run against the wall clock instead of virtual time
        #[arg(long)]
        realtime: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            seed,
            duration,
            config,
            rollover_policy,
            pause_at,
            resume_at,
            realtime,
            json,
        } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_writer(std::io::stderr)
                .init();

            let mut sim_config = match &config {
                Some(path) => SimulatorConfig::load(path)
                    .with_context(|| format!("loading config from {}", path.display()))?,
                None => SimulatorConfig::default(),
            };
            if let Some(seed) = seed {
                sim_config = sim_config.with_seed(seed);
            }
            if let Some(duration) = duration {
                sim_config = sim_config.with_duration(*duration);
            }
            if let Some(policy) = rollover_policy {
                sim_config = sim_config.with_rollover_policy(policy);
            }
            if pause_at.is_some() {
                sim_config =
                    sim_config.with_pause_window(pause_at.map(|d| *d), resume_at.map(|d| *d));
            }

            let simulator =
                Simulator::new(sim_config).context("invalid simulation configuration")?;

            let report = if realtime {
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .context("building tokio runtime")?
                    .block_on(simulator.run_realtime())
            } else {
                simulator.run()
            };

            if json {
                let out = serde_json::to_string_pretty(&report).context("serializing report")?;
                println!("{}", out);
            } else {
                report.print();
            }
        }
    }

    Ok(())
}
