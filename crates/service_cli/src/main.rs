//! mcsim - Command Line Operations for the Monte Carlo Asset Price Simulator
//!
//! # Commands
//!
//! - `mcsim simulate` - Run one simulation worker of a job
//! - `mcsim collect` - Aggregate every worker's results into a report
//! - `mcsim run-local` - Run all workers and the aggregation on this machine
//! - `mcsim check` - Show the effective settings and storage state
//!
//! # Architecture
//!
//! As part of the service layer, this crate wires configuration
//! (`infra_config`), storage (`adapter_store`) and the simulation kernels
//! (`sim_paths`, `sim_aggregate`) together. Settings come from an optional
//! TOML file, the batch-job environment and the flags below, in increasing
//! order of precedence.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use infra_config::{CliOverrides, ConfigSources, LogLevel, Settings};
use sim_paths::ShockModel;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

pub use error::{CliError, Result};

/// Monte Carlo asset price simulator
#[derive(Parser)]
#[command(name = "mcsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Directory backing the local object store
    #[arg(long, global = true, value_name = "DIR")]
    store_root: Option<PathBuf>,

    /// Bucket holding the job's objects
    #[arg(long, global = true)]
    bucket: Option<String>,

    /// Job identifier (key prefix inside the bucket)
    #[arg(long, global = true)]
    job: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Simulation parameters shared by `simulate` and `run-local`.
#[derive(Args, Debug, Default)]
struct SimulationArgs {
    /// Number of simulated periods, including the starting step
    #[arg(long)]
    n_periods: Option<usize>,

    /// Number of trials per worker
    #[arg(long)]
    n_trials: Option<usize>,

    /// Shock model (covariance, correlation)
    #[arg(long)]
    shock_model: Option<ShockModel>,

    /// Parallelise each time step across trials
    #[arg(long)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation worker
    Simulate {
        #[command(flatten)]
        simulation: SimulationArgs,

        /// Index of this worker within the job
        #[arg(long)]
        worker_index: Option<u32>,
    },

    /// Aggregate worker results into the distribution report
    Collect {
        /// Fail unless exactly this many worker tables are present
        #[arg(long)]
        expected_workers: Option<usize>,
    },

    /// Simulate every worker and aggregate, on this machine
    RunLocal {
        #[command(flatten)]
        simulation: SimulationArgs,

        /// Number of workers to simulate (default: expected_workers or 1)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Local price history CSV to upload as the job's input first
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Check configuration and storage
    Check,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            bucket: self.bucket.clone(),
            job: self.job.clone(),
            store_root: self.store_root.clone(),
            log_level: self.log_level,
            ..CliOverrides::default()
        };

        let simulation = match &self.command {
            Commands::Simulate {
                simulation,
                worker_index,
            } => {
                overrides.worker_index = *worker_index;
                Some(simulation)
            }
            Commands::RunLocal { simulation, .. } => Some(simulation),
            Commands::Collect { expected_workers } => {
                overrides.expected_workers = *expected_workers;
                None
            }
            Commands::Check => None,
        };

        if let Some(sim) = simulation {
            overrides.n_periods = sim.n_periods;
            overrides.n_trials = sim.n_trials;
            overrides.shock_model = sim.shock_model;
            overrides.parallel = sim.parallel.then_some(true);
        }
        overrides
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn dispatch(cli: &Cli, settings: &Settings) -> Result<()> {
    match &cli.command {
        Commands::Simulate { .. } => commands::simulate::run(settings),
        Commands::Collect { .. } => commands::collect::run(settings),
        Commands::RunLocal { workers, input, .. } => {
            commands::run_local::run(settings, *workers, input.as_deref())
        }
        Commands::Check => commands::check::run(settings),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let sources = ConfigSources::from_process_env(cli.config.clone(), cli.overrides());
    let settings = match Settings::load(&sources) {
        Ok(settings) => settings,
        Err(e) => {
            let e = CliError::from(e);
            eprintln!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    init_tracing(settings.log_level.as_filter_str());
    info!("mcsim v{}", env!("CARGO_PKG_VERSION"));

    match dispatch(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_simulate_flags_become_overrides() {
        let cli = Cli::parse_from([
            "mcsim",
            "--bucket",
            "results",
            "simulate",
            "--n-periods",
            "30",
            "--n-trials",
            "500",
            "--worker-index",
            "2",
            "--shock-model",
            "correlation",
            "--parallel",
        ]);
        let o = cli.overrides();
        assert_eq!(o.bucket.as_deref(), Some("results"));
        assert_eq!(o.n_periods, Some(30));
        assert_eq!(o.n_trials, Some(500));
        assert_eq!(o.worker_index, Some(2));
        assert_eq!(o.shock_model, Some(ShockModel::Correlation));
        assert_eq!(o.parallel, Some(true));
    }

    #[test]
    fn test_unset_flags_leave_lower_layers() {
        let cli = Cli::parse_from(["mcsim", "collect", "--job", "nightly"]);
        let o = cli.overrides();
        assert_eq!(o.job.as_deref(), Some("nightly"));
        assert_eq!(o.expected_workers, None);
        assert_eq!(o.parallel, None);
        assert_eq!(o.n_periods, None);
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["mcsim", "--log-level", "loud", "check"]).is_err());
    }
}
