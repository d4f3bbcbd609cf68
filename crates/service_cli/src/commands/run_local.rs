//! Run-local command implementation
//!
//! Runs a whole job on one machine: optionally uploads a local price file,
//! simulates every worker in turn, then aggregates the tables written by
//! this run. Results left under the job by earlier runs with more workers
//! are ignored.

use std::path::Path;

use adapter_store::codec::decode_price_history;
use adapter_store::JobStorage;
use infra_config::Settings;
use sim_paths::SimRng;
use tracing::{info, warn};

use super::{collect, open_storage, simulate};
use crate::{CliError, Result};

/// Run the run-local command
pub fn run(settings: &Settings, workers: Option<usize>, input: Option<&Path>) -> Result<()> {
    let workers = workers.or(settings.expected_workers).unwrap_or(1);
    let job = settings.job()?;
    let storage = open_storage(&job);

    let report = execute(settings, &storage, workers, input)?;
    print!("{}", report);
    Ok(())
}

/// Runs `workers` simulations followed by the aggregation; returns the report.
pub fn execute(
    settings: &Settings,
    storage: &JobStorage,
    workers: usize,
    input: Option<&Path>,
) -> Result<String> {
    if workers == 0 {
        return Err(CliError::Config(infra_config::ConfigError::invalid(
            "workers",
            "must be a positive integer",
        )));
    }

    if let Some(path) = input {
        let bytes = std::fs::read(path)?;
        decode_price_history(&bytes)?;
        storage.save_price_history_csv(&bytes)?;
        info!(path = %path.display(), "Staged local price history");
    }

    let mut settings = settings.clone();
    settings.expected_workers = Some(workers);

    let mut written = Vec::with_capacity(workers);
    for index in 0..workers {
        settings.worker_index = Some(index as u32);
        let worker = settings.simulate()?;
        written.push(simulate::execute(&worker, storage, &mut SimRng::from_entropy())?);
    }

    let stale: Vec<String> = storage
        .list_trial_tables()?
        .into_iter()
        .filter(|key| !written.contains(key))
        .collect();
    if !stale.is_empty() {
        warn!(count = stale.len(), keys = ?stale, "Ignoring results not written by this run");
    }

    info!(workers, "All workers finished, aggregating");
    let tables = storage.load_trial_tables_from(&written)?;
    collect::publish(&settings.collect()?, storage, &tables)
}
