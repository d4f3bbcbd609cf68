//! Simulate command implementation
//!
//! One worker: download the price history, simulate, upload the trial table.

use adapter_store::JobStorage;
use infra_config::{Settings, SimulateSettings};
use sim_paths::{PathSimulator, SimRng};
use tracing::info;

use super::open_storage;
use crate::Result;

/// Run the simulate command
pub fn run(settings: &Settings) -> Result<()> {
    let worker = settings.simulate()?;
    let storage = open_storage(&worker.job);
    execute(&worker, &storage, &mut SimRng::from_entropy())?;
    Ok(())
}

/// Simulates one worker against `storage`; returns the uploaded key.
pub fn execute(worker: &SimulateSettings, storage: &JobStorage, rng: &mut SimRng) -> Result<String> {
    let config = &worker.simulation;
    info!(
        job = %storage.layout().job(),
        worker = worker.worker_index,
        n_periods = config.n_periods(),
        n_trials = config.n_trials(),
        shock_model = %config.shock_model(),
        parallel = config.parallel(),
        "Starting simulation"
    );

    let history = storage.load_price_history()?;
    info!(
        assets = history.n_assets(),
        rows = history.n_rows(),
        "Loaded price history"
    );

    let table = PathSimulator::new(config.clone()).simulate(&history, rng)?;
    let key = storage.save_trial_table(worker.worker_index, &table)?;

    info!(key = %key, trials = table.n_trials(), "Simulation complete");
    Ok(key)
}
