//! Collect command implementation
//!
//! Aggregates every worker table of a job and uploads the distribution
//! report.

use adapter_store::JobStorage;
use infra_config::{CollectSettings, Settings};
use sim_aggregate::{render_report, Aggregator};
use sim_paths::TrialResultTable;
use tracing::{info, warn};

use super::open_storage;
use crate::Result;

/// Run the collect command
pub fn run(settings: &Settings) -> Result<()> {
    let collect = settings.collect()?;
    let storage = open_storage(&collect.job);
    let report = execute(&collect, &storage)?;
    print!("{}", report);
    Ok(())
}

/// Aggregates the job's worker tables and uploads the report; returns the
/// rendered report.
pub fn execute(collect: &CollectSettings, storage: &JobStorage) -> Result<String> {
    let tables = storage.load_trial_tables()?;
    publish(collect, storage, &tables)
}

/// Aggregates `tables`, uploads the report and returns it.
pub(crate) fn publish(
    collect: &CollectSettings,
    storage: &JobStorage,
    tables: &[TrialResultTable],
) -> Result<String> {
    let aggregator = match collect.expected_workers {
        Some(expected) => Aggregator::with_expected_tables(expected),
        None => {
            warn!(
                tables = tables.len(),
                "No expected worker count configured; aggregating whatever is present"
            );
            Aggregator::new()
        }
    };

    let summary = aggregator.aggregate(tables)?;
    let report = render_report(&summary);
    let key = storage.save_report(&report)?;

    info!(
        key = %key,
        tables = summary.n_tables(),
        trials = summary.n_trials(),
        assets = summary.rows().len(),
        "Distribution report uploaded"
    );
    Ok(report)
}
