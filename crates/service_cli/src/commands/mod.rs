//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

use std::sync::Arc;

use adapter_store::{JobStorage, LocalObjectStore};
use infra_config::JobSettings;

pub mod check;
pub mod collect;
pub mod run_local;
pub mod simulate;

/// Opens the job's storage on the local object store.
pub fn open_storage(job: &JobSettings) -> JobStorage {
    JobStorage::new(
        Arc::new(LocalObjectStore::new(&job.store_root)),
        job.bucket.clone(),
        job.job.clone(),
    )
}
