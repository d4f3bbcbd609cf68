//! Job storage on the filesystem backend.

use std::sync::Arc;

use adapter_store::{JobStorage, LocalObjectStore, ObjectStore, StoreError};
use sim_paths::TrialResultTable;
use tempfile::TempDir;

fn storage(dir: &TempDir) -> JobStorage {
    JobStorage::new(Arc::new(LocalObjectStore::new(dir.path())), "results", "job-7")
}

#[test]
fn worker_outputs_are_collected_in_key_order() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);

    for worker in [2u32, 0, 1] {
        let table = TrialResultTable::from_rows(
            vec!["AAPL".to_string(), "MSFT".to_string()],
            vec![vec![100.0 + worker as f64, 400.0], vec![99.5, 401.25]],
        )
        .unwrap();
        storage.save_trial_table(worker, &table).unwrap();
    }
    storage.save_report("not a table\n").unwrap();

    let tables = storage.load_trial_tables().unwrap();
    assert_eq!(tables.len(), 3);
    let firsts: Vec<f64> = tables.iter().map(|t| t.row(0)[0]).collect();
    assert_eq!(firsts, vec![100.0, 101.0, 102.0]);

    let on_disk = dir.path().join("results/job-7/output/mc_sim_results_0.csv");
    let text = std::fs::read_to_string(on_disk).unwrap();
    assert_eq!(text, ",AAPL,MSFT\n0,100.00,400.00\n1,99.50,401.25\n");
}

#[test]
fn price_history_is_read_from_input_key() {
    let dir = TempDir::new().unwrap();
    let store = LocalObjectStore::new(dir.path());
    store
        .put(
            "results",
            "job-7/input/asset_prices.csv",
            b"Date,AAPL\n2024-01-02,185.6\n2024-01-03,184.2\n2024-01-04,181.9\n",
        )
        .unwrap();

    let history = storage(&dir).load_price_history().unwrap();
    assert_eq!(history.n_rows(), 3);
    assert_eq!(history.last_row(), &[181.9]);
}

#[test]
fn corrupt_worker_output_names_the_object() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);
    storage
        .store()
        .put("results", "job-7/output/mc_sim_results_0.csv", b",AAPL\n0,oops\n")
        .unwrap();

    match storage.load_trial_tables() {
        Err(StoreError::Codec { key, .. }) => {
            assert_eq!(key, "job-7/output/mc_sim_results_0.csv")
        }
        other => panic!("unexpected {:?}", other),
    }
}
