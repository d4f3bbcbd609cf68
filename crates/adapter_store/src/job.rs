//! Typed access to one job's objects.

use std::sync::Arc;

use sim_core::history::PriceHistory;
use sim_paths::TrialResultTable;
use thiserror::Error;
use tracing::info;

use crate::codec::{decode_price_history, decode_trial_table, encode_trial_table};
use crate::error::{CodecError, TransferError, TransferOp};
use crate::layout::{JobLayout, RESULT_EXTENSION};
use crate::store::{list_with_extension, ObjectStore};

/// Errors raised by [`JobStorage`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// Download, upload or listing failed.
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// An object could not be decoded or encoded.
    #[error("Invalid object {key}: {source}")]
    Codec {
        /// Object key
        key: String,
        /// Underlying codec error
        #[source]
        source: CodecError,
    },
}

/// Reads and writes the objects of one job in one bucket.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use adapter_store::{InMemoryObjectStore, JobStorage};
/// use sim_paths::TrialResultTable;
///
/// let storage = JobStorage::new(Arc::new(InMemoryObjectStore::new()), "bucket", "job");
/// let table = TrialResultTable::from_rows(vec!["AAPL".to_string()], vec![vec![100.0]]).unwrap();
///
/// storage.save_trial_table(0, &table).unwrap();
/// assert_eq!(storage.load_trial_tables().unwrap(), vec![table]);
/// ```
#[derive(Clone)]
pub struct JobStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    layout: JobLayout,
}

impl std::fmt::Debug for JobStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobStorage")
            .field("backend", &self.store.backend())
            .field("bucket", &self.bucket)
            .field("job", &self.layout.job())
            .finish()
    }
}

impl JobStorage {
    /// Creates a handle for `job` in `bucket`.
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            layout: JobLayout::new(job),
        }
    }

    /// Returns the key layout.
    pub fn layout(&self) -> &JobLayout {
        &self.layout
    }

    /// Returns the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    fn codec_error(key: String) -> impl FnOnce(CodecError) -> StoreError {
        move |source| StoreError::Codec { key, source }
    }

    /// Downloads and decodes the job's historical prices.
    ///
    /// # Errors
    ///
    /// `StoreError::Transfer` if the download fails, `StoreError::Codec` if
    /// the table is malformed.
    pub fn load_price_history(&self) -> Result<PriceHistory, StoreError> {
        let key = self.layout.input_key();
        let bytes = self.store.get(&self.bucket, &key)?;
        info!(bucket = %self.bucket, key = %key, bytes = bytes.len(), "Retrieved price history");
        decode_price_history(&bytes).map_err(Self::codec_error(key))
    }

    /// Stores raw price-history CSV as the job's input.
    ///
    /// # Errors
    ///
    /// `StoreError::Transfer` if the upload fails.
    pub fn save_price_history_csv(&self, bytes: &[u8]) -> Result<String, StoreError> {
        let key = self.layout.input_key();
        self.store.put(&self.bucket, &key, bytes)?;
        info!(bucket = %self.bucket, key = %key, bytes = bytes.len(), "Uploaded price history");
        Ok(key)
    }

    /// Encodes and uploads one worker's trial table; returns the key.
    ///
    /// # Errors
    ///
    /// `StoreError::Codec` if encoding fails, `StoreError::Transfer` if the
    /// upload fails.
    pub fn save_trial_table(&self, worker: u32, table: &TrialResultTable) -> Result<String, StoreError> {
        let key = self.layout.worker_output_key(worker);
        let bytes = encode_trial_table(table).map_err(Self::codec_error(key.clone()))?;
        self.store.put(&self.bucket, &key, &bytes)?;
        info!(
            bucket = %self.bucket,
            key = %key,
            worker,
            trials = table.n_trials(),
            bytes = bytes.len(),
            "Uploaded simulation results"
        );
        Ok(key)
    }

    /// Lists the keys of every CSV object under the job's output prefix.
    ///
    /// # Errors
    ///
    /// `StoreError::Transfer` if the listing fails.
    pub fn list_trial_tables(&self) -> Result<Vec<String>, StoreError> {
        Ok(list_with_extension(
            self.store.as_ref(),
            &self.bucket,
            &self.layout.output_prefix(),
            RESULT_EXTENSION,
        )?)
    }

    /// Downloads and decodes every trial table under the output prefix, in
    /// key order.
    ///
    /// # Errors
    ///
    /// The first transfer or decode failure.
    pub fn load_trial_tables(&self) -> Result<Vec<TrialResultTable>, StoreError> {
        let keys = self.list_trial_tables()?;
        self.load_trial_tables_from(&keys)
    }

    /// Downloads and decodes the trial tables stored under `keys`, in the
    /// order given.
    ///
    /// # Errors
    ///
    /// The first transfer or decode failure.
    pub fn load_trial_tables_from(&self, keys: &[String]) -> Result<Vec<TrialResultTable>, StoreError> {
        let mut tables = Vec::with_capacity(keys.len());
        for key in keys {
            let bytes = self.store.get(&self.bucket, key)?;
            info!(bucket = %self.bucket, key = %key, bytes = bytes.len(), "Retrieved simulation results");
            tables.push(decode_trial_table(&bytes).map_err(Self::codec_error(key.clone()))?);
        }
        Ok(tables)
    }

    /// Uploads the aggregate report; returns the key.
    ///
    /// # Errors
    ///
    /// `StoreError::Transfer` if the upload fails.
    pub fn save_report(&self, report: &str) -> Result<String, StoreError> {
        let key = self.layout.report_key();
        self.store.put(&self.bucket, &key, report.as_bytes())?;
        info!(bucket = %self.bucket, key = %key, bytes = report.len(), "Uploaded distribution report");
        Ok(key)
    }

    /// Downloads the aggregate report.
    ///
    /// # Errors
    ///
    /// `StoreError::Transfer` if the download fails or the report is not
    /// UTF-8.
    pub fn load_report(&self) -> Result<String, StoreError> {
        let key = self.layout.report_key();
        let bytes = self.store.get(&self.bucket, &key)?;
        String::from_utf8(bytes).map_err(|e| {
            StoreError::Transfer(TransferError::new(TransferOp::Get, self.bucket.clone(), key, e))
        })
    }
}
