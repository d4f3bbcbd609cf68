//! In-memory object store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{TransferError, TransferOp};
use crate::store::ObjectStore;

/// Object store kept entirely in memory, keyed by `(bucket, key)`.
///
/// Used by tests and by dry runs that should not touch the filesystem.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<(String, String), Vec<u8>>>,
}

impl InMemoryObjectStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    /// Returns `true` if no object is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(op: TransferOp, bucket: &str, key: &str) -> TransferError {
    TransferError::new(op, bucket, key, "store lock poisoned")
}

impl ObjectStore for InMemoryObjectStore {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, TransferError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| poisoned(TransferOp::Get, bucket, key))?;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| TransferError::not_found(bucket, key))
    }

    fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<(), TransferError> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| poisoned(TransferOp::Put, bucket, key))?;
        objects.insert((bucket.to_string(), key.to_string()), bytes.to_vec());
        Ok(())
    }

    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, TransferError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| poisoned(TransferOp::List, bucket, prefix))?;
        Ok(objects
            .keys()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .map(|(_, k)| k.clone())
            .collect())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
