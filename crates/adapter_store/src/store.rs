//! Object storage abstraction.

use crate::error::TransferError;

/// Minimal bucket/key object store.
///
/// Implementations must be safe to share between threads. Keys use `/` as
/// separator regardless of the backend.
pub trait ObjectStore: Send + Sync {
    /// Downloads an object.
    ///
    /// # Errors
    ///
    /// `TransferError` if the object does not exist or cannot be read.
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, TransferError>;

    /// Uploads an object, replacing any previous version.
    ///
    /// A failed upload leaves no partial object behind.
    ///
    /// # Errors
    ///
    /// `TransferError` if the object cannot be written.
    fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<(), TransferError>;

    /// Lists the keys starting with `prefix`, sorted ascending.
    ///
    /// A missing bucket or prefix yields an empty list.
    ///
    /// # Errors
    ///
    /// `TransferError` if the listing cannot be performed.
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, TransferError>;

    /// Returns a short backend name for logging.
    fn backend(&self) -> &'static str;
}

/// Lists the keys under `prefix` whose final `.`-separated segment equals
/// `extension`.
///
/// Keys without a `.` never match.
///
/// # Errors
///
/// Propagates the listing error.
pub fn list_with_extension<S: ObjectStore + ?Sized>(
    store: &S,
    bucket: &str,
    prefix: &str,
    extension: &str,
) -> Result<Vec<String>, TransferError> {
    let keys = store.list(bucket, prefix)?;
    Ok(keys
        .into_iter()
        .filter(|key| matches!(key.rsplit_once('.'), Some((_, ext)) if ext == extension))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryObjectStore;

    #[test]
    fn test_list_with_extension() {
        let store = InMemoryObjectStore::new();
        for key in [
            "job/output/mc_sim_results_0.csv",
            "job/output/mc_sim_results_1.csv",
            "job/output/asset_price_distribution.txt",
            "job/output/notes",
            "job/output/archive.csv.gz",
            "job/input/asset_prices.csv",
        ] {
            store.put("bucket", key, b"x").unwrap();
        }

        let keys = list_with_extension(&store, "bucket", "job/output/", "csv").unwrap();
        assert_eq!(
            keys,
            vec![
                "job/output/mc_sim_results_0.csv".to_string(),
                "job/output/mc_sim_results_1.csv".to_string(),
            ]
        );
    }
}
