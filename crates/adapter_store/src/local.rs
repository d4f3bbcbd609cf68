//! Filesystem-backed object store.
//!
//! A bucket is a directory under the store root and a key is a relative
//! path inside it, so `put("results", "job/output/a.csv")` writes
//! `<root>/results/job/output/a.csv`.
//!
//! Uploads are staged in a temporary file in the destination directory and
//! renamed into place, so readers never observe a partially written object
//! and a failed upload leaves nothing behind.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{TransferError, TransferOp};
use crate::store::ObjectStore;

/// Prefix of staging files; never reported by [`LocalObjectStore::list`].
const STAGING_PREFIX: &str = ".mcsim-";

/// Object store rooted at a local directory.
#[derive(Clone, Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Creates a store rooted at `root`. The directory is created lazily on
    /// the first upload.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a bucket/key pair to a path, rejecting keys that would
    /// escape the bucket directory.
    fn resolve(&self, op: TransferOp, bucket: &str, key: &str) -> Result<PathBuf, TransferError> {
        check_relative(bucket, true).map_err(|r| TransferError::new(op, bucket, key, r))?;
        check_relative(key, false).map_err(|r| TransferError::new(op, bucket, key, r))?;
        Ok(self.root.join(bucket).join(key))
    }
}

/// Accepts plain relative paths made of normal components only.
fn check_relative(path: &str, single_component: bool) -> Result<(), &'static str> {
    if path.is_empty() {
        return Err("empty path");
    }
    let mut count = 0;
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) => count += 1,
            _ => return Err("path must be relative and must not contain '..'"),
        }
    }
    if single_component && count != 1 {
        return Err("bucket name must be a single path component");
    }
    Ok(())
}

/// Collects every file below `dir` as a `/`-separated key relative to `base`.
fn walk(base: &Path, dir: &Path, keys: &mut Vec<String>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk(base, &path, keys)?;
        } else if file_type.is_file() {
            if entry
                .file_name()
                .to_string_lossy()
                .starts_with(STAGING_PREFIX)
            {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(base) {
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                keys.push(key);
            }
        }
    }
    Ok(())
}

impl ObjectStore for LocalObjectStore {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, TransferError> {
        let path = self.resolve(TransferOp::Get, bucket, key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TransferError::not_found(bucket, key))
            }
            Err(e) => Err(TransferError::new(TransferOp::Get, bucket, key, e)),
        }
    }

    fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<(), TransferError> {
        let path = self.resolve(TransferOp::Put, bucket, key)?;
        let err = |e: std::io::Error| TransferError::new(TransferOp::Put, bucket, key, e);

        let parent = path
            .parent()
            .ok_or_else(|| TransferError::new(TransferOp::Put, bucket, key, "key has no parent"))?;
        fs::create_dir_all(parent).map_err(err)?;

        let mut staged = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(parent)
            .map_err(err)?;
        staged.write_all(bytes).map_err(err)?;
        staged.as_file().sync_all().map_err(err)?;
        staged.persist(&path).map_err(|e| err(e.error))?;

        debug!(path = %path.display(), bytes = bytes.len(), "Wrote object");
        Ok(())
    }

    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, TransferError> {
        check_relative(bucket, true)
            .map_err(|r| TransferError::new(TransferOp::List, bucket, prefix, r))?;

        let base = self.root.join(bucket);
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        walk(&base, &base, &mut keys)
            .map_err(|e| TransferError::new(TransferOp::List, bucket, prefix, e))?;
        keys.retain(|k| k.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_creates_directories() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());

        store.put("bucket", "job/output/a.csv", b"1,2\n").unwrap();
        let on_disk = dir.path().join("bucket/job/output/a.csv");
        assert_eq!(fs::read(on_disk).unwrap(), b"1,2\n");
        assert_eq!(store.get("bucket", "job/output/a.csv").unwrap(), b"1,2\n");
    }

    #[test]
    fn test_put_overwrites_and_leaves_no_staging_files() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());

        store.put("b", "k.txt", b"first").unwrap();
        store.put("b", "k.txt", b"second").unwrap();
        assert_eq!(store.get("b", "k.txt").unwrap(), b"second");

        let entries: Vec<_> = fs::read_dir(dir.path().join("b"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_object_and_bucket() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());

        assert_eq!(
            store.get("b", "nope.csv").unwrap_err(),
            TransferError::not_found("b", "nope.csv")
        );
        assert!(store.list("b", "").unwrap().is_empty());
    }

    #[test]
    fn test_list_nested_keys() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());
        store.put("b", "job/output/mc_sim_results_1.csv", b"").unwrap();
        store.put("b", "job/output/mc_sim_results_0.csv", b"").unwrap();
        store.put("b", "job/input/asset_prices.csv", b"").unwrap();

        assert_eq!(
            store.list("b", "job/output/").unwrap(),
            vec![
                "job/output/mc_sim_results_0.csv".to_string(),
                "job/output/mc_sim_results_1.csv".to_string(),
            ]
        );
        assert_eq!(store.list("b", "").unwrap().len(), 3);
    }

    #[test]
    fn test_rejects_escaping_keys() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());

        let err = store.put("b", "../outside.csv", b"x").unwrap_err();
        assert_eq!(err.op, TransferOp::Put);
        assert!(store.get("b", "/etc/passwd").is_err());
        assert!(store.put("a/b", "k", b"x").is_err());
        assert!(store.put("b", "", b"x").is_err());
    }
}
