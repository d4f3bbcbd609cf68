//! # adapter_store: Storage and Wire Formats
//!
//! ## Adapter Role
//!
//! adapter_store keeps I/O out of the simulation kernels:
//! - `ObjectStore` trait with filesystem and in-memory backends (`store`,
//!   `local`, `memory`)
//! - Job key layout: input table, worker outputs, report (`layout`)
//! - CSV codec for price histories and trial tables (`codec`)
//! - Typed per-job access with structured logging (`job`)
//! - Error types: `TransferError`, `CodecError`, `StoreError`
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use adapter_store::{InMemoryObjectStore, JobStorage};
//!
//! let storage = JobStorage::new(Arc::new(InMemoryObjectStore::new()), "bucket", "demo");
//! storage
//!     .save_price_history_csv(b"Date,AAPL\n2024-01-02,185.6\n2024-01-03,184.2\n")
//!     .unwrap();
//!
//! let history = storage.load_price_history().unwrap();
//! assert_eq!(history.n_rows(), 2);
//! ```

#![deny(missing_docs)]

pub mod codec;
pub mod error;
pub mod job;
pub mod layout;
pub mod local;
pub mod memory;
pub mod store;

pub use error::{CodecError, TransferError, TransferOp};
pub use job::{JobStorage, StoreError};
pub use layout::JobLayout;
pub use local::LocalObjectStore;
pub use memory::InMemoryObjectStore;
pub use store::{list_with_extension, ObjectStore};
