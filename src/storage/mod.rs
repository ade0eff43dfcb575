//! Storage module for the range history store.
//!
//! ## Backends
//!
//! - **InMemoryStore**: Fast, ephemeral storage for testing
//! - **RocksStore**: Production-grade persistence using RocksDB
//!
//! ## Usage
//!
//! ```rust,ignore
//! use account_history_api::storage::InMemoryStore;
//! use account_history_api::history::RangeHistoryStore;
//!
//! // For testing
//! let history = RangeHistoryStore::new(Arc::new(InMemoryStore::new()));
//!
//! // For production (requires rocksdb-storage feature)
//! let backend = account_history_api::storage::rocks::open_shared(path, RocksConfig::for_ssd())?;
//! let history = RangeHistoryStore::new(backend);
//! ```

pub mod backend;
pub mod keys;
pub mod rocks;

pub use backend::*;
pub use rocks::{column_families, open_shared, Compression, RocksConfig, RocksStore};
