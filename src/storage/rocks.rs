//! RocksDB storage backend for the range history store.
//!
//! Each history column lives in its own column family, tuned for how the
//! range engine reads it:
//!
//! | Column family | Access pattern | Tuning |
//! |---|---|---|
//! | `operations` | forward range scans | no bloom filter |
//! | `account_history` | reverse scans within one account | no bloom filter |
//! | `transactions` | point lookups | whole-key bloom filter |
//!
//! Batches are written atomically. Reverse scans start at the last key not
//! greater than the seek key.

#[cfg(feature = "rocksdb-storage")]
use rocksdb::{
    BlockBasedOptions, ColumnFamily, ColumnFamilyDescriptor, DBCompressionType, Direction,
    IteratorMode, Options, WriteBatch, DB,
};

use std::path::Path;
#[cfg(feature = "rocksdb-storage")]
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
#[cfg(feature = "rocksdb-storage")]
use crate::storage::backend::{BatchOperation, ScanDirection, ScanVisitor, StorageValue};
use crate::storage::backend::StorageBackend;

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Block compression of the history columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Uncompressed blocks
    None,
    /// LZ4, cheap to decode
    Lz4,
    /// Zstandard, smaller on disk
    Zstd,
}

/// Tuning of the range history store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocksConfig {
    /// Create the database and its column families when missing
    pub create_if_missing: bool,
    /// Open file handle limit, -1 for unlimited
    pub max_open_files: i32,
    /// Memtable size per column family, in MiB
    pub write_buffer_mb: usize,
    /// Flush and compaction threads
    pub background_jobs: i32,
    /// Block compression
    pub compression: Compression,
    /// Bloom filter bits per key on the transaction column, disabled when unset
    pub bloom_filter_bits: Option<f64>,
    /// Collect RocksDB statistics
    pub statistics: bool,
}

impl Default for RocksConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            max_open_files: 512,
            write_buffer_mb: 64,
            background_jobs: 4,
            compression: Compression::Lz4,
            bloom_filter_bits: Some(10.0),
            statistics: false,
        }
    }
}

impl RocksConfig {
    /// Bulk imports on fast disks
    pub fn for_ssd() -> Self {
        Self {
            max_open_files: -1,
            write_buffer_mb: 256,
            background_jobs: 8,
            ..Default::default()
        }
    }

    /// Small nodes
    pub fn low_memory() -> Self {
        Self {
            max_open_files: 128,
            write_buffer_mb: 16,
            background_jobs: 2,
            compression: Compression::Zstd,
            ..Default::default()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COLUMN FAMILIES
// ═══════════════════════════════════════════════════════════════════════════════

/// Column family names of the range history store
pub mod column_families {
    /// Required by RocksDB, unused by the history layout
    pub const DEFAULT: &str = "default";
    /// Operation records keyed by block and position
    pub const OPERATIONS: &str = "operations";
    /// Per-account sequence index
    pub const ACCOUNT_HISTORY: &str = "account_history";
    /// Transaction id locators
    pub const TRANSACTIONS: &str = "transactions";

    /// Every column family the store opens
    pub const ALL: [&str; 4] = [DEFAULT, OPERATIONS, ACCOUNT_HISTORY, TRANSACTIONS];
}

// ═══════════════════════════════════════════════════════════════════════════════
// ROCKSDB STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Range history store persisted in RocksDB
#[cfg(feature = "rocksdb-storage")]
pub struct RocksStore {
    db: Arc<DB>,
    path: PathBuf,
    config: RocksConfig,
}

#[cfg(feature = "rocksdb-storage")]
impl RocksStore {
    /// Open or create the store at `path`
    pub fn open<P: AsRef<Path>>(path: P, config: RocksConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut db_opts = Options::default();
        db_opts.create_if_missing(config.create_if_missing);
        db_opts.create_missing_column_families(config.create_if_missing);
        db_opts.set_max_open_files(config.max_open_files);
        db_opts.set_max_background_jobs(config.background_jobs);
        if config.statistics {
            db_opts.enable_statistics();
        }

        let descriptors = column_families::ALL
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, column_options(name, &config)))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&db_opts, &path, descriptors)
            .map_err(|e| Error::Storage(format!("cannot open range store at {}: {}", path.display(), e)))?;

        tracing::info!(
            path = %path.display(),
            compression = ?config.compression,
            "opened range history store"
        );

        Ok(Self {
            db: Arc::new(db),
            path,
            config,
        })
    }

    /// Open with [`RocksConfig::default`]
    pub fn open_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path, RocksConfig::default())
    }

    fn cf_handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("range store has no column family {}", name)))
    }

    /// Human readable RocksDB statistics, when enabled
    pub fn statistics(&self) -> Option<String> {
        if !self.config.statistics {
            return None;
        }
        self.db.property_value("rocksdb.stats").ok().flatten()
    }

    /// Estimated number of keys in a column family
    pub fn estimated_keys(&self, cf: &str) -> Result<u64> {
        let handle = self.cf_handle(cf)?;
        self.db
            .property_int_value_cf(handle, "rocksdb.estimate-num-keys")
            .map(Option::unwrap_or_default)
            .map_err(|e| Error::Storage(e.to_string()))
    }

    /// Run a full manual compaction of the history columns
    pub fn compact(&self) -> Result<()> {
        for name in &column_families::ALL[1..] {
            let handle = self.cf_handle(name)?;
            self.db.compact_range_cf(handle, None::<&[u8]>, None::<&[u8]>);
        }
        Ok(())
    }

    /// Database directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tuning the store was opened with
    pub fn config(&self) -> &RocksConfig {
        &self.config
    }
}

#[cfg(feature = "rocksdb-storage")]
fn column_options(name: &str, config: &RocksConfig) -> Options {
    let mut opts = Options::default();
    opts.set_write_buffer_size(config.write_buffer_mb * 1024 * 1024);
    opts.set_compression_type(match config.compression {
        Compression::None => DBCompressionType::None,
        Compression::Lz4 => DBCompressionType::Lz4,
        Compression::Zstd => DBCompressionType::Zstd,
    });

    // Point lookups only
    if let (column_families::TRANSACTIONS, Some(bits)) = (name, config.bloom_filter_bits) {
        let mut table = BlockBasedOptions::default();
        table.set_bloom_filter(bits, false);
        opts.set_block_based_table_factory(&table);
    }
    opts
}

#[cfg(feature = "rocksdb-storage")]
impl StorageBackend for RocksStore {
    fn get(&self, cf: &str, key: &[u8]) -> Result<Option<StorageValue>> {
        let handle = self.cf_handle(cf)?;
        self.db
            .get_cf(handle, key)
            .map_err(|e| Error::Storage(format!("get from {}: {}", cf, e)))
    }

    fn write_batch(&self, operations: Vec<BatchOperation>) -> Result<()> {
        let mut batch = WriteBatch::default();
        for operation in operations {
            match operation {
                BatchOperation::Put { cf, key, value } => batch.put_cf(self.cf_handle(&cf)?, key, value),
                BatchOperation::Delete { cf, key } => batch.delete_cf(self.cf_handle(&cf)?, key),
            }
        }

        self.db
            .write(batch)
            .map_err(|e| Error::Storage(format!("batch write: {}", e)))
    }

    fn scan(
        &self,
        cf: &str,
        from: &[u8],
        direction: ScanDirection,
        visitor: &mut ScanVisitor<'_>,
    ) -> Result<()> {
        let handle = self.cf_handle(cf)?;
        let mode = match direction {
            ScanDirection::Forward => IteratorMode::From(from, Direction::Forward),
            ScanDirection::Reverse => IteratorMode::From(from, Direction::Reverse),
        };

        for entry in self.db.iterator_cf(handle, mode) {
            let (key, value) = entry.map_err(|e| Error::Storage(format!("scan of {}: {}", cf, e)))?;
            if !visitor(&key[..], &value[..])? {
                break;
            }
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        for name in column_families::ALL {
            self.db
                .flush_cf(self.cf_handle(name)?)
                .map_err(|e| Error::Storage(format!("flush of {}: {}", name, e)))?;
        }
        Ok(())
    }
}

/// Open a RocksDB store behind the backend trait object
#[cfg(feature = "rocksdb-storage")]
pub fn open_shared<P: AsRef<Path>>(path: P, config: RocksConfig) -> Result<Arc<dyn StorageBackend>> {
    Ok(Arc::new(RocksStore::open(path, config)?))
}

// ═══════════════════════════════════════════════════════════════════════════════
// WITHOUT ROCKSDB
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(not(feature = "rocksdb-storage"))]
const FEATURE_DISABLED: &str = "range store requires the rocksdb-storage feature";

/// Placeholder that refuses to open without the `rocksdb-storage` feature
#[cfg(not(feature = "rocksdb-storage"))]
pub struct RocksStore;

#[cfg(not(feature = "rocksdb-storage"))]
impl RocksStore {
    /// Always fails
    pub fn open<P: AsRef<Path>>(_path: P, _config: RocksConfig) -> Result<Self> {
        Err(Error::Storage(FEATURE_DISABLED.into()))
    }

    /// Always fails
    pub fn open_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path, RocksConfig::default())
    }
}

/// Always fails without the `rocksdb-storage` feature
#[cfg(not(feature = "rocksdb-storage"))]
pub fn open_shared<P: AsRef<Path>>(_path: P, _config: RocksConfig) -> Result<Arc<dyn StorageBackend>> {
    Err(Error::Storage(FEATURE_DISABLED.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let default = RocksConfig::default();
        assert!(default.create_if_missing);
        assert!(RocksConfig::for_ssd().write_buffer_mb > default.write_buffer_mb);
        assert!(RocksConfig::low_memory().write_buffer_mb < default.write_buffer_mb);
        assert_eq!(RocksConfig::low_memory().compression, Compression::Zstd);
    }

    #[test]
    fn test_config_json() {
        let config: RocksConfig =
            serde_json::from_str(r#"{"compression":"none","bloom_filter_bits":null}"#).unwrap();
        assert_eq!(config.compression, Compression::None);
        assert_eq!(config.bloom_filter_bits, None);
        assert_eq!(config.write_buffer_mb, RocksConfig::default().write_buffer_mb);
    }

    #[test]
    fn test_column_families_distinct() {
        let mut names = column_families::ALL.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), column_families::ALL.len());
    }

    #[cfg(not(feature = "rocksdb-storage"))]
    #[test]
    fn test_open_without_feature_fails() {
        assert!(RocksStore::open_default("/nonexistent").is_err());
        assert!(open_shared("/nonexistent", RocksConfig::default()).is_err());
    }

    #[cfg(feature = "rocksdb-storage")]
    #[test]
    fn test_batch_is_visible_per_column() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = RocksStore::open_default(temp_dir.path()).unwrap();

        store
            .write_batch(vec![
                BatchOperation::put(column_families::OPERATIONS, vec![7u8], b"op".to_vec()),
                BatchOperation::put(column_families::TRANSACTIONS, vec![7u8], b"trx".to_vec()),
            ])
            .unwrap();

        assert_eq!(store.get(column_families::OPERATIONS, &[7]).unwrap(), Some(b"op".to_vec()));
        assert_eq!(store.get(column_families::TRANSACTIONS, &[7]).unwrap(), Some(b"trx".to_vec()));
        assert_eq!(store.get(column_families::ACCOUNT_HISTORY, &[7]).unwrap(), None);

        store
            .write_batch(vec![BatchOperation::delete(column_families::OPERATIONS, vec![7u8])])
            .unwrap();
        assert_eq!(store.get(column_families::OPERATIONS, &[7]).unwrap(), None);
        assert!(store.get("missing", &[7]).is_err());
    }

    #[cfg(feature = "rocksdb-storage")]
    #[test]
    fn test_scans_and_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        {
            let store = RocksStore::open(temp_dir.path(), RocksConfig::low_memory()).unwrap();
            let puts = [10u8, 20, 30]
                .iter()
                .map(|k| BatchOperation::put(column_families::OPERATIONS, vec![*k], vec![*k]))
                .collect();
            store.write_batch(puts).unwrap();

            let mut forward = Vec::new();
            store
                .scan(column_families::OPERATIONS, &[15], ScanDirection::Forward, &mut |key, _| {
                    forward.push(key[0]);
                    Ok(true)
                })
                .unwrap();
            assert_eq!(forward, vec![20, 30]);

            let mut reverse = Vec::new();
            store
                .scan(column_families::OPERATIONS, &[25], ScanDirection::Reverse, &mut |key, _| {
                    reverse.push(key[0]);
                    Ok(false)
                })
                .unwrap();
            assert_eq!(reverse, vec![20]);

            store.flush().unwrap();
            store.compact().unwrap();
            assert_eq!(store.path(), temp_dir.path());
            assert!(store.statistics().is_none());
        }

        let reopened = RocksStore::open_default(temp_dir.path()).unwrap();
        assert_eq!(reopened.get(column_families::OPERATIONS, &[30]).unwrap(), Some(vec![30]));
        assert!(reopened.estimated_keys(column_families::OPERATIONS).unwrap() > 0);
        assert_eq!(reopened.config(), &RocksConfig::default());
    }
}
