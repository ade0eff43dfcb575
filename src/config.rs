//! Service configuration.
//!
//! Read from a JSON file, then overridden by environment variables:
//!
//! | Variable | Effect |
//! |---|---|
//! | `AH_API_CONFIG` | path of the JSON file |
//! | `AH_API_BIND` | JSON-RPC listen address |
//! | `AH_API_ROCKSDB_PATH` | enables the range store at this path |
//! | `AH_API_DISABLE_TRX_INDEX` | `1`/`true` disables transaction id indexing |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::chain::ChainDatabase;
use crate::history::{HistoryBackends, RangeHistorySource, RangeHistoryStore};
use crate::storage::{open_shared, RocksConfig};

/// Environment variable naming the config file
pub const ENV_CONFIG: &str = "AH_API_CONFIG";
/// Environment variable overriding the bind address
pub const ENV_BIND: &str = "AH_API_BIND";
/// Environment variable enabling the range store
pub const ENV_ROCKSDB_PATH: &str = "AH_API_ROCKSDB_PATH";
/// Environment variable disabling transaction id indexing
pub const ENV_DISABLE_TRX_INDEX: &str = "AH_API_DISABLE_TRX_INDEX";

// ═══════════════════════════════════════════════════════════════════════════════
// API CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Range store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeStoreConfig {
    /// Database directory
    pub path: PathBuf,
    /// RocksDB tuning
    #[serde(default)]
    pub rocks: RocksConfig,
}

impl RangeStoreConfig {
    /// Range store at `path` with default tuning
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rocks: RocksConfig::default(),
        }
    }
}

/// Account history API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Node database keeps account history indices
    pub account_history: bool,
    /// Range store, active when present
    pub account_history_rocksdb: Option<RangeStoreConfig>,
    /// Index operations by transaction id
    pub transaction_id_indexing: bool,
    /// JSON-RPC listen address
    pub bind: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            account_history: true,
            account_history_rocksdb: None,
            transaction_id_indexing: true,
            bind: "127.0.0.1:8090".into(),
        }
    }
}

impl ApiConfig {
    /// Load from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Load from `AH_API_CONFIG` if set, then apply environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var(ENV_CONFIG) {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        Ok(base.with_overrides(|name| std::env::var(name).ok()))
    }

    /// Apply overrides from a variable lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind = bind;
        }

        if let Some(path) = lookup(ENV_ROCKSDB_PATH) {
            let rocks = self
                .account_history_rocksdb
                .take()
                .map(|existing| existing.rocks)
                .unwrap_or_default();
            self.account_history_rocksdb = Some(RangeStoreConfig {
                path: PathBuf::from(path),
                rocks,
            });
        }

        if let Some(flag) = lookup(ENV_DISABLE_TRX_INDEX) {
            if matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes") {
                self.transaction_id_indexing = false;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.account_history && self.account_history_rocksdb.is_none() {
            return Err(ConfigError::Validation(
                "either account_history or account_history_rocksdb must be enabled".into(),
            ));
        }

        if let Some(range) = &self.account_history_rocksdb {
            if range.path.as_os_str().is_empty() {
                return Err(ConfigError::Validation("range store path cannot be empty".into()));
            }
        }

        if self.bind.is_empty() {
            return Err(ConfigError::Validation("bind address cannot be empty".into()));
        }

        Ok(())
    }

    /// Open the configured subsystems
    pub fn open_backends(&self) -> crate::Result<HistoryBackends> {
        let database = Arc::new(ChainDatabase::with_transaction_index(self.transaction_id_indexing));

        let range_store = match &self.account_history_rocksdb {
            Some(range) => {
                let backend = open_shared(&range.path, range.rocks.clone())?;
                let store: Arc<dyn RangeHistorySource> = Arc::new(RangeHistoryStore::new(backend));
                Some(store)
            }
            None => None,
        };

        Ok(HistoryBackends {
            database,
            chain_history_enabled: self.account_history,
            range_store,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
