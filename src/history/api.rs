//! The account history API facade and its backend selection.

use std::sync::Arc;

use tracing::{info, warn};

use crate::chain::ChainDatabase;
use crate::error::{Error, Result};
use crate::history::engine::HistoryEngine;
use crate::history::primary::PrimaryHistoryEngine;
use crate::history::range::RangeHistoryEngine;
use crate::history::range_store::RangeHistorySource;
use crate::history::types::{
    AccountHistory, AnnotatedTransaction, EnumVirtualOpsArgs, GetAccountHistoryArgs,
    GetOpsInBlockArgs, GetTransactionArgs, HistoryBackend, OpsInBlock, VirtualOpsPage,
};

/// History subsystems active on the node
pub struct HistoryBackends {
    /// Node database, always present for block storage
    pub database: Arc<ChainDatabase>,
    /// Whether the node database maintains account history indices
    pub chain_history_enabled: bool,
    /// Range store, when its subsystem is active
    pub range_store: Option<Arc<dyn RangeHistorySource>>,
}

/// Account history API
pub struct AccountHistoryApi {
    engine: Box<dyn HistoryEngine>,
}

impl AccountHistoryApi {
    /// Select the engine for the active subsystems.
    ///
    /// The range store wins when both are active. Fails when neither is.
    pub fn new(backends: HistoryBackends) -> Result<Self> {
        let HistoryBackends {
            database,
            chain_history_enabled,
            range_store,
        } = backends;

        let engine: Box<dyn HistoryEngine> = match range_store {
            Some(source) => {
                if chain_history_enabled {
                    warn!(
                        "account_history and account_history_rocksdb are both enabled; \
                         account_history_api will query account_history_rocksdb"
                    );
                }
                Box::new(RangeHistoryEngine::new(source, database))
            }
            None if chain_history_enabled => Box::new(PrimaryHistoryEngine::new(database)),
            None => {
                return Err(Error::FatalConfiguration(
                    "account history API requires account_history or account_history_rocksdb to be enabled"
                        .into(),
                ))
            }
        };

        info!(backend = %engine.backend(), "account history API ready");
        Ok(Self { engine })
    }

    /// Wrap an already constructed engine
    pub fn with_engine(engine: Box<dyn HistoryEngine>) -> Self {
        Self { engine }
    }

    /// Backend serving the queries
    pub fn backend(&self) -> HistoryBackend {
        self.engine.backend()
    }

    /// All operations of a block
    pub fn get_ops_in_block(&self, args: &GetOpsInBlockArgs) -> Result<OpsInBlock> {
        self.engine.get_ops_in_block(args)
    }

    /// A transaction by id
    pub fn get_transaction(&self, args: &GetTransactionArgs) -> Result<AnnotatedTransaction> {
        self.engine.get_transaction(args)
    }

    /// A descending window of an account's history
    pub fn get_account_history(&self, args: &GetAccountHistoryArgs) -> Result<AccountHistory> {
        self.engine.get_account_history(args)
    }

    /// One page of virtual operations
    pub fn enum_virtual_ops(&self, args: &EnumVirtualOpsArgs) -> Result<VirtualOpsPage> {
        self.engine.enum_virtual_ops(args)
    }
}
