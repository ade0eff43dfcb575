//! The node database: block log plus history indices behind one lock.
//!
//! Readers take a shared lock for the whole of a query so multi-step index
//! traversals see one consistent state. Block application takes the
//! exclusive lock.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::chain::indices::{AccountHistoryIndex, OperationIndex, OperationObject};
use crate::error::{Error, Result};
use crate::history::ingest::{block_operation_records, VirtualOperation};
use crate::protocol::{SignedBlock, TransactionId};

// ═══════════════════════════════════════════════════════════════════════════════
// CHAIN STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything guarded by the database lock
#[derive(Debug)]
pub struct ChainState {
    blocks: BTreeMap<u32, SignedBlock>,
    operations: OperationIndex,
    account_history: AccountHistoryIndex,
}

impl ChainState {
    fn new(transaction_id_indexing: bool) -> Self {
        Self {
            blocks: BTreeMap::new(),
            operations: OperationIndex::new(transaction_id_indexing),
            account_history: AccountHistoryIndex::default(),
        }
    }

    /// Number of the last applied block, 0 before the first one
    pub fn head_block_num(&self) -> u32 {
        self.blocks.keys().next_back().copied().unwrap_or(0)
    }

    /// Block storage accessor
    pub fn fetch_block_by_number(&self, block_num: u32) -> Option<&SignedBlock> {
        self.blocks.get(&block_num)
    }

    /// Operation objects of a block in ingestion order
    pub fn operations_in_block(&self, block_num: u32) -> impl Iterator<Item = &OperationObject> + '_ {
        self.operations.by_block(block_num)
    }

    /// First operation of a transaction
    pub fn operation_by_transaction_id(&self, trx_id: &TransactionId) -> Option<&OperationObject> {
        self.operations.first_by_transaction_id(trx_id)
    }

    /// Account history entries with sequence `<= start`, newest first
    pub fn account_history(
        &self,
        account: &str,
        start: u32,
        limit: u32,
    ) -> Result<Vec<(u32, &OperationObject)>> {
        self.account_history
            .walk_back(account, start, limit)
            .into_iter()
            .map(|(sequence, id)| {
                self.operations.get(id).map(|object| (sequence, object)).ok_or_else(|| {
                    Error::InconsistentHistory(format!(
                        "history entry {} of {} references missing operation {}",
                        sequence, account, id
                    ))
                })
            })
            .collect()
    }

    /// Whether transaction ids are indexed
    pub fn has_transaction_index(&self) -> bool {
        self.operations.has_transaction_index()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHAIN DATABASE
// ═══════════════════════════════════════════════════════════════════════════════

/// Shared node database
#[derive(Debug)]
pub struct ChainDatabase {
    state: RwLock<ChainState>,
    transaction_id_indexing: bool,
}

impl Default for ChainDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainDatabase {
    /// Create an empty database with transaction id indexing
    pub fn new() -> Self {
        Self::with_transaction_index(true)
    }

    /// Create an empty database, choosing whether to index transaction ids
    pub fn with_transaction_index(transaction_id_indexing: bool) -> Self {
        Self {
            state: RwLock::new(ChainState::new(transaction_id_indexing)),
            transaction_id_indexing,
        }
    }

    /// Whether transaction ids are indexed
    pub fn transaction_index_enabled(&self) -> bool {
        self.transaction_id_indexing
    }

    /// Run `f` under the shared lock
    pub fn with_read_lock<R>(&self, f: impl FnOnce(&ChainState) -> Result<R>) -> Result<R> {
        let state = self.state.read().map_err(|_| Error::Lock)?;
        f(&state)
    }

    /// Number of the last applied block
    pub fn head_block_num(&self) -> Result<u32> {
        self.with_read_lock(|state| Ok(state.head_block_num()))
    }

    /// Apply the next block and index its operations, returning its number
    pub fn push_block(&self, block: SignedBlock, virtual_ops: &[VirtualOperation]) -> Result<u32> {
        let mut state = self.state.write().map_err(|_| Error::Lock)?;
        let block_num = state.head_block_num() + 1;

        // Encode everything before touching the indices
        let records = block_operation_records(block_num, &block, virtual_ops)?;

        for record in &records {
            let id = state.operations.insert(record)?;
            for account in record.op.impacted_accounts() {
                state.account_history.append(&account, id);
            }
        }
        state.blocks.insert(block_num, block);

        tracing::debug!(block_num, operations = records.len(), "applied block");
        Ok(block_num)
    }
}
