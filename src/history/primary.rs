//! History engine over the node database's secondary indices.

use std::sync::Arc;

use tracing::debug;

use crate::chain::{ChainDatabase, ChainState};
use crate::error::{Error, Result};
use crate::history::classifier::classify;
use crate::history::engine::HistoryEngine;
use crate::history::types::{
    AccountHistory, AnnotatedTransaction, EnumVirtualOpsArgs, GetAccountHistoryArgs,
    GetOpsInBlockArgs, GetTransactionArgs, HistoryBackend, OpsInBlock, TransactionLocator,
    VirtualOpsPage,
};
use crate::protocol::TransactionId;
use crate::utils::validation::{
    validate_account_history_window, validate_account_name, validate_block_range,
};

/// Reads history from the node database
pub struct PrimaryHistoryEngine {
    database: Arc<ChainDatabase>,
}

impl PrimaryHistoryEngine {
    /// Create an engine over a shared database
    pub fn new(database: Arc<ChainDatabase>) -> Self {
        Self { database }
    }
}

impl HistoryEngine for PrimaryHistoryEngine {
    fn backend(&self) -> HistoryBackend {
        HistoryBackend::Primary
    }

    fn get_ops_in_block(&self, args: &GetOpsInBlockArgs) -> Result<OpsInBlock> {
        debug!(block_num = args.block_num, only_virtual = args.only_virtual, "get_ops_in_block");

        self.database.with_read_lock(|state| {
            let mut ops = Vec::new();
            for object in state.operations_in_block(args.block_num) {
                let record = object.to_record()?;
                if !args.only_virtual || classify(&record).is_virtual {
                    ops.push(record);
                }
            }
            Ok(OpsInBlock::from_records(ops))
        })
    }

    fn get_transaction(&self, args: &GetTransactionArgs) -> Result<AnnotatedTransaction> {
        debug!(id = %args.id, "get_transaction");
        ensure_transaction_index(&self.database)?;

        self.database.with_read_lock(|state| {
            let object = state
                .operation_by_transaction_id(&args.id)
                .ok_or_else(|| unknown_transaction(&args.id))?;
            let locator = TransactionLocator {
                block_num: object.block,
                trx_in_block: object.trx_in_block,
            };
            load_transaction(state, args.id, locator)
        })
    }

    fn get_account_history(&self, args: &GetAccountHistoryArgs) -> Result<AccountHistory> {
        debug!(account = %args.account, start = args.start, limit = args.limit, "get_account_history");
        validate_account_history_window(args.start, args.limit)?;
        validate_account_name(&args.account)?;

        self.database.with_read_lock(|state| {
            let mut result = AccountHistory::default();
            for (sequence, object) in state.account_history(&args.account, args.start, args.limit)? {
                result.history.insert(sequence, object.to_record()?);
            }
            Ok(result)
        })
    }

    fn enum_virtual_ops(&self, args: &EnumVirtualOpsArgs) -> Result<VirtualOpsPage> {
        validate_block_range(args.block_range_begin, args.block_range_end, args.limit)?;
        Err(Error::Unsupported(
            "enum_virtual_ops is not supported for history backed by the node database".into(),
        ))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHARED LOOKUPS
// ═══════════════════════════════════════════════════════════════════════════════

/// Fail unless the node indexes transaction ids
pub(crate) fn ensure_transaction_index(database: &ChainDatabase) -> Result<()> {
    if database.transaction_index_enabled() {
        Ok(())
    } else {
        Err(Error::Unsupported(
            "this node's operator has disabled operation indexing by transaction id".into(),
        ))
    }
}

pub(crate) fn unknown_transaction(id: &TransactionId) -> Error {
    Error::NotFound(format!("unknown transaction {}", id))
}

/// Fetch a located transaction from block storage
pub(crate) fn load_transaction(
    state: &ChainState,
    transaction_id: TransactionId,
    locator: TransactionLocator,
) -> Result<AnnotatedTransaction> {
    let block = state.fetch_block_by_number(locator.block_num).ok_or_else(|| {
        Error::InconsistentHistory(format!(
            "transaction {} points at missing block {}",
            transaction_id, locator.block_num
        ))
    })?;
    let transaction = block
        .transactions
        .get(locator.trx_in_block as usize)
        .ok_or_else(|| {
            Error::InconsistentHistory(format!(
                "block {} has no transaction {}",
                locator.block_num, locator.trx_in_block
            ))
        })?;

    Ok(AnnotatedTransaction {
        transaction_id,
        block_num: locator.block_num,
        transaction_num: locator.trx_in_block,
        transaction: transaction.clone(),
    })
}
