//! History engine over the range-indexed store.
//!
//! Operation data comes from the range store. Transaction bodies are not
//! duplicated there, so `get_transaction` still reads them from the node's
//! block storage under its read lock.

use std::sync::Arc;

use tracing::debug;

use crate::chain::ChainDatabase;
use crate::error::Result;
use crate::history::classifier::{classify, matches_filter};
use crate::history::engine::HistoryEngine;
use crate::history::primary::{ensure_transaction_index, load_transaction, unknown_transaction};
use crate::history::range_store::RangeHistorySource;
use crate::history::types::{
    AccountHistory, AnnotatedTransaction, EnumVirtualOpsArgs, GetAccountHistoryArgs,
    GetOpsInBlockArgs, GetTransactionArgs, HistoryBackend, OpsInBlock, VirtualOpsPage,
};
use crate::utils::validation::{
    validate_account_history_window, validate_account_name, validate_block_range,
};

/// Reads history from a range store
pub struct RangeHistoryEngine {
    source: Arc<dyn RangeHistorySource>,
    database: Arc<ChainDatabase>,
}

impl RangeHistoryEngine {
    /// Create an engine over a range store and the node's block storage
    pub fn new(source: Arc<dyn RangeHistorySource>, database: Arc<ChainDatabase>) -> Self {
        Self { source, database }
    }
}

impl HistoryEngine for RangeHistoryEngine {
    fn backend(&self) -> HistoryBackend {
        HistoryBackend::Range
    }

    fn get_ops_in_block(&self, args: &GetOpsInBlockArgs) -> Result<OpsInBlock> {
        debug!(block_num = args.block_num, only_virtual = args.only_virtual, "get_ops_in_block");

        let mut ops = Vec::new();
        self.source.find_operations_by_block(args.block_num, &mut |record| {
            if !args.only_virtual || classify(&record).is_virtual {
                ops.push(record);
            }
        })?;
        Ok(OpsInBlock::from_records(ops))
    }

    fn get_transaction(&self, args: &GetTransactionArgs) -> Result<AnnotatedTransaction> {
        debug!(id = %args.id, "get_transaction");
        ensure_transaction_index(&self.database)?;

        let locator = self
            .source
            .find_transaction_info(&args.id)?
            .ok_or_else(|| unknown_transaction(&args.id))?;

        self.database
            .with_read_lock(|state| load_transaction(state, args.id, locator))
    }

    fn get_account_history(&self, args: &GetAccountHistoryArgs) -> Result<AccountHistory> {
        debug!(account = %args.account, start = args.start, limit = args.limit, "get_account_history");
        validate_account_history_window(args.start, args.limit)?;
        validate_account_name(&args.account)?;

        let mut result = AccountHistory::default();
        self.source.find_account_history_data(
            &args.account,
            args.start,
            args.limit,
            &mut |sequence, record| {
                result.history.insert(sequence, record);
            },
        )?;
        Ok(result)
    }

    fn enum_virtual_ops(&self, args: &EnumVirtualOpsArgs) -> Result<VirtualOpsPage> {
        debug!(
            block_range_begin = args.block_range_begin,
            block_range_end = args.block_range_end,
            operation_begin = args.operation_begin,
            limit = args.limit,
            filtered = args.filter.is_some(),
            "enum_virtual_ops"
        );
        validate_block_range(args.block_range_begin, args.block_range_end, args.limit)?;

        let mut ops = Vec::new();
        let (next_block_range_begin, next_operation_begin) =
            self.source.enumerate_operations_from_block_range(
                args.block_range_begin,
                args.block_range_end,
                args.operation_begin,
                args.limit,
                &mut |record| {
                    let classification = classify(record);
                    if !classification.is_virtual || !matches_filter(&classification, args.filter.as_ref()) {
                        return false;
                    }
                    ops.push(record.clone());
                    true
                },
            )?;

        Ok(VirtualOpsPage {
            ops,
            next_block_range_begin,
            next_operation_begin,
        })
    }
}
