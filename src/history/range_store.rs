//! Range-indexed history store.
//!
//! Lays the history out over three column families of an ordered key-value
//! backend (see [`crate::storage::keys`]) and exposes the scan primitives the
//! range history engine is built on.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::history::ingest::{block_operation_records, VirtualOperation};
use crate::history::types::{OperationRecord, TransactionLocator};
use crate::protocol::{SignedBlock, TransactionId};
use crate::storage::keys::{
    account_history_key, account_history_prefix, decode_account_sequence, decode_operation_key,
    decode_transaction_locator, operation_key, transaction_key, transaction_locator_value,
};
use crate::storage::{column_families as cf, BatchOperation, ScanDirection, StorageBackend};

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Store-level primitives consumed by the range history engine
pub trait RangeHistorySource: Send + Sync {
    /// Visit every record of a block in position order
    fn find_operations_by_block(
        &self,
        block_num: u32,
        visitor: &mut dyn FnMut(OperationRecord),
    ) -> Result<()>;

    /// Visit up to `limit` history entries of `account` with sequence `<= start`, newest first
    fn find_account_history_data(
        &self,
        account: &str,
        start: u32,
        limit: u32,
        visitor: &mut dyn FnMut(u32, OperationRecord),
    ) -> Result<()>;

    /// Locate a transaction by id
    fn find_transaction_info(&self, trx_id: &TransactionId) -> Result<Option<TransactionLocator>>;

    /// Visit records of `[block_range_begin, block_range_end)` starting at
    /// `(block_range_begin, operation_begin)` until `limit` of them are
    /// accepted by `visitor`. Returns the position to resume from, or
    /// `(block_range_end, 0)` when the range is exhausted.
    fn enumerate_operations_from_block_range(
        &self,
        block_range_begin: u32,
        block_range_end: u32,
        operation_begin: u32,
        limit: u32,
        visitor: &mut dyn FnMut(&OperationRecord) -> bool,
    ) -> Result<(u32, u32)>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// RANGE HISTORY STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// History laid out over a [`StorageBackend`]
#[derive(Clone)]
pub struct RangeHistoryStore {
    store: Arc<dyn StorageBackend>,
}

impl RangeHistoryStore {
    /// Wrap a backend
    pub fn new(store: Arc<dyn StorageBackend>) -> Self {
        Self { store }
    }

    /// Index one block. All columns are written in a single atomic batch.
    pub fn import_block(
        &self,
        block_num: u32,
        block: &SignedBlock,
        virtual_ops: &[VirtualOperation],
    ) -> Result<()> {
        let records = block_operation_records(block_num, block, virtual_ops)?;
        let mut batch = Vec::new();
        let mut next_sequences: HashMap<String, u32> = HashMap::new();

        for (position, record) in records.iter().enumerate() {
            let op_key = operation_key(block_num, position as u32);
            let value = bincode::serialize(record).map_err(|e| Error::Serialization(e.to_string()))?;
            batch.push(BatchOperation::put(cf::OPERATIONS, op_key.to_vec(), value));

            for account in record.op.impacted_accounts() {
                let sequence = match next_sequences.get(&account) {
                    Some(sequence) => *sequence,
                    None => self.next_sequence(&account)?,
                };
                next_sequences.insert(account.clone(), sequence + 1);
                batch.push(BatchOperation::put(
                    cf::ACCOUNT_HISTORY,
                    account_history_key(&account, sequence)?,
                    op_key.to_vec(),
                ));
            }
        }

        for (trx_in_block, trx) in block.transactions.iter().enumerate() {
            let trx_id = trx.id()?;
            batch.push(BatchOperation::put(
                cf::TRANSACTIONS,
                transaction_key(&trx_id),
                transaction_locator_value(block_num, trx_in_block as u32).to_vec(),
            ));
        }

        tracing::debug!(block_num, operations = records.len(), "imported block into range store");
        self.store.write_batch(batch)
    }

    /// Next free sequence number of an account
    pub fn next_sequence(&self, account: &str) -> Result<u32> {
        let prefix = account_history_prefix(account)?;
        let mut next = 0;
        self.store.scan(
            cf::ACCOUNT_HISTORY,
            &account_history_key(account, u32::MAX)?,
            ScanDirection::Reverse,
            &mut |key, _| {
                if let Some(sequence) = decode_account_sequence(&prefix, key) {
                    next = sequence.saturating_add(1);
                }
                Ok(false)
            },
        )?;
        Ok(next)
    }

    /// Flush the backend
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    fn load_operation(&self, op_key: &[u8]) -> Result<OperationRecord> {
        let bytes = self.store.get(cf::OPERATIONS, op_key)?.ok_or_else(|| {
            Error::InconsistentHistory(format!("missing operation at key {}", hex::encode(op_key)))
        })?;
        decode_record(&bytes)
    }
}

fn decode_record(bytes: &[u8]) -> Result<OperationRecord> {
    bincode::deserialize(bytes).map_err(|e| Error::Deserialization(e.to_string()))
}

impl RangeHistorySource for RangeHistoryStore {
    fn find_operations_by_block(
        &self,
        block_num: u32,
        visitor: &mut dyn FnMut(OperationRecord),
    ) -> Result<()> {
        self.store.scan(
            cf::OPERATIONS,
            &operation_key(block_num, 0),
            ScanDirection::Forward,
            &mut |key, value| match decode_operation_key(key) {
                Some((block, _)) if block == block_num => {
                    visitor(decode_record(value)?);
                    Ok(true)
                }
                _ => Ok(false),
            },
        )
    }

    fn find_account_history_data(
        &self,
        account: &str,
        start: u32,
        limit: u32,
        visitor: &mut dyn FnMut(u32, OperationRecord),
    ) -> Result<()> {
        if limit == 0 {
            return Ok(());
        }

        let prefix = account_history_prefix(account)?;
        let mut entries = Vec::new();
        self.store.scan(
            cf::ACCOUNT_HISTORY,
            &account_history_key(account, start)?,
            ScanDirection::Reverse,
            &mut |key, value| {
                let Some(sequence) = decode_account_sequence(&prefix, key) else {
                    return Ok(false);
                };
                entries.push((sequence, value.to_vec()));
                Ok(entries.len() < limit as usize)
            },
        )?;

        // Operation lookups run after the scan so no backend lock is held twice
        for (sequence, op_key) in entries {
            visitor(sequence, self.load_operation(&op_key)?);
        }
        Ok(())
    }

    fn find_transaction_info(&self, trx_id: &TransactionId) -> Result<Option<TransactionLocator>> {
        let Some(bytes) = self.store.get(cf::TRANSACTIONS, &transaction_key(trx_id))? else {
            return Ok(None);
        };
        let (block_num, trx_in_block) = decode_transaction_locator(&bytes).ok_or_else(|| {
            Error::Deserialization(format!("malformed locator for transaction {}", trx_id))
        })?;
        Ok(Some(TransactionLocator {
            block_num,
            trx_in_block,
        }))
    }

    fn enumerate_operations_from_block_range(
        &self,
        block_range_begin: u32,
        block_range_end: u32,
        operation_begin: u32,
        limit: u32,
        visitor: &mut dyn FnMut(&OperationRecord) -> bool,
    ) -> Result<(u32, u32)> {
        let terminal = (block_range_end, 0);
        if block_range_begin >= block_range_end || limit == 0 {
            return Ok(terminal);
        }

        let mut accepted = 0u32;
        let mut next = terminal;
        self.store.scan(
            cf::OPERATIONS,
            &operation_key(block_range_begin, operation_begin),
            ScanDirection::Forward,
            &mut |key, value| {
                let (block, position) = decode_operation_key(key).ok_or_else(|| {
                    Error::Deserialization(format!("malformed operation key {}", hex::encode(key)))
                })?;
                if block >= block_range_end {
                    return Ok(false);
                }
                if accepted == limit {
                    // First record past the page becomes the cursor
                    next = (block, position);
                    return Ok(false);
                }
                if visitor(&decode_record(value)?) {
                    accepted += 1;
                }
                Ok(true)
            },
        )?;

        Ok(next)
    }
}
