//! Secondary indices of the node database.
//!
//! Operation objects are stored once, keyed by a sequential id. The block,
//! transaction and account indices reference them by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::history::types::OperationRecord;
use crate::protocol::TransactionId;

// ═══════════════════════════════════════════════════════════════════════════════
// OPERATION OBJECT
// ═══════════════════════════════════════════════════════════════════════════════

/// An operation as kept by the node database, with its payload serialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationObject {
    /// Sequential object id
    pub id: u64,
    /// Enclosing transaction id
    pub trx_id: TransactionId,
    /// Block number
    pub block: u32,
    /// Index of the transaction within the block
    pub trx_in_block: u32,
    /// Index of the operation within the transaction
    pub op_in_trx: u32,
    /// Stored virtual flag
    pub virtual_op: bool,
    /// Block time
    pub timestamp: DateTime<Utc>,
    /// bincode-encoded operation
    pub serialized_op: Vec<u8>,
}

impl OperationObject {
    /// Build from a record, encoding its payload
    pub fn from_record(id: u64, record: &OperationRecord) -> Result<Self> {
        let serialized_op =
            bincode::serialize(&record.op).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(Self {
            id,
            trx_id: record.trx_id,
            block: record.block,
            trx_in_block: record.trx_in_block,
            op_in_trx: record.op_in_trx,
            virtual_op: record.virtual_op,
            timestamp: record.timestamp,
            serialized_op,
        })
    }

    /// Decode back into a record
    pub fn to_record(&self) -> Result<OperationRecord> {
        let op = bincode::deserialize(&self.serialized_op)
            .map_err(|e| Error::Deserialization(format!("operation {}: {}", self.id, e)))?;
        Ok(OperationRecord {
            trx_id: self.trx_id,
            block: self.block,
            trx_in_block: self.trx_in_block,
            op_in_trx: self.op_in_trx,
            virtual_op: self.virtual_op,
            timestamp: self.timestamp,
            op,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPERATION INDEX
// ═══════════════════════════════════════════════════════════════════════════════

/// Operation objects with block and transaction id indices
#[derive(Debug, Default)]
pub struct OperationIndex {
    objects: BTreeMap<u64, OperationObject>,
    by_location: BTreeSet<(u32, u64)>,
    by_transaction_id: Option<BTreeSet<(TransactionId, u64)>>,
    next_id: u64,
}

impl OperationIndex {
    /// Create an index, optionally maintaining the transaction id index
    pub fn new(transaction_id_indexing: bool) -> Self {
        Self {
            by_transaction_id: transaction_id_indexing.then(BTreeSet::new),
            ..Default::default()
        }
    }

    /// Whether the transaction id index is maintained
    pub fn has_transaction_index(&self) -> bool {
        self.by_transaction_id.is_some()
    }

    /// Store a record and return its object id
    pub fn insert(&mut self, record: &OperationRecord) -> Result<u64> {
        let id = self.next_id;
        let object = OperationObject::from_record(id, record)?;

        self.by_location.insert((object.block, id));
        if let Some(by_trx) = self.by_transaction_id.as_mut() {
            if !object.trx_id.is_zero() {
                by_trx.insert((object.trx_id, id));
            }
        }
        self.objects.insert(id, object);
        self.next_id += 1;

        Ok(id)
    }

    /// Get an object by id
    pub fn get(&self, id: u64) -> Option<&OperationObject> {
        self.objects.get(&id)
    }

    /// Objects of one block in insertion order
    pub fn by_block(&self, block: u32) -> impl Iterator<Item = &OperationObject> + '_ {
        self.by_location
            .range((block, 0)..=(block, u64::MAX))
            .filter_map(|(_, id)| self.objects.get(id))
    }

    /// First object of a transaction, `None` if unknown or not indexed
    pub fn first_by_transaction_id(&self, trx_id: &TransactionId) -> Option<&OperationObject> {
        self.by_transaction_id
            .as_ref()?
            .range((*trx_id, 0)..=(*trx_id, u64::MAX))
            .next()
            .and_then(|(_, id)| self.objects.get(id))
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ACCOUNT HISTORY INDEX
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-account sequence index over operation objects
#[derive(Debug, Default)]
pub struct AccountHistoryIndex {
    by_account: BTreeMap<(String, u32), u64>,
    next_sequence: BTreeMap<String, u32>,
}

impl AccountHistoryIndex {
    /// Append an operation to an account's history, returning its sequence
    pub fn append(&mut self, account: &str, operation_id: u64) -> u32 {
        let sequence = self.next_sequence.entry(account.to_string()).or_insert(0);
        let assigned = *sequence;
        *sequence += 1;
        self.by_account.insert((account.to_string(), assigned), operation_id);
        assigned
    }

    /// Walk an account's history downward from `start`, at most `limit` entries
    pub fn walk_back(&self, account: &str, start: u32, limit: u32) -> Vec<(u32, u64)> {
        self.by_account
            .range((account.to_string(), 0)..=(account.to_string(), start))
            .rev()
            .take(limit as usize)
            .map(|((_, sequence), id)| (*sequence, *id))
            .collect()
    }

    /// Next sequence number of an account
    pub fn next_sequence(&self, account: &str) -> u32 {
        self.next_sequence.get(account).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::*;
    use chrono::TimeZone;

    fn record(block: u32, trx_id: TransactionId) -> OperationRecord {
        OperationRecord {
            trx_id,
            block,
            trx_in_block: 0,
            op_in_trx: 0,
            virtual_op: false,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            op: Operation::Transfer(TransferOperation {
                from: "alice".into(),
                to: "bob".into(),
                amount: Asset::hive(1),
                memo: String::new(),
            }),
        }
    }

    #[test]
    fn test_object_roundtrip() {
        let original = record(3, TransactionId::new([7; 20]));
        let object = OperationObject::from_record(9, &original).unwrap();
        assert_eq!(object.id, 9);
        assert_eq!(object.to_record().unwrap(), original);
    }

    #[test]
    fn test_block_index() {
        let mut index = OperationIndex::new(true);
        index.insert(&record(1, TransactionId::ZERO)).unwrap();
        index.insert(&record(2, TransactionId::ZERO)).unwrap();
        index.insert(&record(2, TransactionId::ZERO)).unwrap();

        assert_eq!(index.by_block(2).count(), 2);
        assert_eq!(index.by_block(5).count(), 0);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_transaction_index() {
        let id = TransactionId::new([1; 20]);
        let mut index = OperationIndex::new(true);
        index.insert(&record(4, id)).unwrap();
        index.insert(&record(4, TransactionId::ZERO)).unwrap();

        assert_eq!(index.first_by_transaction_id(&id).map(|o| o.block), Some(4));
        assert!(index.first_by_transaction_id(&TransactionId::ZERO).is_none());

        let mut unindexed = OperationIndex::new(false);
        unindexed.insert(&record(4, id)).unwrap();
        assert!(!unindexed.has_transaction_index());
        assert!(unindexed.first_by_transaction_id(&id).is_none());
    }

    #[test]
    fn test_account_walk_back() {
        let mut index = AccountHistoryIndex::default();
        for id in 0..6 {
            assert_eq!(index.append("alice", id), id as u32);
        }
        index.append("bob", 100);

        let entries = index.walk_back("alice", 5, 3);
        assert_eq!(entries, vec![(5, 5), (4, 4), (3, 3)]);

        // Window past the head starts from the newest entry
        let entries = index.walk_back("alice", 1_000, 2);
        assert_eq!(entries, vec![(5, 5), (4, 4)]);

        assert!(index.walk_back("carol", 10, 10).is_empty());
        assert_eq!(index.next_sequence("bob"), 1);
    }
}
