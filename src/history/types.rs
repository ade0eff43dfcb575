//! Request and response types of the history queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::protocol::{Operation, SignedTransaction, TransactionId};

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

/// One recorded operation with its position in the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Id of the enclosing transaction, zero for block-level virtual operations
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
    /// Operation payload
    pub op: Operation,
}

impl OperationRecord {
    /// Ordering key within the history
    pub fn location(&self) -> (u32, u32, u32, bool) {
        (self.block, self.trx_in_block, self.op_in_trx, self.virtual_op)
    }
}

/// Where a transaction was included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLocator {
    /// Block number
    pub block_num: u32,
    /// Index of the transaction within the block
    pub trx_in_block: u32,
}

/// A transaction together with its location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedTransaction {
    /// Transaction id
    pub transaction_id: TransactionId,
    /// Block number
    pub block_num: u32,
    /// Index of the transaction within the block
    pub transaction_num: u32,
    /// Full transaction
    pub transaction: SignedTransaction,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ARGUMENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Arguments of `get_ops_in_block`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetOpsInBlockArgs {
    /// Block number
    pub block_num: u32,
    /// Return only virtual operations
    #[serde(default)]
    pub only_virtual: bool,
}

/// Arguments of `get_transaction`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionArgs {
    /// Transaction id
    pub id: TransactionId,
}

/// Arguments of `get_account_history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAccountHistoryArgs {
    /// Account name
    pub account: String,
    /// Highest sequence number to return
    pub start: u32,
    /// Number of entries to return
    pub limit: u32,
}

/// Arguments of `enum_virtual_ops`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumVirtualOpsArgs {
    /// First block of the range, inclusive
    pub block_range_begin: u32,
    /// Last block of the range, exclusive
    pub block_range_end: u32,
    /// Position to resume from within `block_range_begin`
    #[serde(default)]
    pub operation_begin: u32,
    /// Maximum number of returned operations
    pub limit: u32,
    /// Operation names to keep
    #[serde(default)]
    pub filter: Option<BTreeSet<String>>,
}

impl EnumVirtualOpsArgs {
    /// Enumerate a whole range without a filter
    pub fn new(block_range_begin: u32, block_range_end: u32, limit: u32) -> Self {
        Self {
            block_range_begin,
            block_range_end,
            operation_begin: 0,
            limit,
            filter: None,
        }
    }

    /// Resume from a previous page
    pub fn resume_from(mut self, page: &VirtualOpsPage) -> Self {
        self.block_range_begin = page.next_block_range_begin;
        self.operation_begin = page.next_operation_begin;
        self
    }

    /// Keep only the named operation kinds
    pub fn with_filter<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of `get_ops_in_block`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpsInBlock {
    /// Records of the block, ordered by location and free of duplicates
    pub ops: Vec<OperationRecord>,
}

impl OpsInBlock {
    /// Build from records in any order
    pub fn from_records(mut ops: Vec<OperationRecord>) -> Self {
        ops.sort_by_key(OperationRecord::location);
        ops.dedup_by_key(|record| record.location());
        Self { ops }
    }
}

/// Result of `get_account_history`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountHistory {
    /// Records keyed by per-account sequence number
    pub history: BTreeMap<u32, OperationRecord>,
}

/// Result of `enum_virtual_ops`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualOpsPage {
    /// Matching virtual operations in chain order
    pub ops: Vec<OperationRecord>,
    /// Block to resume from
    pub next_block_range_begin: u32,
    /// Position to resume from within `next_block_range_begin`
    pub next_operation_begin: u32,
}

impl VirtualOpsPage {
    /// Whether the enumerated range is exhausted
    pub fn is_terminal(&self, block_range_end: u32) -> bool {
        self.next_block_range_begin == block_range_end && self.next_operation_begin == 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BACKEND
// ═══════════════════════════════════════════════════════════════════════════════

/// The storage a history engine reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryBackend {
    /// Secondary indices of the node database
    Primary,
    /// External range-indexed store
    Range,
}

impl fmt::Display for HistoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryBackend::Primary => write!(f, "primary"),
            HistoryBackend::Range => write!(f, "range"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Asset, ProducerRewardOperation};
    use chrono::TimeZone;

    fn record(block: u32, trx_in_block: u32, op_in_trx: u32) -> OperationRecord {
        OperationRecord {
            trx_id: TransactionId::ZERO,
            block,
            trx_in_block,
            op_in_trx,
            virtual_op: true,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            op: Operation::ProducerReward(ProducerRewardOperation {
                producer: "witness".into(),
                vesting_shares: Asset::vests(1),
            }),
        }
    }

    #[test]
    fn test_ops_in_block_sorted_and_deduplicated() {
        let result = OpsInBlock::from_records(vec![record(5, 1, 0), record(5, 0, 1), record(5, 1, 0)]);
        let locations: Vec<_> = result.ops.iter().map(OperationRecord::location).collect();
        assert_eq!(locations, vec![(5, 0, 1, true), (5, 1, 0, true)]);
    }

    #[test]
    fn test_resume_from_page() {
        let page = VirtualOpsPage {
            ops: Vec::new(),
            next_block_range_begin: 7,
            next_operation_begin: 3,
        };
        let args = EnumVirtualOpsArgs::new(1, 10, 5).resume_from(&page);
        assert_eq!(args.block_range_begin, 7);
        assert_eq!(args.operation_begin, 3);
        assert!(!page.is_terminal(10));
        assert!(VirtualOpsPage {
            next_block_range_begin: 10,
            ..Default::default()
        }
        .is_terminal(10));
    }

    #[test]
    fn test_enum_args_defaults_from_json() {
        let args: EnumVirtualOpsArgs =
            serde_json::from_str(r#"{"block_range_begin":1,"block_range_end":5,"limit":10}"#).unwrap();
        assert_eq!(args.operation_begin, 0);
        assert!(args.filter.is_none());
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(HistoryBackend::Primary.to_string(), "primary");
        assert_eq!(HistoryBackend::Range.to_string(), "range");
    }
}
