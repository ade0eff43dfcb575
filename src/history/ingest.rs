//! Expansion of an applied block into operation records.
//!
//! Both stores index the same records in the same order, so a block produces
//! identical history whichever backend ingests it.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::history::types::OperationRecord;
use crate::protocol::{Operation, SignedBlock, TransactionId};

/// A virtual operation produced while applying a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualOperation {
    /// Transaction that produced it, `None` for block-level operations
    pub trx_in_block: Option<u32>,
    /// Operation payload
    pub op: Operation,
}

impl VirtualOperation {
    /// Virtual operation produced by a transaction
    pub fn in_transaction(trx_in_block: u32, op: Operation) -> Self {
        Self {
            trx_in_block: Some(trx_in_block),
            op,
        }
    }

    /// Virtual operation produced by the block itself
    pub fn block_level(op: Operation) -> Self {
        Self {
            trx_in_block: None,
            op,
        }
    }
}

/// Records of a block in ingestion order.
///
/// Each transaction contributes its own operations followed by the virtual
/// operations it produced. Block-level virtual operations come last, placed
/// after the final transaction and carrying the zero transaction id.
pub fn block_operation_records(
    block_num: u32,
    block: &SignedBlock,
    virtual_ops: &[VirtualOperation],
) -> Result<Vec<OperationRecord>> {
    let mut records = Vec::new();
    let block_level_trx = block.transactions.len() as u32;

    let make = |trx_id, trx_in_block, op_in_trx, op: &Operation| OperationRecord {
        trx_id,
        block: block_num,
        trx_in_block,
        op_in_trx,
        virtual_op: op.is_virtual(),
        timestamp: block.timestamp,
        op: op.clone(),
    };

    for (trx_in_block, trx) in block.transactions.iter().enumerate() {
        let trx_in_block = trx_in_block as u32;
        let trx_id = trx.id()?;
        let mut op_in_trx = 0u32;

        for op in &trx.operations {
            records.push(make(trx_id, trx_in_block, op_in_trx, op));
            op_in_trx += 1;
        }

        for vop in virtual_ops.iter().filter(|v| v.trx_in_block == Some(trx_in_block)) {
            records.push(make(trx_id, trx_in_block, op_in_trx, &vop.op));
            op_in_trx += 1;
        }
    }

    let block_level = virtual_ops
        .iter()
        .filter(|v| v.trx_in_block.map_or(true, |t| t >= block_level_trx));
    for (op_in_trx, vop) in block_level.enumerate() {
        records.push(make(TransactionId::ZERO, block_level_trx, op_in_trx as u32, &vop.op));
    }

    Ok(records)
}
