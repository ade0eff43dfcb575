//! The query contract shared by both history backends.

use crate::error::Result;
use crate::history::types::{
    AccountHistory, AnnotatedTransaction, EnumVirtualOpsArgs, GetAccountHistoryArgs,
    GetOpsInBlockArgs, GetTransactionArgs, HistoryBackend, OpsInBlock, VirtualOpsPage,
};

/// Account history queries over one storage backend
pub trait HistoryEngine: Send + Sync {
    /// Which backend this engine reads
    fn backend(&self) -> HistoryBackend;

    /// All operations of a block, optionally only the virtual ones
    fn get_ops_in_block(&self, args: &GetOpsInBlockArgs) -> Result<OpsInBlock>;

    /// A transaction by id, with its location
    fn get_transaction(&self, args: &GetTransactionArgs) -> Result<AnnotatedTransaction>;

    /// A descending window of an account's history
    fn get_account_history(&self, args: &GetAccountHistoryArgs) -> Result<AccountHistory>;

    /// One page of virtual operations over a block range
    fn enum_virtual_ops(&self, args: &EnumVirtualOpsArgs) -> Result<VirtualOpsPage>;
}
