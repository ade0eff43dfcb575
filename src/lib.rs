//! # Account History API
//!
//! Read-only query service over a blockchain node's operation history.
//!
//! ## Architecture
//!
//! - **Protocol**: operations, transactions and blocks as stored by the node
//! - **Chain**: the node database with its operation and account history indices
//! - **Storage**: key/value backends and the RocksDB column layout
//! - **History**: the two query engines and the facade that selects one
//! - **RPC**: JSON-RPC envelopes and method dispatch
//!
//! ## Example
//!
//! ```rust,ignore
//! use account_history_api::prelude::*;
//!
//! let api = AccountHistoryApi::new(config.open_backends()?)?;
//! let history = api.get_account_history(&GetAccountHistoryArgs {
//!     account: "alice".into(),
//!     start: u32::MAX,
//!     limit: 100,
//! })?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications
)]

pub mod chain;
pub mod config;
pub mod error;
pub mod history;
pub mod protocol;
pub mod rpc;
pub mod storage;
pub mod utils;

pub use error::{Error, ErrorKind, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::chain::ChainDatabase;
    pub use crate::config::ApiConfig;
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::history::{
        AccountHistory, AccountHistoryApi, AnnotatedTransaction, EnumVirtualOpsArgs,
        GetAccountHistoryArgs, GetOpsInBlockArgs, GetTransactionArgs, HistoryBackend,
        HistoryBackends, OperationRecord, OpsInBlock, RangeHistoryStore, VirtualOperation,
        VirtualOpsPage,
    };
    pub use crate::protocol::{Operation, SignedBlock, SignedTransaction, TransactionId};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
