//! History module - the account history query service.
//!
//! [`AccountHistoryApi`] serves four fixed queries through a [`HistoryEngine`]
//! chosen once at construction:
//!
//! - [`PrimaryHistoryEngine`] reads the node database's secondary indices and
//!   cannot enumerate virtual operations.
//! - [`RangeHistoryEngine`] reads a [`RangeHistoryStore`] and supports all
//!   four queries, including resumable `enum_virtual_ops` pagination.

pub mod api;
pub mod classifier;
pub mod engine;
pub mod ingest;
pub mod primary;
pub mod range;
pub mod range_store;
pub mod types;

pub use api::*;
pub use classifier::*;
pub use engine::*;
pub use ingest::*;
pub use primary::PrimaryHistoryEngine;
pub use range::*;
pub use range_store::*;
pub use types::*;
