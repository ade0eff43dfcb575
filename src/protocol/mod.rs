//! Protocol module - chain data model.
//!
//! Operations, assets, transactions and blocks as they appear in the
//! chain's event log.

pub mod asset;
pub mod operations;
pub mod transaction;

pub use asset::*;
pub use operations::*;
pub use transaction::*;
