//! Chain module - the node's primary database.
//!
//! Holds the block log and the secondary indices the primary history
//! engine reads: operations by block, by transaction id and by account
//! sequence.

pub mod database;
pub mod indices;

pub use database::*;
pub use indices::*;
