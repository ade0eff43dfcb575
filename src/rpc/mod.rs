//! JSON-RPC surface of the account history API.
//!
//! Transport-independent: the server binary feeds decoded requests to
//! [`handle_request`] and writes back the returned envelope.

pub mod dispatch;
pub mod jsonrpc;

pub use dispatch::*;
pub use jsonrpc::*;
