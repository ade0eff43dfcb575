//! JSON-RPC 2.0 envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Protocol version string
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard error codes
pub mod codes {
    /// Malformed request envelope
    pub const INVALID_REQUEST: i64 = -32600;
    /// Unknown method
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Parameters do not match the method
    pub const INVALID_PARAMS: i64 = -32602;
    /// Request body is not JSON
    pub const PARSE_ERROR: i64 = -32700;
}

/// A JSON-RPC request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be "2.0"
    pub jsonrpc: String,
    /// Fully qualified method name
    pub method: String,
    /// Named parameters
    #[serde(default)]
    pub params: Value,
    /// Caller-chosen id echoed in the response
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcRequest {
    /// Build a request
    pub fn new(method: impl Into<String>, params: Value, id: impl Into<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            method: method.into(),
            params,
            id: id.into(),
        }
    }
}

/// Error member of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i64,
    /// Human readable message
    pub message: String,
    /// Extra detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Result on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    /// Id of the request
    pub id: Value,
}

impl JsonRpcResponse {
    /// Successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Failed response
    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Whether the call failed
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RPC ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Failure of a dispatched call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    /// Malformed envelope
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Unknown method
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    /// Parameters could not be decoded
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    /// The query itself failed
    #[error(transparent)]
    Api(#[from] Error),
}

impl RpcError {
    /// Code reported to the caller
    pub fn code(&self) -> i64 {
        match self {
            RpcError::InvalidRequest(_) => codes::INVALID_REQUEST,
            RpcError::MethodNotFound(_) => codes::METHOD_NOT_FOUND,
            RpcError::InvalidParams(_) => codes::INVALID_PARAMS,
            RpcError::Api(err) => i64::from(err.code()),
        }
    }
}

impl From<RpcError> for JsonRpcError {
    fn from(err: RpcError) -> Self {
        let data = match &err {
            RpcError::Api(inner) => Some(serde_json::json!({
                "kind": format!("{:?}", inner.kind()),
            })),
            _ => None,
        };
        Self {
            code: err.code(),
            message: err.to_string(),
            data,
        }
    }
}
