//! Method routing for the `account_history_api` namespace.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::history::types::{
    EnumVirtualOpsArgs, GetAccountHistoryArgs, GetOpsInBlockArgs, GetTransactionArgs,
};
use crate::history::AccountHistoryApi;
use crate::rpc::jsonrpc::{JsonRpcRequest, JsonRpcResponse, RpcError, JSONRPC_VERSION};
use crate::utils::constants::API_NAME;

/// Methods served under the API namespace
pub const METHODS: [&str; 4] = [
    "get_ops_in_block",
    "get_transaction",
    "get_account_history",
    "enum_virtual_ops",
];

/// Route `method` with `params` to the API
pub fn dispatch(api: &AccountHistoryApi, method: &str, params: Value) -> Result<Value, RpcError> {
    let local = method
        .strip_prefix(API_NAME)
        .and_then(|rest| rest.strip_prefix('.'))
        .ok_or_else(|| RpcError::MethodNotFound(method.to_string()))?;

    match local {
        "get_ops_in_block" => respond(api.get_ops_in_block(&parse::<GetOpsInBlockArgs>(params)?)?),
        "get_transaction" => respond(api.get_transaction(&parse::<GetTransactionArgs>(params)?)?),
        "get_account_history" => {
            respond(api.get_account_history(&parse::<GetAccountHistoryArgs>(params)?)?)
        }
        "enum_virtual_ops" => respond(api.enum_virtual_ops(&parse::<EnumVirtualOpsArgs>(params)?)?),
        _ => Err(RpcError::MethodNotFound(method.to_string())),
    }
}

/// Handle a whole request envelope
pub fn handle_request(api: &AccountHistoryApi, request: JsonRpcRequest) -> JsonRpcResponse {
    let JsonRpcRequest {
        jsonrpc,
        method,
        params,
        id,
    } = request;

    let outcome = if jsonrpc != JSONRPC_VERSION {
        Err(RpcError::InvalidRequest(format!("unsupported jsonrpc version {:?}", jsonrpc)))
    } else {
        dispatch(api, &method, params)
    };

    match outcome {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(err) => {
            tracing::debug!(%method, code = err.code(), error = %err, "request failed");
            JsonRpcResponse::failure(id, err.into())
        }
    }
}

fn parse<T: DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    serde_json::from_value(params).map_err(|e| RpcError::InvalidParams(e.to_string()))
}

fn respond<T: Serialize>(result: T) -> Result<Value, RpcError> {
    serde_json::to_value(result)
        .map_err(|e| RpcError::Api(crate::error::Error::Serialization(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainDatabase;
    use crate::history::HistoryBackends;
    use crate::rpc::jsonrpc::codes;
    use serde_json::json;
    use std::sync::Arc;

    fn api() -> AccountHistoryApi {
        AccountHistoryApi::new(HistoryBackends {
            database: Arc::new(ChainDatabase::new()),
            chain_history_enabled: true,
            range_store: None,
        })
        .unwrap()
    }

    #[test]
    fn test_unknown_method() {
        let err = dispatch(&api(), "account_history_api.get_everything", json!({})).unwrap_err();
        assert_eq!(err.code(), codes::METHOD_NOT_FOUND);

        let err = dispatch(&api(), "condenser_api.get_ops_in_block", json!({})).unwrap_err();
        assert_eq!(err.code(), codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_invalid_params() {
        let err = dispatch(&api(), "account_history_api.get_ops_in_block", json!({"block": "x"}))
            .unwrap_err();
        assert_eq!(err.code(), codes::INVALID_PARAMS);
    }

    #[test]
    fn test_get_ops_in_block_empty() {
        let result = dispatch(
            &api(),
            "account_history_api.get_ops_in_block",
            json!({"block_num": 1, "only_virtual": false}),
        )
        .unwrap();
        assert_eq!(result, json!({"ops": []}));
    }

    #[test]
    fn test_api_errors_carry_codes() {
        let err = dispatch(
            &api(),
            "account_history_api.get_account_history",
            json!({"account": "alice", "start": 1, "limit": 5}),
        )
        .unwrap_err();
        assert_eq!(err.code(), 1001);
    }

    #[test]
    fn test_handle_request_echoes_id() {
        let response = handle_request(
            &api(),
            JsonRpcRequest::new(
                "account_history_api.enum_virtual_ops",
                json!({"block_range_begin": 1, "block_range_end": 2, "limit": 10}),
                7,
            ),
        );
        assert_eq!(response.id, json!(7));
        assert_eq!(response.error.map(|e| e.code), Some(1003));

        let mut bad = JsonRpcRequest::new("account_history_api.get_ops_in_block", json!({}), 1);
        bad.jsonrpc = "1.0".into();
        assert_eq!(handle_request(&api(), bad).error.map(|e| e.code), Some(codes::INVALID_REQUEST));
    }
}
