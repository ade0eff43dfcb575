//! Account History API Server
//!
//! JSON-RPC over HTTP for the `account_history_api` namespace.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use account_history_api::chain::ChainDatabase;
use account_history_api::config::{ApiConfig, ENV_BIND};
use account_history_api::history::AccountHistoryApi;
use account_history_api::rpc::{
    codes, handle_request, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
};

// ═══════════════════════════════════════════════════════════════════════════════
// CLI
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "account-history-server")]
#[command(author, version, about = "Account history JSON-RPC server")]
struct Args {
    /// JSON configuration file, takes precedence over AH_API_CONFIG
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the configuration file
    #[arg(short, long, env = ENV_BIND)]
    bind: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVER STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Shared application state
struct AppState {
    api: Arc<AccountHistoryApi>,
    database: Arc<ChainDatabase>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    backend: String,
    head_block_num: Option<u32>,
    transaction_id_indexing: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// HANDLERS
// ═══════════════════════════════════════════════════════════════════════════════

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: account_history_api::VERSION,
    })
}

async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(StatusResponse {
        backend: state.api.backend().to_string(),
        head_block_num: state.database.head_block_num().ok(),
        transaction_id_indexing: state.database.transaction_index_enabled(),
    })
}

async fn json_rpc(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            let response = JsonRpcResponse::failure(
                serde_json::Value::Null,
                JsonRpcError {
                    code: codes::PARSE_ERROR,
                    message: e.to_string(),
                    data: None,
                },
            );
            return (StatusCode::OK, Json(response));
        }
    };

    let id = request.id.clone();
    let api = Arc::clone(&state.api);

    // Queries take the database read lock
    match tokio::task::spawn_blocking(move || handle_request(&api, request)).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            error!(error = %e, "request handler panicked");
            let response = JsonRpcResponse::failure(
                id,
                JsonRpcError {
                    code: i64::from(account_history_api::Error::Internal(String::new()).code()),
                    message: "internal error".into(),
                    data: None,
                },
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MAIN
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ApiConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?
            .with_overrides(|name| std::env::var(name).ok()),
        None => ApiConfig::from_env().context("loading configuration from environment")?,
    };
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    config.validate().context("invalid configuration")?;

    let backends = config.open_backends().context("opening history backends")?;
    let database = Arc::clone(&backends.database);
    let api = AccountHistoryApi::new(backends).context("constructing account history api")?;

    let state = Arc::new(AppState {
        api: Arc::new(api),
        database,
    });

    let app = Router::new()
        .route("/", post(json_rpc))
        .route("/rpc", post(json_rpc))
        .route("/health", get(health_check))
        .route("/status", get(get_status))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state);

    let addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind))?;

    info!("Account history API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
