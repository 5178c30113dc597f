//! HTTP server exposing the statistics engine.
//!
//! This module provides an HTTP server that:
//! - Records transactions via POST /v1/StatisticsController/transactions
//! - Serves window statistics via GET /v1/StatisticsController/statistics
//!
//! # Status mapping
//!
//! ```text
//! POST /transactions ──→ engine.admit ──→ 201 Created | 204 No Content
//! GET  /statistics   ──→ engine.query ──→ 200 {sum, avg, max, min, count} | 204 No Content
//! ```

use crate::config::ServerSettings;
use crate::engine::{AdmissionError, SharedEngine, Transaction, TransactionRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Prefix the statistics routes are mounted under.
pub const API_PREFIX: &str = "/v1/StatisticsController";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind: IpAddr,
    /// Port to bind to (0 for random)
    pub port: u16,
}

impl ServerConfig {
    /// Create a new server configuration listening on localhost
    pub fn new(port: u16) -> Self {
        Self {
            bind: IpAddr::from([127, 0, 0, 1]),
            port,
        }
    }

    /// Build from the persisted listener settings.
    pub fn from_settings(settings: &ServerSettings) -> anyhow::Result<Self> {
        let bind = settings
            .bind
            .parse::<IpAddr>()
            .map_err(|e| anyhow::anyhow!("invalid bind address {:?}: {}", settings.bind, e))?;
        Ok(Self {
            bind,
            port: settings.port,
        })
    }
}

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    engine: SharedEngine,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /transactions
///
/// Returns 201 if the transaction was recorded. Anything else, including an
/// unparsable body, a future timestamp or one older than the window, is 204.
async fn transactions(
    State(state): State<ServerState>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> StatusCode {
    tracing::debug!("Request to record transaction");

    let outcome = payload
        .map_err(|rejection| AdmissionError::InvalidInput(rejection.body_text()))
        .and_then(|Json(request)| Transaction::try_from(request));

    let recorded = match outcome {
        Ok(tx) => state.engine.record(tx),
        Err(err) => {
            tracing::error!(reason = err.reason(), "Cannot record transaction: {}", err);
            false
        }
    };

    if recorded {
        StatusCode::CREATED
    } else {
        StatusCode::NO_CONTENT
    }
}

/// GET /statistics
///
/// Statistics for the transactions in the current window, or 204 if there are none.
async fn statistics(State(state): State<ServerState>) -> Response {
    tracing::debug!("Request for transaction statistics");

    match state.engine.query() {
        Some(aggregate) => (StatusCode::OK, Json(aggregate)).into_response(),
        None => {
            tracing::warn!("There are no transactions currently recorded");
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

/// Build the router without binding a listener.
pub fn router(engine: SharedEngine) -> Router {
    let api = Router::new()
        .route("/transactions", post(transactions))
        .route("/statistics", get(statistics));

    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, api)
        .layer(
            CorsLayer::new()
                .allow_origin([
                    HeaderValue::from_static("http://localhost"),
                    HeaderValue::from_static("http://127.0.0.1"),
                ])
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(ServerState { engine })
}

/// Run the HTTP server
pub async fn run(
    config: ServerConfig,
    engine: SharedEngine,
) -> anyhow::Result<(SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let app = router(engine);

    let addr = SocketAddr::new(config.bind, config.port);
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    tracing::info!("Statistics server listening on http://{}", actual_addr);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Server shutdown signal received");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_addr, shutdown_tx))
}
