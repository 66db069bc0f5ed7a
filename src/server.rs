//! # Server Module
//!
//! HTTP relay for browser frontends. Wallets never hand their keys to this
//! server: it builds unsigned transactions for them and forwards what they
//! sign to the ledger endpoint.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::{
    config::Config,
    ledger::{Ledger, RpcLedger},
    routes::{faucet, health::ping, tx, wallet},
};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn Ledger>,
    pub config: Arc<Config>,
}

/// Routes without the CORS layer
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/api/v1/wallet/balance", get(wallet::get_balance))
        .route("/api/v1/faucet/airdrop", post(faucet::airdrop))
        .route("/api/v1/tx/ping", post(tx::build_ping))
        .route("/api/v1/tx/movie-review", post(tx::build_movie_review))
        .route("/api/v1/tx/anchor-movie-review", post(tx::build_anchor_movie_review))
        .route("/api/v1/tx/student-intro", post(tx::build_student_intro))
        .route("/api/v1/tx/submit", post(tx::submit))
        .route("/api/v1/movie-review", get(tx::get_movie_review))
        .with_state(state)
}

/// Bind the configured address and serve until the process is stopped.
pub async fn start(config: Config) -> Result<()> {
    let ledger: Arc<dyn Ledger> = Arc::new(RpcLedger::new(config.rpc_url.clone(), config.commitment));

    let origins = config
        .server
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>().with_context(|| format!("invalid CORS origin '{}'", origin)))
        .collect::<Result<Vec<_>>>()?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { ledger, config: Arc::new(config) };

    let app = router(state).layer(
        ServiceBuilder::new().layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]),
        ),
    );

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {} - port may already be in use", addr))?;

    tracing::info!("🚀 Relay server starting...");
    tracing::info!("📡 Listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);
    tracing::info!("🧾 Transaction endpoints available at http://{}/api/v1/tx/*", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
