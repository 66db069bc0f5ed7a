//! # Wallet Routes
//!
//! Balance lookups for frontends, so they do not need their own RPC access.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use super::{ApiQuery, ApiResponse, parse_pubkey};
use crate::{config::lamports_to_sol, error::Result, server::AppState};

/// Request parameters for wallet balance endpoint
#[derive(Debug, Deserialize)]
pub struct WalletBalanceQuery {
    /// The wallet public key (base58 encoded)
    pub public_key: String,
}

#[derive(Debug, Serialize)]
pub struct WalletBalanceResponse {
    pub public_key: String,
    pub lamports: u64,
    /// SOL balance in human-readable format (not lamports)
    pub sol_balance: f64,
}

/// `GET /api/v1/wallet/balance?public_key=<base58>`
pub async fn get_balance(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<WalletBalanceQuery>,
) -> Result<Json<ApiResponse<WalletBalanceResponse>>> {
    let pubkey = parse_pubkey("public_key", &query.public_key)?;
    let lamports = state.ledger.balance(&pubkey).await?;
    tracing::debug!("Balance of {}: {} lamports", pubkey, lamports);

    Ok(Json(ApiResponse::success(WalletBalanceResponse {
        public_key: pubkey.to_string(),
        lamports,
        sol_balance: lamports_to_sol(lamports),
    })))
}
