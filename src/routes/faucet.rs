use anchor_client::Cluster;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use super::{ApiJson, ApiResponse, parse_pubkey};
use crate::{
    config::sol_to_lamports,
    error::{Error, Result},
    explorer,
    server::AppState,
};

/// Public devnet refuses larger single requests
const MAX_AIRDROP_SOL: f64 = 2.0;

#[derive(Debug, Deserialize)]
pub struct AirdropRequest {
    pub public_key: String,
    #[serde(default = "default_sol")]
    pub sol: f64,
}

fn default_sol() -> f64 {
    1.0
}

#[derive(Debug, Serialize)]
pub struct AirdropResponse {
    pub tx_signature: String,
    pub explorer_url: String,
    pub balance: u64,
}

/// `POST /api/v1/faucet/airdrop`
pub async fn airdrop(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AirdropRequest>,
) -> Result<Json<ApiResponse<AirdropResponse>>> {
    if matches!(state.config.cluster, Cluster::Mainnet) {
        return Err(Error::InvalidInput("airdrops are not available on mainnet".to_string()));
    }
    if !(body.sol > 0.0 && body.sol <= MAX_AIRDROP_SOL) {
        return Err(Error::InvalidInput(format!("sol must be in (0, {}]", MAX_AIRDROP_SOL)));
    }
    let recipient = parse_pubkey("public_key", &body.public_key)?;

    let signature = state.ledger.request_airdrop(&recipient, sol_to_lamports(body.sol)).await?;
    state.ledger.confirm(&signature).await?;
    let balance = state.ledger.balance(&recipient).await?;
    tracing::info!("Airdropped {} SOL to {}", body.sol, recipient);

    Ok(Json(ApiResponse::success(AirdropResponse {
        explorer_url: explorer::transaction_url(&signature, &state.config.cluster),
        tx_signature: signature.to_string(),
        balance,
    })))
}
