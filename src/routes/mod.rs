// # Routes Module
//
// - HTTP route handlers for the wallet relay, grouped by concern.
//
//  ## Available Route Modules
// - `health`: liveness check
// - `wallet`: balance lookups
// - `faucet`: test-fund requests
// - `tx`: unsigned transaction builders and signed transaction relay

use std::str::FromStr;

use axum::extract::{FromRequest, FromRequestParts};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::error::{Error, Result};

/// Health check endpoint
pub mod health;

/// Wallet balance endpoint
pub mod wallet;

/// Devnet/testnet airdrop endpoint
pub mod faucet;

/// Transaction endpoints
pub mod tx;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// JSON body whose rejections are reported in the `ApiResponse` envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejections are reported in the `ApiResponse` envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

/// Parse a base58 key out of a request field
pub(crate) fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value.trim()).map_err(|e| Error::InvalidInput(format!("{} is not a valid public key: {}", field, e)))
}
