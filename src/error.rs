//! # Error Types
//!
//! Shared error type for every module that touches keys, payloads or the
//! ledger endpoint. Remote failures are not classified: the
//! endpoint's message is carried through as-is.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use solana_client::client_error::ClientError;
use solana_sdk::{pubkey::Pubkey, signer::SignerError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transaction was built without a single signer
    #[error("transaction requires at least one signer")]
    NoSigners,

    /// Seeds rejected by address derivation
    #[error("invalid seeds: {0}")]
    InvalidSeeds(String),

    /// Key material could not be parsed
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// Key material could not be read or persisted
    #[error("keystore error: {0}")]
    Keystore(#[from] std::io::Error),

    #[error("signing failed: {0}")]
    Signing(#[from] SignerError),

    /// Payload or wire transaction could not be encoded/decoded
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("account {0} not found")]
    AccountNotFound(Pubkey),

    /// Anything the ledger endpoint reported
    #[error("remote ledger error: {0}")]
    Remote(String),
}

impl From<ClientError> for Error {
    fn from(err: ClientError) -> Self {
        Error::Remote(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Encoding(err.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Remote(_) => StatusCode::BAD_GATEWAY,
            Error::AccountNotFound(_) => StatusCode::NOT_FOUND,
            Error::Keystore(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        let body = json!({ "success": false, "data": null, "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
