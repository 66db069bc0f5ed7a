//! # Ledger Module
//!
//! The remote ledger endpoint is the only boundary this crate talks to.
//! It is modelled as a trait so the submitter, the token flows and the HTTP
//! routes can be exercised against an in-memory ledger in tests.
//!
//! ## Features
//! - Balance and account queries
//! - Recent blockhash lookup
//! - Test-fund requests (airdrops) and confirmation polling
//! - Send-and-confirm of signed transactions

use async_trait::async_trait;
use solana_sdk::{account::Account, hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};

use crate::error::Result;

/// RPC-backed implementation
pub mod rpc;

#[cfg(test)]
pub mod memory;

pub use rpc::RpcLedger;

/// Operations the submitter needs from a ledger endpoint.
///
/// Every failure the endpoint reports comes back as `Error::Remote`.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn latest_blockhash(&self) -> Result<Hash>;

    /// Balance in lamports
    async fn balance(&self, address: &Pubkey) -> Result<u64>;

    /// `None` when the account does not exist
    async fn account(&self, address: &Pubkey) -> Result<Option<Account>>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64>;

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature>;

    /// Block until `signature` reaches the configured commitment
    async fn confirm(&self, signature: &Signature) -> Result<()>;

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature>;
}
