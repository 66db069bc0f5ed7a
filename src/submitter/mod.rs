//! # Transaction Submitter Module
//!
//! Builds transactions from instructions, signs them, sends them to the
//! ledger endpoint and waits for confirmation.
//!
//! ## Features
//! - Signing with a held keypair (`TransactionSubmitter`)
//! - Unsigned transactions for a connected external signer, and relay of
//!   the transactions it signs (`external`)
//! - Test-fund top-ups before submitting (`funding`)

/// Held-keypair submission
pub mod transaction;

/// Wallet (external signer) round trip
pub mod external;

/// Airdrop-if-needed
pub mod funding;

pub use external::{UnsignedTransaction, build_unsigned, submit_signed};
pub use funding::airdrop_if_needed;
pub use transaction::{TransactionSubmitter, sign};
