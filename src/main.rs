//! # Transaction Submitter
//!
//! Builds, signs and submits transactions for a set of on-chain programs:
//! ping, student intros, native and Anchor movie reviews, a counter, SOL
//! transfers and SPL token flows.
//!
//! ## Architecture
//! - `submitter`: sign and submit with a held keypair, or build unsigned
//!   transactions for an external wallet and relay what it signs
//! - `ledger`: ledger endpoint access behind the `Ledger` trait
//! - `programs`: instruction builders and account decoders per program
//! - `address`: account references and program-derived addresses
//! - `keystore`: load or create the local signer
//! - `server` / `routes`: HTTP relay for browser wallets
//!
//! ## Environment Setup
//! Copy `.env.example` to `.env`. On first run a signer is generated and
//! appended to it as `PRIVATE_KEY=[...]`.
//!
//! ## Running
//! ```bash
//! cargo run -- ping
//! cargo run -- movie-review add --title Heat --rating 5 --description "Great"
//! cargo run -- serve
//! ```

mod address;
mod cli;
mod commands;
mod config;
mod error;
mod explorer;
mod keystore;
mod ledger;
mod programs;
mod routes;
mod server;
mod submitter;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false) // Don't show module targets for cleaner output
                .compact(),
        )
        .init();

    tracing::debug!("📦 Package: {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    if let Err(e) = commands::run(cli).await {
        tracing::error!("❌ {:#}", e);
        std::process::exit(1);
    }
}
