//! Configuration module for environment variables and application settings

use std::{env, path::PathBuf, str::FromStr};

use anchor_client::Cluster;
use anyhow::{Context, Result, anyhow};
use solana_sdk::{commitment_config::CommitmentConfig, native_token::LAMPORTS_PER_SOL, pubkey, pubkey::Pubkey};

use crate::{error::Error, keystore::KeySource};

/// Devnet program the ping scripts talk to
pub const DEFAULT_PING_PROGRAM_ID: Pubkey = pubkey!("ChT1B39WKLS8qUrkLvFDXMhEJ4F1XZzwUNHUt4AU9aVa");
pub const DEFAULT_PING_DATA_ACCOUNT: Pubkey = pubkey!("Ah9K7dQ8EHaZqcAsgBW8w37yN2eAy3koFmUn4x3CJtod");
pub const DEFAULT_MOVIE_REVIEW_PROGRAM_ID: Pubkey = pubkey!("CenYq6bDRB7p73EjsPEpiYN7uveyPUTdXkDkgUduboaN");
pub const DEFAULT_ANCHOR_MOVIE_REVIEW_PROGRAM_ID: Pubkey = pubkey!("7iTggggVhJfZmP2qSUtmAdvU46uGshgXQaWAetcv7gwo");
pub const DEFAULT_COUNTER_PROGRAM_ID: Pubkey = pubkey!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[derive(Debug, Clone)]
pub struct Config {
    /// Cluster the ledger endpoint belongs to (drives explorer links too)
    pub cluster: Cluster,

    /// RPC endpoint; defaults to the cluster's public URL
    pub rpc_url: String,

    pub commitment: CommitmentConfig,

    /// Where the fee payer's key material lives
    pub key_source: KeySource,

    pub airdrop: AirdropConfig,

    pub server: ServerConfig,

    pub programs: ProgramIds,
}

#[derive(Debug, Clone)]
pub struct AirdropConfig {
    /// Request funds when the balance drops below this many lamports
    pub threshold_lamports: u64,
    pub amount_lamports: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Frontend origins allowed by CORS
    pub cors_origins: Vec<String>,
}

/// On-chain programs the builders target
#[derive(Debug, Clone)]
pub struct ProgramIds {
    pub ping: Pubkey,
    pub ping_data: Pubkey,
    /// No usable default exists for this one
    pub student_intro: Option<Pubkey>,
    pub movie_review: Pubkey,
    pub anchor_movie_review: Pubkey,
    pub counter: Pubkey,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let cluster = match env::var("SOLANA_CLUSTER") {
            Ok(value) => Cluster::from_str(&value)
                .map_err(|e| anyhow!("invalid SOLANA_CLUSTER '{}': {}", value, e))?,
            Err(_) => Cluster::Devnet,
        };

        let rpc_url = env::var("SOLANA_RPC_URL").unwrap_or_else(|_| cluster.url().to_string());
        url::Url::parse(&rpc_url).with_context(|| format!("invalid RPC url '{}'", rpc_url))?;

        let commitment = CommitmentConfig::from_str(
            &env::var("COMMITMENT").unwrap_or_else(|_| "confirmed".to_string()),
        )
        .map_err(|_| anyhow!("COMMITMENT must be processed, confirmed or finalized"))?;

        let key_source = match env::var("KEYPAIR_PATH") {
            Ok(path) => KeySource::KeypairFile(PathBuf::from(path)),
            Err(_) => KeySource::EnvFile {
                path: PathBuf::from(env::var("ENV_FILE").unwrap_or_else(|_| ".env".to_string())),
                var: env::var("PRIVATE_KEY_VAR").unwrap_or_else(|_| "PRIVATE_KEY".to_string()),
            },
        };

        Ok(Self {
            cluster,
            rpc_url,
            commitment,
            key_source,

            airdrop: AirdropConfig {
                threshold_lamports: sol_to_lamports(
                    env::var("AIRDROP_THRESHOLD_SOL")
                        .unwrap_or_else(|_| "1".to_string())
                        .parse()
                        .unwrap_or(1.0),
                ),
                amount_lamports: sol_to_lamports(
                    env::var("AIRDROP_AMOUNT_SOL")
                        .unwrap_or_else(|_| "1".to_string())
                        .parse()
                        .unwrap_or(1.0),
                ),
            },

            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
                cors_origins: env::var("CORS_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3001".to_string())
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect(),
            },

            programs: ProgramIds {
                ping: pubkey_var("PING_PROGRAM_ID")?.unwrap_or(DEFAULT_PING_PROGRAM_ID),
                ping_data: pubkey_var("PING_DATA_ACCOUNT")?.unwrap_or(DEFAULT_PING_DATA_ACCOUNT),
                student_intro: pubkey_var("STUDENT_INTRO_PROGRAM_ID")?,
                movie_review: pubkey_var("MOVIE_REVIEW_PROGRAM_ID")?
                    .unwrap_or(DEFAULT_MOVIE_REVIEW_PROGRAM_ID),
                anchor_movie_review: pubkey_var("ANCHOR_MOVIE_REVIEW_PROGRAM_ID")?
                    .unwrap_or(DEFAULT_ANCHOR_MOVIE_REVIEW_PROGRAM_ID),
                counter: pubkey_var("COUNTER_PROGRAM_ID")?.unwrap_or(DEFAULT_COUNTER_PROGRAM_ID),
            },
        })
    }

    /// Replace the cluster, keeping an explicit RPC url override only if the
    /// caller passes one
    pub fn with_cluster(mut self, cluster: Cluster, rpc_url: Option<String>) -> Result<Self> {
        self.rpc_url = rpc_url.unwrap_or_else(|| cluster.url().to_string());
        url::Url::parse(&self.rpc_url).with_context(|| format!("invalid RPC url '{}'", self.rpc_url))?;
        self.cluster = cluster;
        Ok(self)
    }

    pub fn student_intro_program(&self) -> crate::error::Result<Pubkey> {
        self.programs.student_intro.ok_or_else(|| {
            Error::InvalidInput("STUDENT_INTRO_PROGRAM_ID environment variable is required".to_string())
        })
    }
}

fn pubkey_var(name: &str) -> Result<Option<Pubkey>> {
    match env::var(name) {
        Ok(value) => Pubkey::from_str(value.trim())
            .map(Some)
            .with_context(|| format!("{} is not a valid public key", name)),
        Err(_) => Ok(None),
    }
}

pub fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64) as u64
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sol_conversions() {
        assert_eq!(sol_to_lamports(1.0), LAMPORTS_PER_SOL);
        assert_eq!(sol_to_lamports(0.1), 100_000_000);
        assert_eq!(lamports_to_sol(2_500_000_000), 2.5);
    }

    #[test]
    fn test_with_cluster_uses_cluster_url() {
        let config = Config {
            cluster: Cluster::Devnet,
            rpc_url: Cluster::Devnet.url().to_string(),
            commitment: CommitmentConfig::confirmed(),
            key_source: KeySource::KeypairFile(PathBuf::from("id.json")),
            airdrop: AirdropConfig { threshold_lamports: 0, amount_lamports: 0 },
            server: ServerConfig { host: "127.0.0.1".into(), port: 3000, cors_origins: vec![] },
            programs: ProgramIds {
                ping: DEFAULT_PING_PROGRAM_ID,
                ping_data: DEFAULT_PING_DATA_ACCOUNT,
                student_intro: None,
                movie_review: DEFAULT_MOVIE_REVIEW_PROGRAM_ID,
                anchor_movie_review: DEFAULT_ANCHOR_MOVIE_REVIEW_PROGRAM_ID,
                counter: DEFAULT_COUNTER_PROGRAM_ID,
            },
        };

        let config = config.with_cluster(Cluster::Localnet, None).unwrap();
        assert_eq!(config.rpc_url, "http://127.0.0.1:8899");
        assert!(config.student_intro_program().is_err());

        assert!(config.with_cluster(Cluster::Devnet, Some("not a url".into())).is_err());
    }
}
