//! Command-line interface definitions

use std::path::PathBuf;

use anchor_client::Cluster;
use clap::{Args, Parser, Subcommand};
use solana_sdk::pubkey::Pubkey;

use crate::programs::metadata::TokenMetadata;

/// Build, sign and submit transactions to a Solana cluster
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Cluster to talk to: devnet, testnet, mainnet, localnet or an RPC url.
    /// Without it, `SOLANA_CLUSTER` and `SOLANA_RPC_URL` apply
    #[arg(short, long, global = true)]
    pub cluster: Option<Cluster>,

    /// RPC url overriding the cluster's public endpoint
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// JSON keypair file to sign with (generated when missing)
    #[arg(short, long, global = true)]
    pub keypair: Option<PathBuf>,

    /// Never request test funds before submitting
    #[arg(long, global = true)]
    pub no_airdrop: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the signer's address and SOL balance
    Balance {
        /// Address to query instead of the signer
        address: Option<Pubkey>,
    },
    /// Request test funds
    Airdrop {
        #[arg(long, default_value_t = 1.0)]
        sol: f64,
        /// Recipient instead of the signer
        address: Option<Pubkey>,
    },
    /// Ping the ping program
    Ping,
    /// Transfer SOL to another address
    TransferSol {
        #[arg(long)]
        to: Pubkey,
        #[arg(long)]
        sol: f64,
    },
    /// Write or update a student intro
    StudentIntro {
        #[arg(long)]
        name: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        update: bool,
    },
    /// Native movie review program
    #[command(subcommand)]
    MovieReview(ReviewCommand),
    /// Anchor movie review program
    #[command(subcommand)]
    AnchorMovieReview(ReviewCommand),
    /// Anchor counter program
    #[command(subcommand)]
    Counter(CounterCommand),
    /// SPL token operations
    #[command(subcommand)]
    Token(TokenCommand),
    /// Derive a program address from seeds
    Pda {
        #[arg(long)]
        program: Pubkey,
        /// Seeds in order; `pubkey:<base58>` for a key, anything else as UTF-8
        seeds: Vec<String>,
    },
    /// Serve the HTTP relay for browser wallets
    Serve,
}

#[derive(Debug, Args)]
pub struct ReviewArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub rating: u8,
    #[arg(long)]
    pub description: String,
}

#[derive(Debug, Subcommand)]
pub enum ReviewCommand {
    /// Create a review
    Add(ReviewArgs),
    /// Update an existing review
    Update(ReviewArgs),
    /// Close a review (Anchor program only)
    Close {
        #[arg(long)]
        title: String,
    },
    /// Fetch and decode a review
    Show {
        #[arg(long)]
        title: String,
        /// Reviewer instead of the signer
        #[arg(long)]
        reviewer: Option<Pubkey>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CounterCommand {
    /// Create a new counter account
    Init,
    Increment {
        #[arg(long)]
        counter: Pubkey,
    },
    Decrement {
        #[arg(long)]
        counter: Pubkey,
    },
    Show {
        #[arg(long)]
        counter: Pubkey,
    },
}

/// On-chain token metadata; the uri must point at already hosted JSON
#[derive(Debug, Args)]
pub struct MetadataArgs {
    #[arg(long, requires_all = ["symbol", "uri"])]
    pub name: Option<String>,
    #[arg(long, requires_all = ["name", "uri"])]
    pub symbol: Option<String>,
    #[arg(long, requires_all = ["name", "symbol"])]
    pub uri: Option<String>,
}

impl MetadataArgs {
    pub fn into_metadata(self) -> Option<TokenMetadata> {
        match (self.name, self.symbol, self.uri) {
            (Some(name), Some(symbol), Some(uri)) => Some(TokenMetadata::new(name, symbol, uri)),
            _ => None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Create a mint with the signer as mint and freeze authority
    CreateMint {
        #[arg(long, default_value_t = 2)]
        decimals: u8,
        #[command(flatten)]
        metadata: MetadataArgs,
    },
    /// Replace the name, symbol and uri of a mint's metadata
    UpdateMetadata {
        #[arg(long)]
        mint: Pubkey,
        #[command(flatten)]
        metadata: MetadataArgs,
    },
    /// Get or create the associated token account for a mint
    CreateAccount {
        #[arg(long)]
        mint: Pubkey,
        #[arg(long)]
        owner: Option<Pubkey>,
    },
    /// Mint whole tokens to an owner's associated account
    Mint {
        #[arg(long)]
        mint: Pubkey,
        #[arg(long)]
        amount: f64,
        /// Owner of the receiving account instead of the signer
        #[arg(long)]
        to: Option<Pubkey>,
    },
    /// Transfer whole tokens from the signer to another owner
    Transfer {
        #[arg(long)]
        mint: Pubkey,
        #[arg(long)]
        to: Pubkey,
        #[arg(long)]
        amount: f64,
    },
    /// Burn whole tokens from the signer's account
    Burn {
        #[arg(long)]
        mint: Pubkey,
        #[arg(long)]
        amount: f64,
    },
    /// Show the balance of an owner's associated account
    Balance {
        #[arg(long)]
        mint: Pubkey,
        #[arg(long)]
        owner: Option<Pubkey>,
    },
    /// Derive the token-metadata account of a mint
    MetadataAddress {
        #[arg(long)]
        mint: Pubkey,
    },
}

impl Command {
    /// Whether the command sends transactions paid by the signer
    pub fn submits(&self) -> bool {
        !matches!(
            self,
            Command::Balance { .. }
                | Command::Airdrop { .. }
                | Command::Pda { .. }
                | Command::Serve
                | Command::MovieReview(ReviewCommand::Show { .. })
                | Command::AnchorMovieReview(ReviewCommand::Show { .. })
                | Command::Counter(CounterCommand::Show { .. })
                | Command::Token(TokenCommand::Balance { .. })
                | Command::Token(TokenCommand::MetadataAddress { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_review_add() {
        let cli = Cli::try_parse_from([
            "tx-submitter",
            "--cluster",
            "localnet",
            "movie-review",
            "add",
            "--title",
            "Up",
            "--rating",
            "5",
            "--description",
            "great",
        ])
        .unwrap();

        assert!(matches!(cli.cluster, Some(Cluster::Localnet)));
        match cli.command {
            Command::MovieReview(ReviewCommand::Add(args)) => {
                assert_eq!(args.title, "Up");
                assert_eq!(args.rating, 5);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_create_mint_metadata_flags() {
        let cli = Cli::try_parse_from([
            "tx-submitter", "token", "create-mint", "--name", "ShipoorCoin", "--symbol", "SHPR", "--uri",
            "https://example.com/shpr.json",
        ])
        .unwrap();
        match cli.command {
            Command::Token(TokenCommand::CreateMint { decimals, metadata }) => {
                assert_eq!(decimals, 2);
                assert_eq!(metadata.into_metadata().unwrap().symbol, "SHPR");
            }
            other => panic!("unexpected command {:?}", other),
        }

        let partial = Cli::try_parse_from(["tx-submitter", "token", "create-mint", "--name", "ShipoorCoin"]);
        assert!(partial.is_err());

        let cli = Cli::try_parse_from(["tx-submitter", "token", "create-mint"]).unwrap();
        match cli.command {
            Command::Token(TokenCommand::CreateMint { metadata, .. }) => assert!(metadata.into_metadata().is_none()),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_read_only_commands_do_not_submit() {
        let cli = Cli::try_parse_from(["tx-submitter", "balance"]).unwrap();
        assert!(!cli.command.submits());
        let cli = Cli::try_parse_from(["tx-submitter", "ping"]).unwrap();
        assert!(cli.command.submits());
    }
}
