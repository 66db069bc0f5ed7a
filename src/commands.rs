//! # Commands
//!
//! One handler per CLI subcommand. Each handler is a short, linear sequence:
//! build instructions, submit through the `TransactionSubmitter`, log the
//! explorer link.

use std::{str::FromStr, sync::Arc};

use anchor_client::Cluster;
use anyhow::{Context, Result, anyhow, bail};
use serde_json::json;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

use crate::{
    address::{associated_token_address, derive_address, metadata_address},
    cli::{Cli, Command, CounterCommand, ReviewCommand, TokenCommand},
    config::{Config, lamports_to_sol, sol_to_lamports},
    explorer,
    keystore::{self, KeySource},
    ledger::{Ledger, RpcLedger},
    programs::{
        anchor_movie_review, counter, movie_review, ping,
        student_intro::{self, IntroVariant},
        system, token,
    },
    server,
    submitter::{TransactionSubmitter, airdrop_if_needed},
};

/// Run the parsed command line to completion.
pub async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    tracing::info!("🌐 Cluster: {} ({})", cluster_name(&config.cluster), config.rpc_url);

    if let Command::Serve = cli.command {
        return server::start(config).await;
    }

    let ledger: Arc<dyn Ledger> = Arc::new(RpcLedger::new(config.rpc_url.clone(), config.commitment));
    let payer = keystore::load_or_generate(&config.key_source).context("failed to load signer keypair")?;
    tracing::info!("Public Key: {}", payer.pubkey());

    if cli.command.submits() && !cli.no_airdrop && !matches!(config.cluster, Cluster::Mainnet) {
        airdrop_if_needed(
            ledger.as_ref(),
            &payer.pubkey(),
            config.airdrop.threshold_lamports,
            config.airdrop.amount_lamports,
        )
        .await
        .context("failed to fund signer")?;
    }

    let submitter = TransactionSubmitter::new(ledger, payer, config.cluster.clone());
    dispatch(cli.command, &config, &submitter).await
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    apply_overrides(Config::from_env()?, cli)
}

/// Flags win over the environment. `--url` alone keeps the configured
/// cluster; `--cluster` alone switches to that cluster's public endpoint.
fn apply_overrides(mut config: Config, cli: &Cli) -> Result<Config> {
    match (&cli.cluster, &cli.url) {
        (Some(cluster), url) => config = config.with_cluster(cluster.clone(), url.clone())?,
        (None, Some(url)) => {
            let cluster = config.cluster.clone();
            config = config.with_cluster(cluster, Some(url.clone()))?;
        }
        (None, None) => {}
    }
    if let Some(path) = &cli.keypair {
        config.key_source = KeySource::KeypairFile(path.clone());
    }
    Ok(config)
}

async fn dispatch(command: Command, config: &Config, submitter: &TransactionSubmitter) -> Result<()> {
    let signer = submitter.payer().pubkey();
    let ledger = submitter.ledger();

    match command {
        Command::Balance { address } => {
            let address = address.unwrap_or(signer);
            let lamports = ledger.balance(&address).await?;
            print_json(&json!({ "address": address.to_string(), "lamports": lamports, "sol": lamports_to_sol(lamports) }));
        }

        Command::Airdrop { sol, address } => {
            if matches!(config.cluster, Cluster::Mainnet) {
                bail!("airdrops are not available on mainnet");
            }
            let address = address.unwrap_or(signer);
            let signature = ledger.request_airdrop(&address, sol_to_lamports(sol)).await?;
            ledger.confirm(&signature).await?;
            tracing::info!("Airdrop {}", explorer::transaction_url(&signature, &config.cluster));
            tracing::info!("New balance is {} SOL", lamports_to_sol(ledger.balance(&address).await?));
        }

        Command::Ping => {
            submitter
                .submit(
                    config.programs.ping,
                    ping::ping_accounts(&config.programs.ping_data),
                    ping::ping_payload(),
                    &[],
                )
                .await?;
        }

        Command::TransferSol { to, sol } => {
            let instruction = system::transfer_sol(&signer, &to, sol_to_lamports(sol))?;
            submitter.submit_instructions(&[instruction], &[]).await?;
        }

        Command::StudentIntro { name, message, update } => {
            let program = config.student_intro_program()?;
            let variant = if update { IntroVariant::Update } else { IntroVariant::Add };
            let instruction = student_intro::intro_instruction(&program, &signer, variant, &name, &message)?;
            submitter.submit_instructions(&[instruction], &[]).await?;
        }

        Command::MovieReview(review) => native_review(review, config, submitter).await?,

        Command::AnchorMovieReview(review) => anchor_review(review, config, submitter).await?,

        Command::Counter(command) => counter_command(command, config, submitter).await?,

        Command::Token(command) => token_command(command, config, submitter).await?,

        Command::Pda { program, seeds } => {
            let seeds = seeds.iter().map(|seed| parse_seed(seed)).collect::<Result<Vec<_>>>()?;
            let refs: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
            let derived = derive_address(&program, &refs)?;
            print_json(&json!({ "address": derived.address.to_string(), "bump": derived.bump }));
        }

        Command::Serve => bail!("serve runs without a signer"),
    }
    Ok(())
}

async fn native_review(command: ReviewCommand, config: &Config, submitter: &TransactionSubmitter) -> Result<()> {
    let program = config.programs.movie_review;
    let signer = submitter.payer().pubkey();

    let instruction = match command {
        ReviewCommand::Add(args) => movie_review::review_instruction(
            &program,
            &signer,
            movie_review::ReviewVariant::Add,
            &args.title,
            args.rating,
            &args.description,
        )?,
        ReviewCommand::Update(args) => movie_review::review_instruction(
            &program,
            &signer,
            movie_review::ReviewVariant::Update,
            &args.title,
            args.rating,
            &args.description,
        )?,
        ReviewCommand::Close { .. } => bail!("the native movie review program has no close instruction"),
        ReviewCommand::Show { title, reviewer } => {
            let reviewer = reviewer.unwrap_or(signer);
            let pda = movie_review::review_address(&program, &reviewer, &title)?;
            let account = fetch_data(submitter.ledger(), &pda.address).await?;
            print_json(&movie_review::decode_review(&account)?);
            return Ok(());
        }
    };

    submitter.submit_instructions(&[instruction], &[]).await?;
    Ok(())
}

async fn anchor_review(command: ReviewCommand, config: &Config, submitter: &TransactionSubmitter) -> Result<()> {
    let program = config.programs.anchor_movie_review;
    let signer = submitter.payer().pubkey();

    let instruction = match command {
        ReviewCommand::Add(args) => {
            anchor_movie_review::add_review(&program, &signer, &args.title, &args.description, args.rating)?
        }
        ReviewCommand::Update(args) => {
            anchor_movie_review::update_review(&program, &signer, &args.title, &args.description, args.rating)?
        }
        ReviewCommand::Close { title } => anchor_movie_review::close_review(&program, &signer, &title)?,
        ReviewCommand::Show { title, reviewer } => {
            let reviewer = reviewer.unwrap_or(signer);
            let pda = anchor_movie_review::review_address(&program, &reviewer, &title)?;
            let account = fetch_data(submitter.ledger(), &pda.address).await?;
            let view = anchor_movie_review::ReviewView::from(anchor_movie_review::decode_review(&account)?);
            print_json(&view);
            return Ok(());
        }
    };

    submitter.submit_instructions(&[instruction], &[]).await?;
    Ok(())
}

async fn counter_command(command: CounterCommand, config: &Config, submitter: &TransactionSubmitter) -> Result<()> {
    let program = config.programs.counter;
    let signer = submitter.payer().pubkey();

    match command {
        CounterCommand::Init => {
            let account = Keypair::new();
            let instruction = counter::initialize(&program, &account.pubkey(), &signer)?;
            submitter.submit_instructions(&[instruction], &[&account]).await?;
            tracing::info!("Counter account {}", explorer::address_url(&account.pubkey(), &config.cluster));
        }
        CounterCommand::Increment { counter: address } => {
            let instruction = counter::increment(&program, &address, &signer)?;
            submitter.submit_instructions(&[instruction], &[]).await?;
        }
        CounterCommand::Decrement { counter: address } => {
            let instruction = counter::decrement(&program, &address, &signer)?;
            submitter.submit_instructions(&[instruction], &[]).await?;
        }
        CounterCommand::Show { counter: address } => {
            let data = fetch_data(submitter.ledger(), &address).await?;
            print_json(&json!({ "counter": address.to_string(), "count": counter::decode_count(&data)? }));
        }
    }
    Ok(())
}

async fn token_command(command: TokenCommand, config: &Config, submitter: &TransactionSubmitter) -> Result<()> {
    let signer = submitter.payer().pubkey();

    match command {
        TokenCommand::CreateMint { decimals, metadata } => {
            let metadata = metadata.into_metadata();
            let mint = token::create_mint(submitter, decimals, &signer, Some(&signer), metadata.as_ref()).await?;
            tracing::info!("Token Mint: {}", explorer::address_url(&mint, &config.cluster));
            if metadata.is_some() {
                tracing::info!("Token Metadata: {}", explorer::address_url(&metadata_address(&mint).address, &config.cluster));
            }
        }
        TokenCommand::UpdateMetadata { mint, metadata } => {
            let metadata = metadata
                .into_metadata()
                .ok_or_else(|| anyhow!("--name, --symbol and --uri are required"))?;
            token::update_token_metadata(submitter, &mint, &metadata).await?;
        }
        TokenCommand::CreateAccount { mint, owner } => {
            let account = token::get_or_create_token_account(submitter, &mint, &owner.unwrap_or(signer)).await?;
            tracing::info!("Token Account: {}", explorer::address_url(&account, &config.cluster));
        }
        TokenCommand::Mint { mint, amount, to } => {
            let destination = token::get_or_create_token_account(submitter, &mint, &to.unwrap_or(signer)).await?;
            token::mint_to(submitter, &mint, &destination, amount).await?;
        }
        TokenCommand::Transfer { mint, to, amount } => {
            let source = associated_token_address(&signer, &mint);
            let destination = token::get_or_create_token_account(submitter, &mint, &to).await?;
            token::transfer(submitter, &mint, &source, &destination, amount).await?;
        }
        TokenCommand::Burn { mint, amount } => {
            let account = associated_token_address(&signer, &mint);
            token::burn(submitter, &mint, &account, amount).await?;
        }
        TokenCommand::Balance { mint, owner } => {
            let account = associated_token_address(&owner.unwrap_or(signer), &mint);
            print_json(&token::token_balance(submitter.ledger(), &account).await?);
        }
        TokenCommand::MetadataAddress { mint } => {
            let derived = metadata_address(&mint);
            print_json(&json!({ "mint": mint.to_string(), "metadata": derived.address.to_string(), "bump": derived.bump }));
        }
    }
    Ok(())
}

async fn fetch_data(ledger: &dyn Ledger, address: &Pubkey) -> Result<Vec<u8>> {
    let account = ledger
        .account(address)
        .await?
        .ok_or_else(|| anyhow!("account {} does not exist", address))?;
    Ok(account.data)
}

/// `pubkey:<base58>` is a 32-byte key seed, anything else is taken as UTF-8
fn parse_seed(seed: &str) -> Result<Vec<u8>> {
    match seed.strip_prefix("pubkey:") {
        Some(key) => Ok(Pubkey::from_str(key)
            .with_context(|| format!("invalid pubkey seed '{}'", key))?
            .to_bytes()
            .to_vec()),
        None => Ok(seed.as_bytes().to_vec()),
    }
}

fn cluster_name(cluster: &Cluster) -> &'static str {
    match cluster {
        Cluster::Mainnet => "mainnet",
        Cluster::Devnet => "devnet",
        Cluster::Testnet => "testnet",
        Cluster::Localnet => "localnet",
        _ => "custom",
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => tracing::warn!("Failed to render output: {}", e),
    }
}
