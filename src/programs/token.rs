//! # SPL Token Flows
//!
//! Mint creation, associated token accounts, minting, transfers and burns.
//! Amounts are taken in whole tokens and scaled by the mint's decimals,
//! which are read from chain before every amount-bearing instruction.

use serde::Serialize;
use solana_sdk::{
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
};
use spl_associated_token_account::instruction::create_associated_token_account;
use spl_token::{
    instruction as token_instruction,
    state::{Account as TokenAccount, Mint},
};

use crate::{
    address::associated_token_address,
    error::{Error, Result},
    ledger::Ledger,
    programs::metadata::{TokenMetadata, create_metadata, update_metadata},
    submitter::TransactionSubmitter,
};

/// Token account balance as stored and as displayed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenBalance {
    pub address: String,
    pub amount: u64,
    pub decimals: u8,
    pub ui_amount: f64,
}

/// Create a new mint owned by the token program; returns its address.
///
/// With `metadata`, the token-metadata account is created in the same
/// transaction, with the payer as update authority.
pub async fn create_mint(
    submitter: &TransactionSubmitter,
    decimals: u8,
    mint_authority: &Pubkey,
    freeze_authority: Option<&Pubkey>,
    metadata: Option<&TokenMetadata>,
) -> Result<Pubkey> {
    let mint = Keypair::new();
    let payer = submitter.payer().pubkey();
    let lamports = submitter.ledger().minimum_balance_for_rent_exemption(Mint::LEN).await?;

    let mut instructions = vec![
        system_instruction::create_account(&payer, &mint.pubkey(), lamports, Mint::LEN as u64, &spl_token::ID),
        token_instruction::initialize_mint(&spl_token::ID, &mint.pubkey(), mint_authority, freeze_authority, decimals)
            .map_err(|e| Error::InvalidInput(e.to_string()))?,
    ];
    if let Some(metadata) = metadata {
        let (instruction, pda) = create_metadata(&mint.pubkey(), mint_authority, &payer, &payer, metadata)?;
        tracing::debug!("Token metadata account is {}", pda.address);
        instructions.push(instruction);
    }

    submitter.submit_instructions(&instructions, &[&mint]).await?;
    tracing::info!("The token mint address is {}", mint.pubkey());
    Ok(mint.pubkey())
}

/// Point the mint's metadata at a new name, symbol and uri; the payer must
/// be the update authority.
pub async fn update_token_metadata(
    submitter: &TransactionSubmitter,
    mint: &Pubkey,
    metadata: &TokenMetadata,
) -> Result<Signature> {
    let instruction = update_metadata(mint, &submitter.payer().pubkey(), metadata)?;
    submitter.submit_instructions(&[instruction], &[]).await
}

/// Associated token account of `owner` for `mint`, created when missing.
pub async fn get_or_create_token_account(
    submitter: &TransactionSubmitter,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Result<Pubkey> {
    let address = associated_token_address(owner, mint);
    if submitter.ledger().account(&address).await?.is_some() {
        tracing::debug!("Token account {} already exists", address);
        return Ok(address);
    }

    let instruction = create_associated_token_account(&submitter.payer().pubkey(), owner, mint, &spl_token::ID);
    submitter.submit_instructions(&[instruction], &[]).await?;
    tracing::info!("Created token account {}", address);
    Ok(address)
}

/// Mint `amount` whole tokens into `destination`; the payer is the mint authority.
pub async fn mint_to(
    submitter: &TransactionSubmitter,
    mint: &Pubkey,
    destination: &Pubkey,
    amount: f64,
) -> Result<Signature> {
    let decimals = mint_decimals(submitter.ledger(), mint).await?;
    let authority = submitter.payer().pubkey();
    let instruction = token_instruction::mint_to_checked(
        &spl_token::ID,
        mint,
        destination,
        &authority,
        &[],
        to_base_units(amount, decimals)?,
        decimals,
    )
    .map_err(|e| Error::InvalidInput(e.to_string()))?;

    submitter.submit_instructions(&[instruction], &[]).await
}

/// Move `amount` whole tokens between two token accounts owned by the payer.
pub async fn transfer(
    submitter: &TransactionSubmitter,
    mint: &Pubkey,
    source: &Pubkey,
    destination: &Pubkey,
    amount: f64,
) -> Result<Signature> {
    let decimals = mint_decimals(submitter.ledger(), mint).await?;
    let owner = submitter.payer().pubkey();
    let instruction = token_instruction::transfer_checked(
        &spl_token::ID,
        source,
        mint,
        destination,
        &owner,
        &[],
        to_base_units(amount, decimals)?,
        decimals,
    )
    .map_err(|e| Error::InvalidInput(e.to_string()))?;

    submitter.submit_instructions(&[instruction], &[]).await
}

/// Burn `amount` whole tokens from a token account owned by the payer.
pub async fn burn(submitter: &TransactionSubmitter, mint: &Pubkey, account: &Pubkey, amount: f64) -> Result<Signature> {
    let decimals = mint_decimals(submitter.ledger(), mint).await?;
    let owner = submitter.payer().pubkey();
    let instruction = token_instruction::burn_checked(
        &spl_token::ID,
        account,
        mint,
        &owner,
        &[],
        to_base_units(amount, decimals)?,
        decimals,
    )
    .map_err(|e| Error::InvalidInput(e.to_string()))?;

    submitter.submit_instructions(&[instruction], &[]).await
}

pub async fn mint_decimals(ledger: &dyn Ledger, mint: &Pubkey) -> Result<u8> {
    let account = ledger.account(mint).await?.ok_or(Error::AccountNotFound(*mint))?;
    let mint_state = Mint::unpack(&account.data).map_err(|e| Error::Encoding(format!("mint {}: {}", mint, e)))?;
    Ok(mint_state.decimals)
}

pub async fn token_balance(ledger: &dyn Ledger, token_account: &Pubkey) -> Result<TokenBalance> {
    let account = ledger
        .account(token_account)
        .await?
        .ok_or(Error::AccountNotFound(*token_account))?;
    let state = TokenAccount::unpack(&account.data)
        .map_err(|e| Error::Encoding(format!("token account {}: {}", token_account, e)))?;
    let decimals = mint_decimals(ledger, &state.mint).await?;

    Ok(TokenBalance {
        address: token_account.to_string(),
        amount: state.amount,
        decimals,
        ui_amount: state.amount as f64 / 10f64.powi(decimals as i32),
    })
}

/// Scale a whole-token amount to base units
pub fn to_base_units(amount: f64, decimals: u8) -> Result<u64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidInput(format!("token amount must be positive, got {}", amount)));
    }
    let scaled = (amount * 10f64.powi(decimals as i32)).round();
    if scaled < 1.0 {
        return Err(Error::InvalidInput(format!(
            "token amount {} is below the smallest unit for {} decimals",
            amount, decimals
        )));
    }
    // u64::MAX as f64 rounds up to 2^64, which is itself out of range
    if scaled >= u64::MAX as f64 {
        return Err(Error::InvalidInput(format!("token amount {} overflows", amount)));
    }
    Ok(scaled as u64)
}
