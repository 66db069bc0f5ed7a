//! Metaplex token-metadata instructions.
//!
//! Only the two instructions the token flows need are encoded here:
//! `CreateMetadataAccountV3` and `UpdateMetadataAccountV2`. The JSON the
//! `uri` points at is expected to be hosted already.

use borsh::BorshSerialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program};

use super::borsh_payload;
use crate::{
    address::{AccountRef, DerivedAddress, TOKEN_METADATA_PROGRAM_ID, metadata_address},
    error::{Error, Result},
};

const CREATE_METADATA_ACCOUNT_V3: u8 = 33;
const UPDATE_METADATA_ACCOUNT_V2: u8 = 15;

const MAX_NAME_LENGTH: usize = 32;
const MAX_SYMBOL_LENGTH: usize = 10;
const MAX_URI_LENGTH: usize = 200;

/// Name, symbol and off-chain JSON uri of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, uri: impl Into<String>) -> Self {
        Self { name: name.into(), symbol: symbol.into(), uri: uri.into() }
    }

    fn validate(&self) -> Result<()> {
        for (field, value, max) in [
            ("name", &self.name, MAX_NAME_LENGTH),
            ("symbol", &self.symbol, MAX_SYMBOL_LENGTH),
            ("uri", &self.uri, MAX_URI_LENGTH),
        ] {
            if value.len() > max {
                return Err(Error::InvalidInput(format!("metadata {} is longer than {} bytes", field, max)));
            }
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("metadata name must not be empty".to_string()));
        }
        Ok(())
    }

    fn data(&self) -> DataV2<'_> {
        DataV2 {
            name: &self.name,
            symbol: &self.symbol,
            uri: &self.uri,
            seller_fee_basis_points: 0,
            creators: None,
            collection: None,
            uses: None,
        }
    }
}

// Creators, collection, uses and collection details are always sent as
// `None`; the types only fix the wire layout.
#[allow(dead_code)]
#[derive(BorshSerialize)]
struct Creator {
    address: Pubkey,
    verified: bool,
    share: u8,
}

#[allow(dead_code)]
#[derive(BorshSerialize)]
struct Collection {
    verified: bool,
    key: Pubkey,
}

#[allow(dead_code)]
#[derive(BorshSerialize)]
struct Uses {
    use_method: u8,
    remaining: u64,
    total: u64,
}

#[allow(dead_code)]
#[derive(BorshSerialize)]
enum CollectionDetails {
    V1 { size: u64 },
}

#[derive(BorshSerialize)]
struct DataV2<'a> {
    name: &'a str,
    symbol: &'a str,
    uri: &'a str,
    seller_fee_basis_points: u16,
    creators: Option<Vec<Creator>>,
    collection: Option<Collection>,
    uses: Option<Uses>,
}

#[derive(BorshSerialize)]
struct CreateArgs<'a> {
    instruction: u8,
    data: DataV2<'a>,
    is_mutable: bool,
    collection_details: Option<CollectionDetails>,
}

#[derive(BorshSerialize)]
struct UpdateArgs<'a> {
    instruction: u8,
    data: Option<DataV2<'a>>,
    new_update_authority: Option<Pubkey>,
    primary_sale_happened: Option<bool>,
    is_mutable: Option<bool>,
}

/// Create the mutable metadata account of `mint`.
///
/// Accounts: metadata PDA, mint, mint authority, payer, update authority,
/// system program. The update authority signs too when it is the payer.
pub fn create_metadata(
    mint: &Pubkey,
    mint_authority: &Pubkey,
    payer: &Pubkey,
    update_authority: &Pubkey,
    metadata: &TokenMetadata,
) -> Result<(Instruction, DerivedAddress)> {
    metadata.validate()?;
    let pda = metadata_address(mint);

    let payload = borsh_payload(&CreateArgs {
        instruction: CREATE_METADATA_ACCOUNT_V3,
        data: metadata.data(),
        is_mutable: true,
        collection_details: None,
    })?;

    let update_authority_signs = update_authority == payer || update_authority == mint_authority;
    let update_authority_meta = if update_authority_signs {
        AccountRef::signer(*update_authority)
    } else {
        AccountRef::readonly(*update_authority)
    };

    let instruction = Instruction::new_with_bytes(
        TOKEN_METADATA_PROGRAM_ID,
        &payload,
        vec![
            AccountRef::writable(pda.address),
            AccountRef::readonly(*mint),
            AccountRef::signer(*mint_authority),
            AccountRef::writable_signer(*payer),
            update_authority_meta,
            AccountRef::readonly(system_program::ID),
        ],
    );
    Ok((instruction, pda))
}

/// Replace name, symbol and uri of an existing metadata account.
pub fn update_metadata(mint: &Pubkey, update_authority: &Pubkey, metadata: &TokenMetadata) -> Result<Instruction> {
    metadata.validate()?;
    let pda = metadata_address(mint);

    let payload = borsh_payload(&UpdateArgs {
        instruction: UPDATE_METADATA_ACCOUNT_V2,
        data: Some(metadata.data()),
        new_update_authority: None,
        primary_sale_happened: None,
        is_mutable: None,
    })?;

    Ok(Instruction::new_with_bytes(
        TOKEN_METADATA_PROGRAM_ID,
        &payload,
        vec![AccountRef::writable(pda.address), AccountRef::signer(*update_authority)],
    ))
}
