//! # Addresses
//!
//! Account references for instructions and the derived addresses the
//! programs expect. Derivation is a pure function of `(program, seeds)`.

use solana_sdk::{instruction::AccountMeta, pubkey, pubkey::Pubkey};

use crate::error::{Error, Result};

/// Metaplex token-metadata program
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

const MAX_SEEDS: usize = 16;
const MAX_SEED_LEN: usize = 32;

/// Shorthands for building `AccountMeta`s
pub struct AccountRef;

impl AccountRef {
    pub fn writable(address: Pubkey) -> AccountMeta {
        AccountMeta::new(address, false)
    }

    pub fn readonly(address: Pubkey) -> AccountMeta {
        AccountMeta::new_readonly(address, false)
    }

    pub fn signer(address: Pubkey) -> AccountMeta {
        AccountMeta::new_readonly(address, true)
    }

    pub fn writable_signer(address: Pubkey) -> AccountMeta {
        AccountMeta::new(address, true)
    }
}

/// Program-derived address and the bump seed that put it off the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
}

/// Derive the canonical program address for `seeds` under `program_id`.
///
/// Seed limits are checked up front so bad input surfaces as an error
/// instead of a panic inside the runtime helper.
pub fn derive_address(program_id: &Pubkey, seeds: &[&[u8]]) -> Result<DerivedAddress> {
    if seeds.len() >= MAX_SEEDS {
        return Err(Error::InvalidSeeds(format!(
            "{} seeds given, at most {} allowed next to the bump",
            seeds.len(),
            MAX_SEEDS - 1
        )));
    }
    if let Some(seed) = seeds.iter().find(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(Error::InvalidSeeds(format!(
            "seed of {} bytes exceeds {} bytes",
            seed.len(),
            MAX_SEED_LEN
        )));
    }

    let (address, bump) = Pubkey::find_program_address(seeds, program_id);
    Ok(DerivedAddress { address, bump })
}

pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(owner, mint)
}

/// Token-metadata account of `mint`
pub fn metadata_address(mint: &Pubkey) -> DerivedAddress {
    let (address, bump) = Pubkey::find_program_address(
        &[b"metadata", TOKEN_METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &TOKEN_METADATA_PROGRAM_ID,
    );
    DerivedAddress { address, bump }
}
