//! # Program Clients
//!
//! Instruction builders for the on-chain programs this tool drives, and
//! decoders for the accounts they write.
//!
//! - `system`: SOL transfers
//! - `ping`: the ping counter program
//! - `student_intro`: native student intro program
//! - `movie_review`: native movie review program
//! - `anchor_movie_review`: Anchor rewrite of the movie review program
//! - `counter`: Anchor counter program
//! - `token`: SPL token mint/account/transfer/burn flows
//! - `metadata`: Metaplex token-metadata create/update

use borsh::BorshSerialize;
use solana_sdk::hash::hash;

use crate::error::{Error, Result};

pub mod anchor_movie_review;
pub mod counter;
pub mod metadata;
pub mod movie_review;
pub mod ping;
pub mod student_intro;
pub mod system;
pub mod token;

/// First 8 bytes of `sha256("global:<name>")`
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    sighash("global", name)
}

/// First 8 bytes of `sha256("account:<Name>")`
pub fn account_discriminator(name: &str) -> [u8; 8] {
    sighash("account", name)
}

fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    let preimage = format!("{}:{}", namespace, name);
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    out
}

/// Discriminator followed by the Borsh encoding of `args`
pub fn anchor_payload<T: BorshSerialize>(name: &str, args: &T) -> Result<Vec<u8>> {
    let mut data = instruction_discriminator(name).to_vec();
    args.serialize(&mut data).map_err(|e| Error::Encoding(e.to_string()))?;
    Ok(data)
}

pub fn borsh_payload<T: BorshSerialize>(value: &T) -> Result<Vec<u8>> {
    borsh::to_vec(value).map_err(|e| Error::Encoding(e.to_string()))
}

/// Ratings the review programs accept
pub fn check_rating(rating: u8) -> Result<()> {
    if !(1..=5).contains(&rating) {
        return Err(Error::InvalidInput(format!("rating must be between 1 and 5, got {}", rating)));
    }
    Ok(())
}
