//! Anchor movie review program.
//!
//! Same idea as the native program, but reviews are keyed by
//! `[title, initializer]` and every instruction/account is prefixed with an
//! Anchor discriminator.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program};

use super::{account_discriminator, anchor_payload, check_rating};
use crate::{
    address::{AccountRef, DerivedAddress, derive_address},
    error::{Error, Result},
};

#[derive(BorshSerialize)]
struct ReviewArgs<'a> {
    title: &'a str,
    description: &'a str,
    rating: u8,
}

/// On-chain `MovieAccountState`
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MovieAccountState {
    pub reviewer: Pubkey,
    pub rating: u8,
    pub title: String,
    pub description: String,
}

/// JSON view of a review
#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub reviewer: String,
    pub rating: u8,
    pub title: String,
    pub description: String,
}

impl From<MovieAccountState> for ReviewView {
    fn from(state: MovieAccountState) -> Self {
        Self {
            reviewer: state.reviewer.to_string(),
            rating: state.rating,
            title: state.title,
            description: state.description,
        }
    }
}

pub fn review_address(program_id: &Pubkey, initializer: &Pubkey, title: &str) -> Result<DerivedAddress> {
    derive_address(program_id, &[title.as_bytes(), initializer.as_ref()])
}

pub fn add_review(
    program_id: &Pubkey,
    initializer: &Pubkey,
    title: &str,
    description: &str,
    rating: u8,
) -> Result<Instruction> {
    review_instruction("add_movie_review", program_id, initializer, title, description, rating)
}

pub fn update_review(
    program_id: &Pubkey,
    initializer: &Pubkey,
    title: &str,
    description: &str,
    rating: u8,
) -> Result<Instruction> {
    review_instruction("update_movie_review", program_id, initializer, title, description, rating)
}

/// Close the review and return its rent to `reviewer`
pub fn close_review(program_id: &Pubkey, reviewer: &Pubkey, title: &str) -> Result<Instruction> {
    let pda = review_address(program_id, reviewer, title)?;
    Ok(Instruction::new_with_bytes(
        *program_id,
        &anchor_payload("close", &())?,
        vec![AccountRef::writable(pda.address), AccountRef::writable_signer(*reviewer)],
    ))
}

fn review_instruction(
    name: &str,
    program_id: &Pubkey,
    initializer: &Pubkey,
    title: &str,
    description: &str,
    rating: u8,
) -> Result<Instruction> {
    check_rating(rating)?;
    let pda = review_address(program_id, initializer, title)?;

    Ok(Instruction::new_with_bytes(
        *program_id,
        &anchor_payload(name, &ReviewArgs { title, description, rating })?,
        vec![
            AccountRef::writable(pda.address),
            AccountRef::writable_signer(*initializer),
            AccountRef::readonly(system_program::ID),
        ],
    ))
}

pub fn decode_review(data: &[u8]) -> Result<MovieAccountState> {
    let (discriminator, mut body) = data
        .split_first_chunk::<8>()
        .ok_or_else(|| Error::Encoding("movie review account too short".to_string()))?;
    if *discriminator != account_discriminator("MovieAccountState") {
        return Err(Error::Encoding("not a MovieAccountState account".to_string()));
    }
    MovieAccountState::deserialize(&mut body).map_err(|e| Error::Encoding(format!("movie review account: {}", e)))
}
