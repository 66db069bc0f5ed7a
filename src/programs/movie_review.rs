//! Native movie review program.
//!
//! Reviews live at a PDA derived from `[reviewer, title]`. The instruction
//! payload and the stored account share field order but not the leading
//! byte: instructions start with a variant, accounts with an initialized flag.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program};

use super::{borsh_payload, check_rating};
use crate::{
    address::{AccountRef, DerivedAddress, derive_address},
    error::{Error, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReviewVariant {
    Add = 0,
    Update = 1,
}

#[derive(Debug, BorshSerialize)]
struct ReviewPayload<'a> {
    variant: u8,
    title: &'a str,
    rating: u8,
    description: &'a str,
}

/// Stored review account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, BorshSerialize, BorshDeserialize)]
pub struct MovieAccount {
    pub initialized: bool,
    pub title: String,
    pub rating: u8,
    pub description: String,
}

pub fn review_address(program_id: &Pubkey, reviewer: &Pubkey, title: &str) -> Result<DerivedAddress> {
    derive_address(program_id, &[reviewer.as_ref(), title.as_bytes()])
}

pub fn review_payload(variant: ReviewVariant, title: &str, rating: u8, description: &str) -> Result<Vec<u8>> {
    check_rating(rating)?;
    borsh_payload(&ReviewPayload { variant: variant as u8, title, rating, description })
}

pub fn review_instruction(
    program_id: &Pubkey,
    reviewer: &Pubkey,
    variant: ReviewVariant,
    title: &str,
    rating: u8,
    description: &str,
) -> Result<Instruction> {
    let payload = review_payload(variant, title, rating, description)?;
    let pda = review_address(program_id, reviewer, title)?;

    Ok(Instruction::new_with_bytes(
        *program_id,
        &payload,
        vec![
            AccountRef::writable_signer(*reviewer),
            AccountRef::writable(pda.address),
            AccountRef::readonly(system_program::ID),
        ],
    ))
}

/// Decode a review account. Accounts are allocated with slack, so trailing
/// bytes after the description are ignored.
pub fn decode_review(data: &[u8]) -> Result<MovieAccount> {
    let account = MovieAccount::deserialize(&mut &data[..])
        .map_err(|e| Error::Encoding(format!("movie account: {}", e)))?;
    if !account.initialized {
        return Err(Error::Encoding("movie account is not initialized".to_string()));
    }
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_field_order() {
        let data = review_payload(ReviewVariant::Add, "Up", 5, "ok").unwrap();
        assert_eq!(data, vec![0, 2, 0, 0, 0, b'U', b'p', 5, 2, 0, 0, 0, b'o', b'k']);
    }

    #[test]
    fn test_rating_is_checked_before_anything_else() {
        let err = review_instruction(&Pubkey::new_unique(), &Pubkey::new_unique(), ReviewVariant::Add, "Up", 0, "")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_instruction_accounts() {
        let program = Pubkey::new_unique();
        let reviewer = Pubkey::new_unique();
        let ix = review_instruction(&program, &reviewer, ReviewVariant::Update, "Up", 4, "meh").unwrap();

        let (pda, _) = Pubkey::find_program_address(&[reviewer.as_ref(), b"Up"], &program);
        assert_eq!(ix.data[0], 1);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, pda);
        assert_eq!(ix.accounts[2].pubkey, system_program::ID);
    }

    #[test]
    fn test_decode_ignores_slack() {
        let stored = MovieAccount {
            initialized: true,
            title: "Up".to_string(),
            rating: 5,
            description: "great".to_string(),
        };
        let mut data = borsh::to_vec(&stored).unwrap();
        data.resize(1000, 0);

        assert_eq!(decode_review(&data).unwrap(), stored);
    }

    #[test]
    fn test_decode_rejects_empty_account() {
        assert!(decode_review(&[0u8; 64]).is_err());
        assert!(decode_review(&[]).is_err());
    }
}
