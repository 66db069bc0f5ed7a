//! Native student intro program: one account per (student, name) holding a
//! short introduction message.

use borsh::BorshSerialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program};

use super::borsh_payload;
use crate::{
    address::{AccountRef, DerivedAddress, derive_address},
    error::Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntroVariant {
    Add = 0,
    Update = 1,
}

#[derive(Debug, BorshSerialize)]
struct IntroPayload<'a> {
    variant: u8,
    name: &'a str,
    message: &'a str,
}

/// Intro account of `student` for `name`
pub fn intro_address(program_id: &Pubkey, student: &Pubkey, name: &str) -> Result<DerivedAddress> {
    derive_address(program_id, &[student.as_ref(), name.as_bytes()])
}

pub fn intro_payload(variant: IntroVariant, name: &str, message: &str) -> Result<Vec<u8>> {
    borsh_payload(&IntroPayload { variant: variant as u8, name, message })
}

pub fn intro_instruction(
    program_id: &Pubkey,
    student: &Pubkey,
    variant: IntroVariant,
    name: &str,
    message: &str,
) -> Result<Instruction> {
    let pda = intro_address(program_id, student, name)?;
    tracing::debug!("Student intro PDA is {}", pda.address);

    Ok(Instruction::new_with_bytes(
        *program_id,
        &intro_payload(variant, name, message)?,
        vec![
            AccountRef::signer(*student),
            AccountRef::writable(pda.address),
            AccountRef::readonly(system_program::ID),
        ],
    ))
}
