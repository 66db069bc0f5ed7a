use borsh::BorshDeserialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program};

use super::{account_discriminator, anchor_payload};
use crate::{
    address::AccountRef,
    error::{Error, Result},
};

/// Creates the counter at a fresh keypair address; both keys sign.
pub fn initialize(program_id: &Pubkey, counter: &Pubkey, user: &Pubkey) -> Result<Instruction> {
    Ok(Instruction::new_with_bytes(
        *program_id,
        &anchor_payload("initialize", &())?,
        vec![
            AccountRef::writable_signer(*counter),
            AccountRef::writable_signer(*user),
            AccountRef::readonly(system_program::ID),
        ],
    ))
}

pub fn increment(program_id: &Pubkey, counter: &Pubkey, user: &Pubkey) -> Result<Instruction> {
    update("increment", program_id, counter, user)
}

pub fn decrement(program_id: &Pubkey, counter: &Pubkey, user: &Pubkey) -> Result<Instruction> {
    update("decrement", program_id, counter, user)
}

fn update(name: &str, program_id: &Pubkey, counter: &Pubkey, user: &Pubkey) -> Result<Instruction> {
    Ok(Instruction::new_with_bytes(
        *program_id,
        &anchor_payload(name, &())?,
        vec![AccountRef::writable(*counter), AccountRef::signer(*user)],
    ))
}

/// Current count stored in a counter account
pub fn decode_count(data: &[u8]) -> Result<u64> {
    let (discriminator, mut body) = data
        .split_first_chunk::<8>()
        .ok_or_else(|| Error::Encoding("counter account too short".to_string()))?;
    if *discriminator != account_discriminator("Counter") {
        return Err(Error::Encoding("not a Counter account".to_string()));
    }
    u64::deserialize(&mut body).map_err(|e| Error::Encoding(format!("counter account: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_signers() {
        let program = Pubkey::new_unique();
        let counter = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let ix = initialize(&program, &counter, &user).unwrap();

        assert_eq!(ix.data, vec![175, 175, 109, 31, 13, 152, 155, 237]);
        assert!(ix.accounts[0].is_signer && ix.accounts[1].is_signer);
        assert_eq!(ix.accounts[2].pubkey, system_program::ID);
    }

    #[test]
    fn test_update_accounts() {
        let program = Pubkey::new_unique();
        let counter = Pubkey::new_unique();
        let user = Pubkey::new_unique();

        let inc = increment(&program, &counter, &user).unwrap();
        let dec = decrement(&program, &counter, &user).unwrap();
        assert_eq!(dec.data, vec![106, 227, 168, 59, 248, 27, 150, 101]);
        assert_ne!(inc.data, dec.data);
        assert!(inc.accounts[0].is_writable && !inc.accounts[0].is_signer);
        assert!(inc.accounts[1].is_signer && !inc.accounts[1].is_writable);
    }

    #[test]
    fn test_decode_count() {
        let mut data = account_discriminator("Counter").to_vec();
        data.extend_from_slice(&42u64.to_le_bytes());
        assert_eq!(decode_count(&data).unwrap(), 42);

        assert!(decode_count(&data[..10]).is_err());
        data[3] = 0;
        assert!(decode_count(&data).is_err());
    }
}
