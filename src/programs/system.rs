use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction};

use crate::error::{Error, Result};

/// Transfer `lamports` from `from` to `to`
pub fn transfer_sol(from: &Pubkey, to: &Pubkey, lamports: u64) -> Result<Instruction> {
    if lamports == 0 {
        return Err(Error::InvalidInput("transfer amount must be positive".to_string()));
    }
    Ok(system_instruction::transfer(from, to, lamports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::system_program;

    #[test]
    fn test_transfer_accounts() {
        let from = Pubkey::new_unique();
        let to = Pubkey::new_unique();
        let ix = transfer_sol(&from, &to, 100_000_000).unwrap();

        assert_eq!(ix.program_id, system_program::ID);
        assert_eq!(ix.accounts[0].pubkey, from);
        assert!(ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[1].pubkey, to);
        assert!(ix.accounts[1].is_writable);
    }

    #[test]
    fn test_zero_transfer_rejected() {
        assert!(transfer_sol(&Pubkey::new_unique(), &Pubkey::new_unique(), 0).is_err());
    }
}
