//! The ping program bumps a counter held in a single data account. The
//! instruction carries no payload.

use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey};

use crate::address::AccountRef;

/// Accounts for a ping: just the writable data account
pub fn ping_accounts(data_account: &Pubkey) -> Vec<AccountMeta> {
    vec![AccountRef::writable(*data_account)]
}

/// Ping payload (empty)
pub fn ping_payload() -> Vec<u8> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_shape() {
        let data = Pubkey::new_unique();
        let accounts = ping_accounts(&data);
        assert_eq!(accounts.len(), 1);
        assert!(accounts[0].is_writable && !accounts[0].is_signer);
        assert!(ping_payload().is_empty());
    }
}
