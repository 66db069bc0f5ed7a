use solana_sdk::pubkey::Pubkey;

use crate::{config::lamports_to_sol, error::Result, ledger::Ledger};

/// Request test funds for `address` when its balance is below `threshold`.
///
/// Returns the balance after any top-up, in lamports.
pub async fn airdrop_if_needed(
    ledger: &dyn Ledger,
    address: &Pubkey,
    threshold: u64,
    amount: u64,
) -> Result<u64> {
    let balance = ledger.balance(address).await?;
    tracing::info!("Current balance is {} SOL", lamports_to_sol(balance));

    if balance >= threshold {
        return Ok(balance);
    }

    tracing::info!("Airdropping {} SOL", lamports_to_sol(amount));
    let signature = ledger.request_airdrop(address, amount).await?;
    ledger.confirm(&signature).await?;

    let new_balance = ledger.balance(address).await?;
    tracing::info!("New balance is {} SOL", lamports_to_sol(new_balance));
    Ok(new_balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::memory::MemoryLedger;
    use solana_sdk::native_token::LAMPORTS_PER_SOL;

    #[tokio::test]
    async fn test_tops_up_below_threshold() {
        let ledger = MemoryLedger::new();
        let address = Pubkey::new_unique();
        ledger.fund(&address, LAMPORTS_PER_SOL / 2);

        let balance = airdrop_if_needed(&ledger, &address, LAMPORTS_PER_SOL, LAMPORTS_PER_SOL).await.unwrap();

        assert_eq!(balance, LAMPORTS_PER_SOL + LAMPORTS_PER_SOL / 2);
        assert_eq!(ledger.airdrops(), vec![(address, LAMPORTS_PER_SOL)]);
    }

    #[tokio::test]
    async fn test_skips_when_funded() {
        let ledger = MemoryLedger::new();
        let address = Pubkey::new_unique();
        ledger.fund(&address, LAMPORTS_PER_SOL);

        let balance = airdrop_if_needed(&ledger, &address, LAMPORTS_PER_SOL, LAMPORTS_PER_SOL).await.unwrap();

        assert_eq!(balance, LAMPORTS_PER_SOL);
        assert!(ledger.airdrops().is_empty());
    }
}
