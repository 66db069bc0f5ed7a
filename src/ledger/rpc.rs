use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};

use super::Ledger;
use crate::error::Result;

/// Ledger endpoint reached over JSON-RPC
pub struct RpcLedger {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcLedger {
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        tracing::debug!("Connecting to {} ({:?})", rpc_url, commitment.commitment);
        Self {
            client: RpcClient::new_with_commitment(rpc_url, commitment),
            commitment,
        }
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.client.get_latest_blockhash().await?)
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64> {
        Ok(self.client.get_balance(address).await?)
    }

    async fn account(&self, address: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await?;
        Ok(response.value)
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        Ok(self.client.get_minimum_balance_for_rent_exemption(data_len).await?)
    }

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature> {
        Ok(self.client.request_airdrop(to, lamports).await?)
    }

    async fn confirm(&self, signature: &Signature) -> Result<()> {
        self.client
            .poll_for_signature_with_commitment(signature, self.commitment)
            .await?;
        Ok(())
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        Ok(self.client.send_and_confirm_transaction(transaction).await?)
    }
}
