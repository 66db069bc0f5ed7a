use std::sync::Arc;

use anchor_client::Cluster;
use solana_sdk::{
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use crate::{
    error::{Error, Result},
    explorer,
    ledger::Ledger,
};

/// Submits transactions paid for and signed by a held keypair
pub struct TransactionSubmitter {
    ledger: Arc<dyn Ledger>,
    payer: Keypair,
    cluster: Cluster,
}

impl TransactionSubmitter {
    pub fn new(ledger: Arc<dyn Ledger>, payer: Keypair, cluster: Cluster) -> Self {
        Self { ledger, payer, cluster }
    }

    pub fn payer(&self) -> &Keypair {
        &self.payer
    }

    pub fn ledger(&self) -> &dyn Ledger {
        self.ledger.as_ref()
    }

    /// Build a single instruction for `program_id` and submit it.
    pub async fn submit(
        &self,
        program_id: Pubkey,
        accounts: Vec<AccountMeta>,
        payload: Vec<u8>,
        extra_signers: &[&Keypair],
    ) -> Result<Signature> {
        let instruction = Instruction::new_with_bytes(program_id, &payload, accounts);
        self.submit_instructions(&[instruction], extra_signers).await
    }

    /// Submit `instructions` as one transaction and wait for confirmation.
    ///
    /// The payer always signs first; `extra_signers` covers accounts such as
    /// freshly generated mints. Remote failures are passed through untouched.
    pub async fn submit_instructions(
        &self,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
    ) -> Result<Signature> {
        let mut signers: Vec<&dyn Signer> = Vec::with_capacity(extra_signers.len() + 1);
        signers.push(&self.payer);
        signers.extend(extra_signers.iter().map(|kp| *kp as &dyn Signer));

        let blockhash = self.ledger.latest_blockhash().await?;
        let transaction = sign(instructions, &self.payer.pubkey(), &signers, blockhash)?;

        tracing::debug!(
            "Submitting {} instruction(s) with {} signer(s)",
            instructions.len(),
            signers.len()
        );
        let signature = self.ledger.send_and_confirm(&transaction).await?;
        tracing::info!("Transaction {}", explorer::transaction_url(&signature, &self.cluster));
        Ok(signature)
    }
}

/// Build and sign a transaction without touching the network.
pub fn sign(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    signers: &[&dyn Signer],
    blockhash: Hash,
) -> Result<Transaction> {
    if signers.is_empty() {
        return Err(Error::NoSigners);
    }
    if instructions.is_empty() {
        return Err(Error::InvalidInput("transaction has no instructions".to_string()));
    }

    let mut transaction = Transaction::new_with_payer(instructions, Some(fee_payer));
    transaction.try_sign(signers, blockhash)?;
    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{address::AccountRef, ledger::memory::MemoryLedger};

    fn memo_like(program: Pubkey, signer: Pubkey, payload: &[u8]) -> Instruction {
        Instruction::new_with_bytes(program, payload, vec![AccountRef::signer(signer)])
    }

    #[test]
    fn test_sign_requires_signers() {
        let payer = Keypair::new();
        let ix = memo_like(Pubkey::new_unique(), payer.pubkey(), b"hi");
        let err = sign(&[ix], &payer.pubkey(), &[], Hash::new_unique()).unwrap_err();
        assert!(matches!(err, Error::NoSigners));
    }

    #[test]
    fn test_sign_rejects_missing_required_signer() {
        let payer = Keypair::new();
        let other = Keypair::new();
        let ix = memo_like(Pubkey::new_unique(), other.pubkey(), b"hi");
        let err = sign(&[ix], &payer.pubkey(), &[&payer], Hash::new_unique()).unwrap_err();
        assert!(matches!(err, Error::Signing(_)));
    }

    #[test]
    fn test_different_payloads_never_share_a_signature() {
        let payer = Keypair::new();
        let program = Pubkey::new_unique();
        let blockhash = Hash::new_unique();

        let a = sign(&[memo_like(program, payer.pubkey(), b"a")], &payer.pubkey(), &[&payer], blockhash).unwrap();
        let b = sign(&[memo_like(program, payer.pubkey(), b"b")], &payer.pubkey(), &[&payer], blockhash).unwrap();
        let a_again =
            sign(&[memo_like(program, payer.pubkey(), b"a")], &payer.pubkey(), &[&payer], blockhash).unwrap();

        assert_ne!(a.signatures[0], b.signatures[0]);
        assert_eq!(a.signatures[0], a_again.signatures[0]);
    }

    #[tokio::test]
    async fn test_submit_returns_confirmed_signature() {
        let ledger = Arc::new(MemoryLedger::new());
        let payer = Keypair::new();
        ledger.fund(&payer.pubkey(), 1_000_000);
        let submitter = TransactionSubmitter::new(ledger.clone(), payer.insecure_clone(), Cluster::Devnet);

        let program = Pubkey::new_unique();
        let signature = submitter
            .submit(program, vec![AccountRef::writable(Pubkey::new_unique())], vec![1, 2, 3], &[])
            .await
            .unwrap();

        let sent = ledger.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].signatures[0], signature);
        assert_eq!(sent[0].message.account_keys[0], payer.pubkey());
        assert_eq!(sent[0].message.instructions[0].data, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_replayed_transaction_is_rejected() {
        let ledger = Arc::new(MemoryLedger::new());
        let payer = Keypair::new();
        ledger.fund(&payer.pubkey(), 1_000_000);
        let submitter = TransactionSubmitter::new(ledger.clone(), payer.insecure_clone(), Cluster::Devnet);

        let program = Pubkey::new_unique();
        let account = Pubkey::new_unique();
        submitter.submit(program, vec![AccountRef::writable(account)], vec![9], &[]).await.unwrap();
        let err = submitter
            .submit(program, vec![AccountRef::writable(account)], vec![9], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote(_)));

        // A different payload goes through with a fresh identifier
        let other = submitter.submit(program, vec![AccountRef::writable(account)], vec![10], &[]).await.unwrap();
        assert_eq!(ledger.sent().len(), 2);
        assert_ne!(ledger.sent()[0].signatures[0], other);
    }

    #[tokio::test]
    async fn test_remote_failure_is_surfaced_opaquely() {
        let ledger = Arc::new(MemoryLedger::new());
        let payer = Keypair::new();
        let submitter = TransactionSubmitter::new(ledger.clone(), payer, Cluster::Devnet);

        // Unfunded payer
        let err = submitter
            .submit(Pubkey::new_unique(), vec![], vec![], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote(_)));

        ledger.fund(&submitter.payer().pubkey(), 1_000_000);
        ledger.reject_next("custom program error: 0x1");
        let err = submitter.submit(Pubkey::new_unique(), vec![], vec![], &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "remote ledger error: custom program error: 0x1");
    }

    #[tokio::test]
    async fn test_extra_signers_sign_after_payer() {
        let ledger = Arc::new(MemoryLedger::new());
        let payer = Keypair::new();
        ledger.fund(&payer.pubkey(), 1_000_000);
        let submitter = TransactionSubmitter::new(ledger.clone(), payer.insecure_clone(), Cluster::Devnet);

        let extra = Keypair::new();
        submitter
            .submit(Pubkey::new_unique(), vec![AccountRef::writable_signer(extra.pubkey())], vec![], &[&extra])
            .await
            .unwrap();

        let sent = &ledger.sent()[0];
        assert_eq!(sent.signatures.len(), 2);
        assert_eq!(sent.message.account_keys[1], extra.pubkey());
    }
}
