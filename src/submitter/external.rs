//! Transactions signed by a connected wallet.
//!
//! The wallet holds the key, so the round trip is split in two: build an
//! unsigned transaction with the wallet as fee payer, then relay whatever the
//! wallet signed back to the ledger.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Signature, transaction::Transaction};

use crate::{
    error::{Error, Result},
    ledger::Ledger,
};

/// Unsigned transaction handed to an external signer
#[derive(Debug, Clone, Serialize)]
pub struct UnsignedTransaction {
    /// Base64 encoded bincode transaction
    pub transaction: String,
    pub recent_blockhash: String,
    /// Keys the wallet must produce signatures for, fee payer first
    pub signers: Vec<String>,
}

pub async fn build_unsigned(
    ledger: &dyn Ledger,
    fee_payer: &Pubkey,
    instructions: &[Instruction],
) -> Result<UnsignedTransaction> {
    if instructions.is_empty() {
        return Err(Error::InvalidInput("transaction has no instructions".to_string()));
    }

    let mut transaction = Transaction::new_with_payer(instructions, Some(fee_payer));
    let blockhash = ledger.latest_blockhash().await?;
    transaction.message.recent_blockhash = blockhash;

    let required = transaction.message.header.num_required_signatures as usize;
    let signers = transaction.message.account_keys[..required]
        .iter()
        .map(|key| key.to_string())
        .collect();

    Ok(UnsignedTransaction {
        transaction: encode_transaction(&transaction)?,
        recent_blockhash: blockhash.to_string(),
        signers,
    })
}

/// Verify a wallet-signed transaction locally, then submit and confirm it.
pub async fn submit_signed(ledger: &dyn Ledger, encoded: &str) -> Result<Signature> {
    let transaction = decode_transaction(encoded)?;
    if !transaction.is_signed() {
        return Err(Error::InvalidInput("transaction is missing signatures".to_string()));
    }
    transaction
        .verify()
        .map_err(|e| Error::InvalidInput(format!("signature verification failed: {}", e)))?;

    let signature = ledger.send_and_confirm(&transaction).await?;
    tracing::info!("Relayed wallet transaction {}", signature);
    Ok(signature)
}

pub fn encode_transaction(transaction: &Transaction) -> Result<String> {
    Ok(STANDARD.encode(bincode::serialize(transaction)?))
}

pub fn decode_transaction(encoded: &str) -> Result<Transaction> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| Error::Encoding(format!("invalid base64: {}", e)))?;
    Ok(bincode::deserialize(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{address::AccountRef, ledger::memory::MemoryLedger};
    use solana_sdk::signature::{Keypair, Signer};

    fn wallet_instruction(wallet: &Pubkey) -> Instruction {
        Instruction::new_with_bytes(Pubkey::new_unique(), &[0, 1], vec![AccountRef::writable_signer(*wallet)])
    }

    #[tokio::test]
    async fn test_wallet_round_trip() {
        let ledger = MemoryLedger::new();
        let wallet = Keypair::new();
        ledger.fund(&wallet.pubkey(), 1_000_000);

        let unsigned = build_unsigned(&ledger, &wallet.pubkey(), &[wallet_instruction(&wallet.pubkey())])
            .await
            .unwrap();
        assert_eq!(unsigned.signers, vec![wallet.pubkey().to_string()]);
        assert_eq!(unsigned.recent_blockhash, ledger.current_blockhash().to_string());

        // What the wallet does
        let mut transaction = decode_transaction(&unsigned.transaction).unwrap();
        assert!(!transaction.is_signed());
        let blockhash = transaction.message.recent_blockhash;
        transaction.sign(&[&wallet], blockhash);

        let signature = submit_signed(&ledger, &encode_transaction(&transaction).unwrap()).await.unwrap();
        assert_eq!(ledger.sent()[0].signatures[0], signature);
    }

    #[tokio::test]
    async fn test_unsigned_transaction_is_refused() {
        let ledger = MemoryLedger::new();
        let wallet = Keypair::new();
        let unsigned = build_unsigned(&ledger, &wallet.pubkey(), &[wallet_instruction(&wallet.pubkey())])
            .await
            .unwrap();

        let err = submit_signed(&ledger, &unsigned.transaction).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(ledger.sent().is_empty());
    }

    #[tokio::test]
    async fn test_tampered_transaction_is_refused() {
        let ledger = MemoryLedger::new();
        let wallet = Keypair::new();
        let unsigned = build_unsigned(&ledger, &wallet.pubkey(), &[wallet_instruction(&wallet.pubkey())])
            .await
            .unwrap();

        let mut transaction = decode_transaction(&unsigned.transaction).unwrap();
        let blockhash = transaction.message.recent_blockhash;
        transaction.sign(&[&wallet], blockhash);
        transaction.message.instructions[0].data = vec![9, 9];

        let err = submit_signed(&ledger, &encode_transaction(&transaction).unwrap()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_garbage_is_an_encoding_error() {
        assert!(matches!(decode_transaction("not base64!"), Err(Error::Encoding(_))));
        assert!(matches!(decode_transaction("AAAA"), Err(Error::Encoding(_))));
    }

    #[tokio::test]
    async fn test_empty_instruction_list_is_rejected() {
        let ledger = MemoryLedger::new();
        let err = build_unsigned(&ledger, &Pubkey::new_unique(), &[]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
