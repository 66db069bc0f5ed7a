//! In-memory ledger for tests. It checks what a real endpoint would reject
//! (bad signatures, stale blockhash, replays, unfunded fee payers) and
//! records every transaction it accepts.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use solana_sdk::{
    account::Account,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};

use super::Ledger;
use crate::error::{Error, Result};

pub const FEE_LAMPORTS: u64 = 5_000;

#[derive(Default)]
struct State {
    balances: HashMap<Pubkey, u64>,
    accounts: HashMap<Pubkey, Account>,
    confirmed: HashMap<Signature, Vec<u8>>,
    sent: Vec<Transaction>,
    airdrops: Vec<(Pubkey, u64)>,
    reject_next: Option<String>,
}

pub struct MemoryLedger {
    blockhash: Hash,
    state: Mutex<State>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self { blockhash: Hash::new_unique(), state: Mutex::new(State::default()) }
    }

    pub fn fund(&self, address: &Pubkey, lamports: u64) {
        *self.state.lock().unwrap().balances.entry(*address).or_default() += lamports;
    }

    pub fn insert_account(&self, address: Pubkey, account: Account) {
        self.state.lock().unwrap().accounts.insert(address, account);
    }

    /// Fail the next submission with `message`
    pub fn reject_next(&self, message: &str) {
        self.state.lock().unwrap().reject_next = Some(message.to_string());
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn airdrops(&self) -> Vec<(Pubkey, u64)> {
        self.state.lock().unwrap().airdrops.clone()
    }

    pub fn current_blockhash(&self) -> Hash {
        self.blockhash
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.blockhash)
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64> {
        Ok(self.state.lock().unwrap().balances.get(address).copied().unwrap_or(0))
    }

    async fn account(&self, address: &Pubkey) -> Result<Option<Account>> {
        Ok(self.state.lock().unwrap().accounts.get(address).cloned())
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        Ok((128 + data_len as u64) * 6_960)
    }

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature> {
        let mut state = self.state.lock().unwrap();
        *state.balances.entry(*to).or_default() += lamports;
        state.airdrops.push((*to, lamports));
        Ok(Signature::new_unique())
    }

    async fn confirm(&self, _signature: &Signature) -> Result<()> {
        Ok(())
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.reject_next.take() {
            return Err(Error::Remote(message));
        }
        transaction
            .verify()
            .map_err(|e| Error::Remote(format!("signature verification failed: {}", e)))?;
        if transaction.message.recent_blockhash != self.blockhash {
            return Err(Error::Remote("Blockhash not found".to_string()));
        }

        let signature = transaction.signatures[0];
        let message = transaction.message_data();
        if state.confirmed.contains_key(&signature) {
            return Err(Error::Remote("AlreadyProcessed".to_string()));
        }

        let fee_payer = transaction.message.account_keys[0];
        let balance = state.balances.entry(fee_payer).or_default();
        if *balance < FEE_LAMPORTS {
            return Err(Error::Remote(
                "Attempt to debit an account but found no record of a prior credit.".to_string(),
            ));
        }
        *balance -= FEE_LAMPORTS;

        state.confirmed.insert(signature, message);
        state.sent.push(transaction.clone());
        Ok(signature)
    }
}
