//! Seed state for running the gateway against the in-memory billing adapters.

use crate::domain::account::ClientAccount;
use crate::domain::config::RawSettings;
use crate::domain::invoice::Invoice;
use crate::domain::ports::TransactionStore;
use crate::domain::transaction::Transaction;
use crate::error::Result;
use crate::infrastructure::in_memory::{InMemoryInvoiceStore, InMemoryLedger};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Invoices, pending transactions and client credit balances.
#[derive(Debug, Deserialize, PartialEq, Default)]
pub struct BillingState {
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub accounts: Vec<ClientAccount>,
}

impl BillingState {
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Loads invoices and balances into fresh in-memory adapters and stores
    /// every transaction the given store does not hold yet.
    pub async fn seed(
        self,
        transactions: &dyn TransactionStore,
    ) -> Result<(InMemoryInvoiceStore, InMemoryLedger)> {
        let invoices = InMemoryInvoiceStore::new();
        for invoice in self.invoices {
            invoices.insert(invoice).await;
        }

        let ledger = InMemoryLedger::new(invoices.clone());
        for account in self.accounts {
            ledger.set_account(account).await;
        }

        for tx in self.transactions {
            if transactions.get(tx.id).await?.is_none() {
                transactions.store(tx).await?;
            }
        }

        Ok((invoices, ledger))
    }
}

pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<RawSettings> {
    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}
