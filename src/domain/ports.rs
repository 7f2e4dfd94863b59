use super::account::Amount;
use super::invoice::Invoice;
use super::transaction::{Transaction, TransactionUpdate};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Read access to the billing application's invoices.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn get(&self, invoice_id: u32) -> Result<Option<Invoice>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn store(&self, tx: Transaction) -> Result<()>;
    async fn get(&self, tx_id: u32) -> Result<Option<Transaction>>;
    async fn update(&self, tx_id: u32, update: TransactionUpdate) -> Result<()>;
    /// Counts stored transactions carrying the given gateway triple, looking
    /// at no more than `limit` rows.
    async fn count_matching(
        &self,
        txn_id: &str,
        txn_status: &str,
        amount: Decimal,
        limit: usize,
    ) -> Result<usize>;
    async fn get_all(&self) -> Result<Vec<Transaction>>;
}

/// A credit booked to a client's balance.
#[derive(Debug, PartialEq, Clone)]
pub struct FundsCredit {
    pub client_id: u32,
    pub amount: Amount,
    pub description: String,
    pub r#type: String,
    pub rel_id: u32,
}

/// Settlement actions of the billing application.
#[async_trait]
pub trait LedgerService: Send + Sync {
    async fn mark_paid(&self, invoice_id: u32) -> Result<()>;
    async fn add_funds(&self, credit: FundsCredit) -> Result<()>;
    async fn pay_with_credits(&self, invoice_id: u32) -> Result<()>;
    async fn batch_pay_with_credits(&self, client_id: u32) -> Result<()>;
}

pub type InvoiceStoreBox = Box<dyn InvoiceStore>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type LedgerServiceBox = Box<dyn LedgerService>;
