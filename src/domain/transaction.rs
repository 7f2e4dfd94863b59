use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A payment transaction record owned by the billing application.
///
/// Created when the payer is redirected; the gateway fields are filled in
/// from the notification, each at most once.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Transaction {
    pub id: u32,
    pub invoice_id: Option<u32>,
    /// Paylane sale id.
    pub txn_id: Option<String>,
    pub txn_status: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
}

impl Transaction {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Whether the stored gateway triple matches a notification's.
    pub fn matches(&self, txn_id: &str, txn_status: &str, amount: Decimal) -> bool {
        self.txn_id.as_deref() == Some(txn_id)
            && self.txn_status.as_deref() == Some(txn_status)
            && self.amount == Some(amount)
    }

    /// Applies a single field write.
    pub fn apply(&mut self, update: TransactionUpdate) {
        match update {
            TransactionUpdate::InvoiceId(id) => self.invoice_id = Some(id),
            TransactionUpdate::TxnId(txn_id) => self.txn_id = Some(txn_id),
            TransactionUpdate::TxnStatus(status) => self.txn_status = Some(status),
            TransactionUpdate::Amount(amount) => self.amount = Some(amount),
            TransactionUpdate::Currency(currency) => self.currency = Some(currency),
        }
    }
}

/// A write of one transaction field.
#[derive(Debug, PartialEq, Clone)]
pub enum TransactionUpdate {
    InvoiceId(u32),
    TxnId(String),
    TxnStatus(String),
    Amount(Decimal),
    Currency(String),
}
