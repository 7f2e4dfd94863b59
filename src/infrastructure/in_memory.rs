use crate::domain::account::{Balance, ClientAccount};
use crate::domain::invoice::{Invoice, InvoiceStatus};
use crate::domain::ports::{FundsCredit, InvoiceStore, LedgerService, TransactionStore};
use crate::domain::transaction::{Transaction, TransactionUpdate};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// A thread-safe in-memory invoice table.
///
/// Clones share the same table, so a ledger built from a clone sees and
/// settles the same invoices.
#[derive(Default, Clone)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<BTreeMap<u32, Invoice>>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, invoice: Invoice) {
        self.invoices.write().await.insert(invoice.id, invoice);
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn get(&self, invoice_id: u32) -> Result<Option<Invoice>> {
        let invoices = self.invoices.read().await;
        Ok(invoices.get(&invoice_id).cloned())
    }
}

/// A thread-safe in-memory transaction table.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<BTreeMap<u32, Transaction>>>,
}

impl InMemoryTransactionStore {
    /// Creates a new, empty in-memory transaction store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn store(&self, tx: Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.insert(tx.id, tx);
        Ok(())
    }

    async fn get(&self, tx_id: u32) -> Result<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(&tx_id).cloned())
    }

    async fn update(&self, tx_id: u32, update: TransactionUpdate) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        let tx = transactions
            .get_mut(&tx_id)
            .ok_or(PaymentError::ResourceNotFound {
                resource: "Transaction",
                id: tx_id,
            })?;
        tx.apply(update);
        Ok(())
    }

    async fn count_matching(
        &self,
        txn_id: &str,
        txn_status: &str,
        amount: Decimal,
        limit: usize,
    ) -> Result<usize> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .values()
            .filter(|tx| tx.matches(txn_id, txn_status, amount))
            .take(limit)
            .count())
    }

    async fn get_all(&self) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.values().cloned().collect())
    }
}

/// A settlement call received by the in-memory ledger.
#[derive(Debug, PartialEq, Clone)]
pub enum LedgerEvent {
    MarkedPaid(u32),
    FundsAdded(FundsCredit),
    PaidWithCredits(u32),
    BatchPaidWithCredits(u32),
}

/// In-memory billing ledger: client credit balances plus invoice payment.
///
/// Every call is recorded in order in an event log.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    invoices: InMemoryInvoiceStore,
    accounts: Arc<RwLock<HashMap<u32, ClientAccount>>>,
    events: Arc<RwLock<Vec<LedgerEvent>>>,
}

impl InMemoryLedger {
    pub fn new(invoices: InMemoryInvoiceStore) -> Self {
        Self {
            invoices,
            ..Default::default()
        }
    }

    pub async fn set_account(&self, account: ClientAccount) {
        self.accounts.write().await.insert(account.client, account);
    }

    pub async fn account(&self, client_id: u32) -> Option<ClientAccount> {
        self.accounts.read().await.get(&client_id).cloned()
    }

    pub async fn events(&self) -> Vec<LedgerEvent> {
        self.events.read().await.clone()
    }

    async fn record(&self, event: LedgerEvent) {
        self.events.write().await.push(event);
    }

    /// Pays an unpaid invoice from the client's credit when it covers the total.
    async fn settle_from_credit(&self, invoice: &mut Invoice) -> Result<bool> {
        if invoice.status == InvoiceStatus::Paid {
            return Ok(false);
        }

        let mut accounts = self.accounts.write().await;
        let account = accounts
            .entry(invoice.client_id)
            .or_insert_with(|| ClientAccount::new(invoice.client_id));

        let due = Balance::new(invoice.total);
        if account.balance < due {
            debug!(
                invoice_id = invoice.id,
                client_id = invoice.client_id,
                "insufficient credit to pay invoice"
            );
            return Ok(false);
        }

        account.debit(due)?;
        invoice.status = InvoiceStatus::Paid;
        Ok(true)
    }
}

#[async_trait]
impl LedgerService for InMemoryLedger {
    async fn mark_paid(&self, invoice_id: u32) -> Result<()> {
        {
            let mut invoices = self.invoices.invoices.write().await;
            let invoice = invoices
                .get_mut(&invoice_id)
                .ok_or(PaymentError::ResourceNotFound {
                    resource: "Invoice",
                    id: invoice_id,
                })?;
            invoice.status = InvoiceStatus::Paid;
        }
        self.record(LedgerEvent::MarkedPaid(invoice_id)).await;
        Ok(())
    }

    async fn add_funds(&self, credit: FundsCredit) -> Result<()> {
        {
            let mut accounts = self.accounts.write().await;
            accounts
                .entry(credit.client_id)
                .or_insert_with(|| ClientAccount::new(credit.client_id))
                .credit(credit.amount);
        }
        self.record(LedgerEvent::FundsAdded(credit)).await;
        Ok(())
    }

    async fn pay_with_credits(&self, invoice_id: u32) -> Result<()> {
        {
            let mut invoices = self.invoices.invoices.write().await;
            let invoice = invoices
                .get_mut(&invoice_id)
                .ok_or(PaymentError::ResourceNotFound {
                    resource: "Invoice",
                    id: invoice_id,
                })?;
            self.settle_from_credit(invoice).await?;
        }
        self.record(LedgerEvent::PaidWithCredits(invoice_id)).await;
        Ok(())
    }

    async fn batch_pay_with_credits(&self, client_id: u32) -> Result<()> {
        {
            let mut invoices = self.invoices.invoices.write().await;
            for invoice in invoices
                .values_mut()
                .filter(|invoice| invoice.client_id == client_id)
            {
                self.settle_from_credit(invoice).await?;
            }
        }
        self.record(LedgerEvent::BatchPaidWithCredits(client_id)).await;
        Ok(())
    }
}
