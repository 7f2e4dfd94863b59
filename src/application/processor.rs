use crate::domain::account::Amount;
use crate::domain::config::{
    DESCRIPTION_PREFIX, GatewayConfig, STATUS_PERFORMED, SettlementStrategy, TRANSACTION_TYPE,
};
use crate::domain::hash::{hashes_match, outgoing_hash};
use crate::domain::invoice::Invoice;
use crate::domain::notification::{Callback, Notification};
use crate::domain::ports::{FundsCredit, InvoiceStoreBox, LedgerServiceBox, TransactionStoreBox};
use crate::domain::transaction::{Transaction, TransactionUpdate};
use crate::error::{PaymentError, Result};
use tracing::{debug, info, warn};

/// Stored records sharing a notification's gateway triple at which the
/// notification counts as a replay.
const DUPLICATE_THRESHOLD: usize = 2;

enum Settlement {
    MarkPaid,
    Credit(Amount),
}

/// Outcome of an accepted notification.
#[derive(Debug, PartialEq, Clone)]
pub struct ProcessedNotification {
    pub transaction_id: u32,
    /// Number of transaction fields written by this callback.
    pub fields_written: usize,
    pub settled: bool,
}

/// Verifies Paylane notifications and books them in the billing application.
///
/// Each callback runs as one linear sequence and stops at the first failure:
/// context lookup, hash check, replay check, field reconciliation, then
/// settlement for performed sales.
pub struct NotificationProcessor {
    config: GatewayConfig,
    invoices: InvoiceStoreBox,
    transactions: TransactionStoreBox,
    ledger: LedgerServiceBox,
}

impl NotificationProcessor {
    pub fn new(
        config: GatewayConfig,
        invoices: InvoiceStoreBox,
        transactions: TransactionStoreBox,
        ledger: LedgerServiceBox,
    ) -> Self {
        Self {
            config,
            invoices,
            transactions,
            ledger,
        }
    }

    pub fn transactions(&self) -> &TransactionStoreBox {
        &self.transactions
    }

    pub async fn process_notification(&self, callback: Callback) -> Result<ProcessedNotification> {
        let notification = &callback.notification;
        info!(
            transaction_id = callback.transaction_id,
            invoice_id = callback.invoice_id,
            gateway_id = ?callback.gateway_id,
            sale_id = %notification.sale_id,
            status = %notification.status,
            "notification_received"
        );

        let invoice = self
            .invoices
            .get(callback.invoice_id)
            .await?
            .ok_or(PaymentError::ResourceNotFound {
                resource: "Invoice",
                id: callback.invoice_id,
            })?;
        let tx = self
            .transactions
            .get(callback.transaction_id)
            .await?
            .ok_or(PaymentError::ResourceNotFound {
                resource: "Transaction",
                id: callback.transaction_id,
            })?;

        self.verify_hash(&invoice, notification)?;
        self.ensure_not_replayed(notification).await?;

        if let Some(error_text) = &notification.error_text {
            warn!(
                sale_id = %notification.sale_id,
                id_error = ?notification.id_error,
                error_text = %error_text,
                "notification_reports_error"
            );
        }

        let settlement = if notification.status == STATUS_PERFORMED {
            Some(self.plan_settlement(notification)?)
        } else {
            None
        };

        let fields_written = self.reconcile(&tx, &callback).await?;

        let settled = settlement.is_some();
        if let Some(settlement) = settlement {
            let linked_invoice = tx.invoice_id.unwrap_or(callback.invoice_id);
            self.settle(settlement, &invoice, linked_invoice, tx.id, notification)
                .await?;
        }

        info!(
            transaction_id = tx.id,
            fields_written = fields_written,
            settled = settled,
            "notification_processed"
        );

        Ok(ProcessedNotification {
            transaction_id: tx.id,
            fields_written,
            settled,
        })
    }

    /// Recomputes the hash Paylane signs the notification with and rejects
    /// the callback when the supplied one differs.
    fn verify_hash(&self, invoice: &Invoice, notification: &Notification) -> Result<()> {
        let expected = outgoing_hash(
            &self.config.hash_salt,
            &format!("{DESCRIPTION_PREFIX}{}", invoice.id),
            &invoice.total.to_string(),
            &invoice.currency,
            TRANSACTION_TYPE,
        );

        if !hashes_match(&expected, &notification.hash) {
            warn!(
                invoice_id = invoice.id,
                sale_id = %notification.sale_id,
                "notification_hash_mismatch"
            );
            return Err(PaymentError::Authentication(
                "Mismatched Response Hash".to_string(),
            ));
        }
        Ok(())
    }

    async fn ensure_not_replayed(&self, notification: &Notification) -> Result<()> {
        let seen = self
            .transactions
            .count_matching(
                &notification.sale_id,
                &notification.status,
                notification.amount,
                DUPLICATE_THRESHOLD,
            )
            .await?;

        if seen >= DUPLICATE_THRESHOLD {
            warn!(
                sale_id = %notification.sale_id,
                status = %notification.status,
                amount = %notification.amount,
                "notification_duplicate"
            );
            return Err(PaymentError::DuplicateNotification {
                sale_id: notification.sale_id.clone(),
            });
        }
        Ok(())
    }

    /// Writes each gateway field that is still unset on the transaction.
    ///
    /// Writes are independent; a failure leaves earlier writes in place.
    async fn reconcile(&self, tx: &Transaction, callback: &Callback) -> Result<usize> {
        let notification = &callback.notification;
        let mut updates = Vec::new();

        if tx.invoice_id.is_none() {
            updates.push(TransactionUpdate::InvoiceId(callback.invoice_id));
        }
        if tx.txn_id.is_none() {
            updates.push(TransactionUpdate::TxnId(notification.sale_id.clone()));
        }
        if tx.txn_status.is_none() {
            updates.push(TransactionUpdate::TxnStatus(notification.status.clone()));
        }
        if tx.amount.is_none() {
            updates.push(TransactionUpdate::Amount(notification.amount));
        }
        if tx.currency.is_none() {
            updates.push(TransactionUpdate::Currency(notification.currency.clone()));
        }

        let written = updates.len();
        for update in updates {
            debug!(transaction_id = tx.id, update = ?update, "transaction_field_set");
            self.transactions.update(tx.id, update).await?;
        }
        Ok(written)
    }

    /// Rejects a performed sale that cannot be settled before any field is
    /// written.
    fn plan_settlement(&self, notification: &Notification) -> Result<Settlement> {
        match self.config.settlement {
            SettlementStrategy::MarkPaid => Ok(Settlement::MarkPaid),
            SettlementStrategy::CreditBalance => {
                Ok(Settlement::Credit(Amount::new(notification.amount)?))
            }
        }
    }

    async fn settle(
        &self,
        settlement: Settlement,
        invoice: &Invoice,
        linked_invoice: u32,
        transaction_id: u32,
        notification: &Notification,
    ) -> Result<()> {
        match settlement {
            Settlement::MarkPaid => {
                self.ledger.mark_paid(invoice.id).await?;
                info!(invoice_id = invoice.id, "invoice_marked_paid");
            }
            Settlement::Credit(amount) => {
                // Another callback may have recorded the same sale since the
                // first check.
                self.ensure_not_replayed(notification).await?;

                let credit = FundsCredit {
                    client_id: invoice.client_id,
                    amount,
                    description: format!("Paylane transaction {}", notification.sale_id),
                    r#type: "transaction".to_string(),
                    rel_id: transaction_id,
                };
                self.ledger.add_funds(credit).await?;
                self.ledger.pay_with_credits(linked_invoice).await?;
                self.ledger
                    .batch_pay_with_credits(invoice.client_id)
                    .await?;
                info!(
                    client_id = invoice.client_id,
                    invoice_id = linked_invoice,
                    amount = %notification.amount,
                    "client_funded"
                );
            }
        }
        Ok(())
    }
}
