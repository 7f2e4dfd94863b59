use paylane_ipn::application::processor::NotificationProcessor;
use paylane_ipn::domain::config::{GatewayConfig, RawSettings, SettlementStrategy};
use paylane_ipn::domain::hash::outgoing_hash;
use paylane_ipn::domain::invoice::{Invoice, InvoiceLine, InvoiceStatus};
use paylane_ipn::domain::notification::{Callback, Notification};
use paylane_ipn::domain::ports::TransactionStore;
use paylane_ipn::domain::transaction::Transaction;
use paylane_ipn::infrastructure::in_memory::{
    InMemoryInvoiceStore, InMemoryLedger, InMemoryTransactionStore,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const SALT: &str = "s3cr3t";

pub struct Billing {
    pub processor: NotificationProcessor,
    pub invoices: InMemoryInvoiceStore,
    pub transactions: InMemoryTransactionStore,
    pub ledger: InMemoryLedger,
}

/// Invoice 42 for client 7: 19.99 EUR, one "Hosting Plan" line, plus pending
/// transactions 1..=`pending`.
pub async fn billing(settlement: SettlementStrategy, pending: u32) -> Billing {
    let config = GatewayConfig::from_settings(RawSettings {
        redirection_method: Some("POST".to_string()),
        merchant_id: Some("merchant-1".to_string()),
        hash: Some(SALT.to_string()),
        settlement,
        ..Default::default()
    })
    .unwrap();

    let invoices = InMemoryInvoiceStore::new();
    invoices
        .insert(Invoice {
            id: 42,
            client_id: 7,
            total: dec!(19.99),
            currency: "EUR".to_string(),
            lines: vec![InvoiceLine {
                title: "Hosting Plan".to_string(),
            }],
            status: InvoiceStatus::Unpaid,
        })
        .await;

    let transactions = InMemoryTransactionStore::new();
    for id in 1..=pending {
        transactions.store(Transaction::new(id)).await.unwrap();
    }
    let ledger = InMemoryLedger::new(invoices.clone());

    Billing {
        processor: NotificationProcessor::new(
            config,
            Box::new(invoices.clone()),
            Box::new(transactions.clone()),
            Box::new(ledger.clone()),
        ),
        invoices,
        transactions,
        ledger,
    }
}

/// Hash Paylane sends back for invoice 42.
pub fn notification_hash() -> String {
    outgoing_hash(SALT, "NGHSTR-42", "19.99", "EUR", "S")
}

pub fn callback(transaction_id: u32, sale_id: &str, status: &str, amount: Decimal) -> Callback {
    Callback {
        transaction_id,
        invoice_id: 42,
        gateway_id: Some(3),
        notification: Notification {
            sale_id: sale_id.to_string(),
            status: status.to_string(),
            amount,
            currency: "EUR".to_string(),
            hash: notification_hash(),
            description: None,
            id_error: None,
            error_text: None,
        },
    }
}
