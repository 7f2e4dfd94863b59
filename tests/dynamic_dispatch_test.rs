use paylane_ipn::domain::ports::{InvoiceStoreBox, LedgerServiceBox, TransactionStoreBox};
use paylane_ipn::domain::transaction::{Transaction, TransactionUpdate};
use paylane_ipn::infrastructure::in_memory::{
    InMemoryInvoiceStore, InMemoryLedger, InMemoryTransactionStore,
};
use rust_decimal_macros::dec;

mod common;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let invoices = InMemoryInvoiceStore::new();
    let invoice_store: InvoiceStoreBox = Box::new(invoices.clone());
    let transaction_store: TransactionStoreBox = Box::new(InMemoryTransactionStore::new());
    let ledger: LedgerServiceBox = Box::new(InMemoryLedger::new(invoices));

    // Verify Send + Sync by spawning tasks
    let ts_handle = tokio::spawn(async move {
        transaction_store.store(Transaction::new(1)).await.unwrap();
        transaction_store
            .update(1, TransactionUpdate::Amount(dec!(19.99)))
            .await
            .unwrap();
        transaction_store.get(1).await.unwrap().unwrap()
    });
    let is_handle = tokio::spawn(async move { invoice_store.get(42).await.unwrap() });
    let ledger_handle = tokio::spawn(async move { ledger.mark_paid(42).await });

    assert_eq!(ts_handle.await.unwrap().amount, Some(dec!(19.99)));
    assert!(is_handle.await.unwrap().is_none());
    assert!(ledger_handle.await.unwrap().is_err());
}

#[tokio::test]
async fn test_processor_shared_across_tasks() {
    let billing = common::billing(Default::default(), 2).await;
    let processor = std::sync::Arc::new(billing.processor);

    let handles: Vec<_> = [(1, "SALE1"), (2, "SALE2")]
        .into_iter()
        .map(|(id, sale)| {
            let processor = processor.clone();
            tokio::spawn(async move {
                processor
                    .process_notification(common::callback(id, sale, "PERFORMED", dec!(19.99)))
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().settled);
    }
}
