use crate::domain::ports::TransactionStore;
use crate::domain::transaction::{Transaction, TransactionUpdate};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing transaction records.
pub const CF_TRANSACTIONS: &str = "transactions";

/// A persistent transaction store backed by RocksDB.
///
/// Records are stored as JSON under the big-endian transaction id, so
/// iteration yields them in id order. `Clone` shares the underlying `Arc<DB>`
/// and the update lock, so field updates through any clone are serialized.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    update_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_transactions = ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_transactions])?;

        Ok(Self {
            db: Arc::new(db),
            update_lock: Arc::new(Mutex::new(())),
        })
    }

    fn transactions_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_TRANSACTIONS).ok_or_else(|| {
            PaymentError::InternalError(Box::new(std::io::Error::other(
                "Transactions column family not found",
            )))
        })
    }

    fn decode(bytes: &[u8]) -> Result<Transaction> {
        serde_json::from_slice(bytes).map_err(|e| {
            PaymentError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Deserialization error: {}", e),
            )))
        })
    }

    fn scan(&self) -> Result<impl Iterator<Item = Result<Transaction>> + '_> {
        let cf = self.transactions_cf()?;
        Ok(self
            .db
            .iterator_cf(cf, IteratorMode::Start)
            .map(|item| {
                let (_key, value) = item?;
                Self::decode(&value)
            }))
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn store(&self, tx: Transaction) -> Result<()> {
        let cf = self.transactions_cf()?;

        let key = tx.id.to_be_bytes();
        let value = serde_json::to_vec(&tx).map_err(|e| {
            PaymentError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;

        self.db.put_cf(cf, key, value)?;

        Ok(())
    }

    async fn get(&self, tx_id: u32) -> Result<Option<Transaction>> {
        let cf = self.transactions_cf()?;

        match self.db.get_pinned_cf(cf, tx_id.to_be_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, tx_id: u32, update: TransactionUpdate) -> Result<()> {
        let _guard = self.update_lock.lock().await;
        let mut tx = self
            .get(tx_id)
            .await?
            .ok_or(PaymentError::ResourceNotFound {
                resource: "Transaction",
                id: tx_id,
            })?;
        tx.apply(update);
        self.store(tx).await
    }

    async fn count_matching(
        &self,
        txn_id: &str,
        txn_status: &str,
        amount: Decimal,
        limit: usize,
    ) -> Result<usize> {
        let mut count = 0;
        for tx in self.scan()? {
            if tx?.matches(txn_id, txn_status, amount) {
                count += 1;
                if count >= limit {
                    break;
                }
            }
        }
        Ok(count)
    }

    async fn get_all(&self) -> Result<Vec<Transaction>> {
        self.scan()?.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn performed(id: u32) -> Transaction {
        Transaction {
            id,
            invoice_id: Some(42),
            txn_id: Some("SALE1".to_string()),
            txn_status: Some("PERFORMED".to_string()),
            amount: Some(dec!(19.99)),
            currency: Some("EUR".to_string()),
        }
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");
        assert!(store.db.cf_handle(CF_TRANSACTIONS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_transaction_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        store.store(Transaction::new(1)).await.unwrap();
        store
            .update(1, TransactionUpdate::Amount(dec!(100.00)))
            .await
            .unwrap();

        let retrieved = store.get(1).await.unwrap().unwrap();
        assert_eq!(retrieved.amount, Some(dec!(100.00)));
        assert!(store.get(2).await.unwrap().is_none());
        assert!(store.update(2, TransactionUpdate::InvoiceId(1)).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_rocksdb_concurrent_updates_keep_every_field() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();
        store.store(Transaction::new(1)).await.unwrap();

        let updates = vec![
            TransactionUpdate::InvoiceId(42),
            TransactionUpdate::TxnId("SALE1".to_string()),
            TransactionUpdate::TxnStatus("PERFORMED".to_string()),
            TransactionUpdate::Amount(dec!(19.99)),
            TransactionUpdate::Currency("EUR".to_string()),
        ];
        let handles: Vec<_> = updates
            .into_iter()
            .map(|update| {
                let store = store.clone();
                tokio::spawn(async move { store.update(1, update).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.get(1).await.unwrap(), Some(performed(1)));
    }

    #[tokio::test]
    async fn test_rocksdb_count_matching() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();
        for id in 1..=3 {
            store.store(performed(id)).await.unwrap();
        }
        store.store(Transaction::new(4)).await.unwrap();

        let count = store
            .count_matching("SALE1", "PERFORMED", dec!(19.99), 2)
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.get_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_rocksdb_reopen_keeps_records() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            store.store(performed(7)).await.unwrap();
        }
        let store = RocksDBStore::open(dir.path()).unwrap();
        assert_eq!(store.get(7).await.unwrap(), Some(performed(7)));
    }
}
