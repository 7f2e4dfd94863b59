use crate::domain::transaction::Transaction;
use crate::error::Result;
use std::io::Write;

/// Writes transaction records as CSV with a header row.
pub struct TransactionWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TransactionWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_transactions(&mut self, transactions: Vec<Transaction>) -> Result<()> {
        for tx in transactions {
            self.writer.serialize(tx)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_write_transactions() {
        let mut buf = Vec::new();
        {
            let mut writer = TransactionWriter::new(&mut buf);
            let mut tx = Transaction::new(1);
            tx.invoice_id = Some(42);
            tx.txn_id = Some("SALE1".to_string());
            tx.txn_status = Some("PERFORMED".to_string());
            tx.amount = Some(dec!(19.99));
            tx.currency = Some("EUR".to_string());
            writer
                .write_transactions(vec![tx, Transaction::new(2)])
                .unwrap();
        }

        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id,invoice_id,txn_id,txn_status,amount,currency");
        assert_eq!(lines[1], "1,42,SALE1,PERFORMED,19.99,EUR");
        assert_eq!(lines[2], "2,,,,,");
    }
}
