use crate::domain::notification::{Callback, Notification, NotificationForm};
use crate::error::{PaymentError, Result};
use serde::Deserialize;
use std::io::Read;

/// One captured callback: the dispatch parameters followed by the fields
/// Paylane posted.
#[derive(Debug, Deserialize)]
struct CallbackRecord {
    transaction_id: u32,
    bb_invoice_id: u32,
    #[serde(default)]
    bb_gateway_id: Option<u32>,
    #[serde(default)]
    id_sale: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    id_error: Option<String>,
    #[serde(default)]
    error_text: Option<String>,
}

impl TryFrom<CallbackRecord> for Callback {
    type Error = PaymentError;

    fn try_from(record: CallbackRecord) -> Result<Self> {
        let form = NotificationForm {
            id_sale: record.id_sale,
            status: record.status,
            amount: record.amount,
            currency: record.currency,
            hash: record.hash,
            description: record.description,
            id_error: record.id_error,
            error_text: record.error_text,
        };

        Ok(Self {
            transaction_id: record.transaction_id,
            invoice_id: record.bb_invoice_id,
            gateway_id: record.bb_gateway_id,
            notification: Notification::try_from(form)?,
        })
    }
}

/// Reads captured notification callbacks from a CSV source.
///
/// Whitespace is trimmed and optional trailing columns may be left out.
pub struct CallbackReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CallbackReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields callbacks in file order. A bad row yields an error and
    /// reading continues with the next one.
    pub fn callbacks(self) -> impl Iterator<Item = Result<Callback>> {
        self.reader
            .into_deserialize::<CallbackRecord>()
            .map(|result| Callback::try_from(result.map_err(PaymentError::from)?))
    }
}
