//! Inbound Paylane notification (IPN) payloads.
//!
//! The gateway posts loosely typed form fields. `NotificationForm` mirrors
//! them as received; `Notification` is the validated shape the processor
//! works with.

use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Form fields exactly as posted by Paylane.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct NotificationForm {
    #[serde(default)]
    pub id_sale: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub id_error: Option<String>,
    #[serde(default)]
    pub error_text: Option<String>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Notification {
    pub sale_id: String,
    pub status: String,
    pub amount: Decimal,
    pub currency: String,
    pub hash: String,
    pub description: Option<String>,
    pub id_error: Option<String>,
    pub error_text: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PaymentError::InvalidNotification(format!("missing field `{field}`")))
}

impl TryFrom<NotificationForm> for Notification {
    type Error = PaymentError;

    fn try_from(form: NotificationForm) -> Result<Self> {
        let raw_amount = required(form.amount, "amount")?;
        let amount = Decimal::from_str(&raw_amount).map_err(|e| {
            PaymentError::InvalidNotification(format!("invalid amount `{raw_amount}`: {e}"))
        })?;

        Ok(Self {
            sale_id: required(form.id_sale, "id_sale")?,
            status: required(form.status, "status")?,
            amount,
            currency: required(form.currency, "currency")?,
            hash: required(form.hash, "hash")?,
            description: form.description.filter(|v| !v.is_empty()),
            id_error: form.id_error.filter(|v| !v.is_empty()),
            error_text: form.error_text.filter(|v| !v.is_empty()),
        })
    }
}

/// One notification callback as dispatched by the billing application.
#[derive(Debug, PartialEq, Clone)]
pub struct Callback {
    /// Local transaction the callback was dispatched for.
    pub transaction_id: u32,
    /// `bb_invoice_id` query parameter.
    pub invoice_id: u32,
    /// `bb_gateway_id` query parameter.
    pub gateway_id: Option<u32>,
    pub notification: Notification,
}
