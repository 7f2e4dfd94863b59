use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Unpaid,
    Paid,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct InvoiceLine {
    pub title: String,
}

/// An invoice as exposed by the billing application. Read-only to the gateway.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Invoice {
    pub id: u32,
    pub client_id: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    /// ISO 4217 code, e.g. `EUR`.
    pub currency: String,
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
    #[serde(default)]
    pub status: InvoiceStatus,
}

impl Invoice {
    /// Line titles, each terminated by a newline, in invoice order.
    pub fn line_description(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{}\n", line.title))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn invoice(titles: &[&str]) -> Invoice {
        Invoice {
            id: 1,
            client_id: 7,
            total: dec!(100.00),
            currency: "USD".to_string(),
            lines: titles
                .iter()
                .map(|t| InvoiceLine {
                    title: t.to_string(),
                })
                .collect(),
            status: InvoiceStatus::Unpaid,
        }
    }

    #[test]
    fn test_line_description_keeps_order() {
        assert_eq!(
            invoice(&["Line A", "Line B"]).line_description(),
            "Line A\nLine B\n"
        );
    }

    #[test]
    fn test_line_description_empty() {
        assert_eq!(invoice(&[]).line_description(), "");
    }

    #[test]
    fn test_invoice_deserialization_keeps_scale() {
        let json = r#"{"id": 42, "client_id": 3, "total": "19.90", "currency": "EUR",
                       "lines": [{"title": "Hosting Plan"}]}"#;
        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.total.to_string(), "19.90");
        assert_eq!(invoice.status, InvoiceStatus::Unpaid);
        assert_eq!(invoice.lines.len(), 1);
    }
}
