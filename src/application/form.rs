use crate::domain::config::{
    AUTO_SUBMIT_DELAY, DESCRIPTION_PREFIX, FORM_ACTION_URL, GatewayConfig, LANGUAGE,
    RedirectionMethod, TRANSACTION_TYPE,
};
use crate::domain::hash::outgoing_hash;
use crate::domain::invoice::Invoice;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub value: String,
}

/// Hidden fields of the Paylane Secure Form and how to submit them.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct RedirectForm {
    pub action: &'static str,
    pub method: RedirectionMethod,
    pub fields: Vec<FormField>,
    /// Set when the page should submit the form on its own after this many
    /// milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_submit_after_ms: Option<u64>,
}

impl RedirectForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Builds the redirect form that sends the payer to Paylane.
pub struct RedirectFormBuilder<'a> {
    config: &'a GatewayConfig,
}

impl<'a> RedirectFormBuilder<'a> {
    pub fn new(config: &'a GatewayConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, invoice: &Invoice) -> RedirectForm {
        let description = invoice.line_description();
        let amount = invoice.total.to_string();
        let hash = outgoing_hash(
            &self.config.hash_salt,
            &description,
            &amount,
            &invoice.currency,
            TRANSACTION_TYPE,
        );

        let field = |name, value: String| FormField { name, value };
        let fields = vec![
            field("amount", amount),
            field("currency", invoice.currency.clone()),
            field("merchant_id", self.config.merchant_id.clone()),
            field("description", format!("{DESCRIPTION_PREFIX}{}", invoice.id)),
            field("transaction_description", description),
            field("transaction_type", TRANSACTION_TYPE.to_string()),
            field("back_url", self.config.redirect_url.clone()),
            field("language", LANGUAGE.to_string()),
            field("hash", hash),
        ];

        RedirectForm {
            action: FORM_ACTION_URL,
            method: self.config.redirection_method,
            fields,
            auto_submit_after_ms: self
                .config
                .auto_redirect
                .then(|| AUTO_SUBMIT_DELAY.as_millis() as u64),
        }
    }
}
