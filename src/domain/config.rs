use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Paylane Secure Form endpoint the redirect form is submitted to.
pub const FORM_ACTION_URL: &str = "https://secure.paylane.com/order/cart.html";
/// Transaction type code for a sale.
pub const TRANSACTION_TYPE: &str = "S";
/// Language of the hosted payment page.
pub const LANGUAGE: &str = "en";
/// Prefix of the short description sent to Paylane, followed by the invoice id.
pub const DESCRIPTION_PREFIX: &str = "NGHSTR-";
/// Status Paylane reports for a completed sale.
pub const STATUS_PERFORMED: &str = "PERFORMED";
/// Delay before the redirect form submits itself when auto-redirect is on.
pub const AUTO_SUBMIT_DELAY: Duration = Duration::from_millis(1000);

pub const DEFAULT_HTTP_PREFIX: &str = "http://";
pub const DEFAULT_INSTALL_DOMAIN: &str = "www.install-domain.com";

const RETURN_URL_SUFFIX: &str = "/invoice/hash";
const CANCEL_URL_SUFFIX: &str = "/invoice/hash";
const NOTIFY_URL_SUFFIX: &str = "/bb-ipn.php";
const REDIRECT_URL_SUFFIX: &str = "/bb-ipn.php?bb_redirect=1&bb_invoice_hash=invoice_hash";
const CONTINUE_SHOPPING_URL_SUFFIX: &str = "/order";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum RedirectionMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
}

impl RedirectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectionMethod::Get => "GET",
            RedirectionMethod::Post => "POST",
        }
    }
}

impl fmt::Display for RedirectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a performed payment is booked against the client's invoices.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStrategy {
    /// Mark the referenced invoice as paid.
    #[default]
    MarkPaid,
    /// Credit the client balance, then pay the linked invoice and sweep any
    /// other unpaid invoices of the client from credit.
    CreditBalance,
}

/// Gateway settings as stored by the billing application.
///
/// Every field is optional here; `GatewayConfig::from_settings` decides what
/// is required and fills in the defaults.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct RawSettings {
    pub redirection_method: Option<String>,
    pub merchant_id: Option<String>,
    /// Hash salt shared with Paylane.
    pub hash: Option<String>,
    pub http_prefix: Option<String>,
    pub install_domain: Option<String>,
    pub return_url: Option<String>,
    pub cancel_url: Option<String>,
    pub notify_url: Option<String>,
    pub redirect_url: Option<String>,
    pub continue_shopping_url: Option<String>,
    #[serde(default)]
    pub auto_redirect: bool,
    #[serde(default)]
    pub settlement: SettlementStrategy,
}

/// Validated, fully populated gateway configuration.
#[derive(Debug, PartialEq, Clone)]
pub struct GatewayConfig {
    pub redirection_method: RedirectionMethod,
    pub merchant_id: String,
    pub hash_salt: String,
    pub http_prefix: String,
    pub install_domain: String,
    pub return_url: String,
    pub cancel_url: String,
    pub notify_url: String,
    pub redirect_url: String,
    pub continue_shopping_url: String,
    pub auto_redirect: bool,
    pub settlement: SettlementStrategy,
}

/// Treats an unset or blank setting as missing.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl GatewayConfig {
    /// Validates raw settings and substitutes defaults for unset URLs.
    ///
    /// Required fields are checked in a fixed order (redirection method
    /// presence, redirection method validity, merchant id, hash salt) and the
    /// first failure is reported.
    pub fn from_settings(raw: RawSettings) -> Result<Self> {
        let method = present(raw.redirection_method).ok_or_else(|| {
            PaymentError::Configuration(
                "Please fill Paywall Secure Form Redirect method".to_string(),
            )
        })?;

        let redirection_method = match method.as_str() {
            "GET" => RedirectionMethod::Get,
            "POST" => RedirectionMethod::Post,
            _ => {
                return Err(PaymentError::Configuration(
                    "Please fill Paywall Secure Form Redirect method with GET or POST".to_string(),
                ));
            }
        };

        let merchant_id = present(raw.merchant_id).ok_or_else(|| {
            PaymentError::Configuration("Please fill Paywall Secure Form Merchant ID".to_string())
        })?;

        let hash_salt = present(raw.hash).ok_or_else(|| {
            PaymentError::Configuration("Please fill Paywall Secure Form Hash salt".to_string())
        })?;

        let http_prefix =
            present(raw.http_prefix).unwrap_or_else(|| DEFAULT_HTTP_PREFIX.to_string());
        let install_domain =
            present(raw.install_domain).unwrap_or_else(|| DEFAULT_INSTALL_DOMAIN.to_string());
        let base = format!("{http_prefix}{install_domain}");
        let or_default = |value: Option<String>, suffix: &str| {
            present(value).unwrap_or_else(|| format!("{base}{suffix}"))
        };

        Ok(Self {
            redirection_method,
            merchant_id,
            hash_salt,
            return_url: or_default(raw.return_url, RETURN_URL_SUFFIX),
            cancel_url: or_default(raw.cancel_url, CANCEL_URL_SUFFIX),
            notify_url: or_default(raw.notify_url, NOTIFY_URL_SUFFIX),
            redirect_url: or_default(raw.redirect_url, REDIRECT_URL_SUFFIX),
            continue_shopping_url: or_default(
                raw.continue_shopping_url,
                CONTINUE_SHOPPING_URL_SUFFIX,
            ),
            http_prefix,
            install_domain,
            auto_redirect: raw.auto_redirect,
            settlement: raw.settlement,
        })
    }
}
