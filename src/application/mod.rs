//! Application layer: the two operations the gateway offers the billing
//! application.
//!
//! `RedirectFormBuilder` prepares the hosted payment form for an invoice and
//! `NotificationProcessor` handles the callback Paylane sends once the payer
//! has finished.

pub mod form;
pub mod processor;
