use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, SubAssign};

/// Credit held on a client account.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

/// Represents a positive monetary amount credited to a client.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::InvalidNotification(
                "Amount must be positive".to_string(),
            ))
        }
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// A client's prepaid credit in the billing application.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ClientAccount {
    pub client: u32,
    #[serde(default)]
    pub balance: Balance,
}

impl ClientAccount {
    pub fn new(client: u32) -> Self {
        Self {
            client,
            balance: Balance::ZERO,
        }
    }

    /// Adds funds to the balance
    pub fn credit(&mut self, amount: Amount) {
        self.balance += amount.into();
    }

    /// Takes funds from the balance if sufficient
    pub fn debit(&mut self, amount: Balance) -> Result<(), PaymentError> {
        if self.balance >= amount {
            self.balance -= amount;
            Ok(())
        } else {
            Err(PaymentError::InternalError(
                format!("Insufficient credit on client #{}", self.client).into(),
            ))
        }
    }
}
