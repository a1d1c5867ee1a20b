use std::fmt;

use chrono::{Duration, Local, NaiveDate};
use rusty_money::{iso::Currency, Money};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of days covered by a transaction query when no range is given.
const DEFAULT_RANGE_DAYS: i64 = 30;

/// Bank reference of an account. Transactions keep this key rather than the
/// account itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub available_balance: f64,
    /// Ledger balance.
    pub balance: Money<'static, Currency>,
    pub currency: String,
    pub iban: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub account: AccountId,
    pub amount: Money<'static, Currency>,
    pub description: String,
    pub effective_date: NaiveDate,
    pub currency: String,
    /// Running balance after this movement.
    pub balance: Money<'static, Currency>,
}

/// Inclusive range of booking dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }

        Ok(Self { start, end })
    }

    /// The default query window ending on `today`.
    pub fn ending(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(DEFAULT_RANGE_DAYS),
            end: today,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::ending(Local::now().date_naive())
    }
}
