pub mod bbva;

use anyhow::Result;
use async_trait::async_trait;
use netcash::{Account, DateRange, Transaction};

#[async_trait]
pub trait AccountSource {
    async fn accounts(&self) -> Result<Vec<Account>>;
}

#[async_trait]
pub trait TransactionSource {
    async fn transactions(&self, account: &Account, range: DateRange) -> Result<Vec<Transaction>>;
}
