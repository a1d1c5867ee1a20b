use std::io::Write;

use anyhow::Result;
use netcash::{Account, Transaction};
use tabwriter::TabWriter;

pub fn print_accounts<T: std::io::Write>(wr: T, accounts: &[Account]) -> Result<()> {
    let mut tw = TabWriter::new(wr);
    writeln!(tw, "Account ID\tName\tIBAN\tAvailable\tBalance\tDescription")?;

    for account in accounts.iter() {
        writeln!(
            tw,
            "{}\t{}\t{}\t{:.2} {}\t{}\t{}",
            account.id,
            account.name,
            account.iban,
            account.available_balance,
            account.currency,
            account.balance,
            account.description,
        )?;
    }

    tw.flush()?;

    Ok(())
}

pub fn print_transactions<T: std::io::Write>(
    wr: T,
    account: &Account,
    txns: &[Transaction],
) -> Result<()> {
    let mut tw = TabWriter::new(wr);
    writeln!(tw, "{} ({})", account.iban, account.name)?;

    for tx in txns.iter() {
        writeln!(
            tw,
            "{}\t{}\t{}\t{}\t{}",
            tx.effective_date.format("%Y-%m-%d"),
            tx.id,
            tx.description,
            tx.amount,
            tx.balance,
        )?;
    }

    tw.flush()?;

    Ok(())
}
