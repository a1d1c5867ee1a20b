use anyhow::{anyhow, Result};
use chrono::prelude::*;
use clap::ArgMatches;
use netcash::{Account, DateRange};
use tracing::info;

use crate::display::print_transactions;
use crate::settings::Settings;
use crate::upstream::{bbva::Source, AccountSource, TransactionSource};

fn parse_range(begin: Option<&str>, until: Option<&str>, today: NaiveDate) -> Result<DateRange> {
    let default = DateRange::ending(today);
    let start = match begin {
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")?,
        None => default.start(),
    };
    let end = match until {
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")?,
        None => default.end(),
    };

    Ok(DateRange::new(start, end)?)
}

/// Keeps the account whose IBAN or reference matches `selector`, or all of
/// them when no selector is given.
fn select(accounts: Vec<Account>, selector: Option<&str>) -> Result<Vec<Account>> {
    let Some(selector) = selector else {
        return Ok(accounts);
    };

    let selected: Vec<Account> = accounts
        .into_iter()
        .filter(|a| a.iban == selector || a.id.0 == selector)
        .collect();
    if selected.is_empty() {
        return Err(anyhow!("no account matches {}", selector));
    }

    Ok(selected)
}

#[tracing::instrument(skip(settings))]
async fn list(range: DateRange, account: Option<&str>, settings: Settings) -> Result<()> {
    let upstream = Source::connect(&settings).await?;

    for account in select(upstream.accounts().await?, account)? {
        let txns = upstream.transactions(&account, range).await?;
        info!("Found {} transactions for {}.", txns.len(), account.iban);

        print_transactions(std::io::stdout(), &account, &txns)?;
        println!();
    }

    Ok(())
}

pub(crate) async fn run(matches: &ArgMatches, settings: Settings) -> Result<()> {
    let range = parse_range(
        matches.value_of("begin"),
        matches.value_of("until"),
        Local::now().date_naive(),
    )?;

    list(range, matches.value_of("account"), settings).await
}

#[cfg(test)]
mod tests {
    use netcash::AccountId;
    use rusty_money::{iso, Money};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn account(id: &str, iban: &str) -> Account {
        Account {
            id: AccountId(id.into()),
            name: "".into(),
            available_balance: 0.0,
            balance: Money::from_minor(0, iso::EUR),
            currency: "EUR".into(),
            iban: iban.into(),
            description: "".into(),
        }
    }

    #[test]
    fn range_defaults_to_last_thirty_days() {
        let range = parse_range(None, None, date(2021, 3, 31)).unwrap();

        assert_eq!(range.start(), date(2021, 3, 1));
        assert_eq!(range.end(), date(2021, 3, 31));
    }

    #[test]
    fn range_flags_override_defaults() {
        let range = parse_range(Some("2020-12-01"), Some("2021-01-15"), date(2021, 3, 31)).unwrap();

        assert_eq!(range.start(), date(2020, 12, 1));
        assert_eq!(range.end(), date(2021, 1, 15));
    }

    #[test]
    fn invalid_range_flags_are_rejected() {
        let today = date(2021, 3, 31);

        assert!(parse_range(Some("01/12/2020"), None, today).is_err());
        assert!(parse_range(Some("2021-04-01"), None, today).is_err());
    }

    #[test]
    fn select_by_iban_or_reference() {
        let accounts = vec![account("R1", "ES01"), account("R2", "ES02")];

        assert_eq!(select(accounts.clone(), None).unwrap().len(), 2);
        assert_eq!(select(accounts.clone(), Some("ES02")).unwrap()[0].id.0, "R2");
        assert_eq!(select(accounts.clone(), Some("R1")).unwrap()[0].iban, "ES01");
        assert!(select(accounts, Some("ES99")).is_err());
    }
}
