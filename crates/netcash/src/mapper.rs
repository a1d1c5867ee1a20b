//! Conversion from raw bank records into [`Account`] and [`Transaction`].
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rusty_money::{iso, iso::Currency, Money};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{Account, AccountId, Transaction};
use crate::{Error, Result};

const DATE_FORMAT: &str = "%d/%m/%Y";

/// A list-valued response field. The API sends an array when there are
/// several records, a bare object when there is exactly one and leaves the
/// field out (or null) when there are none.
#[derive(Debug, PartialEq)]
pub(crate) enum Records {
    Many(Vec<Value>),
    One(Value),
    Absent,
}

impl Records {
    pub(crate) fn from_field(name: &str, value: Option<Value>) -> Result<Self> {
        match value {
            None | Some(Value::Null) => Ok(Records::Absent),
            Some(Value::Array(items)) => Ok(Records::Many(items)),
            Some(obj @ Value::Object(_)) => Ok(Records::One(obj)),
            Some(other) => Err(Error::Shape(format!(
                "field {:?} is neither a list nor a record: {}",
                name, other
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAccount {
    referencia: Option<String>,
    empresa_des: Option<String>,
    saldo_valor: Option<String>,
    saldo_contable: Option<String>,
    divisa: Option<String>,
    numero_asunto: Option<String>,
    banco_des: Option<String>,
    numero_asunto_mostrar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTransaction {
    cod_rmsoper_s: Option<String>,
    importe: Option<String>,
    concepto: Option<String>,
    desc_concepto_tx: Option<String>,
    fecha_contable: Option<String>,
    divisa: Option<String>,
    saldo_contable: Option<String>,
    currency: Option<String>,
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Shape(e.to_string()))
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Shape(format!("missing required field {:?}", field))),
    }
}

pub(crate) fn currency(code: &str) -> Result<&'static Currency> {
    iso::find(code).ok_or_else(|| Error::Currency(code.to_string()))
}

/// Scales a plain decimal string such as `"-12.30"` to minor units of
/// `currency`. Exponent notation and values that overflow are rejected.
pub(crate) fn to_minor_units(amount: &str, currency: &'static Currency) -> Result<Money<'static, Currency>> {
    let trimmed = amount.trim();
    let minor = Some(trimmed)
        .filter(|s| !s.contains(['e', 'E']))
        .and_then(|s| Decimal::from_str(s).ok())
        .and_then(|d| d.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|d| d.round().to_i64())
        .ok_or_else(|| Error::Amount(amount.to_string()))?;

    Ok(Money::from_minor(minor, currency))
}

/// Parses a `DD/MM/YYYY` booking date. Anything else, including unpadded
/// days or months, is rejected.
pub(crate) fn effective_date(value: &str) -> Result<NaiveDate> {
    let bytes = value.as_bytes();
    let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    if bytes.len() != 10
        || bytes[2] != b'/'
        || bytes[5] != b'/'
        || !(digits(0..2) && digits(3..5) && digits(6..10))
    {
        return Err(Error::Date {
            value: value.to_string(),
            source: None,
        });
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| Error::Date {
        value: value.to_string(),
        source: Some(e),
    })
}

pub(crate) fn to_account(raw: RawAccount) -> Result<Account> {
    let id = required("referencia", &raw.referencia)?;
    let iban = required("numeroAsunto", &raw.numero_asunto)?;
    let code = required("divisa", &raw.divisa)?;
    let available = raw.saldo_valor.as_deref().unwrap_or("0");

    Ok(Account {
        id: AccountId(id.to_string()),
        name: raw.empresa_des.clone().unwrap_or_default(),
        available_balance: available
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::Amount(available.to_string()))?,
        balance: to_minor_units(raw.saldo_contable.as_deref().unwrap_or("0"), currency(code)?)?,
        currency: code.to_string(),
        iban: iban.to_string(),
        description: format!(
            "{} {}",
            raw.banco_des.as_deref().unwrap_or_default(),
            raw.numero_asunto_mostrar.as_deref().unwrap_or_default()
        ),
    })
}

pub(crate) fn to_transaction(raw: RawTransaction, account: &AccountId) -> Result<Transaction> {
    let code = required("divisa", &raw.divisa)?;
    let amount = required("importe", &raw.importe)?;
    let date = required("fechaContable", &raw.fecha_contable)?;
    // The running balance carries its own currency when the bank sends one.
    let balance_code = raw.currency.as_deref().filter(|c| !c.is_empty()).unwrap_or(code);

    Ok(Transaction {
        id: raw.cod_rmsoper_s.clone().unwrap_or_default(),
        account: account.clone(),
        amount: to_minor_units(amount, currency(code)?)?,
        description: raw
            .concepto
            .clone()
            .or_else(|| raw.desc_concepto_tx.clone())
            .unwrap_or_default(),
        effective_date: effective_date(date)?,
        currency: code.to_string(),
        balance: to_minor_units(
            raw.saldo_contable.as_deref().unwrap_or("0"),
            currency(balance_code)?,
        )?,
    })
}
