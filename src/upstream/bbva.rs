use anyhow::{Context, Result};
use async_trait::async_trait;
use netcash::{Account, Connector, DateRange, HttpClient, ReqwestClient, Transaction};
use tracing::info;

use crate::settings::Settings;
use crate::upstream::{AccountSource, TransactionSource};

pub struct Source<C: HttpClient = ReqwestClient> {
    connector: Connector<C>,
}

impl Source {
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let client = ReqwestClient::new()?;
        let connector = Connector::with_client(client, &settings.base_url, &settings.credentials())
            .await
            .with_context(|| format!("failed to log in to {}", settings.base_url))?;

        Ok(Self { connector })
    }
}

impl<C: HttpClient> Source<C> {
    pub fn new(connector: Connector<C>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl<C: HttpClient> AccountSource for Source<C> {
    async fn accounts(&self) -> Result<Vec<Account>> {
        Ok(self.connector.fetch_accounts().await?)
    }
}

#[async_trait]
impl<C: HttpClient> TransactionSource for Source<C> {
    async fn transactions(&self, account: &Account, range: DateRange) -> Result<Vec<Transaction>> {
        info!("Pulling transactions for account {}.", account.iban);
        Ok(self
            .connector
            .fetch_transactions_for(account, Some(range))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;
    use netcash::{Body, Credentials, Headers, TransportError};

    use super::*;

    struct CannedBank(Mutex<Vec<&'static str>>);

    #[async_trait]
    impl HttpClient for CannedBank {
        async fn post(&self, _url: &str, _headers: &Headers, _body: Body) -> Result<String, TransportError> {
            Ok(self.0.lock().unwrap().remove(0).to_string())
        }
    }

    #[tokio::test]
    async fn source_delegates_to_connector() {
        let bank = CannedBank(Mutex::new(vec![
            "",
            r#"{"respuestacuentas":{"cuentas":{"referencia":"R1","divisa":"EUR","numeroAsunto":"ES01","saldoValor":"1","saldoContable":"1"}}}"#,
            r#"{"respuestamovimientos":{"movimientos":{"codRmsoperS":"M1","importe":"1","fechaContable":"01/03/2021","divisa":"EUR"}}}"#,
        ]));
        let credentials = Credentials {
            user: "u".into(),
            password: "p".into(),
            company_code: "c".into(),
        };
        let connector = Connector::with_client(bank, "http://bank.test", &credentials)
            .await
            .unwrap();
        let source = Source::new(connector);

        let accounts = source.accounts().await.unwrap();
        let day = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let txns = source
            .transactions(&accounts[0], DateRange::new(day, day).unwrap())
            .await
            .unwrap();

        assert_eq!(accounts[0].iban, "ES01");
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].id, "M1");
    }
}
