use crate::accounts;
use crate::client::{HttpClient, ReqwestClient};
use crate::model::{Account, DateRange, Transaction};
use crate::session::{Credentials, Session, BASE_URL};
use crate::transactions::Pages;
use crate::Result;

/// Entry point for the net cash API. Logging in happens on construction and
/// the session is kept for the lifetime of the connector.
pub struct Connector<C: HttpClient = ReqwestClient> {
    session: Session<C>,
}

impl Connector<ReqwestClient> {
    pub async fn new(credentials: &Credentials) -> Result<Self> {
        Self::with_client(ReqwestClient::new()?, BASE_URL, credentials).await
    }
}

impl<C: HttpClient> Connector<C> {
    pub async fn with_client(client: C, base_url: &str, credentials: &Credentials) -> Result<Self> {
        Ok(Self {
            session: Session::login(client, base_url, credentials).await?,
        })
    }

    pub async fn fetch_accounts(&self) -> Result<Vec<Account>> {
        accounts::fetch(&self.session).await
    }

    /// Every movement of `account` booked inside `range`, defaulting to the
    /// last 30 days.
    pub async fn fetch_transactions_for(
        &self,
        account: &Account,
        range: Option<DateRange>,
    ) -> Result<Vec<Transaction>> {
        self.transaction_pages(account, range.unwrap_or_default())
            .collect()
            .await
    }

    /// Page-by-page access to an account's movements.
    pub fn transaction_pages(&self, account: &Account, range: DateRange) -> Pages<'_, C> {
        Pages::new(&self.session, account, range)
    }
}
