//! Client for the BBVA net cash mobile API.
//!
//! A [`Connector`] logs in once on construction and then exposes the two read
//! operations the aggregation side needs: listing accounts and paging through
//! an account's transaction history.
mod accounts;
mod client;
mod connector;
mod context;
mod identity;
mod mapper;
mod model;
mod session;
mod transactions;

#[cfg(test)]
mod testing;

use thiserror::Error;

pub use client::{Body, Headers, HttpClient, ReqwestClient, TransportError};
pub use connector::Connector;
pub use context::Context;
pub use identity::login_identifier;
pub use model::{Account, AccountId, DateRange, Transaction};
pub use session::{Credentials, Session, BASE_URL};
pub use transactions::{Cursor, Pages};

#[derive(Debug, Error)]
pub enum Error {
    #[error("login rejected: {0}")]
    Authentication(String),
    #[error("unexpected response shape: {0}")]
    Shape(String),
    #[error("invalid effective date {value:?}, expected DD/MM/YYYY")]
    Date {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },
    #[error("invalid amount {0:?}")]
    Amount(String),
    #[error("unknown currency {0:?}")]
    Currency(String),
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Error) -> bool {
        self.to_string() == other.to_string()
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;
