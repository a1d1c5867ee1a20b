use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Ordered header list. Names compare case-insensitively and a later insert
/// replaces an earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self
            .0
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(pos) => self.0[pos] = (name, value),
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns a copy of `self` with every header of `overlay` applied on top.
    pub fn merged(&self, overlay: &Headers) -> Headers {
        let mut out = self.clone();
        for (name, value) in overlay.iter() {
            out.insert(name, value);
        }

        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
    /// Pre-serialized JSON sent as the raw request body.
    Json(String),
}

/// The HTTP transport the session talks through. Implementations own the
/// cookie jar: whatever the login response sets must be replayed on later
/// calls.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn post(&self, url: &str, headers: &Headers, body: Body) -> Result<String, TransportError>;
}

pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            inner: reqwest::Client::builder().cookie_store(true).build()?,
        })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post(&self, url: &str, headers: &Headers, body: Body) -> Result<String, TransportError> {
        debug!("POST {}", url);
        let mut req = self.inner.post(url);
        for (name, value) in headers.iter() {
            req = req.header(name, value);
        }

        req = match body {
            Body::Form(fields) => req.form(&fields),
            Body::Json(raw) => req.body(raw),
        };

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}
