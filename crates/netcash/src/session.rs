use std::fmt;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::client::{Body, Headers, HttpClient, TransportError};
use crate::context::Context;
use crate::identity::login_identifier;
use crate::{Error, Result};

pub const BASE_URL: &str = "https://www.bbvanetcash.mobi";

const HOST: &str = "www.bbvanetcash.mobi";
const LOGIN_ENDPOINT: &str = "/DFAUTH/slod_mult_mult/EAILServlet";
const DEVICE_SUFFIX: &str = ";Android;LGE;Nexus 5;1080x1776;Android;5.1.1;BMES;4.4;xxhd";
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";
const CONTEXT_HEADER: &str = "Contexto";

#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    pub company_code: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("company_code", &self.company_code)
            .finish()
    }
}

/// An authenticated session. Cookies live in the client; the session keeps
/// the headers sent on every request and the user the context is built for.
pub struct Session<C: HttpClient> {
    client: C,
    base_url: String,
    user: String,
    headers: Headers,
}

/// 32 random bytes as upper-case hex followed by a fixed device description.
fn user_agent() -> String {
    let token: [u8; 32] = rand::thread_rng().gen();
    let mut agent: String = token.iter().map(|b| format!("{:02X}", b)).collect();
    agent.push_str(DEVICE_SUFFIX);
    agent
}

fn default_headers(user_agent: String) -> Headers {
    Headers::new()
        .with("User-Agent", user_agent)
        .with("Accept", "application/json")
        .with("Accept-Charset", "UTF-8")
        .with("Connection", "Keep-Alive")
        .with("Host", HOST)
}

impl<C: HttpClient> Session<C> {
    /// Logs in and returns the session on success.
    ///
    /// The bank answers a bad password with a normal page, so only an HTTP
    /// level rejection is reported here. Wrong credentials otherwise surface
    /// on the first authenticated call.
    #[tracing::instrument(skip(client, credentials), fields(user = %credentials.user))]
    pub async fn login(client: C, base_url: &str, credentials: &Credentials) -> Result<Self> {
        let session = Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user: login_identifier(&credentials.user, &credentials.company_code),
            headers: default_headers(user_agent()),
        };

        session.authenticate(&credentials.password.to_uppercase()).await?;
        info!("logged in as {}", session.user);

        Ok(session)
    }

    async fn authenticate(&self, password: &str) -> Result<()> {
        let fields = vec![
            ("origen".to_string(), "pibeemovil".to_string()),
            ("eai_tipoCP".to_string(), "up".to_string()),
            ("eai_URLDestino".to_string(), "success_eail_CAS.jsp".to_string()),
            ("eai_user".to_string(), self.user.clone()),
            ("eai_password".to_string(), password.to_string()),
        ];

        match self
            .client
            .post(&self.url(LOGIN_ENDPOINT), &self.headers, Body::Form(fields))
            .await
        {
            Ok(_) => Ok(()),
            Err(TransportError::Status { status, .. }) => Err(Error::Authentication(format!(
                "login endpoint answered with status {}",
                status
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Posts `body` as JSON with a fresh context header and returns the raw
    /// response body.
    pub(crate) async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<String> {
        let overlay = Headers::new()
            .with("Content-Type", JSON_CONTENT_TYPE)
            .with(CONTEXT_HEADER, Context::new(&self.user).to_header()?);
        let body = serde_json::to_string(body)?;
        debug!(path, "posting authenticated request");

        Ok(self
            .client
            .post(&self.url(path), &self.headers.merged(&overlay), Body::Json(body))
            .await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The login identifier the session authenticated with.
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn user_agent(&self) -> &str {
        self.headers.get("User-Agent").unwrap_or_default()
    }
}
