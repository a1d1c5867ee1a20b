use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{Body, Headers, HttpClient, TransportError};
use crate::session::Credentials;

pub(crate) fn credentials() -> Credentials {
    Credentials {
        user: "jdoe".to_string(),
        password: "s3cret".to_string(),
        company_code: "0042".to_string(),
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub url: String,
    pub headers: Headers,
    pub body: Body,
}

impl Request {
    /// Parses a JSON body. Panics on form bodies.
    pub fn json(&self) -> Value {
        match &self.body {
            Body::Json(raw) => serde_json::from_str(raw).unwrap(),
            Body::Form(_) => panic!("expected a JSON body for {}", self.url),
        }
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<Result<String, u16>>,
    requests: Vec<Request>,
}

/// Answers posts from a queue of canned responses and records every request.
/// Clones share the same script.
#[derive(Clone, Default)]
pub(crate) struct ScriptedClient {
    script: Arc<Mutex<Script>>,
}

impl ScriptedClient {
    pub fn respond(self, body: impl Into<String>) -> Self {
        self.script.lock().unwrap().responses.push_back(Ok(body.into()));
        self
    }

    pub fn fail(self, status: u16) -> Self {
        self.script.lock().unwrap().responses.push_back(Err(status));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.script.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn post(&self, url: &str, headers: &Headers, body: Body) -> Result<String, TransportError> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(Request {
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });

        match script.responses.pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(status)) => Err(TransportError::Status {
                status,
                body: String::new(),
            }),
            None => panic!("no scripted response left for {}", url),
        }
    }
}
