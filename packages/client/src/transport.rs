//! The transport contract and its two implementations.
//!
//! The pipeline never opens a socket itself; it hands an [`HttpRequest`] to
//! whatever [`Transport`] the [`AppEnv`](crate::AppEnv) carries and gets an
//! [`HttpResponse`] or a [`TransportError`] back. The transport decides
//! where relative endpoints are resolved against.
//!
//! | Implementation | Use |
//! |----------------|-----|
//! | [`ReqwestTransport`] | real HTTPS calls against the platform |
//! | [`ScriptedTransport`] | queued canned responses for tests |

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{BoxError, TransportError};

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One outbound call. `endpoint` is relative (`spaces`, `workbooks?spaceId=…`).
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub endpoint: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What came back. Header names are lower-cased; the body is raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// A response carrying `body` serialised as JSON.
    pub fn json(status: u16, body: &Value) -> Self {
        let mut response = Self::new(status, body.to_string());
        response
            .headers
            .insert("content-type".into(), "application/json".into());
        response
    }
}

// ---------------------------------------------------------------------------
// Transport trait
// ---------------------------------------------------------------------------

/// Performs one HTTP exchange.
///
/// Implementations must be safe to share between concurrent calls; the
/// pipeline holds them behind an `Arc`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// ---------------------------------------------------------------------------
// ReqwestTransport
// ---------------------------------------------------------------------------

/// [`Transport`] backed by a pooled `reqwest::Client`.
///
/// Endpoints are joined onto `base_url` with exactly one `/` between them.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::new)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Self::new(config.base_url(), config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` and `endpoint` joined by a single slash.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self.client.request(method, self.url_for(&request.endpoint));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(TransportError::new)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(TransportError::new)?;

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// ScriptedTransport
// ---------------------------------------------------------------------------

enum Scripted {
    Respond(HttpResponse),
    Fail(BoxError),
}

#[derive(Default)]
struct Inner {
    queue: VecDeque<Scripted>,
    requests: Vec<HttpRequest>,
}

/// In-memory [`Transport`] that replays queued outcomes in order and records
/// every request it receives.
///
/// Sending with an empty queue fails with a [`TransportError`].
#[derive(Default)]
pub struct ScriptedTransport {
    inner: Mutex<Inner>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response.
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.respond_raw(HttpResponse::json(status, &body))
    }

    /// Queue a response exactly as given.
    pub fn respond_raw(&self, response: HttpResponse) -> &Self {
        self.lock().queue.push_back(Scripted::Respond(response));
        self
    }

    /// Queue a transport-level failure.
    pub fn fail(&self, cause: impl Into<BoxError>) -> &Self {
        self.lock().queue.push_back(Scripted::Fail(cause.into()));
        self
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// Outcomes still queued.
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut inner = self.lock();
        let endpoint = request.endpoint.clone();
        inner.requests.push(request);
        match inner.queue.pop_front() {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(cause)) => Err(TransportError::new(cause)),
            None => Err(TransportError::new(format!(
                "no scripted response left for {endpoint}"
            ))),
        }
    }
}
