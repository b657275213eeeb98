//! The request pipeline every resource operation runs through.
//!
//! 1. Build the request from the [`AppEnv`]: bearer header (omitted for an
//!    empty token), JSON body and `Content-Type` when there is one.
//! 2. Hand it to the transport. Failure ⇒ [`HttpError::Request`].
//! 3. Check the status against `[200, 300)`. Outside ⇒ [`HttpError::Status`];
//!    the body is not looked at.
//! 4. Parse the body as JSON. Failure ⇒ [`HttpError::ContentType`].
//! 5. Validate against the response shape. Failure ⇒ [`HttpError::Decode`].
//!
//! The pipeline holds no state of its own, so calls may run concurrently
//! against the same or different environments.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use flatfile_core::Decode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{HttpError, StatusRange};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, Transport};

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Bearer credential. Never printed by `Debug`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token used before one has been issued.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "AccessToken(<empty>)")
        } else {
            write!(f, "AccessToken(<redacted>)")
        }
    }
}

impl From<String> for AccessToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccessToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Everything a call needs besides its inputs: where to send it and which
/// credential to present.
///
/// Immutable; [`with_access_token`](Self::with_access_token) returns a new
/// value sharing the same transport.
#[derive(Clone)]
pub struct AppEnv {
    transport: Arc<dyn Transport>,
    access_token: AccessToken,
}

impl AppEnv {
    pub fn new(transport: Arc<dyn Transport>, access_token: impl Into<AccessToken>) -> Self {
        Self {
            transport,
            access_token: access_token.into(),
        }
    }

    /// An environment with no credential, as used for token issuance.
    pub fn unauthenticated(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, AccessToken::empty())
    }

    pub fn with_access_token(&self, access_token: impl Into<AccessToken>) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl fmt::Debug for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppEnv")
            .field("access_token", &self.access_token)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// `GET endpoint`, decoded as `A`.
pub async fn get_json<A: Decode>(env: &AppEnv, endpoint: &str) -> Result<A, HttpError> {
    let response = send_request(env, HttpMethod::Get, endpoint, None).await?;
    decode_body(HttpMethod::Get, endpoint, &response)
}

/// `method endpoint` with `body` as JSON, decoded as `A`.
pub async fn send_json<A: Decode, B: Serialize + ?Sized>(
    env: &AppEnv,
    method: HttpMethod,
    endpoint: &str,
    body: &B,
) -> Result<A, HttpError> {
    let body = serde_json::to_value(body).map_err(HttpError::json)?;
    let response = send_request(env, method, endpoint, Some(body)).await?;
    decode_body(method, endpoint, &response)
}

/// [`send_json`] with `POST`.
pub async fn post_json<A: Decode, B: Serialize + ?Sized>(
    env: &AppEnv,
    endpoint: &str,
    body: &B,
) -> Result<A, HttpError> {
    send_json(env, HttpMethod::Post, endpoint, body).await
}

/// Build and send one request, then check its status against
/// [`StatusRange::SUCCESS`].
pub async fn send_request(
    env: &AppEnv,
    method: HttpMethod,
    endpoint: &str,
    body: Option<Value>,
) -> Result<HttpResponse, HttpError> {
    let request = build_request(env, method, endpoint, body);
    debug!(%method, endpoint, "sending request");

    let response = env.transport.send(request).await.map_err(|e| {
        warn!(%method, endpoint, error = %e, "transport failure");
        HttpError::from(e)
    })?;

    ensure_2xx(&response).inspect_err(|_| {
        warn!(%method, endpoint, status = response.status, "status outside accepted range");
    })?;
    Ok(response)
}

/// Fail with [`HttpError::Status`] unless `response.status` is in `range`.
pub fn ensure_status_range(response: &HttpResponse, range: StatusRange) -> Result<(), HttpError> {
    if range.contains(response.status) {
        Ok(())
    } else {
        Err(HttpError::Status {
            status: response.status,
            range,
        })
    }
}

/// [`ensure_status_range`] with `[200, 300)`.
pub fn ensure_2xx(response: &HttpResponse) -> Result<(), HttpError> {
    ensure_status_range(response, StatusRange::SUCCESS)
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

/// Serialise `params` as a query string: keys ascending, `null`s dropped,
/// keys and values percent-encoded. Returns `""` when nothing remains.
///
/// `params` must serialise to a JSON object.
pub fn serialize_params<P: Serialize + ?Sized>(params: &P) -> Result<String, HttpError> {
    let value = serde_json::to_value(params).map_err(HttpError::json)?;
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(HttpError::json(format!(
                "query parameters must be an object, found {other}"
            )))
        }
    };

    let sorted: BTreeMap<String, Value> = map.into_iter().collect();
    let pairs: Vec<String> = sorted
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let v = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}={}", urlencoding::encode(k), urlencoding::encode(&v))
        })
        .collect();
    Ok(pairs.join("&"))
}

/// `path?query`, or just `path` when `params` serialise to nothing.
pub fn endpoint_with_query<P: Serialize + ?Sized>(
    path: &str,
    params: &P,
) -> Result<String, HttpError> {
    let query = serialize_params(params)?;
    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{path}?{query}"))
    }
}

// --- helpers ---

fn build_request(
    env: &AppEnv,
    method: HttpMethod,
    endpoint: &str,
    body: Option<Value>,
) -> HttpRequest {
    let mut request = HttpRequest::new(method, endpoint);
    if !env.access_token.is_empty() {
        request.headers.insert(
            "Authorization".into(),
            format!("Bearer {}", env.access_token.as_str()),
        );
    }
    if body.is_some() {
        request
            .headers
            .insert("Content-Type".into(), "application/json".into());
    }
    request.body = body;
    request
}

fn decode_body<A: Decode>(
    method: HttpMethod,
    endpoint: &str,
    response: &HttpResponse,
) -> Result<A, HttpError> {
    let json: Value = serde_json::from_slice(&response.body).map_err(|e| {
        warn!(%method, endpoint, status = response.status, "response body is not json");
        HttpError::json(e)
    })?;
    flatfile_core::decode(&json).map_err(|errors| {
        warn!(
            %method,
            endpoint,
            status = response.status,
            failures = errors.failures().len(),
            "response body failed validation"
        );
        HttpError::Decode(errors)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn query_keys_are_sorted_and_nulls_dropped() {
        let params = json!({ "spaceId": "dev_sp_aaaaaaaa", "archived": null, "a": 2 });
        assert_eq!(serialize_params(&params).unwrap(), "a=2&spaceId=dev_sp_aaaaaaaa");
    }

    #[test]
    fn query_values_are_percent_encoded() {
        let params = json!({ "q": "a b&c", "flag": true });
        assert_eq!(serialize_params(&params).unwrap(), "flag=true&q=a%20b%26c");
    }

    #[test]
    fn empty_query_leaves_path_alone() {
        assert_eq!(endpoint_with_query("spaces", &json!({})).unwrap(), "spaces");
        assert_eq!(
            endpoint_with_query("spaces", &json!({ "x": null })).unwrap(),
            "spaces"
        );
    }

    #[test]
    fn non_object_params_are_rejected() {
        let err = serialize_params(&json!(["a"])).unwrap_err();
        assert!(matches!(err, HttpError::ContentType { .. }));
    }

    #[test]
    fn access_token_debug_is_redacted() {
        assert_eq!(format!("{:?}", AccessToken::from("secret")), "AccessToken(<redacted>)");
        assert_eq!(format!("{:?}", AccessToken::empty()), "AccessToken(<empty>)");
    }

    #[test]
    fn with_access_token_shares_transport() {
        let env = AppEnv::unauthenticated(Arc::new(ScriptedTransport::new()));
        let authed = env.with_access_token("tok");
        assert!(env.access_token().is_empty());
        assert_eq!(authed.access_token().as_str(), "tok");
        assert!(Arc::ptr_eq(env.transport(), authed.transport()));
    }

    #[test]
    fn request_headers() {
        let env = AppEnv::new(Arc::new(ScriptedTransport::new()), "tok");
        let req = build_request(&env, HttpMethod::Post, "spaces", Some(json!({})));
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
        assert_eq!(req.header("content-type"), Some("application/json"));

        let env = env.with_access_token(AccessToken::empty());
        let req = build_request(&env, HttpMethod::Get, "users", None);
        assert!(req.headers.is_empty());
        assert_eq!(req.body, None);
    }
}
