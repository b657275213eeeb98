//! Access token issuance: `POST auth/access-token`.

use flatfile_core::{Decode, Decoded, Path, Record};
use serde::Serialize;
use serde_json::Value;

/// Request body for `POST auth/access-token`.
///
/// This is the one call made without a bearer token; the token it returns
/// authenticates every other call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    pub client_id: String,
    pub secret: String,
}

/// The `data` payload of a successful token issuance.
///
/// ```json
/// { "accessToken": "…", "expiresIn": 86400, "expires": "2026-10-19T12:00:00.000Z" }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub access_token: String,
    /// Lifetime of the token in seconds. Any JSON number.
    pub expires_in: f64,
    /// Expiry instant as sent by the platform (ISO 8601).
    pub expires: String,
}

impl Decode for TokenGrant {
    fn shape() -> String {
        "TokenGrant".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "TokenGrant")?;
        let access_token = record.required("accessToken");
        let expires_in = record.required("expiresIn");
        let expires = record.required("expires");
        record.finish(|| {
            Some(TokenGrant {
                access_token: access_token?,
                expires_in: expires_in?,
                expires: expires?,
            })
        })
    }
}
