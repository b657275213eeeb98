//! Client configuration, populated from environment variables.

use std::fmt;
use std::time::Duration;

use flatfile_api::CreateTokenRequest;
use thiserror::Error;

pub const DEFAULT_API_HOST: &str = "platform.flatfile.com/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for talking to the Flatfile platform.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `FLATFILE_CLIENT_ID` | (required) | Client id exchanged for an access token |
/// | `FLATFILE_SECRET` | (required) | Secret exchanged for an access token |
/// | `FLATFILE_API_HOST` | `platform.flatfile.com/api/v1` | Host and path prefix; `https://` is assumed unless a scheme is given |
/// | `FLATFILE_TIMEOUT_SECS` | `30` | Per-request timeout |
///
/// Empty values count as unset.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub client_id: String,
    pub secret: String,
    pub api_host: String,
    pub timeout: Duration,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl ClientConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let client_id = get("FLATFILE_CLIENT_ID").ok_or(ConfigError::Missing("FLATFILE_CLIENT_ID"))?;
        let secret = get("FLATFILE_SECRET").ok_or(ConfigError::Missing("FLATFILE_SECRET"))?;
        let api_host = get("FLATFILE_API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.into());

        let timeout_secs = match get("FLATFILE_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(v) => v.parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "FLATFILE_TIMEOUT_SECS",
                value: v.clone(),
            })?,
        };

        Ok(Self {
            client_id,
            secret,
            api_host,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Base URL endpoints are joined onto, e.g.
    /// `https://platform.flatfile.com/api/v1`.
    pub fn base_url(&self) -> String {
        let host = self.api_host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }

    /// Body for `POST auth/access-token`.
    pub fn token_request(&self) -> CreateTokenRequest {
        CreateTokenRequest {
            client_id: self.client_id.clone(),
            secret: self.secret.clone(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("FLATFILE_CLIENT_ID", "id"),
            ("FLATFILE_SECRET", "sk"),
        ]))
        .unwrap();
        assert_eq!(config.api_host, DEFAULT_API_HOST);
        assert_eq!(config.base_url(), "https://platform.flatfile.com/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.token_request().client_id, "id");
    }

    #[test]
    fn missing_or_empty_credentials_fail() {
        let err = ClientConfig::from_lookup(lookup(&[("FLATFILE_SECRET", "sk")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("FLATFILE_CLIENT_ID"));

        let err = ClientConfig::from_lookup(lookup(&[
            ("FLATFILE_CLIENT_ID", "id"),
            ("FLATFILE_SECRET", ""),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "FLATFILE_SECRET must be set");
    }

    #[test]
    fn host_override_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("FLATFILE_CLIENT_ID", "id"),
            ("FLATFILE_SECRET", "sk"),
            ("FLATFILE_API_HOST", "http://127.0.0.1:8080/v1/"),
            ("FLATFILE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:8080/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_reported() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("FLATFILE_CLIENT_ID", "id"),
            ("FLATFILE_SECRET", "sk"),
            ("FLATFILE_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "FLATFILE_TIMEOUT_SECS",
                value: "soon".into()
            }
        );
    }

    #[test]
    fn debug_hides_secret() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("FLATFILE_CLIENT_ID", "id"),
            ("FLATFILE_SECRET", "hunter2"),
        ]))
        .unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
