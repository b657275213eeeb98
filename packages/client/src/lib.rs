//! Validated HTTP client for the Flatfile REST API.
//!
//! Every call goes through one pipeline: build the request, send it over a
//! [`Transport`], check the status, parse the body as JSON, and decode it
//! into a typed record from `flatfile-api`. Each step fails with its own
//! [`HttpError`] variant.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`error`] | [`HttpError`] and its payloads |
//! | [`transport`] | [`Transport`] trait, [`ReqwestTransport`], [`ScriptedTransport`] |
//! | [`pipeline`] | [`AppEnv`], [`get_json`], [`send_json`], query strings |
//! | [`config`] | [`ClientConfig`] from `FLATFILE_*` variables |
//! | [`operations`] | one function per endpoint |
//! | [`routing`] | [`route_event`] |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flatfile_client::{operations, AppEnv, ClientConfig, ReqwestTransport};
//!
//! let config = ClientConfig::from_env()?;
//! let transport = Arc::new(ReqwestTransport::from_config(&config)?);
//! let env = AppEnv::unauthenticated(transport);
//! let token = operations::create_token(&env, &config.token_request()).await?;
//! let env = env.with_access_token(token);
//! let spaces = operations::list_spaces(&env).await?;
//! ```

pub mod config;
pub mod error;
pub mod operations;
pub mod pipeline;
pub mod routing;
pub mod transport;

pub use config::{ClientConfig, ConfigError};
pub use error::{BoxError, ContentType, HttpError, StatusRange, TransportError};
pub use pipeline::{
    endpoint_with_query, ensure_2xx, ensure_status_range, get_json, post_json, send_json,
    send_request, serialize_params, AccessToken, AppEnv,
};
pub use routing::{route_event, Route};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, ScriptedTransport, Transport,
};
