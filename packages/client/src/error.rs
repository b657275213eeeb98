//! The closed set of failures a pipeline call can produce.
//!
//! Every call resolves to the typed value or to exactly one [`HttpError`];
//! nothing else escapes the pipeline. Nothing is retried.

use std::error::Error as StdError;
use std::fmt;

use flatfile_core::DecodeErrors;
use thiserror::Error;

/// Opaque cause carried by [`TransportError`] and [`HttpError::ContentType`].
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// The transport could not complete the network call (DNS, TLS, connection
/// reset, timeout, …).
#[derive(Debug)]
pub struct TransportError {
    cause: BoxError,
}

impl TransportError {
    pub fn new(cause: impl Into<BoxError>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.cause.as_ref()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cause)
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// Content type a body was expected to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Json => write!(f, "json"),
        }
    }
}

/// Half-open range of accepted status codes, `[min_inclusive, max_exclusive)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRange {
    pub min_inclusive: u16,
    pub max_exclusive: u16,
}

impl StatusRange {
    /// `[200, 300)`
    pub const SUCCESS: StatusRange = StatusRange::new(200, 300);

    pub const fn new(min_inclusive: u16, max_exclusive: u16) -> Self {
        Self {
            min_inclusive,
            max_exclusive,
        }
    }

    pub fn contains(&self, status: u16) -> bool {
        self.min_inclusive <= status && status < self.max_exclusive
    }
}

impl fmt::Display for StatusRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.min_inclusive, self.max_exclusive)
    }
}

/// Failure of one API call.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The network call did not complete.
    #[error("request failed: {0}")]
    Request(#[from] TransportError),

    /// A body could not be read or written as `content_type`.
    #[error("body is not valid {content_type}: {cause}")]
    ContentType {
        content_type: ContentType,
        cause: BoxError,
    },

    /// The response status was outside the range accepted for the call.
    /// The body was not read.
    #[error("response status {status} is outside the accepted range {range}")]
    Status { status: u16, range: StatusRange },

    /// The response body did not match the declared shape.
    #[error("response body failed validation:\n{0}")]
    Decode(DecodeErrors),
}

impl HttpError {
    pub(crate) fn json(cause: impl Into<BoxError>) -> Self {
        HttpError::ContentType {
            content_type: ContentType::Json,
            cause: cause.into(),
        }
    }

    /// Validation failures rendered as `path: expected …, found …` lines;
    /// empty for every other kind.
    pub fn decode_messages(&self) -> Vec<String> {
        match self {
            HttpError::Decode(errors) => errors.messages(),
            HttpError::Request(_) | HttpError::ContentType { .. } | HttpError::Status { .. } => {
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_range_bounds() {
        let range = StatusRange::SUCCESS;
        assert!(!range.contains(199));
        assert!(range.contains(200));
        assert!(range.contains(299));
        assert!(!range.contains(300));
        assert_eq!(range.to_string(), "[200, 300)");
    }

    #[test]
    fn messages() {
        let err = HttpError::Status {
            status: 404,
            range: StatusRange::SUCCESS,
        };
        assert_eq!(
            err.to_string(),
            "response status 404 is outside the accepted range [200, 300)"
        );

        let err = HttpError::from(TransportError::new("connection refused"));
        assert_eq!(err.to_string(), "request failed: connection refused");
        assert!(err.decode_messages().is_empty());

        let err = HttpError::json("expected value at line 1 column 1");
        assert_eq!(err.to_string(), "body is not valid json: expected value at line 1 column 1");
    }

    #[test]
    fn transport_error_exposes_source() {
        let err = TransportError::new("timed out");
        assert_eq!(StdError::source(&err).map(|e| e.to_string()), Some("timed out".into()));
        assert_eq!(err.cause().to_string(), "timed out");
    }
}
