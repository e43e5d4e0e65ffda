//! Error types for the API client.
//!
//! # Design
//! `NetworkError` is a closed taxonomy: every call resolves to a value or to
//! exactly one of these variants. Transport failures keep their cause as the
//! error source, but they all land in `Unknown` so callers match on a fixed
//! set of kinds. Non-2xx responses are not local failures; they carry the
//! status code and the raw body for the caller to inspect.

use thiserror::Error;

/// Errors returned by `ApiClient` operations and the request/response pipeline.
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// The request could not be constructed (bad base URL, unresolvable path,
    /// or a query/body conflict while encoding parameters).
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Parameters or a custom body could not be serialized.
    #[error("failed to encode request: {0}")]
    Encoding(#[source] CodecError),

    /// The server answered with a status outside 200..=299.
    #[error("server responded with HTTP {status}")]
    Server { status: u16, body: Option<Vec<u8>> },

    /// A body was expected but the response carried none.
    #[error("response contained no data")]
    NoData,

    /// The body was present but did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decoding(#[source] CodecError),

    /// The transport failed, or the response had no usable HTTP metadata.
    #[error("unknown network error")]
    Unknown {
        #[source]
        cause: Option<TransportError>,
    },
}

impl NetworkError {
    /// HTTP status for `Server` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Lossy UTF-8 view of a `Server` error body, mostly for logs.
    pub fn body_text(&self) -> Option<String> {
        match self {
            NetworkError::Server { body: Some(body), .. } => {
                Some(String::from_utf8_lossy(body).into_owned())
            }
            _ => None,
        }
    }

    pub(crate) fn unknown(cause: Option<TransportError>) -> Self {
        NetworkError::Unknown { cause }
    }
}

/// Failures reported by a `Transport` implementation.
///
/// These never reach callers directly; the classifier wraps them in
/// `NetworkError::Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("request was cancelled")]
    Cancelled,

    #[error("transport rejected the request: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

/// A serializer or deserializer failure, reduced to its message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CodecError {
    message: String,
}

impl CodecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::new(err.to_string())
    }
}
