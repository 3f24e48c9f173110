//! Error types for request building and execution.
//!
//! Failures observed after the transport is invoked — a non-2xx status, a
//! transport-level failure, an undecodable body — are passed through the
//! error interceptor chain before being returned; failures while building
//! the request (invalid header, unserializable body) are returned directly.

use http::{HeaderMap, StatusCode};

use crate::request::RequestParts;

/// Error returned by [`Endpoint::call`](crate::Endpoint::call).
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The transport returned a status outside `[200, 300)`.
    #[error("request resulted in error: {status} for {url}")]
    NoSuccess {
        status: StatusCode,
        status_text: String,
        headers: HeaderMap,
        /// Final (post-redirect) URL reported by the transport.
        url: String,
        request: RequestParts,
    },

    /// The transport failed outright (connection error, DNS failure, ...).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        request: RequestParts,
    },

    /// The response declared `application/json` but the body would not parse.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        request: RequestParts,
    },

    /// A resolved header is not a valid HTTP header name or value.
    #[error("invalid header {name:?}: {message}")]
    Header { name: String, message: String },

    /// The request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
}

impl FetchError {
    /// Stable error-kind name, useful for matching in error interceptors.
    pub fn name(&self) -> &'static str {
        match self {
            FetchError::NoSuccess { .. } => "NoSuccess",
            FetchError::Transport { .. } => "TransportFailure",
            FetchError::Decode { .. } => "DecodeFailure",
            FetchError::Header { .. } => "InvalidHeader",
            FetchError::Encode(_) => "EncodeFailure",
        }
    }

    /// The request descriptor that produced this error, when the failure
    /// occurred after the request was assembled.
    pub fn request(&self) -> Option<&RequestParts> {
        match self {
            FetchError::NoSuccess { request, .. }
            | FetchError::Transport { request, .. }
            | FetchError::Decode { request, .. } => Some(request),
            FetchError::Header { .. } | FetchError::Encode(_) => None,
        }
    }

    /// The response status, for [`NoSuccess`](FetchError::NoSuccess) errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::NoSuccess { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error produced by a [`Transport`](crate::Transport) implementation.
///
/// Transports reduce whatever their underlying client reports to a message;
/// the pipeline wraps it into [`FetchError::Transport`] together with the
/// originating request descriptor.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for TransportError {
    fn from(message: &str) -> Self {
        TransportError::new(message)
    }
}

impl From<String> for TransportError {
    fn from(message: String) -> Self {
        TransportError::new(message)
    }
}
