//! The request descriptor threaded through the request interceptor chain.

use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::config::Credentials;
use crate::error::FetchError;

/// An assembled request body, already resolved but not yet serialized.
#[derive(Debug, Clone)]
pub enum Payload {
    /// A JSON document, serialized to text at send time.
    Json(serde_json::Value),
    /// Plain text, passed through unchanged.
    Text(String),
    /// Raw bytes, passed through untouched.
    Bytes(Bytes),
}

impl Payload {
    /// Serialize the payload to wire bytes.
    pub(crate) fn to_bytes(&self) -> Result<Bytes, FetchError> {
        match self {
            Payload::Json(value) => serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(|e| FetchError::Encode(e.to_string())),
            Payload::Text(text) => Ok(Bytes::from(text.clone())),
            Payload::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

/// The mutable request descriptor seen by request interceptors.
///
/// Interceptors receive the descriptor after all dynamic values have been
/// resolved and merged; a replacement returned by an interceptor becomes
/// the input of the next one, and the chain's final value is what the
/// transport sends.
#[derive(Debug, Clone)]
pub struct RequestParts {
    /// Fully constructed URL, query string included.
    pub url: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Payload>,
    pub credentials: Option<Credentials>,
}
