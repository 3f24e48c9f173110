//! The call result and response-body decoding.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::request::RequestParts;

/// A decoded response body.
///
/// The body is decoded by declared content type: `application/json` parses
/// into a JSON value, `text/plain` into text, anything else stays raw.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Json(serde_json::Value),
    Text(String),
    Bytes(Bytes),
}

impl Data {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Data::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Data::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Data::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Deserialize a JSON body into a typed value.
    ///
    /// Returns `None` when the body was not decoded as JSON or does not
    /// match the target type.
    pub fn json<T: DeserializeOwned>(&self) -> Option<T> {
        match self {
            Data::Json(value) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }
}

/// The outcome of a successful call, threaded through the response
/// interceptor chain.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The request descriptor as it left the request interceptor chain.
    pub request: RequestParts,
    pub headers: HeaderMap,
    pub ok: bool,
    pub redirected: bool,
    pub status: StatusCode,
    pub status_text: String,
    pub data: Data,
}

/// Decode a response body by its declared content type.
///
/// Errors only when the body declares `application/json` but will not
/// parse; the message becomes a [`FetchError::Decode`](crate::FetchError).
pub(crate) fn decode_body(headers: &HeaderMap, body: Bytes) -> Result<Data, String> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if content_type.contains("application/json") {
        serde_json::from_slice(&body)
            .map(Data::Json)
            .map_err(|e| e.to_string())
    } else if content_type.contains("text/plain") {
        Ok(Data::Text(String::from_utf8_lossy(&body).into_owned()))
    } else {
        Ok(Data::Bytes(body))
    }
}
