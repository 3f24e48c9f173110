//! The transport seam.
//!
//! The client never performs network I/O itself: every call delegates to an
//! injected [`Transport`], a fetch-style collaborator taking a URL and a
//! [`TransportRequest`] and resolving to a [`TransportResponse`] or a
//! [`TransportError`]. Timeouts, TLS, pooling, and cancellation are the
//! transport's business.
//!
//! [`FnTransport`] adapts an async closure to the trait; with the `reqwest`
//! feature, [`ReqwestTransport`] wraps a `reqwest::Client`.
//!
//! # Example
//!
//! ```ignore
//! use solidfetch::{FnTransport, TransportResponse};
//! use http::StatusCode;
//!
//! let transport = FnTransport::new(|url, request| async move {
//!     // hand off to the embedding application's HTTP stack
//!     Ok(TransportResponse::new(StatusCode::OK).url(url))
//! });
//! ```

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use std::future::Future;

use crate::config::Credentials;
use crate::error::TransportError;

#[cfg(feature = "reqwest")]
mod reqwest;

#[cfg(feature = "reqwest")]
pub use self::reqwest::ReqwestTransport;

/// Everything a transport needs besides the URL.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub headers: HeaderMap,
    /// Serialized body bytes, if the request carries a body.
    pub body: Option<Bytes>,
    /// Requested credentials mode; meaningful only to transports that
    /// distinguish one (a browser-fetch concern).
    pub credentials: Option<Credentials>,
}

/// What a transport reports back.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Final URL after any redirects the transport followed. May be left
    /// empty; the pipeline then falls back to the request URL.
    pub url: String,
    pub redirected: bool,
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a response with the given status and no headers or body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            url: String::new(),
            redirected: false,
            body: Bytes::new(),
        }
    }

    /// Set a header.
    ///
    /// # Panics
    ///
    /// Panics if the header name or value is invalid.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name: HeaderName = name.parse().expect("invalid header name");
        let value: HeaderValue = value.parse().expect("invalid header value");
        self.headers.insert(name, value);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a JSON body together with its content type.
    pub fn json(self, value: &serde_json::Value) -> Self {
        self.header("content-type", "application/json")
            .body(value.to_string())
    }
}

/// A fetch-style HTTP collaborator.
///
/// One invocation per call — the pipeline never retries. Implementations
/// must be cheap to share behind an `Arc`.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        url: String,
        request: TransportRequest,
    ) -> BoxFuture<'static, Result<TransportResponse, TransportError>>;
}

/// Adapts an async closure to [`Transport`].
pub struct FnTransport<F> {
    send: F,
}

impl<F, Fut> FnTransport<F>
where
    F: Fn(String, TransportRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TransportResponse, TransportError>> + Send + 'static,
{
    pub fn new(send: F) -> Self {
        Self { send }
    }
}

impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(String, TransportRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TransportResponse, TransportError>> + Send + 'static,
{
    fn send(
        &self,
        url: String,
        request: TransportRequest,
    ) -> BoxFuture<'static, Result<TransportResponse, TransportError>> {
        (self.send)(url, request).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_transport_forwards_url_and_request() {
        let transport = FnTransport::new(|url, request: TransportRequest| async move {
            assert_eq!(url, "/ping");
            assert_eq!(request.method, Method::GET);
            Ok(TransportResponse::new(StatusCode::OK).url(url))
        });

        let request = TransportRequest {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            credentials: None,
        };
        let response = transport.send("/ping".to_owned(), request).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.url, "/ping");
    }

    #[test]
    fn test_response_builder_helpers() {
        let response = TransportResponse::new(StatusCode::OK)
            .header("x-test", "1")
            .json(&serde_json::json!({ "ok": true }));

        assert_eq!(response.headers.get("x-test").unwrap(), "1");
        assert_eq!(
            response.headers.get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(&response.body[..], br#"{"ok":true}"#);
    }
}
