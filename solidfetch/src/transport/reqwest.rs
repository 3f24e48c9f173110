//! `reqwest`-backed transport adapter.
//!
//! Available behind the `reqwest` feature. The adapter is a thin mapping
//! between the transport seam and `reqwest::Client`; it adds no behavior of
//! its own. The credentials mode is ignored — cookie and credential
//! handling belongs to the `reqwest::Client` the caller configures.

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::TransportError;

use super::{Transport, TransportRequest, TransportResponse};

/// A [`Transport`] that sends requests through a shared [`reqwest::Client`].
///
/// # Example
///
/// ```ignore
/// let client = solidfetch::Client::builder()
///     .transport(ReqwestTransport::new(reqwest::Client::new()))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: ::reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: ::reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(::reqwest::Client::new())
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        url: String,
        request: TransportRequest,
    ) -> BoxFuture<'static, Result<TransportResponse, TransportError>> {
        let mut builder = self
            .client
            .request(request.method, &url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        async move {
            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::new(e.to_string()))?;

            let status = response.status();
            let headers = response.headers().clone();
            let final_url = response.url().to_string();
            let redirected = final_url != url;
            let body: Bytes = response
                .bytes()
                .await
                .map_err(|e| TransportError::new(e.to_string()))?;

            Ok(TransportResponse {
                status,
                headers,
                url: final_url,
                redirected,
                body,
            })
        }
        .boxed()
    }
}
