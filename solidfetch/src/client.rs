//! The client and the call pipeline.
//!
//! [`Client`] holds the transport, the injectables context, the three
//! interceptor chains, and the global query/header entries. It is a cheap
//! clone over shared state. [`Client::request`] renders a path template
//! against a fresh injectables snapshot and returns an [`Endpoint`];
//! [`Endpoint::call`] runs the pipeline: merge and resolve options, build
//! the request descriptor, run the request chain, delegate to the
//! transport, classify the outcome, and run the response or error chain.

use std::sync::{Arc, RwLock};

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use indexmap::IndexMap;

use crate::builder::ClientBuilder;
use crate::config::{CallOptions, Credentials};
use crate::error::FetchError;
use crate::inject::{Injectables, ResolvedInjectables};
use crate::interceptor::Chain;
use crate::path::{PathTemplate, append_query};
use crate::request::{Payload, RequestParts};
use crate::response::{FetchResult, decode_body};
use crate::transport::{Transport, TransportRequest};
use crate::value::{Dynamic, resolve_map};

pub(crate) struct ClientInner {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) injectables: RwLock<Injectables>,
    pub(crate) request_chain: Chain<RequestParts>,
    pub(crate) response_chain: Chain<FetchResult>,
    pub(crate) error_chain: Chain<FetchError>,
    pub(crate) global_query: IndexMap<String, Dynamic>,
    pub(crate) global_headers: IndexMap<String, Dynamic>,
    pub(crate) credentials: Option<Credentials>,
}

impl ClientInner {
    /// Flatten the current injectables into a literal snapshot.
    fn resolve_injectables(&self) -> ResolvedInjectables {
        self.injectables
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .resolve()
    }
}

/// A request-building HTTP client.
///
/// Cloning is cheap and clones share injectables: a merge through one clone
/// is visible to all of them.
///
/// # Example
///
/// ```ignore
/// use solidfetch::{CallOptions, Client, Dynamic};
///
/// let client = Client::builder()
///     .transport(transport)
///     .injectable("id", 42i64)
///     .build()?;
///
/// let result = client
///     .request(PathTemplate::new("/users/").slot(Dynamic::from_fn(|inj| inj["id"].clone())))
///     .call(CallOptions::new().query("active", true))
///     .await?;
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn from_inner(inner: ClientInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Merge a partial set of injectables into the client's context.
    /// Same-named entries are overridden, the rest are kept.
    pub fn set_injectables(&self, partial: Injectables) {
        self.inner
            .injectables
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .merge(partial);
    }

    /// A resolved snapshot of the current injectables.
    pub fn injectables(&self) -> ResolvedInjectables {
        self.inner.resolve_injectables()
    }

    /// Render a path template into an [`Endpoint`].
    ///
    /// The template is rendered once, here, against a fresh injectables
    /// snapshot; later injectable changes affect query, header, and body
    /// resolution but not the rendered path.
    pub fn request(&self, path: impl Into<PathTemplate>) -> Endpoint {
        let snapshot = self.inner.resolve_injectables();
        let path = path.into().render(&snapshot);
        Endpoint {
            inner: self.inner.clone(),
            path,
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("request_chain", &self.inner.request_chain)
            .field("response_chain", &self.inner.response_chain)
            .field("error_chain", &self.inner.error_chain)
            .finish()
    }
}

/// A rendered path bound to a client, ready to be called.
#[derive(Clone)]
pub struct Endpoint {
    inner: Arc<ClientInner>,
    path: String,
}

impl Endpoint {
    /// The rendered path, before any query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Call with default options (a GET with no extra query, headers, or
    /// body).
    pub async fn send(&self) -> Result<FetchResult, FetchError> {
        self.call(CallOptions::new()).await
    }

    /// Run the full pipeline for one call.
    ///
    /// Build failures (invalid header, unserializable body) are returned
    /// directly; failures observed at or after the transport boundary pass
    /// through the error interceptor chain first.
    pub async fn call(&self, options: CallOptions) -> Result<FetchResult, FetchError> {
        let injectables = self.inner.resolve_injectables();

        // Per-call entries merge over globals; an override keeps the
        // global entry's position.
        let mut query = self.inner.global_query.clone();
        for (key, value) in &options.query {
            query.insert(key.clone(), value.clone());
        }
        let url = append_query(&self.path, &resolve_map(&query, &injectables));

        let mut header_entries = self.inner.global_headers.clone();
        for (name, value) in &options.headers {
            header_entries.insert(name.clone(), value.clone());
        }
        let mut headers = HeaderMap::new();
        for (name, value) in resolve_map(&header_entries, &injectables) {
            let header_name: HeaderName = name.parse().map_err(|e: http::header::InvalidHeaderName| {
                FetchError::Header {
                    name: name.clone(),
                    message: e.to_string(),
                }
            })?;
            let header_value =
                HeaderValue::from_str(&value.render()).map_err(|e| FetchError::Header {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        let body = options.body.as_ref().map(|b| b.to_payload(&injectables));
        if matches!(body, Some(Payload::Json(_))) && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let parts = RequestParts {
            url,
            method: options.method.clone().unwrap_or(Method::GET),
            headers,
            body,
            credentials: options.credentials.or(self.inner.credentials),
        };
        let parts = self.inner.request_chain.apply(parts);

        let body_bytes = match &parts.body {
            Some(payload) => Some(payload.to_bytes()?),
            None => None,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(method = %parts.method, url = %parts.url, "sending request");

        let sent = self
            .inner
            .transport
            .send(
                parts.url.clone(),
                TransportRequest {
                    method: parts.method.clone(),
                    headers: parts.headers.clone(),
                    body: body_bytes,
                    credentials: parts.credentials,
                },
            )
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(error) => {
                return Err(self.inner.error_chain.apply(FetchError::Transport {
                    message: error.message().to_owned(),
                    request: parts,
                }));
            }
        };

        let url = if response.url.is_empty() {
            parts.url.clone()
        } else {
            response.url
        };
        let status_text = response
            .status
            .canonical_reason()
            .unwrap_or_default()
            .to_owned();

        if !response.status.is_success() {
            return Err(self.inner.error_chain.apply(FetchError::NoSuccess {
                status: response.status,
                status_text,
                headers: response.headers,
                url,
                request: parts,
            }));
        }

        let data = match decode_body(&response.headers, response.body) {
            Ok(data) => data,
            Err(message) => {
                return Err(self.inner.error_chain.apply(FetchError::Decode {
                    message,
                    request: parts,
                }));
            }
        };

        let result = FetchResult {
            request: parts,
            headers: response.headers,
            ok: true,
            redirected: response.redirected,
            status: response.status,
            status_text,
            data,
        };
        Ok(self.inner.response_chain.apply(result))
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Body;
    use crate::interceptor::Interceptor;
    use crate::response::Data;
    use crate::transport::{FnTransport, TransportResponse};
    use http::StatusCode;
    use std::sync::Mutex;

    fn ok_json_transport(value: serde_json::Value) -> impl Transport {
        FnTransport::new(move |url, _| {
            let value = value.clone();
            async move { Ok(TransportResponse::new(StatusCode::OK).url(url).json(&value)) }
        })
    }

    #[tokio::test]
    async fn test_get_with_query_builds_expected_url() {
        let seen = Arc::new(Mutex::new(String::new()));
        let seen_in = seen.clone();
        let client = Client::builder()
            .transport(FnTransport::new(move |url: String, _| {
                *seen_in.lock().unwrap() = url.clone();
                async move { Ok(TransportResponse::new(StatusCode::OK).url(url)) }
            }))
            .build()
            .unwrap();

        let result = client
            .request("/users/42")
            .call(CallOptions::new().query("active", true))
            .await
            .unwrap();

        assert!(result.ok);
        assert_eq!(*seen.lock().unwrap(), "/users/42?active=true");
    }

    #[tokio::test]
    async fn test_path_slot_resolves_from_injectables() {
        let client = Client::builder()
            .transport(ok_json_transport(serde_json::json!({})))
            .injectable("id", 42i64)
            .build()
            .unwrap();

        let endpoint = client.request(
            PathTemplate::new("/users/")
                .slot(Dynamic::from_fn(|inj| inj["id"].clone()))
                .lit("/posts"),
        );
        assert_eq!(endpoint.path(), "/users/42/posts");
    }

    #[tokio::test]
    async fn test_json_response_round_trip() {
        let client = Client::builder()
            .transport(ok_json_transport(serde_json::json!({ "name": "ada" })))
            .build()
            .unwrap();

        let result = client.request("/users/1").send().await.unwrap();
        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(result.status_text, "OK");
        assert_eq!(result.data.as_json().unwrap()["name"], "ada");
    }

    #[tokio::test]
    async fn test_non_success_status_is_no_success_error() {
        let client = Client::builder()
            .transport(FnTransport::new(|url, _| async move {
                Ok(TransportResponse::new(StatusCode::NOT_FOUND).url(url))
            }))
            .build()
            .unwrap();

        let error = client.request("/users/404").send().await.unwrap_err();
        assert_eq!(error.name(), "NoSuccess");
        assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
        match error {
            FetchError::NoSuccess { url, status_text, request, .. } => {
                assert_eq!(url, "/users/404");
                assert_eq!(status_text, "Not Found");
                assert_eq!(request.url, "/users/404");
            }
            other => panic!("expected NoSuccess, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_flows_through_error_chain() {
        let client = Client::builder()
            .transport(FnTransport::new(|_, _| async move {
                Err(crate::TransportError::new("connection refused"))
            }))
            .error_interceptor(Interceptor::new("tag", |error: &FetchError| {
                match error {
                    FetchError::Transport { message, request } => Some(FetchError::Transport {
                        message: format!("[tagged] {message}"),
                        request: request.clone(),
                    }),
                    _ => None,
                }
            }))
            .build()
            .unwrap();

        let error = client.request("/ping").send().await.unwrap_err();
        assert_eq!(error.name(), "TransportFailure");
        match error {
            FetchError::Transport { message, .. } => {
                assert_eq!(message, "[tagged] connection refused");
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_decode_error() {
        let client = Client::builder()
            .transport(FnTransport::new(|url, _| async move {
                Ok(TransportResponse::new(StatusCode::OK)
                    .url(url)
                    .header("content-type", "application/json")
                    .body("not json"))
            }))
            .build()
            .unwrap();

        let error = client.request("/bad").send().await.unwrap_err();
        assert_eq!(error.name(), "DecodeFailure");
    }

    #[tokio::test]
    async fn test_request_interceptors_run_in_order() {
        let seen = Arc::new(Mutex::new(HeaderMap::new()));
        let seen_in = seen.clone();
        let client = Client::builder()
            .transport(FnTransport::new(move |url, request: TransportRequest| {
                *seen_in.lock().unwrap() = request.headers.clone();
                async move { Ok(TransportResponse::new(StatusCode::OK).url(url)) }
            }))
            .request_interceptor(|parts: &RequestParts| {
                let mut parts = parts.clone();
                parts.headers.insert("x-step", "one".parse().unwrap());
                Some(parts)
            })
            .request_interceptor(|parts: &RequestParts| {
                let mut parts = parts.clone();
                parts.headers.insert("x-step", "two".parse().unwrap());
                Some(parts)
            })
            .build()
            .unwrap();

        client.request("/ordered").send().await.unwrap();
        assert_eq!(seen.lock().unwrap().get("x-step").unwrap(), "two");
    }

    #[tokio::test]
    async fn test_response_interceptor_replaces_result() {
        let client = Client::builder()
            .transport(ok_json_transport(serde_json::json!({ "n": 1 })))
            .response_interceptor(|result: &FetchResult| {
                let mut result = result.clone();
                result.data = Data::Json(serde_json::json!({ "n": 2 }));
                Some(result)
            })
            .build()
            .unwrap();

        let result = client.request("/n").send().await.unwrap();
        assert_eq!(result.data.as_json().unwrap()["n"], 2);
    }

    #[tokio::test]
    async fn test_per_call_entries_override_globals() {
        let seen = Arc::new(Mutex::new(String::new()));
        let seen_in = seen.clone();
        let client = Client::builder()
            .transport(FnTransport::new(move |url: String, _| {
                *seen_in.lock().unwrap() = url.clone();
                async move { Ok(TransportResponse::new(StatusCode::OK).url(url)) }
            }))
            .query("locale", "en")
            .query("page", 1i64)
            .build()
            .unwrap();

        client
            .request("/items")
            .call(CallOptions::new().query("page", 2i64))
            .await
            .unwrap();
        // Override keeps the global entry's position.
        assert_eq!(*seen.lock().unwrap(), "/items?locale=en&page=2");
    }

    #[tokio::test]
    async fn test_json_body_sets_content_type_when_absent() {
        let seen = Arc::new(Mutex::new((HeaderMap::new(), None::<bytes::Bytes>)));
        let seen_in = seen.clone();
        let client = Client::builder()
            .transport(FnTransport::new(move |url, request: TransportRequest| {
                *seen_in.lock().unwrap() = (request.headers.clone(), request.body.clone());
                async move { Ok(TransportResponse::new(StatusCode::OK).url(url)) }
            }))
            .build()
            .unwrap();

        client
            .request("/users")
            .call(
                CallOptions::new()
                    .method(Method::POST)
                    .body(Body::Json(serde_json::json!({ "name": "ada" }))),
            )
            .await
            .unwrap();

        let (headers, body) = seen.lock().unwrap().clone();
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        assert_eq!(&body.unwrap()[..], br#"{"name":"ada"}"#);
    }

    #[tokio::test]
    async fn test_explicit_content_type_is_kept() {
        let seen = Arc::new(Mutex::new(HeaderMap::new()));
        let seen_in = seen.clone();
        let client = Client::builder()
            .transport(FnTransport::new(move |url, request: TransportRequest| {
                *seen_in.lock().unwrap() = request.headers.clone();
                async move { Ok(TransportResponse::new(StatusCode::OK).url(url)) }
            }))
            .build()
            .unwrap();

        client
            .request("/users")
            .call(
                CallOptions::new()
                    .method(Method::POST)
                    .header("content-type", "application/vnd.api+json")
                    .body(Body::Json(serde_json::json!({}))),
            )
            .await
            .unwrap();

        assert_eq!(
            seen.lock().unwrap().get("content-type").unwrap(),
            "application/vnd.api+json"
        );
    }

    #[tokio::test]
    async fn test_invalid_header_is_returned_directly() {
        let chain_ran = Arc::new(Mutex::new(false));
        let chain_ran_in = chain_ran.clone();
        let client = Client::builder()
            .transport(ok_json_transport(serde_json::json!({})))
            .error_interceptor(move |_: &FetchError| {
                *chain_ran_in.lock().unwrap() = true;
                None
            })
            .build()
            .unwrap();

        let error = client
            .request("/x")
            .call(CallOptions::new().header("bad name", "v"))
            .await
            .unwrap_err();
        assert_eq!(error.name(), "InvalidHeader");
        assert!(!*chain_ran.lock().unwrap());
    }

    #[tokio::test]
    async fn test_injectables_update_affects_later_calls() {
        let seen = Arc::new(Mutex::new(String::new()));
        let seen_in = seen.clone();
        let client = Client::builder()
            .transport(FnTransport::new(move |url: String, _| {
                *seen_in.lock().unwrap() = url.clone();
                async move { Ok(TransportResponse::new(StatusCode::OK).url(url)) }
            }))
            .injectable("token", "old")
            .build()
            .unwrap();

        let endpoint = client.request("/auth");
        let options =
            || CallOptions::new().query("token", Dynamic::from_fn(|inj| inj["token"].clone()));

        endpoint.call(options()).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), "/auth?token=old");

        client.set_injectables(Injectables::new().set("token", "new"));
        endpoint.call(options()).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), "/auth?token=new");
    }

    #[tokio::test]
    async fn test_credentials_default_and_override() {
        let seen = Arc::new(Mutex::new(None::<Credentials>));
        let seen_in = seen.clone();
        let client = Client::builder()
            .transport(FnTransport::new(move |url, request: TransportRequest| {
                *seen_in.lock().unwrap() = request.credentials;
                async move { Ok(TransportResponse::new(StatusCode::OK).url(url)) }
            }))
            .credentials(Credentials::SameOrigin)
            .build()
            .unwrap();

        client.request("/a").send().await.unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(Credentials::SameOrigin));

        client
            .request("/b")
            .call(CallOptions::new().credentials(Credentials::Include))
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(Credentials::Include));
    }

    #[tokio::test]
    async fn test_no_success_url_falls_back_to_request_url() {
        let client = Client::builder()
            .transport(FnTransport::new(|_, _| async move {
                // Transport reports no final URL.
                Ok(TransportResponse::new(StatusCode::INTERNAL_SERVER_ERROR))
            }))
            .build()
            .unwrap();

        let error = client.request("/fallback").send().await.unwrap_err();
        match error {
            FetchError::NoSuccess { url, .. } => assert_eq!(url, "/fallback"),
            other => panic!("expected NoSuccess, got {other:?}"),
        }
    }
}
