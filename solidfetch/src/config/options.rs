//! Call options for per-request configuration.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use indexmap::IndexMap;

use crate::error::FetchError;
use crate::inject::ResolvedInjectables;
use crate::request::Payload;
use crate::value::{Dynamic, resolve_map};

/// Fetch-style credentials mode, forwarded opaquely to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    Omit,
    SameOrigin,
    Include,
}

impl Credentials {
    pub fn as_str(&self) -> &'static str {
        match self {
            Credentials::Omit => "omit",
            Credentials::SameOrigin => "same-origin",
            Credentials::Include => "include",
        }
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request body in one of the accepted forms.
///
/// - [`Fields`](Body::Fields): a mapping of dynamic values, resolved per
///   call and serialized as a JSON object with `Content-Type:
///   application/json` set automatically when absent.
/// - [`Json`](Body::Json): a pre-built JSON document, same content-type
///   handling.
/// - [`Text`](Body::Text): passed through unchanged, no header touched.
/// - [`Bytes`](Body::Bytes): passed through untouched.
/// - [`Resolver`](Body::Resolver): a one-argument closure over the resolved
///   injectables; its output is used as-is and not re-resolved.
#[derive(Clone)]
pub enum Body {
    Fields(IndexMap<String, Dynamic>),
    Json(serde_json::Value),
    Text(String),
    Bytes(Bytes),
    Resolver(Arc<dyn Fn(&ResolvedInjectables) -> Payload + Send + Sync>),
}

impl Body {
    /// Build a JSON body from any serializable value.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self, FetchError> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(|e| FetchError::Encode(e.to_string()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Body::Text(text.into())
    }

    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        Body::Bytes(bytes.into())
    }

    /// Build a body from a resolver closure.
    pub fn from_fn<F>(resolver: F) -> Self
    where
        F: Fn(&ResolvedInjectables) -> Payload + Send + Sync + 'static,
    {
        Body::Resolver(Arc::new(resolver))
    }

    /// Resolve into a concrete payload.
    pub(crate) fn to_payload(&self, injectables: &ResolvedInjectables) -> Payload {
        match self {
            Body::Fields(fields) => {
                let object = resolve_map(fields, injectables)
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect::<serde_json::Map<String, serde_json::Value>>();
                Payload::Json(serde_json::Value::Object(object))
            }
            Body::Json(value) => Payload::Json(value.clone()),
            Body::Text(text) => Payload::Text(text.clone()),
            Body::Bytes(bytes) => Payload::Bytes(bytes.clone()),
            Body::Resolver(resolver) => resolver(injectables),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
            Body::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Body::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Body::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Body::Resolver(_) => f.debug_tuple("Resolver").finish(),
        }
    }
}

/// Options for a single call.
///
/// Query and header entries merge over the client's global entries; later
/// same-named keys override. The method defaults to `GET`.
///
/// # Example
///
/// ```ignore
/// use solidfetch::{Body, CallOptions, Method};
///
/// let options = CallOptions::new()
///     .method(Method::POST)
///     .query("active", true)
///     .header("x-request-id", "abc-123")
///     .body(Body::json(&payload)?);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub(crate) method: Option<Method>,
    pub(crate) query: IndexMap<String, Dynamic>,
    pub(crate) headers: IndexMap<String, Dynamic>,
    pub(crate) body: Option<Body>,
    pub(crate) credentials: Option<Credentials>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method for this call.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Add a query parameter; values may be literals or resolvers.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<Dynamic>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header; values may be literals or resolvers.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<Dynamic>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a JSON body from any serializable value.
    pub fn json<T: serde::Serialize>(self, value: &T) -> Result<Self, FetchError> {
        Ok(self.body(Body::json(value)?))
    }

    /// Override the client's credentials mode for this call.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}
