//! Client construction.

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use crate::client::{Client, ClientInner};
use crate::config::Credentials;
use crate::error::FetchError;
use crate::inject::{Injectable, Injectables};
use crate::interceptor::{Chain, Intercept};
use crate::request::RequestParts;
use crate::response::FetchResult;
use crate::transport::Transport;
use crate::value::Dynamic;

/// Error returned by [`ClientBuilder::build`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuildError {
    /// No transport was configured; the client cannot send requests.
    #[error("no transport configured; set one with ClientBuilder::transport")]
    MissingTransport,
}

/// Builder for [`Client`].
///
/// A transport is the only required piece; everything else — injectables,
/// interceptor chains, global query and header entries, a credentials mode —
/// is optional.
///
/// # Example
///
/// ```ignore
/// use solidfetch::{Client, Injectable};
///
/// let client = Client::builder()
///     .transport(my_transport)
///     .injectable("token", Injectable::from_fn(|| current_token().into()))
///     .query("locale", "en")
///     .build()?;
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    injectables: Injectables,
    request_chain: Chain<RequestParts>,
    response_chain: Chain<FetchResult>,
    error_chain: Chain<FetchError>,
    global_query: IndexMap<String, Dynamic>,
    global_headers: IndexMap<String, Dynamic>,
    credentials: Option<Credentials>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transport every call delegates to.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set an already shared transport.
    pub fn transport_arc(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Register a single injectable.
    pub fn injectable(mut self, name: impl Into<String>, value: impl Into<Injectable>) -> Self {
        self.injectables.insert(name, value);
        self
    }

    /// Merge a set of injectables; same-named keys override.
    pub fn injectables(mut self, injectables: Injectables) -> Self {
        self.injectables.merge(injectables);
        self
    }

    /// Append a request interceptor; interceptors run in registration order.
    pub fn request_interceptor(mut self, step: impl Intercept<RequestParts> + 'static) -> Self {
        self.request_chain.push(Arc::new(step));
        self
    }

    /// Append a response interceptor.
    pub fn response_interceptor(mut self, step: impl Intercept<FetchResult> + 'static) -> Self {
        self.response_chain.push(Arc::new(step));
        self
    }

    /// Append an error interceptor.
    pub fn error_interceptor(mut self, step: impl Intercept<FetchError> + 'static) -> Self {
        self.error_chain.push(Arc::new(step));
        self
    }

    /// Add a query parameter sent with every call. Per-call entries with the
    /// same key override it.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<Dynamic>) -> Self {
        self.global_query.insert(key.into(), value.into());
        self
    }

    /// Add a header sent with every call. Per-call entries with the same
    /// name override it.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<Dynamic>) -> Self {
        self.global_headers.insert(name.into(), value.into());
        self
    }

    /// Set the default credentials mode for every call.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn build(self) -> Result<Client, BuildError> {
        let transport = self.transport.ok_or(BuildError::MissingTransport)?;
        Ok(Client::from_inner(ClientInner {
            transport,
            injectables: RwLock::new(self.injectables),
            request_chain: self.request_chain,
            response_chain: self.response_chain,
            error_chain: self.error_chain,
            global_query: self.global_query,
            global_headers: self.global_headers,
            credentials: self.credentials,
        }))
    }
}
